use crate::error::Result;
use crate::math_utils::inverse_lerp;
use crate::sediment::SedimentColumn;
use crate::stability::StabilityLimit;
use crate::stepper::{Snapshot, StepperOutcome, Termination};
use crate::target::TargetState;
use serde::Serialize;

/// Everything a plotter or summary needs from a finished run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PressureReport {
    pub name: String,
    pub termination: Termination,
    pub iterations: usize,
    pub elapsed_years: f64,
    pub dt_seconds: f64,
    pub alpha: f64,
    pub depth: Vec<f64>,
    pub initial_pressure: Vec<f64>,
    pub steady_pressure: Vec<f64>,
    pub final_pressure: Vec<f64>,
    pub final_overpressure: Vec<f64>,
    pub snapshot: Option<Snapshot>,
    pub porosity: Vec<f64>,
    pub permeability: Vec<f64>,
}

/// One depth node of a report, in plotting order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProfileRow {
    pub depth_m: f64,
    pub initial_pa: f64,
    pub snapshot_pa: Option<f64>,
    pub final_pa: f64,
    pub steady_pa: f64,
    pub permeability_m2: f64,
    pub porosity: f64,
}

impl PressureReport {
    pub fn new(
        name: &str,
        column: &SedimentColumn,
        stability: &StabilityLimit,
        target: &TargetState,
        outcome: StepperOutcome,
    ) -> Self {
        Self {
            name: name.to_string(),
            termination: outcome.termination,
            iterations: outcome.iterations,
            elapsed_years: outcome.elapsed_years,
            dt_seconds: stability.dt_seconds,
            alpha: stability.alpha,
            depth: column.depth.clone(),
            initial_pressure: column.initial_pressure.clone(),
            steady_pressure: target.steady_pressure.clone(),
            final_pressure: target.absolute_pressure(&outcome.final_overpressure),
            final_overpressure: outcome.final_overpressure,
            snapshot: outcome.snapshot,
            porosity: column.porosity.clone(),
            permeability: column.permeability.clone(),
        }
    }

    pub fn converged(&self) -> bool {
        self.termination == Termination::Converged
    }

    /// How far node `j` has moved from its initial toward its steady pressure
    /// (0 = untouched, 1 = fully relaxed). The seafloor node always reads 1.
    pub fn relaxation_fraction(&self, j: usize) -> f64 {
        inverse_lerp(self.initial_pressure[j], self.steady_pressure[j], self.final_pressure[j])
    }

    pub fn profile_rows(&self) -> Vec<ProfileRow> {
        (0..self.depth.len())
            .map(|j| ProfileRow {
                depth_m: self.depth[j],
                initial_pa: self.initial_pressure[j],
                snapshot_pa: self.snapshot.as_ref().map(|s| s.pressure[j]),
                final_pa: self.final_pressure[j],
                steady_pa: self.steady_pressure[j],
                permeability_m2: self.permeability[j],
                porosity: self.porosity[j],
            })
            .collect()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sediment::SedimentLaws;

    fn report(snapshot: Option<Snapshot>) -> PressureReport {
        let column =
            SedimentColumn::build(20.0, 5, 800.0, 1024.0, &SedimentLaws::default()).unwrap();
        let stability = StabilityLimit::from_column(&column, 2.25e9, 0.001).unwrap();
        let target = TargetState::build(&column, 650.0, 1024.0).unwrap();
        let outcome = StepperOutcome {
            termination: Termination::BudgetExhausted,
            iterations: 7,
            elapsed_years: 0.5,
            final_overpressure: vec![0.0, 10.0, 20.0, 30.0, 30.0],
            snapshot,
        };
        PressureReport::new("unit", &column, &stability, &target, outcome)
    }

    #[test]
    fn test_final_pressure_adds_overpressure_to_steady() {
        let report = report(None);
        assert_eq!(report.final_pressure[0], report.steady_pressure[0]);
        assert_eq!(report.final_pressure[2], report.steady_pressure[2] + 20.0);
        assert!(!report.converged());
    }

    #[test]
    fn test_relaxation_fraction() {
        let report = report(None);
        // initial overpressure is ~1.5 MPa, 20 Pa of it remains at node 2
        let fraction = report.relaxation_fraction(2);
        assert!(fraction > 0.99 && fraction < 1.0);
        assert_eq!(report.relaxation_fraction(0), 1.0);
    }

    #[test]
    fn test_profile_rows_tolerate_missing_snapshot() {
        let rows = report(None).profile_rows();
        assert_eq!(rows.len(), 5);
        assert!(rows.iter().all(|row| row.snapshot_pa.is_none()));
        assert_eq!(rows[4].depth_m, 80.0);
    }

    #[test]
    fn test_profile_rows_carry_snapshot() {
        let snapshot = Snapshot {
            iteration: 3,
            elapsed_years: 0.2,
            pressure: vec![1.0, 2.0, 3.0, 4.0, 5.0],
        };
        let rows = report(Some(snapshot)).profile_rows();
        assert_eq!(rows[3].snapshot_pa, Some(4.0));
    }

    #[test]
    fn test_json_export_names_termination() {
        let json = report(None).to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["termination"], "budget_exhausted");
        assert_eq!(value["iterations"], 7);
        assert!(value["snapshot"].is_null());
    }
}
