//! Explicit pore-pressure diffusion stepper
//!
//! Advances the overpressure field with a conservative flux-form update:
//! - face mobility is the arithmetic mean of the two adjacent `k/phi` values
//! - Dirichlet top (`P*[0] = 0`), zero-gradient bottom (`P*[nz-1] = P*[nz-2]`)
//! - Jacobi sweep: every node reads the previous iterate only, then the buffers swap

use crate::constants::SECONDS_PER_YEAR;
use crate::error::{PressureError, Result};
use serde::{Deserialize, Serialize};

/// How far down the interior stencil reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BottomStencil {
    /// Stencil on `1..=nz-2`; the bottom node copies `nz-2`.
    #[default]
    Full,
    /// Stencil on `1..=nz-3`; node `nz-2` keeps its previous value and the
    /// bottom node copies it.
    Frozen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapshotMode {
    /// First iteration where `floor(elapsed_years) == year`. May never fire when
    /// one step spans more than a year.
    #[default]
    ExactYear,
    /// First iteration where `elapsed_years >= year`.
    FirstCrossing,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapshotPolicy {
    pub year: u32,
    pub mode: SnapshotMode,
}

impl SnapshotPolicy {
    pub fn is_due(&self, elapsed_years: f64) -> bool {
        match self.mode {
            SnapshotMode::ExactYear => elapsed_years.floor() == self.year as f64,
            SnapshotMode::FirstCrossing => elapsed_years >= self.year as f64,
        }
    }
}

/// Absolute pressure profile captured mid-transient
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub iteration: usize,
    pub elapsed_years: f64,
    pub pressure: Vec<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Overpressure fell below the threshold fraction of steady pressure everywhere
    Converged,
    /// Iteration cap reached first; the profile may still be relaxing
    BudgetExhausted,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepperSettings {
    pub dz: f64,
    pub dt_seconds: f64,
    pub bulk_modulus_pa: f64,
    pub viscosity_pa_s: f64,
    pub max_iterations: usize,
    pub convergence_threshold: f64,
    pub snapshot: SnapshotPolicy,
    pub bottom_stencil: BottomStencil,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StepperOutcome {
    pub termination: Termination,
    pub iterations: usize,
    pub elapsed_years: f64,
    pub final_overpressure: Vec<f64>,
    pub snapshot: Option<Snapshot>,
}

#[derive(Debug, Clone)]
pub struct DiffusionStepper {
    mobility: Vec<f64>,
    steady_pressure: Vec<f64>,
    current: Vec<f64>,
    next: Vec<f64>,
    settings: StepperSettings,
    /// `dt * K / mu`
    coefficient: f64,
    iteration: usize,
    max_relative: f64,
    snapshot: Option<Snapshot>,
}

impl DiffusionStepper {
    pub fn new(
        mobility: Vec<f64>,
        steady_pressure: Vec<f64>,
        initial_overpressure: Vec<f64>,
        settings: StepperSettings,
    ) -> Result<Self> {
        let nz = initial_overpressure.len();
        if nz < 3 {
            return Err(PressureError::invalid(
                "step_count",
                format!("need at least 3 nodes, got {nz}"),
            ));
        }
        if mobility.len() != nz || steady_pressure.len() != nz {
            return Err(PressureError::invalid(
                "step_count",
                format!(
                    "profile lengths differ: mobility {}, steady {}, overpressure {nz}",
                    mobility.len(),
                    steady_pressure.len()
                ),
            ));
        }
        if let Some(index) = steady_pressure.iter().position(|&p| p == 0.0) {
            return Err(PressureError::ZeroSteadyPressure { index });
        }
        require_positive("dt_seconds", settings.dt_seconds)?;
        require_positive("vertical_resolution_m", settings.dz)?;
        require_positive("water_bulk_modulus_pa", settings.bulk_modulus_pa)?;
        require_positive("viscosity_pa_s", settings.viscosity_pa_s)?;
        if settings.max_iterations == 0 {
            return Err(PressureError::invalid("max_iterations", "must be at least 1"));
        }
        if !(settings.convergence_threshold > 0.0 && settings.convergence_threshold < 1.0) {
            return Err(PressureError::invalid(
                "convergence_threshold",
                format!("must lie in (0, 1), got {}", settings.convergence_threshold),
            ));
        }

        let coefficient = settings.dt_seconds * settings.bulk_modulus_pa / settings.viscosity_pa_s;
        require_positive("dt_seconds", coefficient)?;
        let max_relative = max_relative_deviation(&initial_overpressure, &steady_pressure);

        Ok(Self {
            mobility,
            steady_pressure,
            next: vec![0.0; nz],
            current: initial_overpressure,
            settings,
            coefficient,
            iteration: 0,
            max_relative,
            snapshot: None,
        })
    }

    /// One Jacobi sweep. Returns the new max relative overpressure.
    pub fn advance(&mut self) -> f64 {
        let nz = self.current.len();
        let dz = self.settings.dz;
        let last_stencil = match self.settings.bottom_stencil {
            BottomStencil::Full => nz - 2,
            BottomStencil::Frozen => nz - 3,
        };

        let old = &self.current;
        let new = &mut self.next;
        let m = &self.mobility;

        new[0] = 0.0;
        for j in 1..=last_stencil {
            let flux_up = 0.5 * (m[j + 1] + m[j]) * (old[j + 1] - old[j]) / dz;
            let flux_down = 0.5 * (m[j - 1] + m[j]) * (old[j] - old[j - 1]) / dz;
            new[j] = old[j] + self.coefficient * (flux_up - flux_down) / dz;
        }
        if self.settings.bottom_stencil == BottomStencil::Frozen {
            new[nz - 2] = old[nz - 2];
        }
        new[nz - 1] = new[nz - 2];

        std::mem::swap(&mut self.current, &mut self.next);
        self.iteration += 1;
        self.max_relative = max_relative_deviation(&self.current, &self.steady_pressure);

        if self.snapshot.is_none() && self.settings.snapshot.is_due(self.elapsed_years()) {
            self.snapshot = Some(Snapshot {
                iteration: self.iteration,
                elapsed_years: self.elapsed_years(),
                pressure: self
                    .steady_pressure
                    .iter()
                    .zip(&self.current)
                    .map(|(steady, over)| steady + over)
                    .collect(),
            });
        }

        self.max_relative
    }

    /// `Some` once the run should stop; convergence wins over the budget.
    pub fn termination(&self) -> Option<Termination> {
        if self.iteration == 0 {
            None
        } else if self.max_relative < self.settings.convergence_threshold {
            Some(Termination::Converged)
        } else if self.iteration >= self.settings.max_iterations {
            Some(Termination::BudgetExhausted)
        } else {
            None
        }
    }

    pub fn run(&mut self) -> StepperOutcome {
        self.run_with(|_| {})
    }

    /// Advance until converged or out of budget, handing the stepper to `observer`
    /// after every iteration.
    pub fn run_with<F>(&mut self, mut observer: F) -> StepperOutcome
    where
        F: FnMut(&DiffusionStepper),
    {
        loop {
            self.advance();
            observer(self);
            if let Some(termination) = self.termination() {
                return self.outcome(termination);
            }
        }
    }

    pub fn outcome(&self, termination: Termination) -> StepperOutcome {
        StepperOutcome {
            termination,
            iterations: self.iteration,
            elapsed_years: self.elapsed_years(),
            final_overpressure: self.current.clone(),
            snapshot: self.snapshot.clone(),
        }
    }

    pub fn overpressure(&self) -> &[f64] {
        &self.current
    }

    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn elapsed_years(&self) -> f64 {
        self.settings.dt_seconds * self.iteration as f64 / SECONDS_PER_YEAR
    }

    pub fn max_relative_overpressure(&self) -> f64 {
        self.max_relative
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        self.snapshot.as_ref()
    }
}

/// `max_j |overpressure[j] / steady[j]|`; NaN anywhere makes the result NaN,
/// which never passes a `<` threshold test.
pub fn max_relative_deviation(overpressure: &[f64], steady_pressure: &[f64]) -> f64 {
    overpressure
        .iter()
        .zip(steady_pressure)
        .map(|(p, s)| (p / s).abs())
        .fold(0.0, |acc, r| if r.is_nan() || r > acc { r } else { acc })
}

fn require_positive(field: &'static str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(PressureError::invalid(field, format!("must be positive and finite, got {value}")))
    }
}
