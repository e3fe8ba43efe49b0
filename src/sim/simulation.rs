use crate::config::PressureConfig;
use crate::error::Result;
use crate::report::PressureReport;
use crate::sediment::SedimentColumn;
use crate::sim::sim_op::{SimOp, SimOpHandle};
use crate::stability::StabilityLimit;
use crate::stepper::{DiffusionStepper, StepperSettings, Termination};
use crate::target::TargetState;
use tracing::{info, warn};

pub struct SimProps {
    pub name: &'static str,
    pub config: PressureConfig,
    pub ops: Vec<SimOpHandle>,
}

/// A sea-level change experiment: the built column, its stability limit,
/// the target state and the stepper that relaxes toward it.
pub struct Simulation {
    pub name: String,
    pub config: PressureConfig,
    pub column: SedimentColumn,
    pub stability: StabilityLimit,
    pub target: TargetState,
    pub stepper: DiffusionStepper,
    ops: Vec<Box<dyn SimOp>>,
}

impl Simulation {
    /// Validate the config and build every stage up to a ready stepper.
    pub fn new(props: SimProps) -> Result<Simulation> {
        let config = props.config;
        config.validate()?;

        let column = SedimentColumn::build(
            config.vertical_resolution_m,
            config.step_count,
            config.seafloor_depth_m,
            config.water_density_kg_m3,
            &config.sediment,
        )?;
        let stability = StabilityLimit::from_column(
            &column,
            config.water_bulk_modulus_pa,
            config.viscosity_pa_s,
        )?;
        let target = TargetState::build(
            &column,
            config.new_seafloor_depth_m,
            config.water_density_kg_m3,
        )?;

        let stepper = DiffusionStepper::new(
            column.mobility(),
            target.steady_pressure.clone(),
            target.initial_overpressure.clone(),
            StepperSettings {
                dz: column.dz,
                dt_seconds: stability.dt_seconds,
                bulk_modulus_pa: config.water_bulk_modulus_pa,
                viscosity_pa_s: config.viscosity_pa_s,
                max_iterations: config.max_iterations,
                convergence_threshold: config.convergence_threshold,
                snapshot: config.snapshot_policy(),
                bottom_stencil: config.bottom_stencil,
            },
        )?;

        info!(
            name = props.name,
            nodes = column.len(),
            dt_seconds = stability.dt_seconds,
            alpha = stability.alpha,
            "pressure simulation ready"
        );

        Ok(Simulation {
            name: props.name.to_string(),
            config,
            column,
            stability,
            target,
            stepper,
            ops: props.ops.into_iter().map(|handle| handle.op).collect(),
        })
    }

    /// Completed iterations so far
    pub fn current_step(&self) -> usize {
        self.stepper.iteration()
    }

    pub fn elapsed_years(&self) -> f64 {
        self.stepper.elapsed_years()
    }

    /// Run to convergence or to the iteration cap, then hand back the report.
    pub fn run(mut self) -> PressureReport {
        let mut ops = std::mem::take(&mut self.ops);

        for op in ops.iter_mut() {
            op.init_sim(&self);
        }

        let termination = loop {
            self.stepper.advance();
            for op in ops.iter_mut() {
                op.update_sim(&self);
            }
            if let Some(termination) = self.stepper.termination() {
                break termination;
            }
        };

        let report = self.report(termination);
        match termination {
            Termination::Converged => info!(
                iterations = report.iterations,
                elapsed_years = report.elapsed_years,
                "pressure profile relaxed"
            ),
            Termination::BudgetExhausted => warn!(
                iterations = report.iterations,
                max_relative = self.stepper.max_relative_overpressure(),
                "iteration budget exhausted before convergence"
            ),
        }
        if report.snapshot.is_none() {
            warn!(
                snapshot_year = self.config.snapshot_year,
                elapsed_years = report.elapsed_years,
                "no snapshot captured"
            );
        }

        for op in ops.iter_mut() {
            op.after_sim(&self, &report);
        }
        report
    }

    pub fn report(&self, termination: Termination) -> PressureReport {
        PressureReport::new(
            &self.name,
            &self.column,
            &self.stability,
            &self.target,
            self.stepper.outcome(termination),
        )
    }
}
