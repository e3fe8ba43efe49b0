mod sim_op_progress_reporter;

pub use sim_op_progress_reporter::ProgressReporterOp;

use crate::report::PressureReport;
use crate::sim::Simulation;

/// Observer hooks around a pressure simulation run. Ops read the simulation;
/// the stepper alone mutates the pressure state.
pub trait SimOp {
    /// The name of this operator (for identification and lookup)
    fn name(&self) -> &str;

    /// Called once before the first iteration
    fn init_sim(&mut self, _sim: &Simulation) {
        // Default implementation does nothing
    }

    /// Called after every completed iteration
    fn update_sim(&mut self, _sim: &Simulation) {
        // Default implementation does nothing
    }

    /// Called once with the final report
    fn after_sim(&mut self, _sim: &Simulation, _report: &PressureReport) {
        // Default implementation does nothing
    }
}

pub struct SimOpHandle {
    pub op: Box<dyn SimOp>,
}

impl SimOpHandle {
    /// Create a new SimOpHandle with the given operation
    pub fn new(op: Box<dyn SimOp>) -> Self {
        SimOpHandle { op }
    }
}
