pub mod sim_op;
pub mod simulation;

pub use simulation::{SimProps, Simulation};
