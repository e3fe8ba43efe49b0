pub mod config;
pub mod constants;
pub mod error;
pub mod math_utils;
pub mod report;
pub mod sediment;
pub mod sim;
pub mod stability;
pub mod stepper;
pub mod target;

pub use config::PressureConfig;
pub use error::{PressureError, Result};
pub use report::PressureReport;
pub use sim::{SimProps, Simulation};
pub use stepper::{BottomStencil, DiffusionStepper, SnapshotMode, Termination};
