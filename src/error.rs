//! Errors raised while configuring or setting up a pressure simulation

use std::path::PathBuf;
use thiserror::Error;

/// Crate result type
pub type Result<T> = std::result::Result<T, PressureError>;

#[derive(Debug, Error)]
pub enum PressureError {
    #[error("invalid configuration for {field}: {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("diffusivity bound must be positive and finite, got {alpha}")]
    DegenerateDiffusivity { alpha: f64 },

    #[error("stable time step floors to zero (alpha = {alpha} m²/s, dz = {dz} m)")]
    TimeStepUnderflow { alpha: f64, dz: f64 },

    #[error("steady-state pressure is zero at depth index {index}")]
    ZeroSteadyPressure { index: usize },

    #[error("failed to read config {}: {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl PressureError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        PressureError::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }
}
