// src/config.rs - Scalar inputs of a pressure simulation

use crate::constants::*;
use crate::error::{PressureError, Result};
use crate::sediment::SedimentLaws;
use crate::stepper::{BottomStencil, SnapshotMode, SnapshotPolicy};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Parameters for a sea-level change experiment
///
/// Every field has a default, so a JSON file only needs the values it overrides:
/// ```
/// use seafloor_pressure::config::PressureConfig;
///
/// let config = PressureConfig::from_json_str(r#"{ "new_seafloor_depth_m": 700.0 }"#).unwrap();
/// assert_eq!(config.new_seafloor_depth_m, 700.0);
/// assert_eq!(config.seafloor_depth_m, 800.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PressureConfig {
    /// Seafloor depth below sea level before the change (m)
    pub seafloor_depth_m: f64,
    /// Seafloor depth below sea level after the change (m)
    pub new_seafloor_depth_m: f64,
    pub water_density_kg_m3: f64,
    pub water_bulk_modulus_pa: f64,
    pub viscosity_pa_s: f64,
    /// Node spacing `dz` (m)
    pub vertical_resolution_m: f64,
    /// Number of depth nodes `nz`
    pub step_count: usize,
    pub max_iterations: usize,
    /// Relative overpressure below which the column counts as relaxed
    pub convergence_threshold: f64,
    pub snapshot_year: u32,
    pub snapshot_mode: SnapshotMode,
    pub bottom_stencil: BottomStencil,
    pub sediment: SedimentLaws,
}

impl Default for PressureConfig {
    fn default() -> Self {
        Self {
            seafloor_depth_m: DEFAULT_SEAFLOOR_DEPTH_M,
            new_seafloor_depth_m: DEFAULT_NEW_SEAFLOOR_DEPTH_M,
            water_density_kg_m3: DEFAULT_WATER_DENSITY_KG_M3,
            water_bulk_modulus_pa: DEFAULT_WATER_BULK_MODULUS_PA,
            viscosity_pa_s: DEFAULT_VISCOSITY_PA_S,
            vertical_resolution_m: DEFAULT_VERTICAL_RESOLUTION_M,
            step_count: DEFAULT_STEP_COUNT,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            convergence_threshold: DEFAULT_CONVERGENCE_THRESHOLD,
            snapshot_year: DEFAULT_SNAPSHOT_YEAR,
            snapshot_mode: SnapshotMode::default(),
            bottom_stencil: BottomStencil::default(),
            sediment: SedimentLaws::default(),
        }
    }
}

impl PressureConfig {
    pub fn from_json_str(json_str: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(file_path: P) -> Result<Self> {
        let path = file_path.as_ref();
        let json_str = fs::read_to_string(path).map_err(|source| PressureError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json_str)
    }

    pub fn snapshot_policy(&self) -> SnapshotPolicy {
        SnapshotPolicy {
            year: self.snapshot_year,
            mode: self.snapshot_mode,
        }
    }

    /// Reject inputs the solver cannot run with. Called before anything is built.
    pub fn validate(&self) -> Result<()> {
        require_positive("vertical_resolution_m", self.vertical_resolution_m)?;
        require_positive("water_density_kg_m3", self.water_density_kg_m3)?;
        require_positive("water_bulk_modulus_pa", self.water_bulk_modulus_pa)?;
        require_positive("viscosity_pa_s", self.viscosity_pa_s)?;
        require_positive("sediment.decay_length_m", self.sediment.decay_length_m)?;
        require_non_negative("seafloor_depth_m", self.seafloor_depth_m)?;
        require_non_negative("new_seafloor_depth_m", self.new_seafloor_depth_m)?;

        if self.step_count < MIN_STEP_COUNT {
            return Err(PressureError::invalid(
                "step_count",
                format!("need at least {MIN_STEP_COUNT} nodes, got {}", self.step_count),
            ));
        }
        if self.max_iterations == 0 {
            return Err(PressureError::invalid("max_iterations", "must be at least 1"));
        }
        if !(self.convergence_threshold > 0.0 && self.convergence_threshold < 1.0) {
            return Err(PressureError::invalid(
                "convergence_threshold",
                format!("must lie in (0, 1), got {}", self.convergence_threshold),
            ));
        }
        if !(self.sediment.surface_porosity > 0.0 && self.sediment.surface_porosity < 1.0) {
            return Err(PressureError::invalid(
                "sediment.surface_porosity",
                format!("must lie in (0, 1), got {}", self.sediment.surface_porosity),
            ));
        }
        Ok(())
    }
}

fn require_positive(field: &'static str, value: f64) -> Result<()> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(PressureError::invalid(field, format!("must be positive, got {value}")))
    }
}

fn require_non_negative(field: &'static str, value: f64) -> Result<()> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(PressureError::invalid(field, format!("must not be negative, got {value}")))
    }
}
