//! Stability limit of the explicit pore-pressure diffusion scheme.
//!
//! The local diffusivity of node `j` is `D = k * K / (phi * mu)`. The fastest-diffusing
//! node governs the explicit limit, so the time step is taken from `alpha = max(D)`:
//! `dt = floor(0.5 * dz² / alpha)`.

use crate::constants::STABILITY_FACTOR;
use crate::error::{PressureError, Result};
use crate::sediment::SedimentColumn;
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StabilityLimit {
    /// Largest local diffusivity (m²/s)
    pub alpha: f64,
    /// Whole seconds per explicit step
    pub dt_seconds: f64,
    pub dz: f64,
}

impl StabilityLimit {
    pub fn from_column(
        column: &SedimentColumn,
        bulk_modulus_pa: f64,
        viscosity_pa_s: f64,
    ) -> Result<Self> {
        let alpha = diffusivity_bound(column, bulk_modulus_pa, viscosity_pa_s)?;
        let dt_seconds = stable_time_step(column.dz, alpha)?;
        debug!(alpha, dt_seconds, dz = column.dz, "explicit stability limit");
        Ok(Self {
            alpha,
            dt_seconds,
            dz: column.dz,
        })
    }

    /// `dt * alpha / dz²`; never above the 0.5 explicit limit
    pub fn courant_number(&self) -> f64 {
        self.dt_seconds * self.alpha / (self.dz * self.dz)
    }
}

/// Local diffusivity `k * K / (phi * mu)` at every node
pub fn diffusivity_profile(
    column: &SedimentColumn,
    bulk_modulus_pa: f64,
    viscosity_pa_s: f64,
) -> Vec<f64> {
    column
        .permeability
        .iter()
        .zip(&column.porosity)
        .map(|(k, phi)| (k * bulk_modulus_pa) / (phi * viscosity_pa_s))
        .collect()
}

/// `alpha = max_j D[j]`; fails when the bound is zero, negative or not finite.
pub fn diffusivity_bound(
    column: &SedimentColumn,
    bulk_modulus_pa: f64,
    viscosity_pa_s: f64,
) -> Result<f64> {
    let alpha = diffusivity_profile(column, bulk_modulus_pa, viscosity_pa_s)
        .into_iter()
        .fold(f64::NEG_INFINITY, f64::max);

    if !(alpha > 0.0) || !alpha.is_finite() {
        return Err(PressureError::DegenerateDiffusivity { alpha });
    }
    Ok(alpha)
}

pub fn stable_time_step(dz: f64, alpha: f64) -> Result<f64> {
    if !(alpha > 0.0) || !alpha.is_finite() {
        return Err(PressureError::DegenerateDiffusivity { alpha });
    }
    let dt = (STABILITY_FACTOR * dz * dz / alpha).floor();
    if dt < 1.0 {
        return Err(PressureError::TimeStepUnderflow { alpha, dz });
    }
    Ok(dt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sediment::SedimentLaws;
    use approx::assert_relative_eq;
    use more_asserts::{assert_ge, assert_le};

    fn default_column() -> SedimentColumn {
        SedimentColumn::build(20.0, 41, 800.0, 1024.0, &SedimentLaws::default()).unwrap()
    }

    #[test]
    fn test_alpha_is_max_local_diffusivity() {
        let column = default_column();
        let alpha = diffusivity_bound(&column, 2.25e9, 0.001).unwrap();

        let mut expected = 0.0f64;
        for j in 0..column.len() {
            let d = column.permeability[j] * 2.25e9 / (column.porosity[j] * 0.001);
            expected = expected.max(d);
        }
        assert_eq!(alpha, expected);
        // porosity and permeability both peak at the seafloor
        assert_relative_eq!(
            alpha,
            column.permeability[0] * 2.25e9 / (column.porosity[0] * 0.001),
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_time_step_is_floored_half_limit() {
        let column = default_column();
        let limit = StabilityLimit::from_column(&column, 2.25e9, 0.001).unwrap();
        assert_eq!(limit.dt_seconds, (0.5 * 20.0 * 20.0 / limit.alpha).floor());
        assert_eq!(limit.dt_seconds.fract(), 0.0);
        assert_ge!(limit.dt_seconds, 1.0);
        assert_le!(limit.courant_number(), 0.5);
    }

    #[test]
    fn test_zero_diffusivity_fails_fast() {
        assert!(matches!(
            stable_time_step(20.0, 0.0),
            Err(PressureError::DegenerateDiffusivity { .. })
        ));
        assert!(matches!(
            stable_time_step(20.0, f64::NAN),
            Err(PressureError::DegenerateDiffusivity { .. })
        ));
    }

    #[test]
    fn test_zero_bulk_modulus_gives_degenerate_bound() {
        let column = default_column();
        assert!(matches!(
            diffusivity_bound(&column, 0.0, 0.001),
            Err(PressureError::DegenerateDiffusivity { .. })
        ));
    }

    #[test]
    fn test_sub_second_step_is_rejected() {
        assert!(matches!(
            stable_time_step(0.01, 1.0),
            Err(PressureError::TimeStepUnderflow { .. })
        ));
    }
}
