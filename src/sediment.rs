// src/sediment.rs - Depth grid and sediment properties of the column

use crate::constants::{
    GRAVITY_M_S2, LOG_PERMEABILITY_INTERCEPT, LOG_PERMEABILITY_SLOPE, POROSITY_DECAY_LENGTH_M,
    SURFACE_POROSITY,
};
use crate::error::{PressureError, Result};
use serde::{Deserialize, Serialize};

/// Empirical laws mapping depth to porosity and porosity to permeability.
///
/// `phi(z) = surface_porosity * exp(-z / decay_length_m)`
/// `k(phi) = 10^(log_k_slope * phi + log_k_intercept)` in m²
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SedimentLaws {
    pub surface_porosity: f64,
    pub decay_length_m: f64,
    pub log_k_slope: f64,
    pub log_k_intercept: f64,
}

impl Default for SedimentLaws {
    fn default() -> Self {
        Self {
            surface_porosity: SURFACE_POROSITY,
            decay_length_m: POROSITY_DECAY_LENGTH_M,
            log_k_slope: LOG_PERMEABILITY_SLOPE,
            log_k_intercept: LOG_PERMEABILITY_INTERCEPT,
        }
    }
}

impl SedimentLaws {
    pub fn porosity_at(&self, depth_m: f64) -> f64 {
        self.surface_porosity * (-depth_m / self.decay_length_m).exp()
    }

    pub fn permeability_for(&self, porosity: f64) -> f64 {
        10f64.powf(self.log_k_slope * porosity + self.log_k_intercept)
    }
}

/// Hydrostatic pressure (Pa) at `depth_m` below a seafloor lying `seafloor_depth_m` under sea level
pub fn hydrostatic_pressure(depth_m: f64, seafloor_depth_m: f64, water_density_kg_m3: f64) -> f64 {
    (depth_m + seafloor_depth_m) * water_density_kg_m3 * GRAVITY_M_S2
}

/// Hydrostatic profile over every node of `depth`
pub fn hydrostatic_profile(
    depth: &[f64],
    seafloor_depth_m: f64,
    water_density_kg_m3: f64,
) -> Vec<f64> {
    depth
        .iter()
        .map(|&z| hydrostatic_pressure(z, seafloor_depth_m, water_density_kg_m3))
        .collect()
}

/// The discretised sediment column: immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct SedimentColumn {
    pub dz: f64,
    pub depth: Vec<f64>,
    pub porosity: Vec<f64>,
    pub permeability: Vec<f64>,
    /// Hydrostatic pressure under the seafloor depth before the change
    pub initial_pressure: Vec<f64>,
}

impl SedimentColumn {
    /// Build the depth grid `depth[j] = j * dz` and derive every property from it.
    pub fn build(
        dz: f64,
        step_count: usize,
        seafloor_depth_m: f64,
        water_density_kg_m3: f64,
        laws: &SedimentLaws,
    ) -> Result<Self> {
        if !(dz > 0.0) || !dz.is_finite() {
            return Err(PressureError::invalid(
                "vertical_resolution_m",
                format!("must be positive, got {dz}"),
            ));
        }

        let depth: Vec<f64> = (0..step_count).map(|j| j as f64 * dz).collect();
        let porosity: Vec<f64> = depth.iter().map(|&z| laws.porosity_at(z)).collect();
        let permeability: Vec<f64> = porosity
            .iter()
            .map(|&phi| laws.permeability_for(phi))
            .collect();
        let initial_pressure = hydrostatic_profile(&depth, seafloor_depth_m, water_density_kg_m3);

        if let Some((j, phi)) = porosity
            .iter()
            .enumerate()
            .find(|&(_, &phi)| !(phi > 0.0 && phi < 1.0))
        {
            return Err(PressureError::invalid(
                "sediment.surface_porosity",
                format!("porosity {phi} at index {j} is outside (0, 1)"),
            ));
        }
        if let Some((j, k)) = permeability
            .iter()
            .enumerate()
            .find(|&(_, &k)| !(k > 0.0) || !k.is_finite())
        {
            return Err(PressureError::invalid(
                "sediment.log_k_intercept",
                format!("permeability {k} at index {j} is not a positive finite value"),
            ));
        }

        Ok(Self {
            dz,
            depth,
            porosity,
            permeability,
            initial_pressure,
        })
    }

    pub fn len(&self) -> usize {
        self.depth.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depth.is_empty()
    }

    /// Mobility `k / phi` at every node; the coefficient averaged onto cell faces by the stepper.
    pub fn mobility(&self) -> Vec<f64> {
        self.permeability
            .iter()
            .zip(&self.porosity)
            .map(|(k, phi)| k / phi)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use more_asserts::{assert_gt, assert_lt};

    fn default_column() -> SedimentColumn {
        SedimentColumn::build(20.0, 41, 800.0, 1024.0, &SedimentLaws::default()).unwrap()
    }

    #[test]
    fn test_depth_grid_spacing() {
        let column = default_column();
        assert_eq!(column.len(), 41);
        assert_eq!(column.depth[0], 0.0);
        assert_eq!(column.depth[1], 20.0);
        assert_eq!(column.depth[40], 800.0);
    }

    #[test]
    fn test_initial_pressure_is_hydrostatic() {
        let column = default_column();
        assert_abs_diff_eq!(column.initial_pressure[0], 800.0 * 1024.0 * 9.80665, epsilon = 1e-6);
        assert_abs_diff_eq!(
            column.initial_pressure[10],
            (200.0 + 800.0) * 1024.0 * 9.80665,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_porosity_decays_with_depth() {
        let column = default_column();
        assert_abs_diff_eq!(column.porosity[0], 0.775, epsilon = 1e-12);
        assert_abs_diff_eq!(
            column.porosity[40],
            0.775 * (-800.0f64 / 1251.0).exp(),
            epsilon = 1e-12
        );
        for pair in column.porosity.windows(2) {
            assert_lt!(pair[1], pair[0]);
        }
    }

    #[test]
    fn test_permeability_law() {
        let column = default_column();
        for (phi, k) in column.porosity.iter().zip(&column.permeability) {
            assert_abs_diff_eq!(k.log10(), 8.3887 * phi - 20.862, epsilon = 1e-9);
            assert_gt!(*k, 0.0);
        }
        // surface sediment is in the 1e-15 m² range
        assert_gt!(column.permeability[0], 1e-15);
        assert_lt!(column.permeability[0], 1e-14);
    }

    #[test]
    fn test_build_is_idempotent() {
        let a = default_column();
        let b = default_column();
        assert_eq!(a, b);
        let bits = |v: &[f64]| v.iter().map(|x| x.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a.porosity), bits(&b.porosity));
        assert_eq!(bits(&a.permeability), bits(&b.permeability));
        assert_eq!(bits(&a.initial_pressure), bits(&b.initial_pressure));
    }

    #[test]
    fn test_rejects_non_positive_resolution() {
        let err =
            SedimentColumn::build(-20.0, 41, 800.0, 1024.0, &SedimentLaws::default()).unwrap_err();
        assert!(matches!(err, PressureError::InvalidConfig { field: "vertical_resolution_m", .. }));
    }

    #[test]
    fn test_rejects_porosity_outside_unit_interval() {
        let laws = SedimentLaws {
            surface_porosity: 1.2,
            ..SedimentLaws::default()
        };
        assert!(SedimentColumn::build(20.0, 41, 800.0, 1024.0, &laws).is_err());
    }

    #[test]
    fn test_mobility_is_permeability_over_porosity() {
        let column = default_column();
        let mobility = column.mobility();
        assert_eq!(mobility.len(), column.len());
        assert_abs_diff_eq!(
            mobility[3],
            column.permeability[3] / column.porosity[3],
            epsilon = 1e-30
        );
    }
}
