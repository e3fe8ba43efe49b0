use crate::error::{PressureError, Result};
use crate::sediment::{SedimentColumn, hydrostatic_profile};

/// Hydrostatic state the column relaxes toward after the sea-level change,
/// and the overpressure the stepper starts from.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetState {
    pub steady_pressure: Vec<f64>,
    pub initial_overpressure: Vec<f64>,
}

impl TargetState {
    pub fn build(
        column: &SedimentColumn,
        new_seafloor_depth_m: f64,
        water_density_kg_m3: f64,
    ) -> Result<Self> {
        let steady_pressure =
            hydrostatic_profile(&column.depth, new_seafloor_depth_m, water_density_kg_m3);

        // relative convergence divides by the steady pressure
        if let Some(index) = steady_pressure.iter().position(|&p| p == 0.0) {
            return Err(PressureError::ZeroSteadyPressure { index });
        }

        let mut initial_overpressure: Vec<f64> = column
            .initial_pressure
            .iter()
            .zip(&steady_pressure)
            .map(|(initial, steady)| initial - steady)
            .collect();
        if let Some(top) = initial_overpressure.first_mut() {
            *top = 0.0;
        }

        Ok(Self {
            steady_pressure,
            initial_overpressure,
        })
    }

    /// `steady + overpressure` at every node
    pub fn absolute_pressure(&self, overpressure: &[f64]) -> Vec<f64> {
        self.steady_pressure
            .iter()
            .zip(overpressure)
            .map(|(steady, over)| steady + over)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::GRAVITY_M_S2;
    use crate::sediment::SedimentLaws;
    use approx::assert_abs_diff_eq;

    fn column(seafloor_depth_m: f64) -> SedimentColumn {
        SedimentColumn::build(20.0, 41, seafloor_depth_m, 1024.0, &SedimentLaws::default()).unwrap()
    }

    #[test]
    fn test_steady_pressure_uses_new_seafloor() {
        let target = TargetState::build(&column(800.0), 650.0, 1024.0).unwrap();
        assert_abs_diff_eq!(
            target.steady_pressure[0],
            650.0 * 1024.0 * GRAVITY_M_S2,
            epsilon = 1e-6
        );
        assert_abs_diff_eq!(
            target.steady_pressure[40],
            (800.0 + 650.0) * 1024.0 * GRAVITY_M_S2,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_initial_overpressure_is_water_column_drop() {
        let target = TargetState::build(&column(800.0), 650.0, 1024.0).unwrap();
        assert_eq!(target.initial_overpressure[0], 0.0);
        let expected = 150.0 * 1024.0 * GRAVITY_M_S2;
        for &p in &target.initial_overpressure[1..] {
            assert_abs_diff_eq!(p, expected, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_absolute_pressure_restores_initial_below_seafloor() {
        let col = column(800.0);
        let target = TargetState::build(&col, 650.0, 1024.0).unwrap();
        let absolute = target.absolute_pressure(&target.initial_overpressure);
        assert_eq!(absolute[0], target.steady_pressure[0]);
        for j in 1..col.len() {
            assert_abs_diff_eq!(absolute[j], col.initial_pressure[j], epsilon = 1e-6);
        }
    }

    #[test]
    fn test_zero_steady_pressure_fails_fast() {
        let err = TargetState::build(&column(800.0), 0.0, 1024.0).unwrap_err();
        assert!(matches!(err, PressureError::ZeroSteadyPressure { index: 0 }));
    }
}
