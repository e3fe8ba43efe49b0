//! Numeric helpers shared by the solver and its tests

/// Panics unless `actual` lies within `max_deviation` percent of `expected`.
/// An optional trailing format message is appended to the panic text.
#[macro_export]
macro_rules! assert_deviation {
    ($actual:expr, $expected:expr, $max_deviation:expr) => {
        $crate::assert_deviation!($actual, $expected, $max_deviation, "out of tolerance")
    };
    ($actual:expr, $expected:expr, $max_deviation:expr, $($arg:tt)+) => {{
        let (actual, expected, limit) = ($actual, $expected, $max_deviation);
        let off_by = $crate::math_utils::deviation(actual, expected);
        if off_by.is_nan() || off_by >= limit {
            panic!(
                "assertion failed: deviation {:.4}% >= {:.4}%: {} (actual {:?}, expected {:?})",
                off_by,
                limit,
                format_args!($($arg)+),
                actual,
                expected
            );
        }
    }};
}

/// Calculate the percentage deviation between two values
///
/// Uses the expected value as the reference for the percentage.
///
/// # Examples
/// ```
/// use seafloor_pressure::math_utils::deviation;
///
/// // 105 is 5% higher than 100
/// assert_eq!(deviation(105.0, 100.0), 5.0);
/// assert_eq!(deviation(95.0, 100.0), 5.0);
/// ```
pub fn deviation(actual: f64, expected: f64) -> f64 {
    if expected.abs() < f64::EPSILON {
        if actual.abs() < f64::EPSILON {
            0.0
        } else {
            f64::INFINITY
        }
    } else {
        ((actual - expected).abs() / expected.abs()) * 100.0
    }
}

/// Ratio of `value` along `[a, b]`; 0.0 for a degenerate interval
///
/// ```
/// use seafloor_pressure::math_utils::inverse_lerp;
///
/// // final pressure 30% of the way from initial to steady state
/// assert_eq!(inverse_lerp(10.0, 20.0, 13.0), 0.3);
/// ```
pub fn inverse_lerp(a: f64, b: f64, value: f64) -> f64 {
    if (b - a).abs() < f64::EPSILON {
        0.0
    } else {
        (value - a) / (b - a)
    }
}
