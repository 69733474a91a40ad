use crate::io::configuration::PROBABILITY_TOLERANCE;
use crate::io::error::{RisqError, Result};
use crate::model::Time;

/// Error function approximation using Abramowitz and Stegun method
///
/// Maximum absolute error is about 1.5e-7, well below the resolution of the
/// normal approximations it feeds.
pub fn erf(x: f64) -> f64 {
    let a1 = 0.254_829_592_f64;
    let a2 = -0.284_496_736_f64;
    let a3 = 1.421_413_741_f64;
    let a4 = -1.453_152_027_f64;
    let a5 = 1.061_405_429_f64;
    let p = 0.327_591_1_f64;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();

    let t = 1.0 / p.mul_add(x, 1.0);
    let y = (((((a5.mul_add(t, a4)).mul_add(t, a3)).mul_add(t, a2)).mul_add(t, a1)) * t)
        .mul_add(-(-x * x).exp(), 1.0);

    sign * y
}

/// Clamp a computed probability to [0, 1]
///
/// Complement formulas can drift slightly outside the unit interval through
/// rounding. Drift within [`PROBABILITY_TOLERANCE`] is clamped away.
///
/// # Errors
///
/// Returns [`RisqError::Inconsistency`] if the value is NaN or further than
/// the tolerance outside [0, 1].
pub fn checked_probability(value: f64, operation: &'static str, time: Time) -> Result<f64> {
    if value.is_nan()
        || value < -PROBABILITY_TOLERANCE
        || value > 1.0 + PROBABILITY_TOLERANCE
    {
        return Err(RisqError::Inconsistency {
            operation,
            time,
            value,
        });
    }
    if !(0.0..=1.0).contains(&value) {
        tracing::debug!(operation, time, value, "clamped probability noise");
    }
    Ok(value.clamp(0.0, 1.0))
}

/// Keep an intermediate table entry as computed
///
/// Entries that only feed later steps of a recurrence stay unclamped so the
/// recurrence itself is not perturbed. Drift outside [0, 1] is logged; the
/// values handed to callers still go through [`checked_probability`].
pub fn raw_probability(value: f64, operation: &'static str, time: Time) -> f64 {
    if !(0.0..=1.0).contains(&value) {
        tracing::debug!(operation, time, value, "intermediate probability outside unit interval");
    }
    value
}

/// Probability density of a normal distribution
pub fn normal_density(x: f64, mean: f64, variance: f64) -> f64 {
    if variance <= 0.0 {
        return 0.0;
    }
    let sigma = variance.sqrt();
    let z = (x - mean) / sigma;
    (-0.5 * z * z).exp() / ((2.0 * std::f64::consts::PI).sqrt() * sigma)
}

/// Probability that a normal variable exceeds `threshold`
///
/// A degenerate distribution (zero variance) exceeds the threshold with
/// probability 1 if its mean does and 0 otherwise.
pub fn exceedance_probability(mean: f64, variance: f64, threshold: f64) -> f64 {
    if variance <= 0.0 {
        return if mean > threshold { 1.0 } else { 0.0 };
    }
    let sigma = variance.sqrt();
    0.5 * (1.0 - erf((threshold - mean) / (sigma * std::f64::consts::SQRT_2)))
}
