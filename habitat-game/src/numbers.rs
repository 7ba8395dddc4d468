//! Numeric helpers centralizing clamping and safe numeric casts.

use num_traits::cast::cast;

use crate::constants::{RESOURCE_MAX, RESOURCE_MIN};

/// Clamp a percentage into `[0, 100]`, returning 0.0 for non-finite values.
#[must_use]
pub fn clamp_pct(value: f64) -> f64 {
    if !value.is_finite() {
        return RESOURCE_MIN;
    }
    value.clamp(RESOURCE_MIN, RESOURCE_MAX)
}

/// Convert a count to f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Round a f64 and clamp it to the i32 range, returning 0 for NaN values.
#[must_use]
pub fn round_f64_to_i32(value: f64) -> i32 {
    if value.is_nan() {
        return 0;
    }
    let min = cast::<i32, f64>(i32::MIN).unwrap_or(f64::MIN);
    let max = cast::<i32, f64>(i32::MAX).unwrap_or(f64::MAX);
    let clamped = value.clamp(min, max).round();
    cast::<f64, i32>(clamped).unwrap_or(0)
}

/// Arithmetic mean, or `None` for an empty sample.
#[must_use]
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values
        .into_iter()
        .fold((0.0_f64, 0_usize), |(sum, count), v| (sum + v, count + 1));
    (count > 0).then(|| sum / usize_to_f64(count))
}
