//! Numeric conversion helpers centralizing safe numeric casts.

use num_traits::cast::cast;

/// Floor used for every denominator in the stat pipeline.
pub const DENOMINATOR_FLOOR: f64 = 1e-4;

/// Convert usize to f64 while allowing precision loss in a single location.
#[must_use]
pub fn usize_to_f64(value: usize) -> f64 {
    cast::<usize, f64>(value).unwrap_or(0.0)
}

/// Replace non-finite values with 0.0.
#[must_use]
pub const fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

/// Clamp a value to be finite and non-negative.
#[must_use]
pub const fn non_negative(value: f64) -> f64 {
    let value = finite_or_zero(value);
    if value < 0.0 { 0.0 } else { value }
}

/// Integer percentage of `done` over `total`, clamped to `0..=100`.
///
/// An empty total reports completion.
#[must_use]
pub fn percent_complete(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let ratio = usize_to_f64(done.min(total)) / usize_to_f64(total);
    let scaled = (ratio * 100.0).floor().clamp(0.0, 100.0);
    cast::<f64, u8>(scaled).unwrap_or(100)
}
