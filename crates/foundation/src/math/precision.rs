//! Precision policies.
//!
//! Grid values are derived from repeated float arithmetic (`0.1 + 0.2`,
//! `west / divisor`, ...). This module keeps that noise out of comparisons:
//! - Decimal rounding to a fixed number of places (`round_decimals`, `round12`).
//! - Snapping to multiples of a step (`ceil_to_multiple`, `floor_to_multiple`).
//! - A deterministic float ordering (`stable_total_cmp_f64`) for sorting.

use core::cmp::Ordering;

/// Number of decimal places kept for every generated grid value.
pub const GRID_DECIMALS: i32 = 12;

/// Round `v` to `places` decimal places.
pub fn round_decimals(v: f64, places: i32) -> f64 {
    if !v.is_finite() {
        return v;
    }
    let scale = 10f64.powi(places);
    canonical_f64((v * scale).round() / scale)
}

/// Round to [`GRID_DECIMALS`] places.
#[inline]
pub fn round12(v: f64) -> f64 {
    round_decimals(v, GRID_DECIMALS)
}

/// Smallest multiple of `step` that is `>= v`.
///
/// The quotient is rounded before `ceil` so that `-0.3 / 0.1` lands on `-3`
/// rather than `-2.9999999999999996`.
pub fn ceil_to_multiple(v: f64, step: f64) -> f64 {
    round12(round12(v / step).ceil() * step)
}

/// Largest multiple of `step` that is `<= v`.
pub fn floor_to_multiple(v: f64, step: f64) -> f64 {
    round12(round12(v / step).floor() * step)
}

/// Canonicalize a floating-point value for deterministic ordering.
///
/// Rules:
/// - `-0.0` becomes `0.0`
/// - all NaNs become a single canonical NaN
pub fn canonical_f64(v: f64) -> f64 {
    if v == 0.0 {
        // Handles +0.0 and -0.0.
        0.0
    } else if v.is_nan() {
        f64::NAN
    } else {
        v
    }
}

/// Deterministic total ordering for floats.
///
/// Prefer this any time you sort floats or use them in ordered keys.
pub fn stable_total_cmp_f64(a: f64, b: f64) -> Ordering {
    canonical_f64(a).total_cmp(&canonical_f64(b))
}
