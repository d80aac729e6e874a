//! Spacing ladder for grid lines.
//!
//! A raw spacing requirement (degrees between two points `min_pixel_gap`
//! apart on screen) is snapped to a "nice" cartographic value:
//! - up to 10°: `{0.1, 0.2, 0.5, 1} x 10^k`
//! - above 10°: `{30, 45, 60, 90}`, saturating at 90°
//! - on the latitude axis, never more than 5°

use foundation::math::round12;

use crate::error::GraticuleError;

/// Breakpoints of one magnitude decade, normalized to `(0.1, 1]`.
///
/// The first breakpoint `>=` the normalized spacing is chosen, so a spacing
/// that lands exactly on a breakpoint keeps it rather than moving up a tier.
pub const DECADE_LADDER: [f64; 4] = [0.1, 0.2, 0.5, 1.0];

/// Divisors used once the spacing exceeds [`DECADE_LIMIT`].
pub const COARSE_LADDER: [f64; 4] = [30.0, 45.0, 60.0, 90.0];

/// Largest spacing handled by the decade ladder.
pub const DECADE_LIMIT: f64 = 10.0;

/// Latitude divisors never exceed this value.
pub const MAX_VARIABLE_DIVISOR: f64 = 5.0;

/// Finest spacing the 12-decimal grid can represent.
pub const MIN_SPACING: f64 = 1e-12;

/// How the degree spacing of an axis behaves across the viewport.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AxisSpacing {
    /// Same spacing everywhere (longitude).
    Constant,
    /// Spacing changes with position under the projection (latitude).
    Variable,
}

/// Snap a raw degree spacing to the divisor ladder.
pub fn select_divisor(raw: f64, spacing: AxisSpacing) -> Result<f64, GraticuleError> {
    if !raw.is_finite() || raw < MIN_SPACING {
        return Err(GraticuleError::InvalidSpacing { raw });
    }

    if spacing == AxisSpacing::Variable && raw >= MAX_VARIABLE_DIVISOR {
        return Ok(MAX_VARIABLE_DIVISOR);
    }

    if raw > DECADE_LIMIT {
        return Ok(coarse_step(raw));
    }

    let (normalized, exponent) = normalize_decade(raw);
    Ok(round12(decade_step(normalized) * 10f64.powi(exponent)))
}

/// Split `raw` into `normalized x 10^exponent` with `normalized` in `(0.1, 1]`.
pub fn normalize_decade(raw: f64) -> (f64, i32) {
    let mut exponent = raw.log10().ceil() as i32;
    let mut normalized = round12(raw / 10f64.powi(exponent));

    // log10 can land one ulp on the wrong side of a power of ten.
    while normalized > 1.0 {
        normalized = round12(normalized / 10.0);
        exponent += 1;
    }
    while normalized <= 0.1 {
        normalized = round12(normalized * 10.0);
        exponent -= 1;
    }
    (normalized, exponent)
}

/// First [`DECADE_LADDER`] entry `>= normalized`.
pub fn decade_step(normalized: f64) -> f64 {
    DECADE_LADDER
        .iter()
        .copied()
        .find(|&step| normalized <= step)
        .unwrap_or(1.0)
}

/// First [`COARSE_LADDER`] entry `>= raw`, saturating at 90°.
pub fn coarse_step(raw: f64) -> f64 {
    COARSE_LADDER
        .iter()
        .copied()
        .find(|&step| raw <= step)
        .unwrap_or(COARSE_LADDER[COARSE_LADDER.len() - 1])
}
