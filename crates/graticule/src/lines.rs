//! Meridian and parallel generation for one viewport state.
//!
//! Longitude spacing is measured once, at the viewport centre. Latitude
//! spacing is re-measured at every step of two marches that start at the
//! equator (or the nearest bounds edge) and walk toward each pole, so lines
//! spread out where the projection stretches.

use foundation::GeoBounds;
use foundation::math::{
    GeoPoint, MAX_WORKING_LATITUDE, Projection, ceil_to_multiple, floor_to_multiple, round12,
    stable_total_cmp_f64,
};
use tracing::debug;

use crate::divisor::{AxisSpacing, select_divisor};
use crate::error::GraticuleError;
use crate::snapshot::{Axis, GraticuleWarning, GridLine};

/// Inputs for one line build. Nothing here refers back to host state.
#[derive(Clone, Copy)]
pub struct LineRequest<'a> {
    /// Padded viewport bounds; clamped to the working region before use.
    pub bounds: GeoBounds,
    pub zoom: f64,
    pub projection: &'a dyn Projection,
    /// Minimum on-screen distance between adjacent lines (pixels).
    pub min_pixel_gap: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineSet {
    /// Meridians west to east, then parallels south to north.
    pub lines: Vec<GridLine>,
    pub warnings: Vec<GraticuleWarning>,
    /// The clamped bounds every line was generated against.
    pub bounds: GeoBounds,
    pub meridian_divisor: Option<f64>,
}

pub fn build_lines(req: &LineRequest<'_>) -> Result<LineSet, GraticuleError> {
    let center = req.bounds.center();
    let clamped = req.bounds.clamp_to_working();

    let mut set = LineSet {
        lines: Vec::new(),
        warnings: Vec::new(),
        bounds: clamped,
        meridian_divisor: None,
    };

    if clamped.is_lat_inverted() {
        set.warnings.push(GraticuleWarning::DegenerateBounds {
            axis: Axis::Parallel,
        });
    }
    if clamped.is_lng_inverted() {
        set.warnings.push(GraticuleWarning::DegenerateBounds {
            axis: Axis::Meridian,
        });
    }
    if clamped.is_empty() {
        debug!(?clamped, "clamped bounds are empty; no grid lines");
        return Ok(set);
    }

    let raw = longitude_spacing(req, center);
    let divisor = select_divisor(raw, AxisSpacing::Constant)?;
    set.meridian_divisor = Some(divisor);
    set.lines.extend(
        meridian_values(clamped.west, clamped.east, divisor)
            .into_iter()
            .map(|lng| GridLine::meridian(lng, &clamped)),
    );

    let mut parallels = Vec::new();
    if clamped.north > 0.0 {
        march_north(req, &clamped, center.lng, &mut parallels, &mut set.warnings)?;
    }
    if clamped.south < 0.0 {
        let equator_taken = clamped.north > 0.0;
        march_south(
            req,
            &clamped,
            center.lng,
            equator_taken,
            &mut parallels,
            &mut set.warnings,
        )?;
    }
    parallels.sort_by(|a, b| stable_total_cmp_f64(*a, *b));
    set.lines.extend(
        parallels
            .into_iter()
            .map(|lat| GridLine::parallel(lat, &clamped)),
    );

    debug!(
        lines = set.lines.len(),
        meridian_divisor = divisor,
        "grid lines built"
    );
    Ok(set)
}

/// Degrees of longitude covered by `min_pixel_gap` pixels around `center`.
pub fn longitude_spacing(req: &LineRequest<'_>, center: GeoPoint) -> f64 {
    let half = req.min_pixel_gap * 0.5;
    let mid = req.projection.project(center, req.zoom);
    let west = req.projection.unproject(mid.offset(-half, 0.0), req.zoom);
    let east = req.projection.unproject(mid.offset(half, 0.0), req.zoom);
    east.lng - west.lng
}

/// Multiples of `divisor` in `[west, east]`, ascending.
pub fn meridian_values(west: f64, east: f64, divisor: f64) -> Vec<f64> {
    let mut out = Vec::new();
    let mut k = round12(west / divisor).ceil();
    loop {
        let lng = round12(k * divisor);
        if lng > east {
            break;
        }
        out.push(lng);
        k += 1.0;
    }
    out
}

fn march_north(
    req: &LineRequest<'_>,
    bounds: &GeoBounds,
    center_lng: f64,
    out: &mut Vec<f64>,
    warnings: &mut Vec<GraticuleWarning>,
) -> Result<(), GraticuleError> {
    let limit = bounds.north.min(MAX_WORKING_LATITUDE);
    let mut lat = bounds.south.max(0.0);
    let mut first = true;

    while lat < limit {
        let here = req.projection.project(GeoPoint::new(lat, center_lng), req.zoom);
        let next = req
            .projection
            .unproject(here.offset(0.0, -req.min_pixel_gap), req.zoom)
            .lat;
        let divisor = select_divisor(next - lat, AxisSpacing::Variable)?;

        let candidate = if first {
            ceil_to_multiple(lat, divisor)
        } else {
            ceil_to_multiple(next, divisor)
        };
        if !first && candidate <= lat {
            warnings.push(GraticuleWarning::StalledMarch {
                axis: Axis::Parallel,
                at: lat,
            });
            break;
        }
        first = false;
        if candidate > limit {
            break;
        }
        out.push(candidate);
        lat = candidate;
    }
    Ok(())
}

fn march_south(
    req: &LineRequest<'_>,
    bounds: &GeoBounds,
    center_lng: f64,
    equator_taken: bool,
    out: &mut Vec<f64>,
    warnings: &mut Vec<GraticuleWarning>,
) -> Result<(), GraticuleError> {
    let limit = bounds.south.max(-MAX_WORKING_LATITUDE);
    let mut lat = bounds.north.min(0.0);
    let mut first = true;

    while lat > limit {
        let here = req.projection.project(GeoPoint::new(lat, center_lng), req.zoom);
        let next = req
            .projection
            .unproject(here.offset(0.0, req.min_pixel_gap), req.zoom)
            .lat;
        let divisor = select_divisor(lat - next, AxisSpacing::Variable)?;

        let candidate = if first {
            floor_to_multiple(lat, divisor)
        } else {
            floor_to_multiple(next, divisor)
        };
        if !first && candidate >= lat {
            warnings.push(GraticuleWarning::StalledMarch {
                axis: Axis::Parallel,
                at: lat,
            });
            break;
        }
        first = false;
        if candidate < limit {
            break;
        }
        // The northbound march already emitted the equator.
        if !(equator_taken && candidate == 0.0) {
            out.push(candidate);
        }
        lat = candidate;
    }
    Ok(())
}
