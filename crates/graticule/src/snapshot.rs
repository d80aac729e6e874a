use foundation::GeoBounds;
use foundation::math::GeoPoint;
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    /// Constant longitude.
    Meridian,
    /// Constant latitude.
    Parallel,
}

impl Axis {
    pub fn is_latitude(self) -> bool {
        self == Axis::Parallel
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLine {
    pub axis: Axis,
    /// Longitude for meridians, latitude for parallels (degrees).
    pub value: f64,
    pub from: GeoPoint,
    pub to: GeoPoint,
}

impl GridLine {
    /// Meridian at `lng` spanning `bounds.south..bounds.north`.
    pub fn meridian(lng: f64, bounds: &GeoBounds) -> Self {
        Self {
            axis: Axis::Meridian,
            value: lng,
            from: GeoPoint::new(bounds.south, lng),
            to: GeoPoint::new(bounds.north, lng),
        }
    }

    /// Parallel at `lat` spanning `bounds.west..bounds.east`.
    pub fn parallel(lat: f64, bounds: &GeoBounds) -> Self {
        Self {
            axis: Axis::Parallel,
            value: lat,
            from: GeoPoint::new(lat, bounds.west),
            to: GeoPoint::new(lat, bounds.east),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridLabel {
    pub axis: Axis,
    pub value: f64,
    pub anchor: GeoPoint,
    pub text: String,
}

/// Non-fatal conditions met while building one grid.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GraticuleWarning {
    /// The clamped bounds were inverted on this axis; no lines were built.
    DegenerateBounds { axis: Axis },
    /// A latitude march stopped because it could not advance past `at`.
    StalledMarch { axis: Axis, at: f64 },
}

/// One complete grid, built from a single viewport state.
///
/// Snapshots are immutable once published; a recompute replaces the whole
/// snapshot rather than editing it.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraticuleSnapshot {
    /// Meridians west to east, then parallels south to north.
    pub lines: Vec<GridLine>,
    /// One label per line, in line order.
    pub labels: Vec<GridLabel>,
    pub warnings: Vec<GraticuleWarning>,
    /// Working bounds the grid was generated against (padded, then clamped).
    pub bounds: Option<GeoBounds>,
}

impl GraticuleSnapshot {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines_on(&self, axis: Axis) -> impl Iterator<Item = &GridLine> {
        self.lines.iter().filter(move |l| l.axis == axis)
    }

    pub fn values_on(&self, axis: Axis) -> Vec<f64> {
        self.lines_on(axis).map(|l| l.value).collect()
    }
}
