use std::sync::Arc;

use foundation::GeoBounds;
use foundation::math::{GeoPoint, round_decimals};
use serde::{Deserialize, Serialize};

use crate::snapshot::{Axis, GridLabel, GridLine};

type FormatFn = dyn Fn(f64, bool) -> String + Send + Sync;

/// Host-supplied label text: `(value_degrees, is_latitude) -> text`.
#[derive(Clone)]
pub struct LabelFormatter(Arc<FormatFn>);

impl LabelFormatter {
    pub fn new(f: impl Fn(f64, bool) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn format(&self, value: f64, is_latitude: bool) -> String {
        (self.0)(value, is_latitude)
    }
}

impl std::fmt::Debug for LabelFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("LabelFormatter(..)")
    }
}

/// Built-in label renderings.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelFormat {
    /// `"-12.5°"`
    #[default]
    Degrees,
    /// `"12.5°S"`
    Hemisphere,
    /// `"12°30'S"`
    DegreesMinutes,
}

impl LabelFormat {
    pub fn format(self, value: f64, is_latitude: bool) -> String {
        match self {
            LabelFormat::Degrees => format!("{value}°"),
            LabelFormat::Hemisphere => {
                format!("{}°{}", value.abs(), hemisphere(value, is_latitude))
            }
            LabelFormat::DegreesMinutes => {
                let abs = value.abs();
                let mut degrees = abs.trunc();
                let mut minutes = round_decimals((abs - degrees) * 60.0, 6);
                if minutes >= 60.0 {
                    degrees += 1.0;
                    minutes -= 60.0;
                }
                let suffix = hemisphere(value, is_latitude);
                if minutes == 0.0 {
                    format!("{degrees}°{suffix}")
                } else {
                    format!("{degrees}°{minutes}'{suffix}")
                }
            }
        }
    }
}

fn hemisphere(value: f64, is_latitude: bool) -> &'static str {
    match (is_latitude, value) {
        (_, v) if v == 0.0 => "",
        (true, v) if v > 0.0 => "N",
        (true, _) => "S",
        (false, v) if v > 0.0 => "E",
        (false, _) => "W",
    }
}

#[derive(Debug, Clone, Copy)]
pub struct LabelConfig<'a> {
    /// Fraction of the bounds' span between the edge and the anchor.
    pub inset: f64,
    pub format: LabelFormat,
    /// Wins over `format` when present.
    pub formatter: Option<&'a LabelFormatter>,
}

impl LabelConfig<'_> {
    pub fn text(&self, value: f64, is_latitude: bool) -> String {
        match self.formatter {
            Some(formatter) => formatter.format(value, is_latitude),
            None => self.format.format(value, is_latitude),
        }
    }
}

/// One label per line, anchored just inside the north edge for meridians and
/// the west edge for parallels of `bounds`.
pub fn build_labels(
    lines: &[GridLine],
    bounds: &GeoBounds,
    config: &LabelConfig<'_>,
) -> Vec<GridLabel> {
    lines
        .iter()
        .map(|line| GridLabel {
            axis: line.axis,
            value: line.value,
            anchor: label_anchor(line, bounds, config.inset),
            text: config.text(line.value, line.axis.is_latitude()),
        })
        .collect()
}

pub fn label_anchor(line: &GridLine, bounds: &GeoBounds, inset: f64) -> GeoPoint {
    match line.axis {
        Axis::Meridian => GeoPoint::new(bounds.north - bounds.lat_span() * inset, line.value),
        Axis::Parallel => GeoPoint::new(line.value, bounds.west + bounds.lng_span() * inset),
    }
}
