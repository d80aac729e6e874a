use serde::{Deserialize, Serialize};

use crate::error::GraticuleError;
use crate::labels::{LabelFormat, LabelFormatter};
use crate::viewport::ViewportEventKind;

/// Engine configuration.
///
/// Every field has a default, so a partial JSON object is a valid config:
///
/// ```
/// use graticule::GraticuleOptions;
///
/// let opts = GraticuleOptions::from_json(r#"{ "min_pixel_gap": 80 }"#).unwrap();
/// assert_eq!(opts.min_pixel_gap, 80.0);
/// assert_eq!(opts.pad, 0.5);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GraticuleOptions {
    /// Minimum on-screen distance between adjacent lines (pixels).
    pub min_pixel_gap: f64,
    /// Events that trigger a recompute in addition to `view_reset`.
    pub redraw_events: Vec<ViewportEventKind>,
    /// Fraction of the viewport pre-built beyond each visible edge.
    pub pad: f64,
    /// Fraction of the working bounds' span between an edge and its labels.
    pub label_inset: f64,
    pub label_format: LabelFormat,
    #[serde(skip)]
    pub formatter: Option<LabelFormatter>,
}

impl Default for GraticuleOptions {
    fn default() -> Self {
        Self {
            min_pixel_gap: 100.0,
            redraw_events: vec![ViewportEventKind::MoveEnd],
            pad: 0.5,
            label_inset: 0.02,
            label_format: LabelFormat::Degrees,
            formatter: None,
        }
    }
}

impl GraticuleOptions {
    pub fn from_json(json: &str) -> Result<Self, GraticuleError> {
        let opts: Self = serde_json::from_str(json)?;
        opts.validate()?;
        Ok(opts)
    }

    pub fn with_formatter(mut self, formatter: LabelFormatter) -> Self {
        self.formatter = Some(formatter);
        self
    }

    pub fn validate(&self) -> Result<(), GraticuleError> {
        if !self.min_pixel_gap.is_finite() || self.min_pixel_gap <= 0.0 {
            return Err(GraticuleError::InvalidOptions(format!(
                "min_pixel_gap must be positive, got {}",
                self.min_pixel_gap
            )));
        }
        if !self.pad.is_finite() || self.pad < 0.0 {
            return Err(GraticuleError::InvalidOptions(format!(
                "pad must be non-negative, got {}",
                self.pad
            )));
        }
        if !self.label_inset.is_finite() || !(0.0..0.5).contains(&self.label_inset) {
            return Err(GraticuleError::InvalidOptions(format!(
                "label_inset must be in [0, 0.5), got {}",
                self.label_inset
            )));
        }
        Ok(())
    }

    /// `view_reset` plus the configured redraw events, without duplicates.
    pub fn subscribed_events(&self) -> Vec<ViewportEventKind> {
        let mut kinds = vec![ViewportEventKind::ViewReset];
        for kind in &self.redraw_events {
            if !kinds.contains(kind) {
                kinds.push(*kind);
            }
        }
        kinds
    }
}
