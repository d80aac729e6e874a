//! Adaptive latitude/longitude grid for pannable, zoomable maps.
//!
//! The engine attaches to a [`MapViewport`], listens for its change events
//! and, on each one, rebuilds the full set of meridians, parallels and
//! labels so that adjacent lines stay at least `min_pixel_gap` pixels apart
//! under the host's projection.
//!
//! ```
//! use foundation::math::{Equirectangular, GeoPoint};
//! use graticule::{Axis, GraticuleEngine, GraticuleOptions, MemoryViewport};
//!
//! let mut viewport = MemoryViewport::new(
//!     Equirectangular::with_scale_at(100.0, 8.0),
//!     GeoPoint::new(0.0, 0.0),
//!     8.0,
//!     [2000.0, 2000.0],
//! );
//! let mut engine = GraticuleEngine::new();
//! engine.attach(&mut viewport, GraticuleOptions::default()).unwrap();
//!
//! let grid = engine.snapshot().unwrap();
//! assert!(grid.lines_on(Axis::Meridian).any(|l| l.value == 0.0));
//! ```

pub mod divisor;
pub mod engine;
pub mod error;
pub mod labels;
pub mod lines;
pub mod options;
pub mod snapshot;
pub mod viewport;

pub use divisor::{AxisSpacing, select_divisor};
pub use engine::{GraticuleEngine, RecomputeHandle, RecomputeStats, build_snapshot};
pub use error::GraticuleError;
pub use labels::{LabelFormat, LabelFormatter};
pub use options::GraticuleOptions;
pub use snapshot::*;
pub use viewport::*;
