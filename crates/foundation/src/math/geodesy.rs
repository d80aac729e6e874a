use serde::{Deserialize, Serialize};

/// Latitude limit of the working region (degrees).
///
/// Mercator-style projections diverge at the poles; grid geometry is never
/// generated beyond this latitude.
pub const MAX_WORKING_LATITUDE: f64 = 85.0;

/// Longitude limit of the working region (degrees).
pub const MAX_LONGITUDE: f64 = 180.0;

/// Geographic coordinates in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_finite(self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }

    /// Clamp into `[-90, 90] x [-180, 180]`.
    pub fn clamped(self) -> Self {
        Self {
            lat: self.lat.clamp(-90.0, 90.0),
            lng: self.lng.clamp(-MAX_LONGITUDE, MAX_LONGITUDE),
        }
    }
}
