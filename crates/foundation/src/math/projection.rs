use super::{GeoPoint, PixelPoint};

/// Tile edge length at zoom 0 for slippy-map style projections.
pub const TILE_SIZE_PX: f64 = 256.0;

/// Latitude where spherical Web Mercator becomes a square world.
pub const WEB_MERCATOR_MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Pixel <-> geographic mapping at a given zoom.
///
/// Implementations must be pure: the same `(point, zoom)` always maps to the
/// same result. Pixel `y` grows southward.
pub trait Projection: Send + Sync {
    fn project(&self, point: GeoPoint, zoom: f64) -> PixelPoint;
    fn unproject(&self, point: PixelPoint, zoom: f64) -> GeoPoint;
}

/// Spherical Web Mercator (EPSG:3857) in world pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct WebMercator {
    pub tile_size_px: f64,
}

impl Default for WebMercator {
    fn default() -> Self {
        Self {
            tile_size_px: TILE_SIZE_PX,
        }
    }
}

impl WebMercator {
    fn world_size(&self, zoom: f64) -> f64 {
        self.tile_size_px * 2f64.powf(zoom)
    }
}

impl Projection for WebMercator {
    fn project(&self, point: GeoPoint, zoom: f64) -> PixelPoint {
        let size = self.world_size(zoom);
        let lat = point
            .lat
            .clamp(-WEB_MERCATOR_MAX_LATITUDE, WEB_MERCATOR_MAX_LATITUDE)
            .to_radians();
        let x = (point.lng + 180.0) / 360.0 * size;
        let merc = (lat.tan() + 1.0 / lat.cos()).ln();
        let y = (1.0 - merc / std::f64::consts::PI) * 0.5 * size;
        PixelPoint::new(x, y)
    }

    fn unproject(&self, point: PixelPoint, zoom: f64) -> GeoPoint {
        let size = self.world_size(zoom);
        let lng = point.x / size * 360.0 - 180.0;
        let n = std::f64::consts::PI * (1.0 - 2.0 * point.y / size);
        let lat = n.sinh().atan().to_degrees();
        GeoPoint::new(lat, lng)
    }
}

/// Plate carrée: a fixed number of pixels per degree on both axes,
/// doubling with each zoom level.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Equirectangular {
    /// Pixels per degree at zoom 0.
    pub base_px_per_degree: f64,
}

impl Equirectangular {
    pub fn new(base_px_per_degree: f64) -> Self {
        Self { base_px_per_degree }
    }

    /// Projection that yields `px_per_degree` exactly at `zoom`.
    pub fn with_scale_at(px_per_degree: f64, zoom: f64) -> Self {
        Self::new(px_per_degree / 2f64.powf(zoom))
    }

    fn scale(&self, zoom: f64) -> f64 {
        self.base_px_per_degree * 2f64.powf(zoom)
    }
}

impl Projection for Equirectangular {
    fn project(&self, point: GeoPoint, zoom: f64) -> PixelPoint {
        let s = self.scale(zoom);
        PixelPoint::new(point.lng * s, -point.lat * s)
    }

    fn unproject(&self, point: PixelPoint, zoom: f64) -> GeoPoint {
        let s = self.scale(zoom);
        GeoPoint::new(-point.y / s, point.x / s)
    }
}
