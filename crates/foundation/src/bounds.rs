use serde::{Deserialize, Serialize};

use crate::math::{GeoPoint, MAX_LONGITUDE, MAX_WORKING_LATITUDE};

/// Geographic rectangle in degrees.
///
/// Well-formed boxes satisfy `south <= north` and `west <= east`; there is no
/// antimeridian wraparound. Intersections of disjoint boxes come out inverted,
/// see [`GeoBounds::is_empty`].
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

/// Region inside which grid geometry is generated.
pub const WORKING_BOUNDS: GeoBounds = GeoBounds {
    south: -MAX_WORKING_LATITUDE,
    west: -MAX_LONGITUDE,
    north: MAX_WORKING_LATITUDE,
    east: MAX_LONGITUDE,
};

impl GeoBounds {
    pub fn new(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self {
            south,
            west,
            north,
            east,
        }
    }

    /// Smallest box containing both corners, in any order.
    pub fn from_corners(a: GeoPoint, b: GeoPoint) -> Self {
        Self::new(
            a.lat.min(b.lat),
            a.lng.min(b.lng),
            a.lat.max(b.lat),
            a.lng.max(b.lng),
        )
    }

    /// Component-wise intersection: max of south/west, min of north/east.
    ///
    /// Commutative and idempotent. Disjoint inputs yield an inverted box.
    pub fn intersect(&self, other: &GeoBounds) -> GeoBounds {
        GeoBounds {
            south: self.south.max(other.south),
            west: self.west.max(other.west),
            north: self.north.min(other.north),
            east: self.east.min(other.east),
        }
    }

    /// Intersect with [`WORKING_BOUNDS`].
    pub fn clamp_to_working(&self) -> GeoBounds {
        self.intersect(&WORKING_BOUNDS)
    }

    /// Grow each edge by `ratio` of the box's span on that axis.
    pub fn pad(&self, ratio: f64) -> GeoBounds {
        let dlat = (self.north - self.south).abs() * ratio;
        let dlng = (self.east - self.west).abs() * ratio;
        GeoBounds {
            south: self.south - dlat,
            west: self.west - dlng,
            north: self.north + dlat,
            east: self.east + dlng,
        }
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.south + self.north) * 0.5,
            (self.west + self.east) * 0.5,
        )
    }

    pub fn lat_span(&self) -> f64 {
        self.north - self.south
    }

    pub fn lng_span(&self) -> f64 {
        self.east - self.west
    }

    /// `south > north`: no latitude range survives.
    pub fn is_lat_inverted(&self) -> bool {
        self.south > self.north
    }

    /// `west > east`: no longitude range survives.
    pub fn is_lng_inverted(&self) -> bool {
        self.west > self.east
    }

    pub fn is_empty(&self) -> bool {
        self.is_lat_inverted() || self.is_lng_inverted()
    }

    pub fn is_finite(&self) -> bool {
        self.south.is_finite()
            && self.west.is_finite()
            && self.north.is_finite()
            && self.east.is_finite()
    }

    pub fn contains(&self, point: GeoPoint) -> bool {
        point.lat >= self.south
            && point.lat <= self.north
            && point.lng >= self.west
            && point.lng <= self.east
    }
}
