use serde::{Deserialize, Serialize};

/// Geodetic position
///
/// Latitude and longitude are stored in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude in radians
    pub lat: f64,
    /// Longitude in radians
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Create a point from latitude/longitude in degrees
    pub fn from_degrees(lat: f64, lon: f64) -> Self {
        Self::new(lat.to_radians(), lon.to_radians())
    }

    /// Check that the coordinates are within the valid geographic range
    pub fn is_valid(&self) -> bool {
        use std::f64::consts::{FRAC_PI_2, PI};
        (-FRAC_PI_2..=FRAC_PI_2).contains(&self.lat) && (-PI..=PI).contains(&self.lon)
    }
}

/// Position in the projected plane
///
/// Meters from the projection reference point, `x` growing east and `y` north.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanarPoint {
    pub x: f64,
    pub y: f64,
}

impl PlanarPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Straight-line distance in the plane
    pub fn distance_to(&self, other: PlanarPoint) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Point `distance` meters away along a bearing (radians, clockwise from grid north)
    pub fn offset(&self, bearing: f64, distance: f64) -> PlanarPoint {
        PlanarPoint::new(
            self.x + distance * bearing.sin(),
            self.y + distance * bearing.cos(),
        )
    }
}
