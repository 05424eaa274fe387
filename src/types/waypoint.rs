use crate::types::PlanarPoint;
use serde::{Deserialize, Serialize};

/// Named navigation point in projected coordinates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub id: String,
    pub name: String,
    pub position: PlanarPoint,
    /// Elevation in meters
    pub altitude: f64,
    pub landable: bool,
}

impl Waypoint {
    pub fn new(id: impl Into<String>, name: impl Into<String>, position: PlanarPoint) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position,
            altitude: 0.0,
            landable: false,
        }
    }

    pub fn with_altitude(mut self, altitude: f64) -> Self {
        self.altitude = altitude;
        self
    }

    pub fn with_landable(mut self, landable: bool) -> Self {
        self.landable = landable;
        self
    }
}
