use crate::types::PlanarPoint;
use serde::{Deserialize, Serialize};

/// Bounding box in the projected plane
///
/// Axis-aligned rectangle in meters, used to pre-filter containment queries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub xmin: f64,
    pub ymin: f64,
    pub xmax: f64,
    pub ymax: f64,
}

impl BoundingBox {
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        Self {
            xmin,
            ymin,
            xmax,
            ymax,
        }
    }

    /// Square box of half-width `radius` around a center point
    pub fn around(center: PlanarPoint, radius: f64) -> Self {
        Self::new(
            center.x - radius,
            center.y - radius,
            center.x + radius,
            center.y + radius,
        )
    }

    /// Create a bounding box from a slice of points
    ///
    /// Returns `None` if the slice is empty.
    pub fn from_points(points: &[PlanarPoint]) -> Option<Self> {
        let (first, rest) = points.split_first()?;

        let mut bbox = Self::from(*first);
        for &point in rest {
            bbox.extend(point);
        }
        Some(bbox)
    }

    /// Extend bounding box to include a point
    pub fn extend(&mut self, point: PlanarPoint) {
        self.xmin = self.xmin.min(point.x);
        self.xmax = self.xmax.max(point.x);
        self.ymin = self.ymin.min(point.y);
        self.ymax = self.ymax.max(point.y);
    }

    /// Merge another bounding box into this one
    pub fn merge(&mut self, other: BoundingBox) {
        self.xmin = self.xmin.min(other.xmin);
        self.xmax = self.xmax.max(other.xmax);
        self.ymin = self.ymin.min(other.ymin);
        self.ymax = self.ymax.max(other.ymax);
    }

    /// Whether the two boxes share at least one point (edges included)
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        self.xmin <= other.xmax
            && other.xmin <= self.xmax
            && self.ymin <= other.ymax
            && other.ymin <= self.ymax
    }

    pub fn contains(&self, point: PlanarPoint) -> bool {
        (self.xmin..=self.xmax).contains(&point.x) && (self.ymin..=self.ymax).contains(&point.y)
    }

    pub fn width(&self) -> f64 {
        self.xmax - self.xmin
    }

    pub fn height(&self) -> f64 {
        self.ymax - self.ymin
    }
}

impl From<PlanarPoint> for BoundingBox {
    fn from(point: PlanarPoint) -> Self {
        Self::new(point.x, point.y, point.x, point.y)
    }
}
