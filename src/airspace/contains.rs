use crate::airspace::AirspaceRegion;
use crate::types::{BoundarySegment, PlanarPoint};
use crate::utils::angle;

impl AirspaceRegion {
    /// Check whether `point` lies inside the region
    ///
    /// Casts a horizontal ray towards negative `x` and counts boundary crossings; an
    /// odd count means inside. The bounding box is checked first.
    pub fn contains(&self, point: PlanarPoint) -> bool {
        if !self.bounding_box.contains(point) {
            return false;
        }

        let crossings: u32 = self
            .segments
            .iter()
            .map(|segment| segment.crossings_left_of(point))
            .sum();

        crossings % 2 == 1
    }
}

impl BoundarySegment {
    /// Number of times a ray from `point` towards negative `x` crosses this segment
    pub fn crossings_left_of(&self, point: PlanarPoint) -> u32 {
        match *self {
            BoundarySegment::Line { p1, p2 } => {
                let straddles = (p1.y >= point.y) != (p2.y >= point.y);
                if !straddles {
                    return 0;
                }

                let x = p1.x + (point.y - p1.y) * (p2.x - p1.x) / (p2.y - p1.y);
                u32::from(x < point.x)
            }
            BoundarySegment::Arc {
                center,
                radius,
                start_angle,
                sweep_angle,
            } => {
                if radius <= 0.0 || point.y < center.y - radius || point.y >= center.y + radius {
                    return 0;
                }

                // Angles grow clockwise, so a point below the center has a positive angle
                let sine = ((center.y - point.y) / radius).clamp(-1.0, 1.0);
                let ang1 = sine.asin().to_degrees();
                let ang2 = 180.0 - ang1;

                [ang1, ang2]
                    .into_iter()
                    .filter(|&candidate| {
                        let units = angle::normalize(angle::from_degrees(candidate));
                        let x = center.x + radius * candidate.to_radians().cos();
                        x < point.x && angle::on_arc(units, start_angle, sweep_angle)
                    })
                    .count() as u32
            }
        }
    }
}
