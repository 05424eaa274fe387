use crate::types::{BoundingBox, PlanarPoint};
use crate::utils::angle;

/// One piece of a projected airspace boundary
///
/// Angles are in 1/64 degree, measured clockwise from grid east. The sweep is
/// positive for clockwise traversal and negative for anticlockwise traversal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundarySegment {
    Line {
        p1: PlanarPoint,
        p2: PlanarPoint,
    },
    Arc {
        center: PlanarPoint,
        radius: f64,
        start_angle: i32,
        sweep_angle: i32,
    },
}

impl BoundarySegment {
    /// Full circle around `center`
    pub fn circle(center: PlanarPoint, radius: f64) -> Self {
        BoundarySegment::Arc {
            center,
            radius,
            start_angle: 0,
            sweep_angle: angle::FULL_CIRCLE,
        }
    }

    /// Point on an arc's circle at a fixed-point angle
    pub fn point_at(center: PlanarPoint, radius: f64, units: i32) -> PlanarPoint {
        let theta = angle::to_degrees(units).to_radians();
        PlanarPoint::new(
            center.x + radius * theta.cos(),
            center.y - radius * theta.sin(),
        )
    }

    /// Fixed-point angle of `point` as seen from `center`
    pub fn angle_of(center: PlanarPoint, point: PlanarPoint) -> i32 {
        let theta = (center.y - point.y).atan2(point.x - center.x);
        angle::normalize(angle::from_degrees(theta.to_degrees()))
    }

    /// Smallest box enclosing the segment
    ///
    /// For arcs this includes the end points and every compass extreme the arc passes.
    pub fn bounding_box(&self) -> BoundingBox {
        match *self {
            BoundarySegment::Line { p1, p2 } => {
                let mut bbox = BoundingBox::from(p1);
                bbox.extend(p2);
                bbox
            }
            BoundarySegment::Arc {
                center,
                radius,
                start_angle,
                sweep_angle,
            } => {
                if sweep_angle.abs() >= angle::FULL_CIRCLE {
                    return BoundingBox::around(center, radius);
                }

                let end_angle = start_angle + sweep_angle;
                let mut bbox = BoundingBox::from(Self::point_at(center, radius, start_angle));
                bbox.extend(Self::point_at(center, radius, end_angle));

                for quadrant in 0..4 {
                    let extreme = quadrant * 90 * angle::UNITS_PER_DEGREE;
                    if angle::on_arc(extreme, start_angle, sweep_angle) {
                        bbox.extend(Self::point_at(center, radius, extreme));
                    }
                }
                bbox
            }
        }
    }
}
