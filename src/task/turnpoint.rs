use crate::projection::Projection;
use crate::types::{PlanarPoint, Waypoint};
use serde::{Deserialize, Serialize};

/// Zones with an outer radius up to this many meters are treated as points
pub const POINT_ZONE_RADIUS: f64 = 500.0;

/// How a turnpoint's bisector angle is derived
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    /// Weighted bisector of the adjacent legs
    #[default]
    Sym,
    /// Bearing towards the next turnpoint
    Next,
    /// Bearing from the previous turnpoint
    Prev,
    /// Stored angle, never recomputed
    Fix,
}

/// Task turnpoint and its observation zone
///
/// Angles are in degrees. `angle1` and `angle2` are full sector angles centered on the
/// bisector `angle12`; 360 makes a cylinder and an `angle1` of 0 a line perpendicular
/// to the bisector.
#[derive(Debug, Clone, PartialEq)]
pub struct Turnpoint {
    pub waypoint: Waypoint,
    pub radius1: f64,
    pub angle1: f64,
    pub radius2: f64,
    pub angle2: f64,
    pub direction: Direction,
    /// Bisector bearing in degrees, clockwise from north
    pub angle12: f64,
    /// Closest point of the zone along the bisector
    pub min_dist: PlanarPoint,
}

/// Signed difference `to - from` in degrees, in `(-180, 180]`
fn angle_diff(from: f64, to: f64) -> f64 {
    let diff = (to - from).rem_euclid(360.0);
    if diff > 180.0 { diff - 360.0 } else { diff }
}

impl Turnpoint {
    /// Cylinder of `radius` meters
    pub fn cylinder(waypoint: Waypoint, radius: f64) -> Self {
        Self::sector(waypoint, radius, 360.0)
    }

    /// Line of half-width `radius`, perpendicular to the bisector
    pub fn line(waypoint: Waypoint, radius: f64) -> Self {
        Self::sector(waypoint, radius, 0.0)
    }

    /// Sector of `radius` meters spanning `angle` degrees
    pub fn sector(waypoint: Waypoint, radius: f64, angle: f64) -> Self {
        let min_dist = waypoint.position;
        Self {
            waypoint,
            radius1: radius,
            angle1: angle,
            radius2: 0.0,
            angle2: 0.0,
            direction: Direction::default(),
            angle12: 0.0,
            min_dist,
        }
    }

    /// Add an inner sector
    pub fn with_inner(mut self, radius: f64, angle: f64) -> Self {
        self.radius2 = radius;
        self.angle2 = angle;
        self
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Fix the bisector at `angle12` degrees
    pub fn with_fixed_bisector(mut self, angle12: f64) -> Self {
        self.direction = Direction::Fix;
        self.angle12 = angle12.rem_euclid(360.0);
        self
    }

    pub fn is_line(&self) -> bool {
        self.angle1 == 0.0
    }

    pub fn is_cylinder(&self) -> bool {
        self.angle1 >= 360.0
    }

    /// Radius of the sector the minimum-distance point lies on
    ///
    /// `None` when the zone collapses to the waypoint.
    pub fn active_radius(&self) -> Option<f64> {
        if self.radius1 <= POINT_ZONE_RADIUS || self.is_line() {
            None
        } else if self.is_cylinder() || self.radius2 <= 0.0 {
            Some(self.radius1)
        } else if self.angle2 >= 360.0 {
            Some(self.radius2)
        } else {
            Some(self.radius1)
        }
    }

    /// Recompute the bisector and minimum-distance point from the neighbouring points
    pub fn update_geometry(
        &mut self,
        projection: &Projection,
        prev: Option<PlanarPoint>,
        next: Option<PlanarPoint>,
    ) {
        let here = self.waypoint.position;
        let bearing = |from: PlanarPoint, to: PlanarPoint| projection.course(from, to).to_degrees();

        let angle12 = match self.direction {
            Direction::Fix => None,
            Direction::Next => next.map(|next| bearing(here, next)),
            Direction::Prev => prev.map(|prev| bearing(prev, here)),
            Direction::Sym => match (prev, next) {
                (Some(prev), Some(next)) => {
                    let to_prev = bearing(here, prev);
                    let to_next = bearing(here, next);
                    let d_prev = projection.dist(here, prev);
                    let d_next = projection.dist(here, next);

                    let total = d_prev + d_next;
                    let weight = if total > 0.0 { d_prev / total } else { 0.5 };
                    Some(to_prev + angle_diff(to_prev, to_next) * weight)
                }
                (Some(prev), None) => Some(bearing(here, prev)),
                (None, Some(next)) => Some(bearing(here, next)),
                (None, None) => None,
            },
        };

        if let Some(angle12) = angle12 {
            self.angle12 = angle12.rem_euclid(360.0);
        }

        self.min_dist = match self.active_radius() {
            Some(radius) => here.offset(self.angle12.to_radians(), radius),
            None => here,
        };
    }

    /// Whether `point` lies inside the observation zone
    pub fn in_zone(&self, projection: &Projection, point: PlanarPoint) -> bool {
        let (distance, offset) = self.polar_offset(projection, point);
        within(distance, offset, self.radius1, self.outer_span())
            || within(distance, offset, self.radius2, self.angle2)
    }

    /// Whether `point` lies inside the outer sector alone, ignoring any inner zone
    pub fn in_outer_sector(&self, projection: &Projection, point: PlanarPoint) -> bool {
        let (distance, offset) = self.polar_offset(projection, point);
        within(distance, offset, self.radius1, self.outer_span())
    }

    fn outer_span(&self) -> f64 {
        if self.is_line() { 180.0 } else { self.angle1 }
    }

    /// Ground distance from the waypoint and absolute angle off the bisector
    fn polar_offset(&self, projection: &Projection, point: PlanarPoint) -> (f64, f64) {
        let here = self.waypoint.position;
        let course = projection.course(here, point).to_degrees();
        (projection.dist(here, point), angle_diff(self.angle12, course).abs())
    }

}

fn within(distance: f64, offset: f64, radius: f64, span: f64) -> bool {
    distance < radius && (span >= 360.0 || offset <= span / 2.0)
}
