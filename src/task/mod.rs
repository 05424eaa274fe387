//! Task state machine and final glide
//!
//! A [`Task`] is an ordered, non-empty list of [`Turnpoint`]s together with the glider
//! polar and the pilot's [`GlideSettings`]. Index 0 is the start; once started the
//! active turnpoint index stays within `1..=n-1`. A diversion overrides the target
//! without touching the index.

mod glide;
mod polar;
mod record;
mod turnpoint;

pub use self::glide::{FinalGlide, GlideLeg, InvalidGlide, WindVector, final_glide};
pub use self::polar::{GlideSettings, KNOT, PolarCoefficients, SpeedToFly};
pub use self::record::TurnpointRecord;
pub use self::turnpoint::{Direction, POINT_ZONE_RADIUS, Turnpoint};

use crate::error::{Error, Result};
use crate::projection::Projection;
use crate::types::{PlanarPoint, Waypoint};
use tracing::debug;

/// Progress through a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    NotStarted,
    Started,
    /// Flying to a diversion target instead of the active turnpoint
    Diverted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    turnpoints: Vec<Turnpoint>,
    index: usize,
    started: bool,
    divert: Option<Waypoint>,
    polar: PolarCoefficients,
    settings: GlideSettings,
}

impl Task {
    pub fn new(turnpoints: Vec<Turnpoint>, polar: PolarCoefficients) -> Result<Self> {
        if turnpoints.is_empty() {
            return Err(Error::EmptyTask);
        }

        Ok(Self {
            turnpoints,
            index: 0,
            started: false,
            divert: None,
            polar,
            settings: GlideSettings::default(),
        })
    }

    pub fn with_settings(mut self, settings: GlideSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn turnpoints(&self) -> &[Turnpoint] {
        &self.turnpoints
    }

    /// Index of the active turnpoint
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state(&self) -> TaskState {
        if self.divert.is_some() {
            TaskState::Diverted
        } else if self.started {
            TaskState::Started
        } else {
            TaskState::NotStarted
        }
    }

    pub fn polar(&self) -> &PolarCoefficients {
        &self.polar
    }

    pub fn settings(&self) -> &GlideSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: GlideSettings) {
        self.settings = settings;
    }

    /// Recompute bisectors and minimum-distance points of every turnpoint
    pub fn update_geometry(&mut self, projection: &Projection) {
        let positions: Vec<PlanarPoint> = self
            .turnpoints
            .iter()
            .map(|tp| tp.waypoint.position)
            .collect();

        for (i, tp) in self.turnpoints.iter_mut().enumerate() {
            let prev = i.checked_sub(1).map(|j| positions[j]);
            let next = positions.get(i + 1).copied();
            tp.update_geometry(projection, prev, next);
        }
    }

    fn last_index(&self) -> usize {
        self.turnpoints.len() - 1
    }

    pub fn reset(&mut self) {
        debug!("Task reset");
        self.started = false;
        self.divert = None;
        self.index = 0;
    }

    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.index = self.last_index().min(1);
        debug!(index = self.index, "Task started");
    }

    pub fn next_turnpoint(&mut self) {
        if self.started && self.index < self.last_index() {
            self.index += 1;
            debug!(index = self.index, "Advanced to next turnpoint");
        }
    }

    pub fn prev_turnpoint(&mut self) {
        if self.started && self.index > 1 {
            self.index -= 1;
            debug!(index = self.index, "Stepped back to previous turnpoint");
        }
    }

    /// Fly straight to `waypoint` instead of the remaining turnpoints
    ///
    /// Ignored until the task is started.
    pub fn divert(&mut self, waypoint: Waypoint) {
        if !self.started {
            debug!(waypoint = %waypoint.id, "Ignoring diversion before task start");
            return;
        }
        debug!(waypoint = %waypoint.id, "Diverting");
        self.divert = Some(waypoint);
    }

    pub fn cancel_divert(&mut self) {
        if self.divert.take().is_some() {
            debug!(index = self.index, "Diversion cancelled");
        }
    }

    pub fn active_turnpoint(&self) -> &Turnpoint {
        &self.turnpoints[self.index]
    }

    /// Waypoint currently flown to
    pub fn active_target(&self) -> &Waypoint {
        self.divert
            .as_ref()
            .unwrap_or(&self.active_turnpoint().waypoint)
    }

    /// Whether `point` lies inside the start turnpoint's outer sector
    pub fn in_start_sector(&self, projection: &Projection, point: PlanarPoint) -> bool {
        self.turnpoints[0].in_outer_sector(projection, point)
    }

    /// Points from `position` to the destination
    ///
    /// Goes through the minimum-distance points of the remaining turnpoints, or straight
    /// to the diversion target.
    pub fn remaining_route(&self, position: PlanarPoint) -> Vec<PlanarPoint> {
        let mut route = vec![position];
        match &self.divert {
            Some(waypoint) => route.push(waypoint.position),
            None => route.extend(self.turnpoints[self.index..].iter().map(|tp| tp.min_dist)),
        }
        route
    }

    fn destination(&self) -> &Waypoint {
        match &self.divert {
            Some(waypoint) => waypoint,
            None => &self.turnpoints[self.last_index()].waypoint,
        }
    }

    /// Final glide from `position` at `altitude` over the rest of the task
    pub fn final_glide(
        &self,
        projection: &Projection,
        position: PlanarPoint,
        altitude: f64,
        wind: WindVector,
    ) -> std::result::Result<FinalGlide, InvalidGlide> {
        let stf = self
            .polar
            .solve(&self.settings)
            .ok_or(InvalidGlide::NoSpeedToFly)?;

        let legs: Vec<GlideLeg> = self
            .remaining_route(position)
            .windows(2)
            .map(|pair| GlideLeg {
                distance: projection.dist(pair[0], pair[1]),
                course: projection.course(pair[0], pair[1]),
            })
            .collect();

        final_glide(
            &legs,
            stf,
            wind,
            altitude,
            self.destination().altitude,
            self.settings.safety_height,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::{assert_err_eq, assert_matches, assert_ok};

    fn projection() -> Projection {
        Projection::new(
            49f64.to_radians(),
            55f64.to_radians(),
            52f64.to_radians(),
            (-1f64).to_radians(),
        )
        .unwrap()
    }

    fn polar() -> PolarCoefficients {
        PolarCoefficients::new(-0.002117, 0.08998, -1.560)
    }

    fn wp(id: &str, x: f64, y: f64) -> Waypoint {
        Waypoint::new(id, id, PlanarPoint::new(x, y))
    }

    fn triangle() -> Task {
        let turnpoints = vec![
            Turnpoint::line(wp("START", 0.0, 0.0), 1000.0).with_direction(Direction::Next),
            Turnpoint::sector(wp("TP1", 0.0, 50_000.0), 3000.0, 90.0),
            Turnpoint::cylinder(wp("FINISH", 40_000.0, 20_000.0).with_altitude(150.0), 500.0),
        ];
        let mut task = Task::new(turnpoints, polar()).unwrap();
        task.update_geometry(&projection());
        task
    }

    #[test]
    fn empty_task() {
        assert_matches!(Task::new(Vec::new(), polar()), Err(Error::EmptyTask));
    }

    #[test]
    fn index_stays_in_bounds() {
        let mut task = triangle();
        assert_eq!(task.state(), TaskState::NotStarted);
        assert_eq!(task.index(), 0);

        task.next_turnpoint();
        assert_eq!(task.index(), 0);

        task.start();
        assert_eq!(task.state(), TaskState::Started);
        assert_eq!(task.index(), 1);

        task.next_turnpoint();
        task.next_turnpoint();
        task.next_turnpoint();
        assert_eq!(task.index(), 2);
        assert_eq!(task.active_target().id, "FINISH");

        task.prev_turnpoint();
        task.prev_turnpoint();
        task.prev_turnpoint();
        assert_eq!(task.index(), 1);

        task.reset();
        assert_eq!(task.state(), TaskState::NotStarted);
        assert_eq!(task.index(), 0);
    }

    #[test]
    fn single_turnpoint_task() {
        let home = Turnpoint::cylinder(wp("HOME", 0.0, 0.0), 500.0);
        let mut task = Task::new(vec![home], polar()).unwrap();
        task.start();
        task.next_turnpoint();
        assert_eq!(task.index(), 0);
    }

    #[test]
    fn divert_and_cancel() {
        let mut task = triangle();
        task.start();
        task.next_turnpoint();
        let before = task.active_target().clone();

        task.divert(wp("FIELD", 10_000.0, 10_000.0).with_landable(true));
        assert_eq!(task.state(), TaskState::Diverted);
        assert_eq!(task.active_target().id, "FIELD");
        assert_eq!(task.index(), 2);

        task.cancel_divert();
        assert_eq!(task.state(), TaskState::Started);
        assert_eq!(task.active_target(), &before);
    }

    #[test]
    fn divert_needs_a_started_task() {
        let mut task = triangle();
        task.divert(wp("FIELD", 10_000.0, 10_000.0));
        assert_eq!(task.state(), TaskState::NotStarted);
        assert_eq!(task.active_target().id, "START");

        task.start();
        task.divert(wp("FIELD", 10_000.0, 10_000.0));
        assert_eq!(task.state(), TaskState::Diverted);

        task.reset();
        assert_eq!(task.state(), TaskState::NotStarted);
        assert_eq!(task.active_target().id, "START");
    }

    #[test]
    fn start_sector_ignores_inner_zone() {
        let start = Turnpoint::sector(wp("START", 0.0, 0.0), 3000.0, 90.0)
            .with_fixed_bisector(0.0)
            .with_inner(500.0, 360.0);
        let turn = Turnpoint::cylinder(wp("TP", 0.0, 20_000.0), 500.0);
        let task = Task::new(vec![start, turn], polar()).unwrap();
        let projection = projection();

        // Behind the waypoint: inside the inner cylinder only
        let behind = PlanarPoint::new(0.0, -300.0);
        assert!(task.active_turnpoint().in_zone(&projection, behind));
        assert!(!task.in_start_sector(&projection, behind));

        assert!(task.in_start_sector(&projection, PlanarPoint::new(0.0, 2000.0)));
        assert!(!task.in_start_sector(&projection, PlanarPoint::new(0.0, 3500.0)));
    }

    #[test]
    fn start_sector() {
        let task = triangle();
        let projection = projection();

        assert!(task.in_start_sector(&projection, PlanarPoint::new(200.0, 300.0)));
        assert!(!task.in_start_sector(&projection, PlanarPoint::new(200.0, -300.0)));
        assert!(!task.in_start_sector(&projection, PlanarPoint::new(0.0, 1500.0)));
    }

    #[test]
    fn route_uses_min_dist_points() {
        let mut task = triangle();
        task.start();

        let route = task.remaining_route(PlanarPoint::new(0.0, 0.0));
        assert_eq!(route.len(), 3);
        // Sector bisector points back into the triangle, away from the turnpoint
        assert!(route[1].y < 50_000.0);
        assert_eq!(route[2], PlanarPoint::new(40_000.0, 20_000.0));

        task.divert(wp("FIELD", 10_000.0, 10_000.0));
        assert_eq!(
            task.remaining_route(PlanarPoint::new(0.0, 0.0)),
            [PlanarPoint::new(0.0, 0.0), PlanarPoint::new(10_000.0, 10_000.0)]
        );
    }

    #[test]
    fn final_glide_over_remaining_legs() {
        let mut task = triangle();
        let projection = projection();
        task.start();
        task.next_turnpoint();

        let position = PlanarPoint::new(0.0, 20_000.0);
        let glide = assert_ok!(task.final_glide(&projection, position, 2000.0, WindVector::calm()));

        let distance = projection.dist(position, PlanarPoint::new(40_000.0, 20_000.0));
        let expected_loss = distance / 40.07;
        assert!((glide.height_loss - expected_loss).abs() < 5.0, "{}", glide.height_loss);
        assert!((glide.arrival_height - (2000.0 - glide.height_loss - 150.0)).abs() < 1e-9);
        assert!(glide.glide_margin.unwrap() > 0.0);
    }

    #[test]
    fn final_glide_sentinels() {
        let mut task = triangle();
        let projection = projection();
        task.start();
        task.next_turnpoint();

        let at_finish = PlanarPoint::new(40_000.0, 20_000.0);
        assert_err_eq!(
            task.final_glide(&projection, at_finish, 2000.0, WindVector::calm()),
            InvalidGlide::ZeroLengthLeg
        );
        assert_err_eq!(
            task.final_glide(
                &projection,
                PlanarPoint::new(0.0, 0.0),
                2000.0,
                WindVector::new(40.0, 0.0)
            ),
            InvalidGlide::WindTooStrong
        );
    }
}
