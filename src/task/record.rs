use crate::error::{Error, Result};
use crate::task::{Direction, PolarCoefficients, Task, Turnpoint};
use crate::types::{PlanarPoint, Waypoint};
use serde::{Deserialize, Serialize};

/// Stored form of one task turnpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnpointRecord {
    pub waypoint_id: String,
    pub radius1: f64,
    pub angle1: f64,
    pub radius2: f64,
    pub angle2: f64,
    pub direction: Direction,
    pub angle12: f64,
    pub min_dist_x: f64,
    pub min_dist_y: f64,
}

impl From<&Turnpoint> for TurnpointRecord {
    fn from(tp: &Turnpoint) -> Self {
        Self {
            waypoint_id: tp.waypoint.id.clone(),
            radius1: tp.radius1,
            angle1: tp.angle1,
            radius2: tp.radius2,
            angle2: tp.angle2,
            direction: tp.direction,
            angle12: tp.angle12,
            min_dist_x: tp.min_dist.x,
            min_dist_y: tp.min_dist.y,
        }
    }
}

impl TurnpointRecord {
    /// Rebuild the turnpoint, resolving the waypoint by id
    pub fn to_turnpoint(&self, waypoints: &[Waypoint]) -> Result<Turnpoint> {
        let waypoint = waypoints
            .iter()
            .find(|wp| wp.id == self.waypoint_id)
            .ok_or_else(|| Error::UnknownWaypoint(self.waypoint_id.clone()))?;

        Ok(Turnpoint {
            waypoint: waypoint.clone(),
            radius1: self.radius1,
            angle1: self.angle1,
            radius2: self.radius2,
            angle2: self.angle2,
            direction: self.direction,
            angle12: self.angle12,
            min_dist: PlanarPoint::new(self.min_dist_x, self.min_dist_y),
        })
    }
}

impl Task {
    pub fn to_records(&self) -> Vec<TurnpointRecord> {
        self.turnpoints().iter().map(TurnpointRecord::from).collect()
    }

    /// Load a task from stored records
    ///
    /// The stored bisectors and minimum-distance points are used as they are; call
    /// [`Task::update_geometry`] to recompute them.
    pub fn from_records(
        records: &[TurnpointRecord],
        waypoints: &[Waypoint],
        polar: PolarCoefficients,
    ) -> Result<Self> {
        let turnpoints = records
            .iter()
            .map(|record| record.to_turnpoint(waypoints))
            .collect::<Result<Vec<_>>>()?;

        Task::new(turnpoints, polar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::{assert_matches, assert_ok};
    use insta::assert_snapshot;

    fn waypoints() -> Vec<Waypoint> {
        vec![
            Waypoint::new("LAS", "Lasham", PlanarPoint::new(0.0, 0.0)).with_altitude(186.0),
            Waypoint::new("DID", "Didcot", PlanarPoint::new(1500.0, 52_000.0)),
        ]
    }

    fn polar() -> PolarCoefficients {
        PolarCoefficients::new(-0.002117, 0.08998, -1.560)
    }

    fn record(id: &str) -> TurnpointRecord {
        TurnpointRecord {
            waypoint_id: id.to_string(),
            radius1: 3000.0,
            angle1: 90.0,
            radius2: 500.0,
            angle2: 360.0,
            direction: Direction::Sym,
            angle12: 182.5,
            min_dist_x: 1478.2,
            min_dist_y: 51_500.4,
        }
    }

    #[test]
    fn records_round_trip_through_task() {
        let records = vec![
            TurnpointRecord {
                direction: Direction::Next,
                ..record("LAS")
            },
            record("DID"),
        ];

        let task = assert_ok!(Task::from_records(&records, &waypoints(), polar()));
        assert_eq!(task.turnpoints()[1].waypoint.name, "Didcot");
        assert_eq!(task.turnpoints()[1].min_dist, PlanarPoint::new(1478.2, 51_500.4));
        assert_eq!(task.to_records(), records);
    }

    #[test]
    fn unknown_waypoint() {
        let records = vec![record("LAS"), record("XYZ")];
        assert_matches!(
            Task::from_records(&records, &waypoints(), polar()),
            Err(Error::UnknownWaypoint(id)) if id == "XYZ"
        );
    }

    #[test]
    fn no_records() {
        assert_matches!(Task::from_records(&[], &waypoints(), polar()), Err(Error::EmptyTask));
    }

    #[test]
    fn json_shape() {
        let json = assert_ok!(serde_json::to_string(&record("DID")));
        assert_snapshot!(json, @r#"{"waypoint_id":"DID","radius1":3000.0,"angle1":90.0,"radius2":500.0,"angle2":360.0,"direction":"SYM","angle12":182.5,"min_dist_x":1478.2,"min_dist_y":51500.4}"#);
    }
}
