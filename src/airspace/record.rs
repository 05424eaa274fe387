use crate::airspace::AirspaceRegion;
use crate::types::{
    AirspaceClass, AirspaceType, BoundarySegment, BoundingBox, InvalidLevel, PlanarPoint,
};
use serde::{Deserialize, Serialize};

/// Boundary line as stored by the airspace database
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LineRecord {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// Boundary arc as stored by the airspace database, angles in 1/64 degree
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcRecord {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub start_angle: i32,
    pub sweep: i32,
}

/// Flat storage form of an [`AirspaceRegion`]
///
/// Lines and arcs are kept in separate lists. The containment test only needs the
/// crossing count, so segment order does not survive a round trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirspaceRecord {
    pub id: u32,
    pub name: String,
    pub class: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub base: String,
    pub tops: String,
    pub bounding_box: BoundingBox,
    pub lines: Vec<LineRecord>,
    pub arcs: Vec<ArcRecord>,
}

impl AirspaceRegion {
    pub fn to_record(&self) -> AirspaceRecord {
        let mut lines = Vec::new();
        let mut arcs = Vec::new();

        for segment in &self.segments {
            match *segment {
                BoundarySegment::Line { p1, p2 } => lines.push(LineRecord {
                    x1: p1.x,
                    y1: p1.y,
                    x2: p2.x,
                    y2: p2.y,
                }),
                BoundarySegment::Arc {
                    center,
                    radius,
                    start_angle,
                    sweep_angle,
                } => arcs.push(ArcRecord {
                    x: center.x,
                    y: center.y,
                    radius,
                    start_angle,
                    sweep: sweep_angle,
                }),
            }
        }

        AirspaceRecord {
            id: self.id,
            name: self.name.clone(),
            class: self.class.letter().map(String::from).unwrap_or_default(),
            kind: self.kind.as_tnp().to_string(),
            base: self.base.to_string(),
            tops: self.tops.to_string(),
            bounding_box: self.bounding_box,
            lines,
            arcs,
        }
    }

    pub fn from_record(record: AirspaceRecord) -> Result<Self, InvalidLevel> {
        let lines = record.lines.iter().map(|line| BoundarySegment::Line {
            p1: PlanarPoint::new(line.x1, line.y1),
            p2: PlanarPoint::new(line.x2, line.y2),
        });
        let arcs = record.arcs.iter().map(|arc| BoundarySegment::Arc {
            center: PlanarPoint::new(arc.x, arc.y),
            radius: arc.radius,
            start_angle: arc.start_angle,
            sweep_angle: arc.sweep,
        });

        Ok(AirspaceRegion {
            id: record.id,
            class: AirspaceClass::from_letter(&record.class).unwrap_or_default(),
            kind: AirspaceType::from_tnp(&record.kind),
            base: record.base.parse()?,
            tops: record.tops.parse()?,
            bounding_box: record.bounding_box,
            segments: lines.chain(arcs).collect(),
            name: record.name,
        })
    }
}

impl TryFrom<AirspaceRecord> for AirspaceRegion {
    type Error = InvalidLevel;

    fn try_from(record: AirspaceRecord) -> Result<Self, Self::Error> {
        AirspaceRegion::from_record(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Level;
    use crate::utils::angle;
    use claims::{assert_err, assert_ok};

    fn sector() -> AirspaceRegion {
        let center = PlanarPoint::new(0.0, 0.0);
        let segments = vec![
            BoundarySegment::Line {
                p1: center,
                p2: PlanarPoint::new(1000.0, 0.0),
            },
            BoundarySegment::Arc {
                center,
                radius: 1000.0,
                start_angle: 0,
                sweep_angle: angle::from_degrees(90.0),
            },
            BoundarySegment::Line {
                p1: PlanarPoint::new(0.0, -1000.0),
                p2: center,
            },
        ];

        AirspaceRegion {
            id: 7,
            name: "DANGER 1".to_string(),
            class: AirspaceClass::Unknown,
            kind: AirspaceType::DangerArea,
            base: Level::Surface,
            tops: Level::Altitude(3000),
            bounding_box: BoundingBox::new(0.0, -1000.0, 1000.0, 0.0),
            segments,
        }
    }

    #[test]
    fn record_splits_lines_and_arcs() {
        let record = sector().to_record();

        assert_eq!(record.class, "");
        assert_eq!(record.kind, "D");
        assert_eq!(record.base, "SFC");
        assert_eq!(record.tops, "3000ALT");
        assert_eq!(record.lines.len(), 2);
        assert_eq!(record.arcs, vec![ArcRecord {
            x: 0.0,
            y: 0.0,
            radius: 1000.0,
            start_angle: 0,
            sweep: 5760,
        }]);
    }

    #[test]
    fn record_keeps_containment() {
        let region = assert_ok!(AirspaceRegion::try_from(sector().to_record()));

        assert_eq!(region.kind, AirspaceType::DangerArea);
        assert_eq!(region.tops, Level::Altitude(3000));
        assert!(region.contains(PlanarPoint::new(500.0, -500.0)));
        assert!(!region.contains(PlanarPoint::new(-500.0, -500.0)));
    }

    #[test]
    fn record_json() {
        let json = assert_ok!(serde_json::to_value(sector().to_record()));

        assert_eq!(json["type"], "D");
        assert_eq!(json["arcs"][0]["sweep"], 5760);
        assert_eq!(json["bounding_box"]["ymin"], -1000.0);

        let record: AirspaceRecord = assert_ok!(serde_json::from_value(json));
        assert_eq!(record, sector().to_record());
    }

    #[test]
    fn invalid_level_in_record() {
        let mut record = sector().to_record();
        record.base = "GROUND".to_string();
        assert_eq!(
            assert_err!(AirspaceRegion::from_record(record)),
            InvalidLevel("GROUND".to_string())
        );
    }
}
