use crate::types::{AirspaceClass, AirspaceType, GeoPoint, Level};

/// Boundary command as written in the TNP file
///
/// Coordinates are in radians, radii in meters. Arcs run from the end of the
/// previous segment to `to`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Segment {
    Point(GeoPoint),
    Circle {
        center: GeoPoint,
        radius: f64,
    },
    ClockwiseArc {
        to: GeoPoint,
        center: GeoPoint,
        radius: f64,
    },
    AnticlockwiseArc {
        to: GeoPoint,
        center: GeoPoint,
        radius: f64,
    },
}

impl Segment {
    /// Point at which the pen rests after this segment
    pub fn end_point(&self) -> GeoPoint {
        match *self {
            Segment::Point(point) => point,
            Segment::Circle { center, .. } => center,
            Segment::ClockwiseArc { to, .. } | Segment::AnticlockwiseArc { to, .. } => to,
        }
    }
}

/// One airspace block (or sub-block) of a TNP file
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAirspace {
    pub title: String,
    pub class: AirspaceClass,
    pub kind: AirspaceType,
    pub base: Level,
    pub tops: Level,
    pub active: Option<String>,
    pub radio: Option<String>,
    pub segments: Vec<Segment>,
}

/// Consumer of parsed airspace blocks
///
/// The parser calls `add_airspace` once per completed block, in file order, and only
/// after the whole input parsed successfully.
pub trait AirspaceSink {
    fn add_airspace(&mut self, airspace: &ParsedAirspace);
}

impl AirspaceSink for Vec<ParsedAirspace> {
    fn add_airspace(&mut self, airspace: &ParsedAirspace) {
        self.push(airspace.clone());
    }
}

impl<S: AirspaceSink + ?Sized> AirspaceSink for &mut S {
    fn add_airspace(&mut self, airspace: &ParsedAirspace) {
        (**self).add_airspace(airspace);
    }
}
