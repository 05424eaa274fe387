//! Projected airspace regions and point containment

mod builder;
mod contains;
mod record;
mod set;

pub use self::builder::AirspaceBuilder;
pub use self::record::{AirspaceRecord, ArcRecord, LineRecord};
pub use self::set::AirspaceSet;

use crate::types::{AirspaceClass, AirspaceType, BoundarySegment, BoundingBox, Level};

/// Airspace region in projected coordinates
///
/// The boundary is one or more closed loops of lines and arcs. Regions built from TNP
/// sub-blocks sharing a title and altitude band hold several disjoint loops.
#[derive(Debug, Clone, PartialEq)]
pub struct AirspaceRegion {
    pub id: u32,
    pub name: String,
    pub class: AirspaceClass,
    pub kind: AirspaceType,
    pub base: Level,
    pub tops: Level,
    pub bounding_box: BoundingBox,
    pub segments: Vec<BoundarySegment>,
}

impl AirspaceRegion {
    /// Number of line segments in the boundary
    pub fn line_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|segment| matches!(segment, BoundarySegment::Line { .. }))
            .count()
    }

    /// Number of arc segments in the boundary
    pub fn arc_count(&self) -> usize {
        self.segments.len() - self.line_count()
    }
}
