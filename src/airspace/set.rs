use crate::airspace::AirspaceRegion;
use crate::types::{BoundingBox, PlanarPoint};
use tracing::debug;

/// Loaded airspace regions, ordered by bounding box `xmin`
///
/// The whole set is replaced on each import.
#[derive(Debug, Clone, Default)]
pub struct AirspaceSet {
    regions: Vec<AirspaceRegion>,
}

impl AirspaceSet {
    pub fn new(regions: Vec<AirspaceRegion>) -> Self {
        let mut set = Self::default();
        set.replace(regions);
        set
    }

    /// Swap in a freshly imported region list
    pub fn replace(&mut self, mut regions: Vec<AirspaceRegion>) {
        regions.sort_by(|a, b| a.bounding_box.xmin.total_cmp(&b.bounding_box.xmin));
        debug!(count = regions.len(), "Replaced airspace set");
        self.regions = regions;
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AirspaceRegion> {
        self.regions.iter()
    }

    /// Regions whose bounding box overlaps `bbox`
    pub fn query(&self, bbox: BoundingBox) -> impl Iterator<Item = &AirspaceRegion> {
        let end = self
            .regions
            .partition_point(|region| region.bounding_box.xmin <= bbox.xmax);

        self.regions[..end]
            .iter()
            .filter(move |region| region.bounding_box.overlaps(&bbox))
    }

    /// Regions containing `point`
    pub fn containing(&self, point: PlanarPoint) -> Vec<&AirspaceRegion> {
        self.query(BoundingBox::from(point))
            .filter(|region| region.contains(point))
            .collect()
    }
}

impl FromIterator<AirspaceRegion> for AirspaceSet {
    fn from_iter<I: IntoIterator<Item = AirspaceRegion>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AirspaceClass, AirspaceType, BoundarySegment, Level};

    fn circle(id: u32, x: f64, y: f64, radius: f64) -> AirspaceRegion {
        let center = PlanarPoint::new(x, y);
        AirspaceRegion {
            id,
            name: format!("CIRCLE {id}"),
            class: AirspaceClass::ClassD,
            kind: AirspaceType::ControlZone,
            base: Level::Surface,
            tops: Level::FlightLevel(45),
            bounding_box: BoundingBox::around(center, radius),
            segments: vec![BoundarySegment::circle(center, radius)],
        }
    }

    fn ids<'a>(regions: impl IntoIterator<Item = &'a AirspaceRegion>) -> Vec<u32> {
        let mut ids: Vec<u32> = regions.into_iter().map(|region| region.id).collect();
        ids.sort();
        ids
    }

    fn set() -> AirspaceSet {
        AirspaceSet::from_iter([
            circle(1, 10_000.0, 0.0, 1_000.0),
            circle(2, 0.0, 0.0, 5_000.0),
            circle(3, -20_000.0, 0.0, 2_000.0),
            circle(4, 1_000.0, 1_000.0, 2_000.0),
        ])
    }

    #[test]
    fn sorted_by_xmin() {
        let set = set();
        let xmins: Vec<f64> = set.iter().map(|r| r.bounding_box.xmin).collect();
        assert_eq!(xmins, [-22_000.0, -5_000.0, -1_000.0, 9_000.0]);
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn query_by_viewport() {
        let set = set();

        let viewport = BoundingBox::new(-1_000.0, -1_000.0, 1_000.0, 1_000.0);
        assert_eq!(ids(set.query(viewport)), [2, 4]);

        let viewport = BoundingBox::new(4_000.0, -500.0, 9_000.0, 500.0);
        assert_eq!(ids(set.query(viewport)), [1, 2]);

        let viewport = BoundingBox::new(-100_000.0, 50_000.0, 100_000.0, 60_000.0);
        assert_eq!(ids(set.query(viewport)), Vec::<u32>::new());
    }

    #[test]
    fn containing_point() {
        let set = set();

        assert_eq!(ids(set.containing(PlanarPoint::new(0.0, 0.0))), [2, 4]);
        assert_eq!(ids(set.containing(PlanarPoint::new(4_000.0, -2_000.0))), [2]);
        assert_eq!(ids(set.containing(PlanarPoint::new(10_500.0, 0.0))), [1]);
        // Corner of circle 3's bounding box, outside the circle itself
        assert!(set.containing(PlanarPoint::new(-21_900.0, 1_900.0)).is_empty());
    }

    #[test]
    fn replace_swaps_everything() {
        let mut set = set();
        set.replace(vec![circle(9, 0.0, 0.0, 100.0)]);

        assert_eq!(set.len(), 1);
        assert_eq!(ids(set.containing(PlanarPoint::new(0.0, 0.0))), [9]);
        set.replace(Vec::new());
        assert!(set.is_empty());
    }
}
