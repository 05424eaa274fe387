use crate::airspace::AirspaceRegion;
use crate::error::Warning;
use crate::projection::Projection;
use crate::tnp::{AirspaceSink, ParsedAirspace, Segment};
use crate::types::{BoundarySegment, BoundingBox, GeoPoint, PlanarPoint};
use crate::utils::angle;
use tracing::{debug, warn};

/// Builds projected airspace regions from parsed TNP blocks
///
/// Consecutive blocks with the same title, class, type and levels are merged into one
/// region with several boundary loops.
///
/// # Example
///
/// ```
/// use glidenav::airspace::AirspaceBuilder;
/// use glidenav::tnp::{AirspaceSink, parse_str};
/// use glidenav::Projection;
///
/// let projection = Projection::new(0.855, 0.96, 0.907, 0.0)?;
/// let text = "TITLE=X\nBASE=SFC\nTOPS=FL50\nCIRCLE RADIUS=1 CENTRE=N520000 E0000000\n";
///
/// let mut builder = AirspaceBuilder::new(&projection);
/// for block in parse_str(text, &mut Vec::new())? {
///     builder.add_airspace(&block);
/// }
/// assert_eq!(builder.finish().len(), 1);
/// # Ok::<(), glidenav::Error>(())
/// ```
pub struct AirspaceBuilder<'a> {
    projection: &'a Projection,
    regions: Vec<AirspaceRegion>,
    warnings: Vec<Warning>,
}

impl<'a> AirspaceBuilder<'a> {
    pub fn new(projection: &'a Projection) -> Self {
        Self {
            projection,
            regions: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Get warnings collected while building
    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Consume the builder and return the regions in file order
    pub fn finish(self) -> Vec<AirspaceRegion> {
        self.regions
    }

    fn degenerate_arc(&mut self, title: &str, radius: f64) {
        warn!(title, radius, "Degenerate arc radius, using a straight line instead");
        self.warnings.push(Warning::DegenerateArc {
            title: title.to_string(),
            radius,
        });
    }

    /// Radius in plane units for a ground radius around `center`
    fn planar_radius(&self, center: GeoPoint, radius: f64) -> f64 {
        radius * self.projection.scale_factor(center.lat)
    }

    /// Project one block into a closed boundary
    fn project(&mut self, airspace: &ParsedAirspace) -> Vec<BoundarySegment> {
        let mut segments = Vec::with_capacity(airspace.segments.len() + 1);
        let mut first: Option<PlanarPoint> = None;
        let mut pen: Option<PlanarPoint> = None;

        for segment in &airspace.segments {
            match *segment {
                Segment::Point(point) => {
                    let point = self.projection.project(point);
                    match pen {
                        Some(previous) if previous != point => segments.push(BoundarySegment::Line {
                            p1: previous,
                            p2: point,
                        }),
                        Some(_) => {}
                        None => first = Some(point),
                    }
                    pen = Some(point);
                }
                Segment::Circle { center, radius } => {
                    if radius <= 0.0 {
                        self.degenerate_arc(&airspace.title, radius);
                        continue;
                    }
                    segments.push(BoundarySegment::circle(
                        self.projection.project(center),
                        self.planar_radius(center, radius),
                    ));
                }
                Segment::ClockwiseArc { to, center, radius }
                | Segment::AnticlockwiseArc { to, center, radius } => {
                    let end = self.projection.project(to);
                    let Some(start) = pen else {
                        // The grammar never lets an arc open a boundary
                        first = Some(end);
                        pen = Some(end);
                        continue;
                    };

                    if radius <= 0.0 {
                        self.degenerate_arc(&airspace.title, radius);
                        segments.push(BoundarySegment::Line { p1: start, p2: end });
                    } else {
                        let radius = self.planar_radius(center, radius);
                        let center = self.projection.project(center);
                        let start_angle = BoundarySegment::angle_of(center, start);
                        let end_angle = BoundarySegment::angle_of(center, end);
                        let sweep_angle = match segment {
                            Segment::ClockwiseArc { .. } => {
                                angle::normalize(end_angle - start_angle)
                            }
                            _ => -angle::normalize(start_angle - end_angle),
                        };

                        // The arc runs on its nominal radius; join it to the actual end points
                        let arc_start = BoundarySegment::point_at(center, radius, start_angle);
                        let arc_end =
                            BoundarySegment::point_at(center, radius, start_angle + sweep_angle);

                        connect(&mut segments, start, arc_start);
                        segments.push(BoundarySegment::Arc {
                            center,
                            radius,
                            start_angle,
                            sweep_angle,
                        });
                        connect(&mut segments, arc_end, end);
                    }
                    pen = Some(end);
                }
            }
        }

        if let (Some(first), Some(last)) = (first, pen) {
            if first != last {
                segments.push(BoundarySegment::Line { p1: last, p2: first });
            }
        }

        segments
    }
}

fn connect(segments: &mut Vec<BoundarySegment>, from: PlanarPoint, to: PlanarPoint) {
    if from != to {
        segments.push(BoundarySegment::Line { p1: from, p2: to });
    }
}

fn bounding_box(segments: &[BoundarySegment]) -> Option<BoundingBox> {
    let (first, rest) = segments.split_first()?;
    let mut bbox = first.bounding_box();
    for segment in rest {
        bbox.merge(segment.bounding_box());
    }
    Some(bbox)
}

impl AirspaceSink for AirspaceBuilder<'_> {
    fn add_airspace(&mut self, airspace: &ParsedAirspace) {
        let segments = self.project(airspace);
        let Some(bbox) = bounding_box(&segments) else {
            debug!(title = %airspace.title, "Skipping airspace without usable boundary");
            return;
        };

        if let Some(region) = self.regions.last_mut() {
            let same_region = region.name == airspace.title
                && region.class == airspace.class
                && region.kind == airspace.kind
                && region.base == airspace.base
                && region.tops == airspace.tops;

            if same_region {
                debug!(title = %airspace.title, "Adding boundary loop to airspace");
                region.bounding_box.merge(bbox);
                region.segments.extend(segments);
                return;
            }
        }

        let id = self.regions.len() as u32 + 1;
        debug!(id, title = %airspace.title, segments = segments.len(), "Built airspace");
        self.regions.push(AirspaceRegion {
            id,
            name: airspace.title.clone(),
            class: airspace.class,
            kind: airspace.kind.clone(),
            base: airspace.base,
            tops: airspace.tops,
            bounding_box: bbox,
            segments,
        });
    }
}
