//! OpenAir export of parsed TNP airspace

use crate::error::Result;
use crate::tnp::{AirspaceSink, METERS_PER_NM, ParsedAirspace, Segment};
use crate::types::{AirspaceType, GeoPoint, Level};
use std::io::Write;

/// OpenAir text writer with builder API
///
/// Collects parsed airspace blocks as an [`AirspaceSink`] and writes them as OpenAir
/// `AC`/`AN`/`AL`/`AH` records followed by `DP`, `V`, `DB` and `DC` geometry.
///
/// # Example
///
/// ```
/// use glidenav::tnp::{AirspaceSink, parse_str};
/// use glidenav::writer::OpenAirWriter;
///
/// let text = "TITLE=X\nCLASS=D\nBASE=SFC\nTOPS=FL50\nCIRCLE RADIUS=1 CENTRE=N520000 W0010000\n";
///
/// let mut writer = OpenAirWriter::new();
/// for block in parse_str(text, &mut Vec::new())? {
///     writer.add_airspace(&block);
/// }
///
/// let mut output = Vec::new();
/// writer.write(&mut output)?;
/// assert!(String::from_utf8_lossy(&output).starts_with("AC D\nAN X\n"));
/// # Ok::<(), glidenav::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct OpenAirWriter {
    comment: Option<String>,
    airspaces: Vec<ParsedAirspace>,
}

impl OpenAirWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a `*` comment at the top of the output
    ///
    /// Returns `&mut self` to allow method chaining.
    pub fn with_comment(&mut self, comment: impl Into<String>) -> &mut Self {
        self.comment = Some(comment.into());
        self
    }

    /// Add multiple airspaces from an iterator
    ///
    /// Returns `&mut self` to allow method chaining.
    pub fn add_airspaces<'a, I>(&mut self, airspaces: I) -> &mut Self
    where
        I: IntoIterator<Item = &'a ParsedAirspace>,
    {
        self.airspaces.extend(airspaces.into_iter().cloned());
        self
    }

    pub fn len(&self) -> usize {
        self.airspaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.airspaces.is_empty()
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        if let Some(comment) = &self.comment {
            for line in comment.lines() {
                writeln!(writer, "* {line}")?;
            }
            writeln!(writer)?;
        }

        for (i, airspace) in self.airspaces.iter().enumerate() {
            if i > 0 {
                writeln!(writer)?;
            }
            write_airspace(writer, airspace)?;
        }
        Ok(())
    }
}

impl AirspaceSink for OpenAirWriter {
    fn add_airspace(&mut self, airspace: &ParsedAirspace) {
        self.airspaces.push(airspace.clone());
    }
}

/// OpenAir `AC` value
///
/// Danger, restricted and prohibited areas keep their type; everything else is
/// written by class where one is known.
fn openair_class(airspace: &ParsedAirspace) -> String {
    match &airspace.kind {
        AirspaceType::DangerArea => return "Q".to_string(),
        AirspaceType::RestrictedArea => return "R".to_string(),
        AirspaceType::ProhibitedArea => return "P".to_string(),
        _ => {}
    }

    if let Some(letter) = airspace.class.letter() {
        return letter.to_string();
    }

    match &airspace.kind {
        AirspaceType::ControlZone => "CTR",
        AirspaceType::TransponderMandatoryZone => "TMZ",
        AirspaceType::RadioMandatoryZone => "RMZ",
        _ => "UNKNOWN",
    }
    .to_string()
}

fn openair_level(level: Level) -> String {
    match level {
        Level::Surface => "SFC".to_string(),
        Level::FlightLevel(fl) => format!("FL{fl}"),
        Level::Altitude(ft) => format!("{ft}ft MSL"),
        Level::Agl(ft) => format!("{ft}ft AGL"),
        Level::Aal(ft) => format!("{ft}ft AAL"),
        Level::Unlimited => "UNLTD".to_string(),
    }
}

/// Degrees, minutes and rounded seconds
fn dms(radians: f64) -> (u32, u32, u32) {
    let seconds = (radians.to_degrees().abs() * 3600.0).round() as u32;
    (seconds / 3600, seconds / 60 % 60, seconds % 60)
}

fn openair_point(point: GeoPoint) -> String {
    let (lat_d, lat_m, lat_s) = dms(point.lat);
    let (lon_d, lon_m, lon_s) = dms(point.lon);
    let ns = if point.lat < 0.0 { 'S' } else { 'N' };
    let ew = if point.lon < 0.0 { 'W' } else { 'E' };

    format!("{lat_d:02}:{lat_m:02}:{lat_s:02} {ns} {lon_d:03}:{lon_m:02}:{lon_s:02} {ew}")
}

fn nautical_miles(meters: f64) -> f64 {
    (meters / METERS_PER_NM * 1000.0).round() / 1000.0
}

fn write_airspace<W: Write>(writer: &mut W, airspace: &ParsedAirspace) -> Result<()> {
    writeln!(writer, "AC {}", openair_class(airspace))?;
    writeln!(writer, "AN {}", airspace.title)?;
    writeln!(writer, "AL {}", openair_level(airspace.base))?;
    writeln!(writer, "AH {}", openair_level(airspace.tops))?;

    let mut pen: Option<GeoPoint> = None;
    for segment in &airspace.segments {
        match *segment {
            Segment::Point(point) => {
                writeln!(writer, "DP {}", openair_point(point))?;
            }
            Segment::Circle { center, radius } => {
                writeln!(writer, "V X={}", openair_point(center))?;
                writeln!(writer, "DC {}", nautical_miles(radius))?;
            }
            Segment::ClockwiseArc { to, center, .. }
            | Segment::AnticlockwiseArc { to, center, .. } => {
                // The parser never lets an arc open a boundary
                let Some(from) = pen else { continue };

                let sign = if matches!(segment, Segment::ClockwiseArc { .. }) { '+' } else { '-' };
                writeln!(writer, "V D={sign}")?;
                writeln!(writer, "V X={}", openair_point(center))?;
                writeln!(writer, "DB {}, {}", openair_point(from), openair_point(to))?;
            }
        }
        pen = Some(segment.end_point());
    }
    Ok(())
}
