//! TNP airspace text format
//!
//! A TNP file is a line-oriented list of airspace blocks. Each block starts with header
//! fields (`TITLE=`, `CLASS=`, `TYPE=`, `BASE=`, `TOPS=`, `ACTIVE=`, `RADIO=`) followed by
//! boundary commands:
//!
//! ```text
//! TITLE=ODIHAM CTR
//! CLASS=D
//! BASE=SFC
//! TOPS=2500ALT
//! CIRCLE RADIUS=2.5 CENTRE=N511403 W0005634
//! ```
//!
//! Parsed blocks are delivered to an [`AirspaceSink`], so the same parser feeds the
//! geometry builder and export writers alike.

mod coords;
mod parser;
mod record;
mod syntax;

pub use self::coords::{METERS_PER_NM, parse_lat, parse_lon};
pub use self::parser::parse_str;
pub use self::record::{AirspaceSink, ParsedAirspace, Segment};
pub use self::syntax::SyntaxError;

use crate::error::{Result, Warning};
use crate::utils::decode_text;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// TNP file reader
///
/// Reads the whole source before parsing; nothing reaches the sink unless the complete
/// input parsed successfully.
///
/// # Example
///
/// ```no_run
/// use glidenav::tnp::{ParsedAirspace, TnpReader};
///
/// let mut warnings = Vec::new();
/// let mut airspaces: Vec<ParsedAirspace> = Vec::new();
/// TnpReader::from_path("uk.tnp")?.read_into(&mut airspaces, &mut warnings)?;
/// println!("{} airspaces", airspaces.len());
/// # Ok::<(), glidenav::Error>(())
/// ```
pub struct TnpReader<R: Read> {
    reader: R,
}

impl TnpReader<File> {
    /// Open a TNP file from a path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(File::open(path)?))
    }
}

impl<R: Read> TnpReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Parse the whole input into airspace blocks
    pub fn read_airspaces(&mut self, warnings: &mut Vec<Warning>) -> Result<Vec<ParsedAirspace>> {
        let mut bytes = Vec::new();
        self.reader.read_to_end(&mut bytes)?;
        parse_str(&decode_text(&bytes), warnings)
    }

    /// Parse the whole input and deliver each block to `sink`
    ///
    /// Returns the number of blocks delivered.
    pub fn read_into<S: AirspaceSink>(
        &mut self,
        mut sink: S,
        warnings: &mut Vec<Warning>,
    ) -> Result<usize> {
        let airspaces = self.read_airspaces(warnings)?;
        for airspace in &airspaces {
            sink.add_airspace(airspace);
        }
        Ok(airspaces.len())
    }
}
