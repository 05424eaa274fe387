use crate::error::{Error, Result, Warning};
use crate::tnp::coords::{parse_point, parse_radius};
use crate::tnp::record::{ParsedAirspace, Segment};
use crate::tnp::syntax::SyntaxError;
use crate::types::{AirspaceClass, AirspaceType, GeoPoint, Level};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderField {
    Title,
    Class,
    Type,
    Base,
    Tops,
    Active,
    Radio,
}

/// Header keywords accepted before (and, for sub-headers, between) boundary commands
const HEADER_FIELDS: &[(&str, HeaderField)] = &[
    ("TITLE", HeaderField::Title),
    ("CLASS", HeaderField::Class),
    ("TYPE", HeaderField::Type),
    ("BASE", HeaderField::Base),
    ("TOPS", HeaderField::Tops),
    ("ACTIVE", HeaderField::Active),
    ("RADIO", HeaderField::Radio),
];

#[derive(Debug, Clone, PartialEq)]
enum Statement<'a> {
    Header(HeaderField, &'a str),
    Include(bool),
    Boundary(Segment),
}

/// Whitespace token cursor for the arc and circle commands
struct Tokens<'a> {
    inner: std::str::SplitWhitespace<'a>,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inner: text.split_whitespace(),
        }
    }

    fn value(&mut self, what: &str) -> std::result::Result<&'a str, SyntaxError> {
        self.inner
            .next()
            .ok_or_else(|| SyntaxError::Missing(what.to_string()))
    }

    /// Read `KEY=value`, allowing whitespace after the equals sign
    fn keyed(&mut self, keys: &[&str]) -> std::result::Result<&'a str, SyntaxError> {
        let expected = format!("{}=", keys[0]);
        let token = self.value(&expected)?;
        let value = token
            .split_once('=')
            .filter(|(key, _)| keys.contains(key))
            .map(|(_, value)| value)
            .ok_or_else(|| SyntaxError::Unexpected {
                expected,
                found: token.to_string(),
            })?;

        if value.is_empty() {
            self.value(&format!("value for {}", keys[0]))
        } else {
            Ok(value)
        }
    }

    fn point(&mut self, keys: &[&str]) -> std::result::Result<GeoPoint, SyntaxError> {
        let lat = self.keyed(keys)?;
        let lon = self.value("longitude")?;
        parse_point(lat, lon)
    }

    fn finish(mut self) -> std::result::Result<(), SyntaxError> {
        match self.inner.next() {
            None => Ok(()),
            Some(token) => Err(SyntaxError::TrailingToken(token.to_string())),
        }
    }
}

fn parse_statement(line: &str) -> std::result::Result<Statement<'_>, SyntaxError> {
    if let Some((key, value)) = line.split_once('=') {
        let key = key.trim();
        let value = value.trim();

        if let Some(&(_, field)) = HEADER_FIELDS.iter().find(|(name, _)| *name == key) {
            return Ok(Statement::Header(field, value));
        }

        match key {
            "INCLUDE" => {
                return match value {
                    "YES" => Ok(Statement::Include(true)),
                    "NO" => Ok(Statement::Include(false)),
                    _ => Err(SyntaxError::InvalidInclude(value.to_string())),
                };
            }
            "POINT" => {
                let mut tokens = Tokens::new(value);
                let lat = tokens.value("latitude")?;
                let lon = tokens.value("longitude")?;
                let point = parse_point(lat, lon)?;
                tokens.finish()?;
                return Ok(Statement::Boundary(Segment::Point(point)));
            }
            _ => {}
        }
    }

    let mut tokens = Tokens::new(line);
    let command = tokens.value("statement")?;
    let segment = match command {
        "CIRCLE" => {
            let radius = parse_radius(tokens.keyed(&["RADIUS"])?)?;
            let center = tokens.point(&["CENTRE", "CENTER"])?;
            Segment::Circle { center, radius }
        }
        "CLOCKWISE" | "ANTI-CLOCKWISE" => {
            let radius = parse_radius(tokens.keyed(&["RADIUS"])?)?;
            let center = tokens.point(&["CENTRE", "CENTER"])?;
            let to = tokens.point(&["TO"])?;
            if command == "CLOCKWISE" {
                Segment::ClockwiseArc { to, center, radius }
            } else {
                Segment::AnticlockwiseArc { to, center, radius }
            }
        }
        _ => return Err(SyntaxError::UnknownStatement(command.to_string())),
    };
    tokens.finish()?;

    Ok(Statement::Boundary(segment))
}

fn parse_level(field: &'static str, value: &str) -> std::result::Result<Level, SyntaxError> {
    value
        .parse()
        .map_err(|source| SyntaxError::InvalidLevel { field, source })
}

/// Accumulates header fields and boundary commands of the current block
#[derive(Debug, Default)]
struct BlockState {
    title: Option<String>,
    class: AirspaceClass,
    kind: AirspaceType,
    base: Option<Level>,
    tops: Option<Level>,
    active: Option<String>,
    radio: Option<String>,
    segments: Vec<Segment>,
    /// Header fields were declared since the last completed sub-block
    pending_header: bool,
}

impl BlockState {
    fn take_block(&mut self) -> Option<ParsedAirspace> {
        if self.segments.is_empty() {
            return None;
        }

        // Boundary commands are only accepted once these are set
        let (title, base, tops) = (self.title.clone()?, self.base?, self.tops?);

        self.pending_header = false;
        Some(ParsedAirspace {
            title,
            class: self.class,
            kind: self.kind.clone(),
            base,
            tops,
            active: self.active.clone(),
            radio: self.radio.clone(),
            segments: std::mem::take(&mut self.segments),
        })
    }

    fn header(
        &mut self,
        field: HeaderField,
        value: &str,
        blocks: &mut Vec<ParsedAirspace>,
    ) -> std::result::Result<(), SyntaxError> {
        let completed = self.take_block();
        let in_body = completed.is_some();
        blocks.extend(completed);

        // A new TITLE, CLASS or TYPE after boundary commands starts a new airspace
        if in_body && matches!(field, HeaderField::Title | HeaderField::Class | HeaderField::Type)
        {
            self.title = None;
            self.base = None;
            self.tops = None;
            self.active = None;
            self.radio = None;
        }

        match field {
            HeaderField::Title => {
                if value.is_empty() {
                    return Err(SyntaxError::EmptyTitle);
                }
                if self.pending_header {
                    if let Some(title) = &self.title {
                        return Err(SyntaxError::NoBoundary(title.clone()));
                    }
                }
                self.title = Some(value.to_string());
            }
            HeaderField::Class => {
                self.class = AirspaceClass::from_letter(value)
                    .ok_or_else(|| SyntaxError::InvalidClass(value.to_string()))?;
            }
            HeaderField::Type => self.kind = AirspaceType::from_tnp(value),
            HeaderField::Base => self.base = Some(parse_level("BASE", value)?),
            HeaderField::Tops => self.tops = Some(parse_level("TOPS", value)?),
            HeaderField::Active => self.active = Some(value.to_string()),
            HeaderField::Radio => self.radio = Some(value.to_string()),
        }

        self.pending_header = true;
        Ok(())
    }

    fn boundary(&mut self, segment: Segment) -> std::result::Result<(), SyntaxError> {
        let Some(title) = &self.title else {
            return Err(SyntaxError::BoundaryBeforeTitle);
        };
        if self.base.is_none() {
            return Err(SyntaxError::MissingBase(title.clone()));
        }
        if self.tops.is_none() {
            return Err(SyntaxError::MissingTops(title.clone()));
        }

        let after_circle = matches!(self.segments.last(), Some(Segment::Circle { .. }));
        match segment {
            Segment::Point(_) if after_circle => {
                return Err(SyntaxError::PointAfterCircle);
            }
            Segment::Circle { .. } if !self.segments.is_empty() => {
                return Err(SyntaxError::CircleNotAlone);
            }
            Segment::ClockwiseArc { .. } | Segment::AnticlockwiseArc { .. }
                if self.segments.is_empty() || after_circle =>
            {
                return Err(SyntaxError::ArcWithoutStart);
            }
            _ => {}
        }

        self.segments.push(segment);
        Ok(())
    }
}

/// Parse TNP text into airspace blocks
///
/// Sub-headers (`BASE`, `TOPS`, `RADIO` or `ACTIVE` after boundary commands) close the
/// current sub-block and start a new one for the same title. `CLASS` and `TYPE` carry
/// over to following blocks until redeclared.
///
/// Fails on the first malformed line with `Error::Parse` carrying its 1-based line number.
pub fn parse_str(text: &str, warnings: &mut Vec<Warning>) -> Result<Vec<ParsedAirspace>> {
    let mut blocks = Vec::new();
    let mut state = BlockState::default();
    let mut excluded_since: Option<usize> = None;

    for (index, raw_line) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = match raw_line.split_once('#') {
            Some((code, _)) => code,
            None => raw_line,
        }
        .trim();

        if line.is_empty() {
            continue;
        }

        if let Some(start) = excluded_since {
            if line.split_once('=').is_some_and(|(key, value)| {
                key.trim() == "INCLUDE" && value.trim() == "YES"
            }) {
                debug!(from = start, to = line_no, "Skipped excluded section");
                excluded_since = None;
            }
            continue;
        }

        let to_error = |source: SyntaxError| Error::Parse {
            line: line_no,
            source,
        };

        match parse_statement(line).map_err(to_error)? {
            Statement::Include(true) => {}
            Statement::Include(false) => excluded_since = Some(line_no),
            Statement::Header(field, value) => {
                state.header(field, value, &mut blocks).map_err(to_error)?;
            }
            Statement::Boundary(segment) => state.boundary(segment).map_err(to_error)?,
        }
    }

    if let Some(line) = excluded_since {
        warn!(line, "INCLUDE=NO section not terminated before end of input");
        warnings.push(Warning::UnterminatedInclude { line });
    }

    match state.take_block() {
        Some(block) => blocks.push(block),
        None => {
            if let (true, Some(title)) = (state.pending_header, &state.title) {
                return Err(Error::Parse {
                    line: text.matches('\n').count() + 1,
                    source: SyntaxError::NoBoundary(title.clone()),
                });
            }
        }
    }

    debug!(count = blocks.len(), "Parsed TNP airspace blocks");
    Ok(blocks)
}
