use std::fmt;
use std::str::FromStr;

/// Airspace class (TNP `CLASS=` field)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AirspaceClass {
    #[default]
    Unknown,
    ClassA,
    ClassB,
    ClassC,
    ClassD,
    ClassE,
    ClassF,
    ClassG,
}

impl AirspaceClass {
    /// Parse from the single letter used in TNP files
    pub fn from_letter(value: &str) -> Option<Self> {
        match value {
            "A" => Some(AirspaceClass::ClassA),
            "B" => Some(AirspaceClass::ClassB),
            "C" => Some(AirspaceClass::ClassC),
            "D" => Some(AirspaceClass::ClassD),
            "E" => Some(AirspaceClass::ClassE),
            "F" => Some(AirspaceClass::ClassF),
            "G" => Some(AirspaceClass::ClassG),
            _ => None,
        }
    }

    pub fn letter(&self) -> Option<char> {
        match self {
            AirspaceClass::Unknown => None,
            AirspaceClass::ClassA => Some('A'),
            AirspaceClass::ClassB => Some('B'),
            AirspaceClass::ClassC => Some('C'),
            AirspaceClass::ClassD => Some('D'),
            AirspaceClass::ClassE => Some('E'),
            AirspaceClass::ClassF => Some('F'),
            AirspaceClass::ClassG => Some('G'),
        }
    }
}

/// Airspace type (TNP `TYPE=` field)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum AirspaceType {
    #[default]
    Unknown,
    ControlZone,
    ControlArea,
    Airway,
    DangerArea,
    RestrictedArea,
    ProhibitedArea,
    MilitaryAerodromeTrafficZone,
    TransponderMandatoryZone,
    RadioMandatoryZone,
    GliderSector,
    Other(String),
}

impl AirspaceType {
    pub fn from_tnp(value: &str) -> Self {
        match value {
            "" => AirspaceType::Unknown,
            "CTR" | "CTA/CTR" => AirspaceType::ControlZone,
            "CTA" | "TMA" => AirspaceType::ControlArea,
            "AWY" | "AIRWAYS" => AirspaceType::Airway,
            "D" | "D_OTHER" | "DANGER" => AirspaceType::DangerArea,
            "R" | "RESTRICTED" => AirspaceType::RestrictedArea,
            "P" | "PROHIBITED" => AirspaceType::ProhibitedArea,
            "MATZ" => AirspaceType::MilitaryAerodromeTrafficZone,
            "TMZ" => AirspaceType::TransponderMandatoryZone,
            "RMZ" => AirspaceType::RadioMandatoryZone,
            "GSEC" => AirspaceType::GliderSector,
            other => AirspaceType::Other(other.to_string()),
        }
    }

    /// Canonical TNP spelling
    pub fn as_tnp(&self) -> &str {
        match self {
            AirspaceType::Unknown => "",
            AirspaceType::ControlZone => "CTA/CTR",
            AirspaceType::ControlArea => "CTA",
            AirspaceType::Airway => "AWY",
            AirspaceType::DangerArea => "D",
            AirspaceType::RestrictedArea => "R",
            AirspaceType::ProhibitedArea => "P",
            AirspaceType::MilitaryAerodromeTrafficZone => "MATZ",
            AirspaceType::TransponderMandatoryZone => "TMZ",
            AirspaceType::RadioMandatoryZone => "RMZ",
            AirspaceType::GliderSector => "GSEC",
            AirspaceType::Other(value) => value,
        }
    }
}

/// Vertical limit of an airspace
///
/// Heights and altitudes are in feet, flight levels in hundreds of feet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    Surface,
    FlightLevel(u32),
    /// Fixed altitude above mean sea level
    Altitude(u32),
    /// Height above ground level
    Agl(u32),
    /// Height above aerodrome level
    Aal(u32),
    Unlimited,
}

/// Error returned when a level descriptor cannot be parsed
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid level {0:?}")]
pub struct InvalidLevel(pub String);

fn parse_digits(value: &str) -> Option<u32> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

impl FromStr for Level {
    type Err = InvalidLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level = match s {
            "SFC" => Some(Level::Surface),
            "UNLTD" => Some(Level::Unlimited),
            _ if s.starts_with("FL") => parse_digits(&s[2..]).map(Level::FlightLevel),
            _ if s.ends_with("ALT") => parse_digits(&s[..s.len() - 3]).map(Level::Altitude),
            _ if s.ends_with("AGL") => parse_digits(&s[..s.len() - 3]).map(Level::Agl),
            _ if s.ends_with("AAL") => parse_digits(&s[..s.len() - 3]).map(Level::Aal),
            _ => None,
        };

        level.ok_or_else(|| InvalidLevel(s.to_string()))
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Surface => write!(f, "SFC"),
            Level::FlightLevel(fl) => write!(f, "FL{fl}"),
            Level::Altitude(ft) => write!(f, "{ft}ALT"),
            Level::Agl(ft) => write!(f, "{ft}AGL"),
            Level::Aal(ft) => write!(f, "{ft}AAL"),
            Level::Unlimited => write!(f, "UNLTD"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use claims::assert_err;

    #[test]
    fn airspace_class_from_letter() {
        assert_eq!(AirspaceClass::from_letter("A"), Some(AirspaceClass::ClassA));
        assert_eq!(AirspaceClass::from_letter("D"), Some(AirspaceClass::ClassD));
        assert_eq!(AirspaceClass::from_letter("G"), Some(AirspaceClass::ClassG));
        assert_eq!(AirspaceClass::from_letter("X"), None);
        assert_eq!(AirspaceClass::ClassD.letter(), Some('D'));
        assert_eq!(AirspaceClass::Unknown.letter(), None);
    }

    #[test]
    fn airspace_type_from_tnp() {
        assert_eq!(AirspaceType::from_tnp("CTA/CTR"), AirspaceType::ControlZone);
        assert_eq!(AirspaceType::from_tnp("D"), AirspaceType::DangerArea);
        assert_eq!(AirspaceType::from_tnp("MATZ"), AirspaceType::MilitaryAerodromeTrafficZone);
        assert_eq!(
            AirspaceType::from_tnp("HIRTA"),
            AirspaceType::Other("HIRTA".to_string())
        );
        assert_eq!(AirspaceType::from_tnp("HIRTA").as_tnp(), "HIRTA");
    }

    #[test]
    fn level_from_str() {
        assert_eq!("SFC".parse(), Ok(Level::Surface));
        assert_eq!("UNLTD".parse(), Ok(Level::Unlimited));
        assert_eq!("FL65".parse(), Ok(Level::FlightLevel(65)));
        assert_eq!("FL195".parse(), Ok(Level::FlightLevel(195)));
        assert_eq!("2500ALT".parse(), Ok(Level::Altitude(2500)));
        assert_eq!("1500AGL".parse(), Ok(Level::Agl(1500)));
        assert_eq!("2000AAL".parse(), Ok(Level::Aal(2000)));
    }

    #[test]
    fn level_from_str_invalid() {
        assert_err!("FL".parse::<Level>());
        assert_err!("ALT".parse::<Level>());
        assert_err!("25O0ALT".parse::<Level>());
        assert_err!("2500FT".parse::<Level>());
        assert_err!("-100ALT".parse::<Level>());

        let err = assert_err!("2500FT".parse::<Level>());
        assert_eq!(err.to_string(), "invalid level \"2500FT\"");
    }

    #[test]
    fn level_display() {
        assert_eq!(Level::FlightLevel(65).to_string(), "FL65");
        assert_eq!(Level::Altitude(2500).to_string(), "2500ALT");
        assert_eq!(Level::Agl(1500).to_string(), "1500AGL");
        assert_eq!(Level::Surface.to_string(), "SFC");
        assert_eq!(Level::Unlimited.to_string(), "UNLTD");
    }
}
