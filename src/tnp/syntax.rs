use crate::types::InvalidLevel;

/// Problem found on a single TNP line
///
/// Wrapped into [`Error::Parse`](crate::Error::Parse) together with the line number.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SyntaxError {
    #[error("expected {0}")]
    Missing(String),

    #[error("expected {expected}, found {found:?}")]
    Unexpected { expected: String, found: String },

    #[error("unexpected {0:?}")]
    TrailingToken(String),

    #[error("unrecognised statement {0:?}")]
    UnknownStatement(String),

    #[error("expected INCLUDE=YES or INCLUDE=NO, found {0:?}")]
    InvalidInclude(String),

    #[error("invalid latitude {0:?}")]
    InvalidLatitude(String),

    #[error("invalid longitude {0:?}")]
    InvalidLongitude(String),

    #[error("invalid radius {0:?}")]
    InvalidRadius(String),

    #[error("invalid CLASS {0:?}")]
    InvalidClass(String),

    #[error("{field}: {source}")]
    InvalidLevel {
        field: &'static str,
        #[source]
        source: InvalidLevel,
    },

    #[error("empty TITLE")]
    EmptyTitle,

    #[error("boundary command before TITLE")]
    BoundaryBeforeTitle,

    #[error("airspace {0:?} has no BASE")]
    MissingBase(String),

    #[error("airspace {0:?} has no TOPS")]
    MissingTops(String),

    #[error("airspace {0:?} has no boundary")]
    NoBoundary(String),

    #[error("POINT after CIRCLE")]
    PointAfterCircle,

    #[error("CIRCLE must be the only boundary of an airspace")]
    CircleNotAlone,

    #[error("arc must follow a POINT or another arc")]
    ArcWithoutStart,
}
