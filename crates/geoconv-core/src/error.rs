use std::fmt;
use std::path::PathBuf;

/// Where in a source file a problem was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// Spreadsheet cell, 0-based row and column.
    Cell { row: u32, col: u32 },
    /// Delimited-text line, 1-based.
    Line(usize),
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Cell { row, col } => {
                write!(f, "cell {}{}", column_letters(*col), row + 1)
            }
            Location::Line(line) => write!(f, "line {line}"),
        }
    }
}

/// Render a 0-based column index as spreadsheet letters (0 -> A, 26 -> AA).
pub fn column_letters(col: u32) -> String {
    let mut n = col as u64 + 1;
    let mut letters = Vec::new();
    while n > 0 {
        let rem = ((n - 1) % 26) as u8;
        letters.push((b'A' + rem) as char);
        n = (n - 1) / 26;
    }
    letters.iter().rev().collect()
}

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("cannot read {path}: {reason}")]
    SourceUnreadable { path: PathBuf, reason: String },

    #[error("no coordinates found")]
    NoCoordinatesFound,

    #[error("malformed value '{token}' at {location}: {reason}")]
    TokenParse {
        token: String,
        reason: String,
        location: Location,
    },

    /// Standalone grammar failure, before the caller attaches a location.
    #[error("malformed coordinate '{token}': {reason}")]
    InvalidToken { token: String, reason: String },

    #[error("missing {field} at {location}")]
    MissingField { field: String, location: Location },

    #[error("numbering broken at {location}: expected {expected}, found {found}")]
    NumberingContinuityBroken {
        location: Location,
        expected: i64,
        found: i64,
    },

    #[error("numbering does not close the ring: last row ends at {last}, first row starts at {first}")]
    NumberingCycleBroken { first: i64, last: i64 },

    #[error("unsupported column order '{0}'. Available: index-lat-lon, lat-lon-index, lon-lat-index")]
    UnsupportedColumnOrder(String),

    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),

    #[error("invalid cell address '{0}' (expected e.g. F19)")]
    InvalidCellAddress(String),

    #[error("failed to load options from {path}: {reason}")]
    ConfigLoad { path: PathBuf, reason: String },

    #[error("invalid options: {0}")]
    ConfigInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ConvertError {
    /// Location of the offending cell or line, when the error has one.
    pub fn location(&self) -> Option<Location> {
        match self {
            ConvertError::TokenParse { location, .. }
            | ConvertError::MissingField { location, .. }
            | ConvertError::NumberingContinuityBroken { location, .. } => Some(*location),
            _ => None,
        }
    }

    /// Short stable name of the error kind, for reports.
    pub fn kind(&self) -> &'static str {
        match self {
            ConvertError::SourceUnreadable { .. } => "source_unreadable",
            ConvertError::NoCoordinatesFound => "no_coordinates_found",
            ConvertError::TokenParse { .. } | ConvertError::InvalidToken { .. } => "token_parse",
            ConvertError::MissingField { .. } => "missing_field",
            ConvertError::NumberingContinuityBroken { .. } => "numbering_continuity_broken",
            ConvertError::NumberingCycleBroken { .. } => "numbering_cycle_broken",
            ConvertError::UnsupportedColumnOrder(_) => "unsupported_column_order",
            ConvertError::UnsupportedFormat(_) => "unsupported_format",
            ConvertError::InvalidCellAddress(_) => "invalid_cell_address",
            ConvertError::ConfigLoad { .. } | ConvertError::ConfigInvalid(_) => "config",
            ConvertError::Io(_) => "io",
            ConvertError::Json(_) => "json",
        }
    }

    /// Attach a location to a bare grammar failure.
    pub fn at(self, location: Location) -> ConvertError {
        match self {
            ConvertError::InvalidToken { token, reason } => ConvertError::TokenParse {
                token,
                reason,
                location,
            },
            other => other,
        }
    }
}
