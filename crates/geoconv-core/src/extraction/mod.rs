pub mod delimited;
pub mod spreadsheet;

use crate::error::{ConvertError, Location};
use crate::model::{AnchorSet, PolygonRing};
use crate::options::schema::ConvertOptions;
use std::path::Path;

/// Extensions read as workbooks (first sheet only).
pub const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xls", "ods"];

/// Extensions read as ';'-delimited text.
pub const DELIMITED_EXTENSIONS: &[&str] = &["csv", "txt"];

/// Something noteworthy that did not fail the scan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanWarning {
    pub message: String,
    pub location: Option<Location>,
}

/// Coordinates harvested from one source file.
#[derive(Debug, Clone, Default)]
pub struct ScanOutput {
    pub ring: PolygonRing,
    pub anchors: AnchorSet,
    pub warnings: Vec<ScanWarning>,
}

/// Trait for source-format scanners.
pub trait Scanner: Send + Sync {
    /// Harvest the polygon ring (and anchors, if the format has them).
    fn scan(&self, path: &Path, options: &ConvertOptions) -> Result<ScanOutput, ConvertError>;

    /// Name of this scanner (for diagnostics).
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Spreadsheet,
    DelimitedText,
}

impl SourceKind {
    /// Pick the source kind from a file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<SourceKind, ConvertError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        if SPREADSHEET_EXTENSIONS.contains(&ext.as_str()) {
            Ok(SourceKind::Spreadsheet)
        } else if DELIMITED_EXTENSIONS.contains(&ext.as_str()) {
            Ok(SourceKind::DelimitedText)
        } else if ext.is_empty() {
            Err(ConvertError::UnsupportedFormat(format!(
                "{} has no extension",
                path.display()
            )))
        } else {
            Err(ConvertError::UnsupportedFormat(format!(".{ext}")))
        }
    }

    pub fn scanner(self) -> &'static dyn Scanner {
        match self {
            SourceKind::Spreadsheet => &spreadsheet::SpreadsheetScanner,
            SourceKind::DelimitedText => &delimited::DelimitedScanner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_from_extension() {
        assert_eq!(
            SourceKind::from_path(Path::new("a/b/plot.xlsx")).unwrap(),
            SourceKind::Spreadsheet
        );
        assert_eq!(
            SourceKind::from_path(Path::new("plot.XLSX")).unwrap(),
            SourceKind::Spreadsheet
        );
        assert_eq!(
            SourceKind::from_path(Path::new("plot.csv")).unwrap(),
            SourceKind::DelimitedText
        );
    }

    #[test]
    fn unknown_extension_rejected() {
        assert!(matches!(
            SourceKind::from_path(Path::new("plot.pdf")),
            Err(ConvertError::UnsupportedFormat(_))
        ));
        assert!(matches!(
            SourceKind::from_path(Path::new("plot")),
            Err(ConvertError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn scanner_names() {
        assert_eq!(SourceKind::Spreadsheet.scanner().name(), "spreadsheet");
        assert_eq!(SourceKind::DelimitedText.scanner().name(), "delimited-text");
    }
}
