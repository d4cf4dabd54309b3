use crate::diagnostics::Diagnostic;
use crate::error::ConvertError;
use crate::model::{AnchorSet, PolygonRing};
use serde::Serialize;
use std::path::PathBuf;

/// A file that produced a polygon document.
#[derive(Debug, Clone, Serialize)]
pub struct ConvertedFile {
    /// Path of the source file.
    pub source: PathBuf,
    /// Written polygon document.
    pub polygon_path: PathBuf,
    /// Written anchor document, if one was emitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anchor_path: Option<PathBuf>,
    /// Harvested ring (open).
    pub ring: PolygonRing,
    /// Harvested anchors, whether or not they were written.
    pub anchors: AnchorSet,
    /// Non-fatal findings, such as a truncated anchor list.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Diagnostic>,
}

/// A file that was rejected. Nothing was written for it.
#[derive(Debug, Serialize)]
pub struct FailedFile {
    pub source: PathBuf,
    /// Short error kind, e.g. "numbering_cycle_broken".
    pub kind: &'static str,
    /// Human-readable reason.
    pub reason: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip)]
    pub error: ConvertError,
}

impl FailedFile {
    pub fn new(source: PathBuf, error: ConvertError) -> Self {
        FailedFile {
            source,
            kind: error.kind(),
            reason: error.to_string(),
            location: error.location().map(|l| l.to_string()),
            error,
        }
    }
}

/// Result of converting one file.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ConversionOutcome {
    Converted(ConvertedFile),
    Failed(FailedFile),
}

impl ConversionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ConversionOutcome::Converted(_))
    }

    pub fn source(&self) -> &std::path::Path {
        match self {
            ConversionOutcome::Converted(c) => &c.source,
            ConversionOutcome::Failed(f) => &f.source,
        }
    }
}

/// Outcomes of a batch, in input order.
#[derive(Debug, Default, Serialize)]
pub struct BatchSummary {
    pub converted: usize,
    pub failed: usize,
    pub files: Vec<ConversionOutcome>,
}

impl BatchSummary {
    pub fn from_outcomes(files: Vec<ConversionOutcome>) -> Self {
        let converted = files.iter().filter(|o| o.is_success()).count();
        BatchSummary {
            converted,
            failed: files.len() - converted,
            files,
        }
    }
}
