//! Per-file diagnostic records and the sinks that collect them.
//!
//! Conversions never log to a process-wide file on their own. The caller
//! injects a [`DiagnosticSink`]; sinks take `&self` and are `Send + Sync`,
//! so one sink can be shared by conversions running on different threads.

use crate::error::Location;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARN"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub source: PathBuf,
    pub message: String,
    /// Cell or line, rendered ("cell F19", "line 3").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, source: &Path, message: impl Into<String>) -> Self {
        Diagnostic {
            severity,
            source: source.to_path_buf(),
            message: message.into(),
            location: None,
        }
    }

    pub fn with_location(mut self, location: Option<Location>) -> Self {
        self.location = location.map(|l| l.to_string());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {}", self.severity, self.source.display(), self.message)?;
        if let Some(ref loc) = self.location {
            write!(f, " ({loc})")?;
        }
        Ok(())
    }
}

/// Destination for diagnostics produced while converting files.
pub trait DiagnosticSink: Send + Sync {
    fn record(&self, diagnostic: &Diagnostic);
}

/// Keeps records in memory, in arrival order.
#[derive(Default)]
pub struct MemorySink {
    records: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn records(&self) -> Vec<Diagnostic> {
        match self.records.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl DiagnosticSink for MemorySink {
    fn record(&self, diagnostic: &Diagnostic) {
        let mut guard = match self.records.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.push(diagnostic.clone());
    }
}

/// Forwards records to `tracing` at the matching level.
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn record(&self, d: &Diagnostic) {
        let source = d.source.display();
        let location = d.location.as_deref().unwrap_or("-");
        match d.severity {
            Severity::Info => tracing::info!(%source, location, "{}", d.message),
            Severity::Warning => tracing::warn!(%source, location, "{}", d.message),
            Severity::Error => tracing::error!(%source, location, "{}", d.message),
        }
    }
}

/// Appends timestamped lines to a log file.
///
/// Writes are serialized by a mutex, so concurrent conversions may share
/// one `FileSink`. Records below `min_severity` are dropped.
pub struct FileSink {
    file: Mutex<File>,
    min_severity: Severity,
}

impl FileSink {
    pub fn open(path: &Path, min_severity: Severity) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(FileSink {
            file: Mutex::new(file),
            min_severity,
        })
    }
}

impl DiagnosticSink for FileSink {
    fn record(&self, diagnostic: &Diagnostic) {
        if diagnostic.severity < self.min_severity {
            return;
        }
        let line = format!(
            "{} - {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            diagnostic
        );
        let mut file = match self.file.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = file.write_all(line.as_bytes()) {
            tracing::warn!(error = %e, "failed to append diagnostic to log file");
        }
    }
}

/// Sends each record to every inner sink.
pub struct FanOut<'a> {
    sinks: Vec<&'a dyn DiagnosticSink>,
}

impl<'a> FanOut<'a> {
    pub fn new(sinks: Vec<&'a dyn DiagnosticSink>) -> Self {
        FanOut { sinks }
    }
}

impl DiagnosticSink for FanOut<'_> {
    fn record(&self, diagnostic: &Diagnostic) {
        for sink in &self.sinks {
            sink.record(diagnostic);
        }
    }
}
