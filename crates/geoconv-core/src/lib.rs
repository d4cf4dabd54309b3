pub mod diagnostics;
pub mod error;
pub mod extraction;
pub mod geojson;
pub mod grammar;
pub mod inputs;
pub mod model;
pub mod numbering;
pub mod options;
pub mod outcome;

use std::path::{Path, PathBuf};

use tracing::{debug, info_span};

use diagnostics::{Diagnostic, DiagnosticSink, Severity};
use error::ConvertError;
use extraction::{ScanOutput, Scanner, SourceKind};
use geojson::EmittedFiles;
use options::schema::ConvertOptions;
use outcome::{ConversionOutcome, ConvertedFile, FailedFile};

pub use inputs::collect_inputs;

/// Name of the directory created beside a source file when no output
/// directory is configured.
pub const DEFAULT_OUTPUT_SUBDIR: &str = "geojson";

/// Main API entry point: convert one source file into GeoJSON documents.
///
/// Picks a scanner by extension, harvests and validates the ring, writes
/// the documents and reports what happened. Every failure is folded into
/// `ConversionOutcome::Failed`; this function does not return errors.
pub fn convert_file(
    path: &Path,
    options: &ConvertOptions,
    sink: &dyn DiagnosticSink,
) -> ConversionOutcome {
    match SourceKind::from_path(path) {
        Ok(kind) => convert_with(path, kind.scanner(), options, sink),
        Err(e) => fail(path, e, sink),
    }
}

/// Convert one file with an explicit scanner.
pub fn convert_with(
    path: &Path,
    scanner: &dyn Scanner,
    options: &ConvertOptions,
    sink: &dyn DiagnosticSink,
) -> ConversionOutcome {
    let _span =
        info_span!("convert", path = %path.display(), scanner = scanner.name()).entered();

    match run(path, scanner, options) {
        Ok((scan, files)) => {
            let warnings: Vec<Diagnostic> = scan
                .warnings
                .iter()
                .map(|w| {
                    Diagnostic::new(Severity::Warning, path, w.message.clone())
                        .with_location(w.location)
                })
                .collect();
            for w in &warnings {
                sink.record(w);
            }

            let mut message = format!(
                "converted {} point(s) to {}",
                scan.ring.len(),
                files.polygon.display()
            );
            if let Some(ref anchor) = files.anchor {
                message.push_str(&format!(
                    ", {} anchor(s) to {}",
                    scan.anchors.len(),
                    anchor.display()
                ));
            }
            sink.record(&Diagnostic::new(Severity::Info, path, message));

            ConversionOutcome::Converted(ConvertedFile {
                source: path.to_path_buf(),
                polygon_path: files.polygon,
                anchor_path: files.anchor,
                ring: scan.ring,
                anchors: scan.anchors,
                warnings,
            })
        }
        Err(e) => fail(path, e, sink),
    }
}

fn run(
    path: &Path,
    scanner: &dyn Scanner,
    options: &ConvertOptions,
) -> Result<(ScanOutput, EmittedFiles), ConvertError> {
    let scan = scanner.scan(path, options)?;
    debug!(
        points = scan.ring.len(),
        anchors = scan.anchors.len(),
        "scan complete"
    );

    let output_dir = output_dir_for(path, options);
    let files = geojson::write_documents(
        path,
        &scan.ring,
        &scan.anchors,
        &output_dir,
        options.create_anchor,
        options.axis_order,
    )?;
    Ok((scan, files))
}

fn fail(path: &Path, error: ConvertError, sink: &dyn DiagnosticSink) -> ConversionOutcome {
    sink.record(
        &Diagnostic::new(Severity::Error, path, error.to_string()).with_location(error.location()),
    );
    ConversionOutcome::Failed(FailedFile::new(path.to_path_buf(), error))
}

/// Directory that receives the documents for `source`.
pub fn output_dir_for(source: &Path, options: &ConvertOptions) -> PathBuf {
    match options.output_directory {
        Some(ref dir) => dir.clone(),
        None => source
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .join(DEFAULT_OUTPUT_SUBDIR),
    }
}
