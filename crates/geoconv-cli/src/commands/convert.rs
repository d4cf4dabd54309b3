use geoconv_core::diagnostics::{DiagnosticSink, FanOut, FileSink, Severity, TracingSink};
use geoconv_core::error::ConvertError;
use geoconv_core::grammar::Grammar;
use geoconv_core::options::schema::{ColumnOrder, ConvertOptions};
use geoconv_core::outcome::BatchSummary;
use geoconv_core::{collect_inputs, convert_file};
use std::path::PathBuf;

use crate::output;

pub struct ConvertArgs {
    pub inputs: Vec<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub no_cycle_check: bool,
    pub start_cell: Option<String>,
    pub anchors: bool,
    pub column_order: Option<String>,
    pub narrow_grammar: bool,
    pub log_file: Option<PathBuf>,
    pub json: bool,
}

/// Returns `Ok(false)` when at least one file failed.
pub fn run(args: ConvertArgs) -> Result<bool, ConvertError> {
    let options = build_options(&args)?;

    let mut files = Vec::new();
    for input in &args.inputs {
        let found = collect_inputs(input)?;
        if found.is_empty() {
            tracing::warn!(path = %input.display(), "no supported files");
        }
        files.extend(found);
    }

    let file_sink = match args.log_file {
        Some(ref path) => Some(FileSink::open(path, Severity::Warning)?),
        None => None,
    };
    let mut sinks: Vec<&dyn DiagnosticSink> = vec![&TracingSink];
    if let Some(ref sink) = file_sink {
        sinks.push(sink);
    }
    let sink = FanOut::new(sinks);

    let outcomes = files
        .iter()
        .map(|path| convert_file(path, &options, &sink))
        .collect();
    let summary = BatchSummary::from_outcomes(outcomes);

    if args.json {
        output::json::print(&summary)?;
    } else {
        output::table::print_summary(&summary);
    }

    Ok(summary.failed == 0)
}

/// Options file first, then command-line overrides.
fn build_options(args: &ConvertArgs) -> Result<ConvertOptions, ConvertError> {
    let mut options = match args.config {
        Some(ref path) => geoconv_core::options::load_options(path)?,
        None => ConvertOptions::default(),
    };

    if let Some(ref dir) = args.output_dir {
        options.output_directory = Some(dir.clone());
    }
    if args.no_cycle_check {
        options.cycle_check = false;
    }
    if let Some(ref cell) = args.start_cell {
        options.start_cell = Some(cell.clone());
    }
    if args.anchors {
        options.create_anchor = true;
    }
    if let Some(ref order) = args.column_order {
        options.column_order = order.parse::<ColumnOrder>()?;
    }
    if args.narrow_grammar {
        options.grammar = Grammar::NARROW;
    }

    geoconv_core::options::validate_options(&options)?;
    Ok(options)
}
