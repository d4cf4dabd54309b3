mod commands;
mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "geoconv",
    version,
    about = "Convert surveyed plot coordinates from spreadsheets and CSV files to GeoJSON"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert files (or every supported file in a directory) to GeoJSON
    Convert {
        /// Source files or directories
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        /// Directory for the written documents (default: "geojson" beside each source)
        #[arg(short, long, value_name = "DIR")]
        output_dir: Option<PathBuf>,

        /// JSON options file; command-line flags override its values
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Skip the point numbering checks
        #[arg(long)]
        no_cycle_check: bool,

        /// Cell holding the first coordinate token, e.g. F19
        #[arg(long, value_name = "CELL")]
        start_cell: Option<String>,

        /// Also write the anchor document (<name>_.geojson)
        #[arg(long)]
        anchors: bool,

        /// Column order for delimited text: index-lat-lon, lat-lon-index, lon-lat-index
        #[arg(long, value_name = "ORDER")]
        column_order: Option<String>,

        /// Accept only N/E hemispheres and dot decimals in coordinate tokens
        #[arg(long)]
        narrow_grammar: bool,

        /// Append warnings and errors to this log file
        #[arg(long, value_name = "FILE")]
        log_file: Option<PathBuf>,

        /// Print the batch summary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check whether strings are valid coordinate tokens
    Check {
        /// Tokens such as "N64.062788 E67.503584"
        #[arg(required = true)]
        tokens: Vec<String>,

        /// Use the narrow grammar (N/E only, dot decimals)
        #[arg(long)]
        narrow_grammar: bool,

        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Convert {
            inputs,
            output_dir,
            config,
            no_cycle_check,
            start_cell,
            anchors,
            column_order,
            narrow_grammar,
            log_file,
            json,
        } => commands::convert::run(commands::convert::ConvertArgs {
            inputs,
            output_dir,
            config,
            no_cycle_check,
            start_cell,
            anchors,
            column_order,
            narrow_grammar,
            log_file,
            json,
        }),
        Commands::Check {
            tokens,
            narrow_grammar,
            json,
        } => commands::check::run(&tokens, narrow_grammar, json),
    };

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
