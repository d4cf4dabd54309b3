use geoconv_core::outcome::{BatchSummary, ConversionOutcome};

use crate::commands::check::TokenCheck;

pub fn print_summary(summary: &BatchSummary) {
    if summary.files.is_empty() {
        println!("No supported files found.");
        return;
    }

    let width = summary
        .files
        .iter()
        .map(|o| o.source().display().to_string().chars().count())
        .max()
        .unwrap_or(10);

    for outcome in &summary.files {
        let source = outcome.source().display().to_string();
        match outcome {
            ConversionOutcome::Converted(c) => {
                println!(
                    "  OK    {:<width$}  {} point(s) -> {}",
                    source,
                    c.ring.len(),
                    c.polygon_path.display()
                );
                if let Some(ref anchor) = c.anchor_path {
                    println!(
                        "        {:<width$}  {} anchor(s) -> {}",
                        "",
                        c.anchors.len(),
                        anchor.display()
                    );
                }
                for w in &c.warnings {
                    println!("        {:<width$}  warning: {}", "", w.message);
                }
            }
            ConversionOutcome::Failed(f) => {
                println!("  FAIL  {:<width$}  {}", source, f.reason);
            }
        }
    }

    println!();
    println!(
        "{} converted, {} failed ({} total)",
        summary.converted,
        summary.failed,
        summary.files.len()
    );
}

pub fn print_checks(results: &[TokenCheck]) {
    let width = results
        .iter()
        .map(|r| r.token.chars().count())
        .max()
        .unwrap_or(10);

    for r in results {
        match (r.lat, r.lon) {
            (Some(lat), Some(lon)) => {
                println!("  valid    {:<width$}  lat {lat:.8}  lon {lon:.8}", r.token)
            }
            _ => println!(
                "  invalid  {:<width$}  {}",
                r.token,
                r.reason.as_deref().unwrap_or("")
            ),
        }
    }
}
