//! Clean command - run the pipeline and write the cleaned table.

use std::path::PathBuf;

use colored::Colorize;
use patient_cleaner::{Cleaner, OutputFormat, default_output_path, write_table};

use super::{build_config, display_value};

#[allow(clippy::too_many_arguments)]
pub fn run(
    file: PathBuf,
    output: Option<PathBuf>,
    format: Option<OutputFormat>,
    audit: Option<PathBuf>,
    keep_going: bool,
    config: Option<PathBuf>,
    delimiter: Option<u8>,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let cleaner = Cleaner::with_config(build_config(config.as_deref(), keep_going, delimiter)?)?;

    println!(
        "{} {}",
        "Cleaning".cyan().bold(),
        file.display().to_string().white()
    );

    let result = cleaner.clean_file(&file)?;

    println!(
        "Loaded {} rows, {} columns ({})",
        result.source.row_count.to_string().white().bold(),
        result.source.column_count,
        result.source.format
    );
    println!();

    for change in &result.audit.changes {
        println!("  {:18} {}", change.stage.cyan(), change.description);
        if verbose {
            for header in &change.header_changes {
                println!("  {:18}   '{}' → '{}'", "", header.from, header.to.green());
            }
        }
        if change.values_changed > 0 {
            println!(
                "  {:18}   {} value(s) changed",
                "",
                change.values_changed.to_string().white().bold()
            );
        }
    }

    let failures: Vec<_> = result.audit.failures().collect();
    if !failures.is_empty() {
        println!();
        println!(
            "{} Kept {} malformed value(s):",
            "Warning:".yellow().bold(),
            failures.len()
        );
        for failure in &failures {
            println!(
                "  row {} {} '{}': {}",
                failure.row + 1,
                failure.column.white().bold(),
                display_value(&failure.value),
                failure.error.dimmed()
            );
        }
    }

    let format = format
        .or_else(|| output.as_deref().and_then(OutputFormat::from_path))
        .unwrap_or_default();
    let output_path = output.unwrap_or_else(|| default_output_path(&file, format));

    write_table(&result.table, &output_path, format)?;

    println!();
    println!(
        "{} {}",
        "Saved to".green().bold(),
        output_path.display().to_string().white()
    );

    if let Some(audit_path) = audit {
        result.audit.save(&audit_path)?;
        println!(
            "{} {}",
            "Audit written to".green().bold(),
            audit_path.display().to_string().white()
        );
    }

    Ok(())
}
