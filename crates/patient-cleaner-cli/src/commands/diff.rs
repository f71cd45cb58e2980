//! Diff command - preview changes the pipeline would make.

use std::collections::BTreeMap;
use std::path::PathBuf;

use colored::Colorize;
use patient_cleaner::{Cleaner, RowAudit};

use super::{build_config, display_value};

pub fn run(
    file: PathBuf,
    rows: usize,
    column: Option<String>,
    config: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    // Previews never abort; malformed values are listed instead.
    let cleaner = Cleaner::with_config(build_config(config.as_deref(), true, None)?)?;
    let result = cleaner.clean_file(&file)?;

    let wanted = |c: &str| column.as_deref().is_none_or(|w| w == c);

    let mut by_row: BTreeMap<usize, Vec<&RowAudit>> = BTreeMap::new();
    for audit in result.audit.row_audits().filter(|a| wanted(&a.column)) {
        by_row.entry(audit.row).or_default().push(audit);
    }

    for change in &result.audit.changes {
        for header in &change.header_changes {
            println!(
                "  {} '{}' → '{}'",
                "HEADER".blue(),
                header.from,
                header.to.green()
            );
        }
    }

    if by_row.is_empty() {
        println!("{}", "No value changes.".yellow());
    } else {
        println!(
            "{} changes in {} of {} rows",
            "Previewing".cyan().bold(),
            by_row.len().to_string().white().bold(),
            result.table.row_count()
        );
    }

    for (row, audits) in by_row.iter().take(rows) {
        println!();
        println!("{}", format!("Row {}", row + 1).white().bold());
        for audit in audits {
            println!(
                "  {:16} {} → {}",
                audit.column.cyan(),
                display_value(&audit.original_value).red(),
                display_value(&audit.new_value).green()
            );
        }
    }

    if by_row.len() > rows {
        println!();
        println!("... {} more row(s)", by_row.len() - rows);
    }

    let failures: Vec<_> = result
        .audit
        .failures()
        .filter(|f| wanted(&f.column))
        .collect();
    if !failures.is_empty() {
        println!();
        println!(
            "{} {} value(s) could not be normalized:",
            "Warning:".yellow().bold(),
            failures.len()
        );
        for failure in failures {
            println!(
                "  row {} {}: {}",
                failure.row + 1,
                failure.column.white().bold(),
                failure.error
            );
        }
    }

    Ok(())
}
