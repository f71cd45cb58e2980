//! CLI argument definitions using clap.

use clap::{ArgAction, Parser, Subcommand};
use patient_cleaner::OutputFormat;
use std::path::PathBuf;

/// patient-cleaner: normalize tabular patient demographic data
#[derive(Parser)]
#[command(name = "patient-cleaner")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Allow patient values in log output
    #[arg(long, global = true)]
    pub log_data: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the normalization pipeline and write the cleaned table
    Clean {
        /// Path to the patient data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path (default: <file>_cleaned.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format (csv, tsv, json; default: from --output extension, else csv)
        #[arg(short, long)]
        format: Option<OutputFormat>,

        /// Write the audit trail as JSON to this path
        #[arg(long, value_name = "PATH")]
        audit: Option<PathBuf>,

        /// Keep malformed values and continue instead of aborting
        #[arg(long)]
        keep_going: bool,

        /// Pipeline configuration file (JSON)
        #[arg(short, long, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Input delimiter (default: auto-detect)
        #[arg(short, long, value_parser = parse_delimiter)]
        delimiter: Option<u8>,
    },

    /// Preview the changes the pipeline would make, without writing anything
    Diff {
        /// Path to the patient data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Maximum number of rows to show
        #[arg(short = 'n', long, default_value = "10")]
        rows: usize,

        /// Show only changes to this column
        #[arg(short, long)]
        column: Option<String>,

        /// Pipeline configuration file (JSON)
        #[arg(long, value_name = "PATH")]
        config: Option<PathBuf>,
    },
}

/// Accept a single ASCII character, or `\t` / `tab` for tab.
fn parse_delimiter(s: &str) -> Result<u8, String> {
    match s {
        "\\t" | "tab" => Ok(b'\t'),
        _ if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        _ => Err(format!("Delimiter must be a single ASCII character, got '{}'", s)),
    }
}
