//! Delimited and JSON writers for [`PatientTable`].

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CleanerError, Result};
use crate::record::PatientTable;

/// Output file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Tsv,
    Json,
}

impl OutputFormat {
    /// File extension for the format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
        }
    }

    /// Guess the format from a path's extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?;
        ext.parse().ok()
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "tsv" => Ok(OutputFormat::Tsv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use csv, tsv, or json.", s)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// `<dir>/<stem>_cleaned.<ext>` next to the input file.
pub fn default_output_path(input: &Path, format: OutputFormat) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    input.with_file_name(format!("{}_cleaned.{}", stem, format.extension()))
}

/// Write a table to a file.
pub fn write_table(
    table: &PatientTable,
    path: impl AsRef<Path>,
    format: OutputFormat,
) -> Result<()> {
    let path = path.as_ref();
    let io_err = |e| CleanerError::Io {
        path: path.to_path_buf(),
        source: e,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    write_table_to(table, &mut writer, format)?;
    writer.flush().map_err(io_err)
}

/// Write a table to any writer.
pub fn write_table_to<W: Write>(
    table: &PatientTable,
    writer: W,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Csv => write_delimited(table, writer, b','),
        OutputFormat::Tsv => write_delimited(table, writer, b'\t'),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(writer, table.records())?;
            Ok(())
        }
    }
}

fn write_delimited<W: Write>(table: &PatientTable, writer: W, delimiter: u8) -> Result<()> {
    let mut csv_writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(writer);

    csv_writer.write_record(table.columns())?;
    for row in table.value_rows() {
        csv_writer.write_record(&row)?;
    }
    csv_writer.flush().map_err(|e| CleanerError::Csv(e.into()))?;
    Ok(())
}
