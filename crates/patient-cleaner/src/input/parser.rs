//! CSV/TSV parser with delimiter detection.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::debug;

use super::source::{format_name, DataTable, SourceMetadata};
use crate::error::{CleanerError, Result};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Number of logical records sampled for delimiter detection.
const DETECTION_SAMPLE: usize = 10;

/// Parser configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
        }
    }
}

/// Parses tabular data files.
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the data table and metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceMetadata)> {
        let path = path.as_ref();
        let io_err = |e| CleanerError::Io {
            path: path.to_path_buf(),
            source: e,
        };

        let mut file = File::open(path).map_err(io_err)?;
        let size_bytes = file.metadata().map_err(io_err)?.len();

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(io_err)?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let table = self.parse_bytes(&contents)?;

        let source = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format_name(table.delimiter).to_string(),
            table.row_count(),
            table.column_count(),
        );

        debug!(
            file = %source.file,
            format = %source.format,
            rows = source.row_count,
            columns = source.column_count,
            "parsed source file"
        );

        Ok((table, source))
    }

    /// Parse in-memory bytes, detecting the delimiter unless one is configured.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<DataTable> {
        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(bytes, self.config.quote)?,
        };
        self.parse_with_delimiter(bytes, delimiter)
    }

    fn parse_with_delimiter(&self, bytes: &[u8], delimiter: u8) -> Result<DataTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(self.config.has_header)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let mut headers: Vec<String> = if self.config.has_header {
            reader.headers()?.iter().map(|s| s.to_string()).collect()
        } else {
            Vec::new()
        };

        let mut rows = Vec::new();
        for (row_idx, result) in reader.records().enumerate() {
            if let Some(max) = self.config.max_rows {
                if row_idx >= max {
                    break;
                }
            }

            let record = result?;
            if headers.is_empty() && !self.config.has_header {
                headers = (0..record.len())
                    .map(|i| format!("column_{}", i + 1))
                    .collect();
            }
            rows.push(record.iter().map(|s| s.to_string()).collect::<Vec<_>>());
        }

        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(CleanerError::EmptyData("No columns found".to_string()));
        }
        if rows.is_empty() {
            return Err(CleanerError::EmptyData("No data rows found".to_string()));
        }

        // Ragged rows are squared off to the header width.
        let expected_cols = headers.len();
        for row in &mut rows {
            row.resize(expected_cols, String::new());
        }

        Ok(DataTable::new(headers, rows, delimiter))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Detect the delimiter by analyzing the first few records.
///
/// Records are split on newlines outside quotes, so quoted multi-line
/// fields (addresses) count as part of a single record.
fn detect_delimiter(bytes: &[u8], quote: u8) -> Result<u8> {
    let text = String::from_utf8_lossy(bytes);
    let records = logical_records(&text, quote as char, DETECTION_SAMPLE);

    if records.is_empty() {
        return Err(CleanerError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = records
            .iter()
            .map(|record| count_delimiter(record, delim as char, quote as char))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let variance: f64 = if counts.len() > 1 {
            let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64
        } else {
            0.0
        };

        // Higher count with lower variance wins; tab gets a small bonus.
        let score = if consistent {
            first_count * 1000 + if delim == b'\t' { 100 } else { 0 }
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Split text into at most `limit` non-blank records, honoring quotes.
fn logical_records(text: &str, quote: char, limit: usize) -> Vec<String> {
    let mut records = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in text.chars() {
        if ch == quote {
            in_quotes = !in_quotes;
        }
        if ch == '\n' && !in_quotes {
            let line = current.trim_end_matches('\r');
            if !line.trim().is_empty() {
                records.push(line.to_string());
                if records.len() == limit {
                    return records;
                }
            }
            current.clear();
        } else {
            current.push(ch);
        }
    }

    if !current.trim().is_empty() && records.len() < limit {
        records.push(current);
    }

    records
}

/// Count delimiter occurrences in a record, respecting quotes.
fn count_delimiter(record: &str, delimiter: char, quote: char) -> usize {
    let mut count = 0;
    let mut in_quotes = false;

    for ch in record.chars() {
        match ch {
            c if c == quote => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter_csv() {
        let data = b"a,b,c\n1,2,3\n4,5,6";
        assert_eq!(detect_delimiter(data, b'"').unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_tsv() {
        let data = b"a\tb\tc\n1\t2\t3\n4\t5\t6";
        assert_eq!(detect_delimiter(data, b'"').unwrap(), b'\t');
    }

    #[test]
    fn test_detect_delimiter_with_multiline_quoted_field() {
        let data = b"PID,address,gender\n\
            1,\"12 Oak Rd\nDover, DE 19901\",Male\n\
            2,\"9 Pine Ln\nSalem, OR 97301\",Female\n";
        assert_eq!(detect_delimiter(data, b'"').unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_empty() {
        assert!(matches!(
            detect_delimiter(b"\n\n", b'"'),
            Err(CleanerError::EmptyData(_))
        ));
    }

    #[test]
    fn test_parse_csv() {
        let parser = Parser::new();
        let data = b"name,age,city\nAlice,30,NYC\nBob,25,LA";
        let table = parser.parse_bytes(data).unwrap();

        assert_eq!(table.headers, vec!["name", "age", "city"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(0, 0), Some("Alice"));
        assert_eq!(table.get(1, 1), Some("25"));
    }

    #[test]
    fn test_parse_keeps_embedded_newline() {
        let parser = Parser::new();
        let data = b"PID,address\n7,\"123 Elm St\nSpringfield, IL 62704\"\n";
        let table = parser.parse_bytes(data).unwrap();

        assert_eq!(table.row_count(), 1);
        assert_eq!(table.get(0, 1), Some("123 Elm St\nSpringfield, IL 62704"));
    }

    #[test]
    fn test_parse_pads_short_rows() {
        let parser = Parser::new();
        let table = parser.parse_bytes(b"a,b,c\n1,2\n3,4,5,6\n").unwrap();

        assert_eq!(table.rows[0], vec!["1", "2", ""]);
        assert_eq!(table.rows[1], vec!["3", "4", "5"]);
    }

    #[test]
    fn test_parse_without_header() {
        let parser = Parser::with_config(ParserConfig {
            has_header: false,
            ..Default::default()
        });
        let table = parser.parse_bytes(b"1,2\n3,4\n").unwrap();

        assert_eq!(table.headers, vec!["column_1", "column_2"]);
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn test_parse_max_rows() {
        let parser = Parser::with_config(ParserConfig {
            max_rows: Some(1),
            ..Default::default()
        });
        let table = parser.parse_bytes(b"a,b\n1,2\n3,4\n").unwrap();
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_parse_header_only_is_empty() {
        let parser = Parser::new();
        assert!(matches!(
            parser.parse_bytes(b"a,b,c\n"),
            Err(CleanerError::EmptyData(_))
        ));
    }
}
