//! Main Cleaner struct and public API.

use std::path::Path;

use tracing::info;

use crate::error::Result;
use crate::input::{Parser, ParserConfig, SourceMetadata};
use crate::record::PatientTable;
use crate::transform::{PipelineConfig, TransformEngine, TransformResult};

/// Configuration for a cleaning run.
#[derive(Debug, Clone, Default)]
pub struct CleanerConfig {
    /// Parser configuration.
    pub parser: ParserConfig,
    /// Pipeline configuration.
    pub pipeline: PipelineConfig,
}

impl CleanerConfig {
    /// Replace the parser configuration.
    pub fn with_parser(mut self, parser: ParserConfig) -> Self {
        self.parser = parser;
        self
    }

    /// Replace the pipeline configuration.
    pub fn with_pipeline(mut self, pipeline: PipelineConfig) -> Self {
        self.pipeline = pipeline;
        self
    }
}

/// Result of cleaning a data file.
#[derive(Debug, Clone)]
pub struct CleanResult {
    /// Metadata about the source file.
    pub source: SourceMetadata,
    /// The cleaned table.
    pub table: PatientTable,
    /// What every stage changed.
    pub audit: TransformResult,
}

/// Loads patient data and runs the normalization pipeline over it.
pub struct Cleaner {
    parser: Parser,
    engine: TransformEngine,
}

impl Cleaner {
    /// Create a cleaner with default configuration.
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
            engine: TransformEngine::new(),
        }
    }

    /// Create a cleaner with custom configuration.
    pub fn with_config(config: CleanerConfig) -> Result<Self> {
        Ok(Self {
            parser: Parser::with_config(config.parser),
            engine: TransformEngine::from_config(&config.pipeline)?,
        })
    }

    /// Load and clean a file.
    pub fn clean_file(&self, path: impl AsRef<Path>) -> Result<CleanResult> {
        let (data, source) = self.parser.parse_file(path)?;
        info!(
            file = %source.file,
            rows = source.row_count,
            columns = source.column_count,
            "loaded patient data"
        );

        let raw = PatientTable::from_data_table(&data)?;
        let (table, audit) = self.engine.apply(&raw)?;

        info!(
            values_changed = audit.values_changed,
            failures = audit.failures().count(),
            "cleaning complete"
        );

        Ok(CleanResult {
            source,
            table,
            audit,
        })
    }

    /// Clean in-memory delimited data.
    pub fn clean_bytes(&self, bytes: &[u8]) -> Result<(PatientTable, TransformResult)> {
        let data = self.parser.parse_bytes(bytes)?;
        let raw = PatientTable::from_data_table(&data)?;
        self.engine.apply(&raw)
    }

    /// Clean an already-loaded table.
    pub fn clean_table(&self, table: &PatientTable) -> Result<(PatientTable, TransformResult)> {
        self.engine.apply(table)
    }
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new()
    }
}
