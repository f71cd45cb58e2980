//! CLI command implementations.

pub mod clean;
pub mod diff;

use std::path::Path;

use patient_cleaner::{CleanerConfig, ErrorPolicy, ParserConfig, PipelineConfig};

/// Assemble the library configuration from command-line options.
pub(crate) fn build_config(
    config: Option<&Path>,
    keep_going: bool,
    delimiter: Option<u8>,
) -> Result<CleanerConfig, Box<dyn std::error::Error>> {
    let mut pipeline = match config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::default(),
    };
    if keep_going {
        pipeline.error_policy = ErrorPolicy::Keep;
    }

    let parser = ParserConfig {
        delimiter,
        ..Default::default()
    };

    Ok(CleanerConfig::default()
        .with_parser(parser)
        .with_pipeline(pipeline))
}

/// Make a cell value printable on one line.
pub(crate) fn display_value(value: &str) -> String {
    value.replace('\r', "").replace('\n', "\\n")
}
