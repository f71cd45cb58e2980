//! Pipeline configuration.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{CleanerError, Result};
use crate::normalize::date::{ISO_DATE, US_DATE};
use crate::normalize::default_renames;
use crate::record::columns;

use super::operations::TransformOperation;

/// What to do when a value cannot be parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorPolicy {
    /// Stop at the first malformed value.
    #[default]
    Abort,
    /// Leave the value untouched and record the failure in the audit.
    Keep,
}

/// Settings for the normalization pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Exact header renames applied before case normalization.
    pub header_renames: IndexMap<String, String>,
    /// Handling of malformed values.
    pub error_policy: ErrorPolicy,
    /// Separator between first and last name.
    pub full_name_separator: String,
    /// strftime pattern dates of birth are expected in.
    pub date_input_format: String,
    /// strftime pattern dates of birth are written in.
    pub date_output_format: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            header_renames: default_renames(),
            error_policy: ErrorPolicy::default(),
            full_name_separator: " ".to_string(),
            date_input_format: ISO_DATE.to_string(),
            date_output_format: US_DATE.to_string(),
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a JSON file. Missing keys take defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path).map_err(|e| CleanerError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            CleanerError::Config(format!(
                "Failed to parse pipeline config '{}': {}",
                path.display(),
                e
            ))
        })
    }

    /// Set the error policy.
    pub fn with_error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = policy;
        self
    }

    /// The ordered stages this configuration describes.
    pub fn operations(&self) -> Vec<TransformOperation> {
        vec![
            TransformOperation::NormalizeHeaders {
                renames: self.header_renames.clone(),
            },
            TransformOperation::Lowercase {
                column: columns::GENDER.to_string(),
            },
            TransformOperation::FullName {
                first: columns::FIRST_NAME.to_string(),
                last: columns::LAST_NAME.to_string(),
                target: columns::FULL_NAME.to_string(),
                separator: self.full_name_separator.clone(),
            },
            TransformOperation::ReformatDate {
                column: columns::DATE_OF_BIRTH.to_string(),
                input_format: self.date_input_format.clone(),
                output_format: self.date_output_format.clone(),
            },
            TransformOperation::SplitAddress {
                column: columns::ADDRESS.to_string(),
            },
            TransformOperation::NormalizePhone {
                column: columns::PHONE_NUMBER.to_string(),
            },
        ]
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_default_stage_order() {
        let names: Vec<&str> = PipelineConfig::default()
            .operations()
            .iter()
            .map(|op| op.name())
            .collect();
        assert_eq!(
            names,
            vec![
                "normalize_headers",
                "lowercase",
                "full_name",
                "reformat_date",
                "split_address",
                "normalize_phone"
            ]
        );
    }

    #[test]
    fn test_load_partial_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"error_policy": "keep", "full_name_separator": "_"}}"#).unwrap();

        let config = PipelineConfig::load(file.path()).unwrap();
        assert_eq!(config.error_policy, ErrorPolicy::Keep);
        assert_eq!(config.full_name_separator, "_");
        assert_eq!(config.date_input_format, ISO_DATE);
        assert_eq!(config.header_renames.get("PID").map(String::as_str), Some("patient_id"));
    }

    #[test]
    fn test_load_invalid_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"error_policy": "sometimes"}}"#).unwrap();
        assert!(matches!(
            PipelineConfig::load(file.path()),
            Err(CleanerError::Config(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            PipelineConfig::load("/nonexistent/pipeline.json"),
            Err(CleanerError::Io { .. })
        ));
    }
}
