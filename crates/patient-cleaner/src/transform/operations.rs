//! Pipeline stages and the audit trail they produce.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{CleanerError, Result};

/// One normalization stage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TransformOperation {
    /// Rename known headers, then lowercase and underscore all headers.
    NormalizeHeaders { renames: IndexMap<String, String> },

    /// Lowercase every value in a column.
    Lowercase { column: String },

    /// Derive `target` as `first + separator + last`.
    FullName {
        first: String,
        last: String,
        target: String,
        separator: String,
    },

    /// Reparse dates from one pattern and write them in another.
    ReformatDate {
        column: String,
        input_format: String,
        output_format: String,
    },

    /// Decompose an address column into `<column>_street`, `<column>_city`,
    /// `<column>_state` and `<column>_zip`, then drop it.
    SplitAddress { column: String },

    /// Canonicalize phone numbers.
    NormalizePhone { column: String },
}

impl TransformOperation {
    /// Short machine-readable stage name.
    pub fn name(&self) -> &'static str {
        match self {
            TransformOperation::NormalizeHeaders { .. } => "normalize_headers",
            TransformOperation::Lowercase { .. } => "lowercase",
            TransformOperation::FullName { .. } => "full_name",
            TransformOperation::ReformatDate { .. } => "reformat_date",
            TransformOperation::SplitAddress { .. } => "split_address",
            TransformOperation::NormalizePhone { .. } => "normalize_phone",
        }
    }

    /// Get a human-readable description of the operation.
    pub fn description(&self) -> String {
        match self {
            TransformOperation::NormalizeHeaders { renames } => {
                let examples: Vec<String> = renames
                    .iter()
                    .map(|(from, to)| format!("'{}' → '{}'", from, to))
                    .collect();
                if examples.is_empty() {
                    "Normalize headers to lowercase_with_underscores".to_string()
                } else {
                    format!(
                        "Normalize headers ({}) to lowercase_with_underscores",
                        examples.join(", ")
                    )
                }
            }
            TransformOperation::Lowercase { column } => format!("Lowercase '{}'", column),
            TransformOperation::FullName {
                first,
                last,
                target,
                ..
            } => format!("Derive '{}' from '{}' and '{}'", target, first, last),
            TransformOperation::ReformatDate {
                column,
                input_format,
                output_format,
            } => format!(
                "Reformat '{}' from {} to {}",
                column, input_format, output_format
            ),
            TransformOperation::SplitAddress { column } => format!(
                "Split '{}' into street, city, state and zip",
                column
            ),
            TransformOperation::NormalizePhone { column } => {
                format!("Canonicalize phone numbers in '{}'", column)
            }
        }
    }
}

/// Result of running the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransformResult {
    /// Number of operations applied.
    pub operations_applied: usize,

    /// Number of values changed across all operations.
    pub values_changed: usize,

    /// Number of columns added.
    pub columns_added: usize,

    /// Number of columns removed.
    pub columns_removed: usize,

    /// Detailed changes for each operation.
    pub changes: Vec<TransformChange>,
}

/// What a single stage did.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransformChange {
    /// Stage name.
    pub stage: String,

    /// Description of the change.
    pub description: String,

    /// Column affected.
    pub column: String,

    /// Number of values changed.
    pub values_changed: usize,

    /// Columns this stage added.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns_added: Vec<String>,

    /// Columns this stage removed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub columns_removed: Vec<String>,

    /// Header renames.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub header_changes: Vec<HeaderChange>,

    /// Per-row audit information.
    pub row_audits: Vec<RowAudit>,

    /// Values left untouched because they could not be parsed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<RowFailure>,
}

/// A header that changed name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderChange {
    pub from: String,
    pub to: String,
}

/// Audit information for a single row change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowAudit {
    /// Row index (0-based).
    pub row: usize,

    /// Column that was changed.
    pub column: String,

    /// Original value before transformation.
    pub original_value: String,

    /// New value after transformation.
    pub new_value: String,

    /// Type of transformation applied.
    pub transform_type: String,
}

/// A value a stage could not process.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RowFailure {
    /// Row index (0-based).
    pub row: usize,

    /// Column holding the value.
    pub column: String,

    /// The value as found.
    pub value: String,

    /// Why it was rejected.
    pub error: String,
}

impl TransformResult {
    /// Create an empty result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a change to the result.
    pub fn add_change(&mut self, change: TransformChange) {
        self.operations_applied += 1;
        self.values_changed += change.values_changed;
        self.columns_added += change.columns_added.len();
        self.columns_removed += change.columns_removed.len();
        self.changes.push(change);
    }

    /// All failures recorded across stages.
    pub fn failures(&self) -> impl Iterator<Item = &RowFailure> {
        self.changes.iter().flat_map(|c| c.failures.iter())
    }

    /// All row audits across stages.
    pub fn row_audits(&self) -> impl Iterator<Item = &RowAudit> {
        self.changes.iter().flat_map(|c| c.row_audits.iter())
    }

    /// Save the audit trail as pretty JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let io_err = |e| CleanerError::Io {
            path: path.to_path_buf(),
            source: e,
        };

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let file = File::create(path).map_err(io_err)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_change_accumulates() {
        let mut result = TransformResult::new();
        result.add_change(TransformChange {
            stage: "split_address".to_string(),
            values_changed: 3,
            columns_added: vec!["a".to_string(), "b".to_string()],
            columns_removed: vec!["address".to_string()],
            ..Default::default()
        });
        result.add_change(TransformChange {
            stage: "lowercase".to_string(),
            values_changed: 2,
            failures: vec![RowFailure {
                row: 1,
                column: "gender".to_string(),
                value: String::new(),
                error: "x".to_string(),
            }],
            ..Default::default()
        });

        assert_eq!(result.operations_applied, 2);
        assert_eq!(result.values_changed, 5);
        assert_eq!(result.columns_added, 2);
        assert_eq!(result.columns_removed, 1);
        assert_eq!(result.failures().count(), 1);
    }

    #[test]
    fn test_operation_serializes_with_tag() {
        let op = TransformOperation::NormalizePhone {
            column: "phone_number".to_string(),
        };
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["type"], "normalize_phone");
        assert_eq!(json["column"], "phone_number");
    }

    #[test]
    fn test_save_writes_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit").join("run.json");

        TransformResult::new().save(&path).unwrap();

        let loaded: TransformResult =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(loaded.operations_applied, 0);
    }
}
