//! Transformation engine that runs the normalization stages.
//!
//! Every stage reads an input table and builds a new one; the input is never
//! mutated.

use indexmap::IndexMap;
use tracing::{debug, info, info_span, warn};

use crate::error::{CleanerError, Result};
use crate::logging::redact_value;
use crate::normalize::{
    full_name, lowercase, normalize_header, normalize_phone, split_address, DateReformatter,
};
use crate::record::{columns, PatientTable, Record};

use super::config::{ErrorPolicy, PipelineConfig};
use super::operations::{
    HeaderChange, RowAudit, RowFailure, TransformChange, TransformOperation, TransformResult,
};

/// Runs an ordered list of stages over a patient table.
pub struct TransformEngine {
    operations: Vec<TransformOperation>,
    policy: ErrorPolicy,
}

impl TransformEngine {
    /// Create an engine running the standard pipeline with default settings.
    pub fn new() -> Self {
        Self {
            operations: PipelineConfig::default().operations(),
            policy: ErrorPolicy::default(),
        }
    }

    /// Create an engine from a pipeline configuration.
    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        // Surface bad date patterns before any data is touched.
        DateReformatter::new(&config.date_input_format, &config.date_output_format)?;

        Ok(Self {
            operations: config.operations(),
            policy: config.error_policy,
        })
    }

    /// The stages, in order.
    pub fn operations(&self) -> &[TransformOperation] {
        &self.operations
    }

    /// Run every stage and return the final table with the audit trail.
    pub fn apply(&self, table: &PatientTable) -> Result<(PatientTable, TransformResult)> {
        let mut result = TransformResult::new();
        let mut current: Option<PatientTable> = None;

        for operation in &self.operations {
            let span = info_span!("stage", name = operation.name());
            let _guard = span.enter();

            let input = current.as_ref().unwrap_or(table);
            let (next, change) = self.apply_operation(operation, input)?;

            info!(
                changed = change.values_changed,
                failures = change.failures.len(),
                "{}",
                change.description
            );

            result.add_change(change);
            current = Some(next);
        }

        Ok((current.unwrap_or_else(|| table.clone()), result))
    }

    /// Apply a single stage.
    pub fn apply_operation(
        &self,
        operation: &TransformOperation,
        table: &PatientTable,
    ) -> Result<(PatientTable, TransformChange)> {
        let (next, mut change) = match operation {
            TransformOperation::NormalizeHeaders { renames } => self.apply_headers(renames, table),
            TransformOperation::Lowercase { column } => self.apply_lowercase(column, table),
            TransformOperation::FullName {
                first,
                last,
                target,
                separator,
            } => self.apply_full_name(first, last, target, separator, table),
            TransformOperation::ReformatDate {
                column,
                input_format,
                output_format,
            } => self.apply_date(column, input_format, output_format, table),
            TransformOperation::SplitAddress { column } => self.apply_address(column, table),
            TransformOperation::NormalizePhone { column } => self.apply_phone(column, table),
        }?;

        change.stage = operation.name().to_string();
        if change.description.is_empty() {
            change.description = operation.description();
        }
        Ok((next, change))
    }

    fn apply_headers(
        &self,
        renames: &IndexMap<String, String>,
        table: &PatientTable,
    ) -> Result<(PatientTable, TransformChange)> {
        let mut header_changes = Vec::new();
        let columns: Vec<String> = table
            .columns()
            .iter()
            .map(|header| {
                let normalized = normalize_header(header, renames);
                if normalized != *header {
                    debug!(from = %header, to = %normalized, "renamed header");
                    header_changes.push(HeaderChange {
                        from: header.clone(),
                        to: normalized.clone(),
                    });
                }
                normalized
            })
            .collect();

        let records = table
            .records()
            .iter()
            .cloned()
            .map(|record| record.rename_columns(|c| normalize_header(c, renames)))
            .collect();

        let next = PatientTable::new(columns, records)?;

        Ok((
            next,
            TransformChange {
                description: format!("Normalized {} header(s)", header_changes.len()),
                header_changes,
                ..Default::default()
            },
        ))
    }

    fn apply_lowercase(
        &self,
        column: &str,
        table: &PatientTable,
    ) -> Result<(PatientTable, TransformChange)> {
        table.require_column(column, "lowercase")?;

        let values = self.map_values(table, column, "lowercase", |_, record| {
            Ok(lowercase(record.get(column).unwrap_or_default()))
        })?;

        values.finish(table.columns().to_vec(), column, Vec::new())
    }

    fn apply_full_name(
        &self,
        first: &str,
        last: &str,
        target: &str,
        separator: &str,
        table: &PatientTable,
    ) -> Result<(PatientTable, TransformChange)> {
        table.require_column(first, "full_name")?;
        table.require_column(last, "full_name")?;

        let values = self.map_values(table, target, "full_name", |_, record| {
            Ok(full_name(
                record.get(first).unwrap_or_default(),
                record.get(last).unwrap_or_default(),
                separator,
            ))
        })?;

        let mut columns = table.columns().to_vec();
        let mut added = Vec::new();
        if !table.has_column(target) {
            columns.push(target.to_string());
            added.push(target.to_string());
        }

        values.finish(columns, target, added)
    }

    fn apply_date(
        &self,
        column: &str,
        input_format: &str,
        output_format: &str,
        table: &PatientTable,
    ) -> Result<(PatientTable, TransformChange)> {
        table.require_column(column, "reformat_date")?;
        let dates = DateReformatter::new(input_format, output_format)?;

        let values = self.map_values(table, column, "reformat_date", |row, record| {
            dates
                .reformat(record.get(column).unwrap_or_default())
                .map_err(|e| CleanerError::MalformedDate {
                    row,
                    value: e.value,
                    expected: e.expected,
                })
        })?;

        values.finish(table.columns().to_vec(), column, Vec::new())
    }

    fn apply_phone(
        &self,
        column: &str,
        table: &PatientTable,
    ) -> Result<(PatientTable, TransformChange)> {
        table.require_column(column, "normalize_phone")?;

        let values = self.map_values(table, column, "normalize_phone", |row, record| {
            normalize_phone(record.get(column).unwrap_or_default()).map_err(|e| {
                CleanerError::MalformedPhone {
                    row,
                    reason: e.to_string(),
                }
            })
        })?;

        values.finish(table.columns().to_vec(), column, Vec::new())
    }

    fn apply_address(
        &self,
        column: &str,
        table: &PatientTable,
    ) -> Result<(PatientTable, TransformChange)> {
        table.require_column(column, "split_address")?;

        let targets = columns::address_part_columns(column);

        let mut records = Vec::with_capacity(table.row_count());
        let mut row_audits = Vec::new();
        let mut failures = Vec::new();
        let mut changed = 0;

        for (row, record) in table.records().iter().enumerate() {
            let mut record = record.clone();
            let raw = record.remove(column).unwrap_or_default();

            match split_address(&raw) {
                Ok(parts) => {
                    changed += 1;
                    let parts = [parts.street, parts.city, parts.state, parts.zip];
                    for (target, value) in targets.iter().zip(parts) {
                        if !value.is_empty() {
                            row_audits.push(RowAudit {
                                row,
                                column: target.clone(),
                                original_value: raw.clone(),
                                new_value: value.clone(),
                                transform_type: "split_address".to_string(),
                            });
                        }
                        record.set(target.clone(), value);
                    }
                }
                Err(e) => {
                    let error = CleanerError::MalformedAddress {
                        row,
                        reason: e.to_string(),
                    };
                    self.handle_failure(error, row, column, &raw, &mut failures)?;

                    // Unsplit addresses stay in the street column as found.
                    let [street, rest @ ..] = &targets;
                    record.set(street.clone(), raw);
                    for target in rest {
                        record.set(target.clone(), String::new());
                    }
                }
            }
            records.push(record);
        }

        let mut columns: Vec<String> = table
            .columns()
            .iter()
            .filter(|c| c.as_str() != column)
            .cloned()
            .collect();
        let mut added = Vec::new();
        for target in &targets {
            if !columns.contains(target) {
                columns.push(target.clone());
                added.push(target.clone());
            }
        }

        let next = PatientTable::new(columns, records)?;

        Ok((
            next,
            TransformChange {
                column: column.to_string(),
                values_changed: changed,
                columns_added: added,
                columns_removed: vec![column.to_string()],
                row_audits,
                failures,
                ..Default::default()
            },
        ))
    }

    /// Rewrite one column of every record, auditing real changes.
    fn map_values<F>(
        &self,
        table: &PatientTable,
        column: &str,
        transform_type: &str,
        mut f: F,
    ) -> Result<MappedValues>
    where
        F: FnMut(usize, &Record) -> Result<String>,
    {
        let mut mapped = MappedValues::default();

        for (row, record) in table.records().iter().enumerate() {
            let mut record = record.clone();
            let original = record.get(column).unwrap_or_default().to_string();

            match f(row, &record) {
                Ok(new_value) => {
                    if new_value != original {
                        mapped.row_audits.push(RowAudit {
                            row,
                            column: column.to_string(),
                            original_value: original,
                            new_value: new_value.clone(),
                            transform_type: transform_type.to_string(),
                        });
                    }
                    record.set(column, new_value);
                }
                Err(error) => {
                    self.handle_failure(error, row, column, &original, &mut mapped.failures)?;
                }
            }

            mapped.records.push(record);
        }

        Ok(mapped)
    }

    /// Abort, or keep the value and record the failure, per the policy.
    fn handle_failure(
        &self,
        error: CleanerError,
        row: usize,
        column: &str,
        value: &str,
        failures: &mut Vec<RowFailure>,
    ) -> Result<()> {
        match self.policy {
            ErrorPolicy::Abort => Err(error),
            ErrorPolicy::Keep => {
                warn!(row, column, value = redact_value(value), "kept malformed value");
                failures.push(RowFailure {
                    row,
                    column: column.to_string(),
                    value: value.to_string(),
                    error: error.to_string(),
                });
                Ok(())
            }
        }
    }
}

impl Default for TransformEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Output of [`TransformEngine::map_values`].
#[derive(Default)]
struct MappedValues {
    records: Vec<Record>,
    row_audits: Vec<RowAudit>,
    failures: Vec<RowFailure>,
}

impl MappedValues {
    fn finish(
        self,
        columns: Vec<String>,
        column: &str,
        columns_added: Vec<String>,
    ) -> Result<(PatientTable, TransformChange)> {
        let next = PatientTable::new(columns, self.records)?;
        Ok((
            next,
            TransformChange {
                column: column.to_string(),
                values_changed: self.row_audits.len(),
                columns_added,
                row_audits: self.row_audits,
                failures: self.failures,
                ..Default::default()
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_table() -> PatientTable {
        let columns = ["PID", "DOB", "first_name", "last_name", "gender", "address", "phone_number"]
            .map(String::from)
            .to_vec();
        let records = vec![
            Record::new()
                .with("PID", "1")
                .with("DOB", "1985-03-07")
                .with("first_name", "Jane")
                .with("last_name", "Doe")
                .with("gender", "FEMALE")
                .with("address", "123 Elm St\nSpringfield, IL 62704")
                .with("phone_number", "(555) 123-4567"),
            Record::new()
                .with("PID", "2")
                .with("DOB", "1990-11-21")
                .with("first_name", "John")
                .with("last_name", "Smith")
                .with("gender", "Male")
                .with("address", "9 Pine Ln\nSalem, OR 97301")
                .with("phone_number", "555.123.4567x89"),
        ];
        PatientTable::new(columns, records).unwrap()
    }

    #[test]
    fn test_full_pipeline() {
        let engine = TransformEngine::new();
        let (table, result) = engine.apply(&raw_table()).unwrap();

        assert_eq!(
            table.columns(),
            [
                "patient_id",
                "date_of_birth",
                "first_name",
                "last_name",
                "gender",
                "phone_number",
                "full_name",
                "address_street",
                "address_city",
                "address_state",
                "address_zip",
            ]
        );

        let jane = &table.records()[0];
        assert_eq!(jane.get("patient_id"), Some("1"));
        assert_eq!(jane.get("date_of_birth"), Some("03/07/1985"));
        assert_eq!(jane.get("gender"), Some("female"));
        assert_eq!(jane.get("full_name"), Some("Jane Doe"));
        assert_eq!(jane.get("address_street"), Some("123 Elm St"));
        assert_eq!(jane.get("address_city"), Some("Springfield"));
        assert_eq!(jane.get("address_state"), Some("IL"));
        assert_eq!(jane.get("address_zip"), Some("62704"));
        assert_eq!(jane.get("address"), None);
        assert_eq!(jane.get("phone_number"), Some("555- 123-4567"));

        let john = &table.records()[1];
        assert_eq!(john.get("gender"), Some("male"));
        assert_eq!(john.get("phone_number"), Some("555-123-4567"));

        assert_eq!(result.operations_applied, 6);
        assert_eq!(result.columns_added, 5);
        assert_eq!(result.columns_removed, 1);
        assert_eq!(result.failures().count(), 0);
    }

    #[test]
    fn test_input_is_not_mutated() {
        let raw = raw_table();
        let before = raw.clone();
        TransformEngine::new().apply(&raw).unwrap();
        assert_eq!(raw, before);
    }

    #[test]
    fn test_header_changes_are_audited() {
        let engine = TransformEngine::new();
        let op = &engine.operations()[0];
        let (_, change) = engine.apply_operation(op, &raw_table()).unwrap();

        assert_eq!(change.stage, "normalize_headers");
        assert_eq!(
            change.header_changes,
            vec![
                HeaderChange {
                    from: "PID".to_string(),
                    to: "patient_id".to_string()
                },
                HeaderChange {
                    from: "DOB".to_string(),
                    to: "date_of_birth".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_header_collision_is_rejected() {
        let table = PatientTable::new(
            vec!["PID".to_string(), "patient_id".to_string()],
            vec![Record::new().with("PID", "1").with("patient_id", "1")],
        )
        .unwrap();
        let op = TransformOperation::NormalizeHeaders {
            renames: crate::normalize::default_renames(),
        };
        let result = TransformEngine::new().apply_operation(&op, &table);
        assert!(matches!(result, Err(CleanerError::Config(_))));
    }

    #[test]
    fn test_unchanged_values_are_not_audited() {
        let table = PatientTable::new(
            vec!["gender".to_string()],
            vec![
                Record::new().with("gender", "male"),
                Record::new().with("gender", "Female"),
            ],
        )
        .unwrap();
        let op = TransformOperation::Lowercase {
            column: "gender".to_string(),
        };
        let (_, change) = TransformEngine::new().apply_operation(&op, &table).unwrap();

        assert_eq!(change.values_changed, 1);
        assert_eq!(change.row_audits[0].row, 1);
        assert_eq!(change.row_audits[0].new_value, "female");
    }

    #[test]
    fn test_missing_column() {
        let table = PatientTable::new(
            vec!["first_name".to_string()],
            vec![Record::new().with("first_name", "Jane")],
        )
        .unwrap();
        let op = TransformOperation::FullName {
            first: "first_name".to_string(),
            last: "last_name".to_string(),
            target: "full_name".to_string(),
            separator: " ".to_string(),
        };
        let err = TransformEngine::new().apply_operation(&op, &table).unwrap_err();
        assert!(matches!(
            err,
            CleanerError::MissingColumn { ref column, .. } if column == "last_name"
        ));
    }

    #[test]
    fn test_abort_on_malformed_date() {
        let (columns, mut records) = raw_table().into_parts();
        records[1].set("DOB", "11/21/1990");
        let raw = PatientTable::new(columns, records).unwrap();

        let err = TransformEngine::new().apply(&raw).unwrap_err();
        assert!(matches!(
            err,
            CleanerError::MalformedDate { row: 1, ref value, .. } if value == "11/21/1990"
        ));
    }

    #[test]
    fn test_keep_policy_records_failures() {
        let (columns, mut records) = raw_table().into_parts();
        records[0].set("address", "no newline here");
        records[1].set("phone_number", "");
        let raw = PatientTable::new(columns, records).unwrap();

        let config = PipelineConfig::default().with_error_policy(ErrorPolicy::Keep);
        let engine = TransformEngine::from_config(&config).unwrap();
        let (table, result) = engine.apply(&raw).unwrap();

        let failures: Vec<_> = result.failures().collect();
        assert_eq!(failures.len(), 2);
        assert_eq!(failures[0].column, "address");
        assert_eq!(failures[0].value, "no newline here");
        assert_eq!(failures[1].column, "phone_number");

        let jane = &table.records()[0];
        assert_eq!(jane.get("address_street"), Some("no newline here"));
        assert_eq!(jane.get("address_zip"), Some(""));
        assert_eq!(table.records()[1].get("phone_number"), Some(""));
        assert_eq!(table.records()[1].get("address_city"), Some("Salem"));
    }

    #[test]
    fn test_keep_policy_preserves_unsplit_address() {
        let table = PatientTable::new(
            vec!["address".to_string()],
            vec![Record::new().with("address", "PSC 1234, Box 5678\nAPO AA 12345")],
        )
        .unwrap();
        let op = TransformOperation::SplitAddress {
            column: "address".to_string(),
        };
        let engine = TransformEngine::from_config(
            &PipelineConfig::default().with_error_policy(ErrorPolicy::Keep),
        )
        .unwrap();
        let (next, change) = engine.apply_operation(&op, &table).unwrap();

        let record = &next.records()[0];
        assert_eq!(record.get("address"), None);
        assert_eq!(
            record.get("address_street"),
            Some("PSC 1234, Box 5678\nAPO AA 12345")
        );
        assert_eq!(record.get("address_city"), Some(""));
        assert_eq!(record.get("address_state"), Some(""));
        assert_eq!(change.values_changed, 0);
        assert!(change.row_audits.is_empty());
        assert_eq!(change.failures.len(), 1);
    }

    #[test]
    fn test_existing_target_column_is_overwritten_in_place() {
        let table = PatientTable::new(
            vec!["full_name".to_string(), "first_name".to_string(), "last_name".to_string()],
            vec![Record::new()
                .with("full_name", "old")
                .with("first_name", "Jane")
                .with("last_name", "Doe")],
        )
        .unwrap();
        let op = TransformOperation::FullName {
            first: "first_name".to_string(),
            last: "last_name".to_string(),
            target: "full_name".to_string(),
            separator: " ".to_string(),
        };
        let (next, change) = TransformEngine::new().apply_operation(&op, &table).unwrap();

        assert_eq!(next.columns(), ["full_name", "first_name", "last_name"]);
        assert_eq!(next.records()[0].get("full_name"), Some("Jane Doe"));
        assert!(change.columns_added.is_empty());
    }

    #[test]
    fn test_from_config_rejects_bad_date_pattern() {
        let config = PipelineConfig {
            date_output_format: "%Q".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            TransformEngine::from_config(&config),
            Err(CleanerError::Config(_))
        ));
    }
}
