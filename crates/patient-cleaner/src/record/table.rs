//! Table of patient records.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::row::Record;
use crate::error::{CleanerError, Result};
use crate::input::DataTable;

/// An ordered column list plus the records carrying those columns.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientTable {
    columns: Vec<String>,
    records: Vec<Record>,
}

impl PatientTable {
    /// Create a table, checking that column names are unique.
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Result<Self> {
        check_unique(&columns)?;
        Ok(Self { columns, records })
    }

    /// Convert raw parsed data into records.
    pub fn from_data_table(table: &DataTable) -> Result<Self> {
        let records = table
            .rows
            .iter()
            .map(|row| Record::from_row(&table.headers, row))
            .collect();
        Self::new(table.headers.clone(), records)
    }

    /// Column names in order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// The records.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Take the records out of the table.
    pub fn into_parts(self) -> (Vec<String>, Vec<Record>) {
        (self.columns, self.records)
    }

    /// Number of records.
    pub fn row_count(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has a column.
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Fail with [`CleanerError::MissingColumn`] unless the column exists.
    pub fn require_column(&self, name: &str, stage: &str) -> Result<()> {
        if self.has_column(name) {
            Ok(())
        } else {
            Err(CleanerError::MissingColumn {
                column: name.to_string(),
                stage: stage.to_string(),
            })
        }
    }

    /// Row values in column order, for writing.
    pub fn value_rows(&self) -> impl Iterator<Item = Vec<&str>> {
        self.records.iter().map(|record| {
            self.columns
                .iter()
                .map(|c| record.get(c).unwrap_or(""))
                .collect()
        })
    }
}

fn check_unique(columns: &[String]) -> Result<()> {
    let mut seen = HashSet::new();
    for column in columns {
        if !seen.insert(column.as_str()) {
            return Err(CleanerError::Config(format!(
                "Duplicate column '{}'",
                column
            )));
        }
    }
    Ok(())
}
