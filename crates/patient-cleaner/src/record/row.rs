//! A single patient row.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One patient row: an ordered map from column name to value.
///
/// Columns the pipeline knows nothing about are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: IndexMap<String, String>,
}

impl Record {
    /// Create an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a record from parallel header and value slices.
    pub fn from_row(headers: &[String], values: &[String]) -> Self {
        let fields = headers
            .iter()
            .zip(values.iter().map(String::as_str).chain(std::iter::repeat("")))
            .map(|(h, v)| (h.clone(), v.to_string()))
            .collect();
        Self { fields }
    }

    /// Get a field value.
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Set a field, appending it at the end if it is new.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(column.into(), value.into());
    }

    /// Builder-style [`Record::set`].
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(column, value);
        self
    }

    /// Remove a field, keeping the order of the others.
    pub fn remove(&mut self, column: &str) -> Option<String> {
        self.fields.shift_remove(column)
    }

    /// Column names in order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Rename every column through `rename`, keeping positions.
    pub fn rename_columns(self, mut rename: impl FnMut(&str) -> String) -> Self {
        let fields = self
            .fields
            .into_iter()
            .map(|(k, v)| (rename(&k), v))
            .collect();
        Self { fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_row_pads_missing_values() {
        let headers = vec!["a".to_string(), "b".to_string()];
        let record = Record::from_row(&headers, &["1".to_string()]);
        assert_eq!(record.get("a"), Some("1"));
        assert_eq!(record.get("b"), Some(""));
    }

    #[test]
    fn test_set_appends_and_remove_keeps_order() {
        let mut record = Record::new().with("a", "1").with("b", "2").with("c", "3");
        record.set("d", "4");
        assert_eq!(record.remove("b"), Some("2".to_string()));
        assert_eq!(record.columns().collect::<Vec<_>>(), vec!["a", "c", "d"]);
    }

    #[test]
    fn test_rename_columns_keeps_positions() {
        let record = Record::new().with("PID", "1").with("Full Name", "x");
        let renamed = record.rename_columns(|c| c.to_lowercase());
        assert_eq!(renamed.columns().collect::<Vec<_>>(), vec!["pid", "full name"]);
    }
}
