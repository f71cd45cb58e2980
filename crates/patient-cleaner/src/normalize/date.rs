//! Date reformatting with a declared input pattern.

use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDate;
use thiserror::Error;

use crate::error::{CleanerError, Result};

/// Pattern dates are expected in (`yyyy-mm-dd`).
pub const ISO_DATE: &str = "%Y-%m-%d";

/// Canonical output pattern (`mm/dd/yyyy`).
pub const US_DATE: &str = "%m/%d/%Y";

/// A value did not match the expected date pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' does not match date pattern '{expected}'")]
pub struct MalformedDateError {
    pub value: String,
    pub expected: String,
}

/// Parses dates in one pattern and renders them in another.
#[derive(Debug, Clone)]
pub struct DateReformatter {
    input: String,
    output: String,
}

impl DateReformatter {
    /// Create a reformatter, rejecting invalid strftime patterns.
    pub fn new(input: impl Into<String>, output: impl Into<String>) -> Result<Self> {
        let input = input.into();
        let output = output.into();
        check_pattern(&input)?;
        check_pattern(&output)?;
        Ok(Self { input, output })
    }

    /// Reformat a single value.
    ///
    /// The value must render back to itself under the input pattern, so
    /// unpadded or surrounding-whitespace variants are rejected.
    pub fn reformat(&self, value: &str) -> std::result::Result<String, MalformedDateError> {
        let malformed = || MalformedDateError {
            value: value.to_string(),
            expected: self.input.clone(),
        };

        let date = NaiveDate::parse_from_str(value, &self.input).map_err(|_| malformed())?;
        if date.format(&self.input).to_string() != value {
            return Err(malformed());
        }

        Ok(date.format(&self.output).to_string())
    }
}

impl Default for DateReformatter {
    fn default() -> Self {
        Self {
            input: ISO_DATE.to_string(),
            output: US_DATE.to_string(),
        }
    }
}

/// A pattern is usable if it parses and can render a date without time fields.
fn check_pattern(pattern: &str) -> Result<()> {
    let mut rendered = String::new();
    let invalid = pattern.is_empty()
        || StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error))
        || write!(rendered, "{}", NaiveDate::default().format(pattern)).is_err();

    if invalid {
        return Err(CleanerError::Config(format!(
            "Invalid date pattern '{}'",
            pattern
        )));
    }
    Ok(())
}
