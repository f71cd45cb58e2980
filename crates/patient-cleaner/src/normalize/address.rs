//! Address decomposition.
//!
//! Addresses are expected as two lines:
//!
//! ```text
//! 123 Elm St
//! Springfield, IL 62704
//! ```
//!
//! The first line is the street. On the second line the city runs up to the
//! first comma, followed by a two-letter state and a ZIP code (5 digits or
//! ZIP+4).

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logging::redact_value;

static STATE_ZIP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z]{2})\s+(\d{5}(?:-\d{4})?)$").unwrap());

/// The components an address is split into.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressParts {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
}

/// Why an address could not be split.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("no newline separating street from city")]
    MissingNewline,

    #[error("street spans more than one line")]
    ExtraLines,

    #[error("no comma separating city from state and ZIP")]
    MissingComma,

    #[error("expected '<STATE> <ZIP>' after the comma, found '{}'", redact_value(.0))]
    StateZip(String),
}

/// Split a two-line address into street, city, state and ZIP.
pub fn split_address(value: &str) -> Result<AddressParts, AddressError> {
    let (street, rest) = value.split_once('\n').ok_or(AddressError::MissingNewline)?;
    let rest = rest.trim_end_matches(['\r', '\n']);
    if rest.contains('\n') {
        return Err(AddressError::ExtraLines);
    }
    let (city, state_zip) = rest.split_once(',').ok_or(AddressError::MissingComma)?;

    let state_zip = state_zip.trim();
    let caps = STATE_ZIP
        .captures(state_zip)
        .ok_or_else(|| AddressError::StateZip(state_zip.to_string()))?;

    Ok(AddressParts {
        street: street.trim_end_matches('\r').to_string(),
        city: city.to_string(),
        state: caps[1].to_string(),
        zip: caps[2].to_string(),
    })
}
