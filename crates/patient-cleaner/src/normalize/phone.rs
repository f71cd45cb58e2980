//! Phone number canonicalization.
//!
//! This is a prefix heuristic, not a general phone parser:
//!
//! 1. Everything from the extension marker `x` onward is dropped.
//! 2. A number of leading characters is skipped depending on the first
//!    character (see [`LEADING_OFFSETS`]).
//! 3. `)` and `.` become `-`.
//!
//! Spaces are left alone, so `(555) 123-4567` becomes `555- 123-4567`.

use thiserror::Error;

/// Marks the start of an extension.
pub const EXTENSION_MARKER: char = 'x';

/// Leading character -> number of characters to skip.
///
/// `+` covers `+1 `, `0` covers the `001-` international prefix and `(`
/// drops the opening parenthesis of an area code. Anything else skips
/// nothing.
pub const LEADING_OFFSETS: &[(char, usize)] = &[('+', 3), ('0', 4), ('(', 1)];

/// Characters rewritten to `-`.
const SEPARATORS: &[char] = &[')', '.'];

/// Why a phone number could not be canonicalized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhoneError {
    #[error("phone number is empty")]
    Empty,

    #[error("prefix '{prefix}' skips {skip} characters but only {available} precede the extension")]
    TooShort {
        prefix: char,
        skip: usize,
        available: usize,
    },
}

/// Number of leading characters to skip for a value.
pub fn start_offset(value: &str) -> usize {
    value
        .chars()
        .next()
        .and_then(|first| {
            LEADING_OFFSETS
                .iter()
                .find(|(prefix, _)| *prefix == first)
                .map(|(_, skip)| *skip)
        })
        .unwrap_or(0)
}

/// Canonicalize a phone number.
pub fn normalize_phone(value: &str) -> Result<String, PhoneError> {
    let first = value.chars().next().ok_or(PhoneError::Empty)?;

    let number = match value.find(EXTENSION_MARKER) {
        Some(pos) => &value[..pos],
        None => value,
    };

    let skip = start_offset(value);
    let available = number.chars().count();
    if skip >= available {
        return Err(PhoneError::TooShort {
            prefix: first,
            skip,
            available,
        });
    }

    Ok(number
        .chars()
        .skip(skip)
        .map(|c| if SEPARATORS.contains(&c) { '-' } else { c })
        .collect())
}
