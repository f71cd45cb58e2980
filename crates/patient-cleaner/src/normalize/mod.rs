//! Per-field normalization rules.
//!
//! Every function here is pure and operates on a single value; the pipeline
//! stages in [`crate::transform`] map them over record sequences.

pub mod address;
pub mod date;
pub mod headers;
pub mod phone;
pub mod text;

pub use address::{split_address, AddressError, AddressParts};
pub use date::{DateReformatter, MalformedDateError};
pub use headers::{default_renames, normalize_header};
pub use phone::{normalize_phone, PhoneError};
pub use text::{full_name, lowercase};
