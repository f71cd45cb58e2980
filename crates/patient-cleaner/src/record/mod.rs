//! Record types the pipeline stages operate on.

mod row;
mod table;

pub use row::Record;
pub use table::PatientTable;

/// Canonical column names produced by the pipeline.
pub mod columns {
    pub const PATIENT_ID: &str = "patient_id";
    pub const DATE_OF_BIRTH: &str = "date_of_birth";
    pub const FIRST_NAME: &str = "first_name";
    pub const LAST_NAME: &str = "last_name";
    pub const FULL_NAME: &str = "full_name";
    pub const GENDER: &str = "gender";
    pub const ADDRESS: &str = "address";
    pub const PHONE_NUMBER: &str = "phone_number";

    /// Suffixes of the columns an address column is split into.
    pub const ADDRESS_PARTS: [&str; 4] = ["street", "city", "state", "zip"];

    /// `<column>_street`, `<column>_city`, `<column>_state`, `<column>_zip`.
    pub fn address_part_columns(column: &str) -> [String; 4] {
        ADDRESS_PARTS.map(|part| format!("{}_{}", column, part))
    }
}
