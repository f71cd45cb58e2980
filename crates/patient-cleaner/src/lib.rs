//! patient-cleaner: normalization pipeline for tabular patient demographic data.
//!
//! A table of patient rows is passed through a fixed sequence of stages:
//!
//! 1. headers are renamed (`PID` → `patient_id`, `DOB` → `date_of_birth`),
//!    lowercased and underscored,
//! 2. `gender` is lowercased,
//! 3. `full_name` is derived from `first_name` and `last_name`,
//! 4. `date_of_birth` is reformatted from `yyyy-mm-dd` to `mm/dd/yyyy`,
//! 5. `address` is split into street, city, state and zip,
//! 6. `phone_number` is canonicalized.
//!
//! Each stage builds a new table from its input and reports what it changed.
//! The pipeline is meant to run once: its output no longer matches the input
//! layouts the date and address stages expect.
//!
//! # Example
//!
//! ```no_run
//! use patient_cleaner::{Cleaner, OutputFormat};
//!
//! let cleaner = Cleaner::new();
//! let result = cleaner.clean_file("fake_patients.csv").unwrap();
//!
//! println!("Rows: {}", result.table.row_count());
//! println!("Values changed: {}", result.audit.values_changed);
//! let output = "updated_patient_data.csv";
//! patient_cleaner::write_table(&result.table, output, OutputFormat::Csv).unwrap();
//! ```

pub mod error;
pub mod input;
pub mod logging;
pub mod normalize;
pub mod output;
pub mod record;
pub mod transform;

mod cleaner;

pub use crate::cleaner::{CleanResult, Cleaner, CleanerConfig};
pub use error::{CleanerError, Result};
pub use input::{DataTable, Parser, ParserConfig, SourceMetadata};
pub use output::{default_output_path, write_table, write_table_to, OutputFormat};
pub use record::{PatientTable, Record};
pub use transform::{
    ErrorPolicy, PipelineConfig, RowAudit, RowFailure, TransformChange, TransformEngine,
    TransformOperation, TransformResult,
};
