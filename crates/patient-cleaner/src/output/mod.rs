//! Writing cleaned tables.

mod writer;

pub use writer::{default_output_path, write_table, write_table_to, OutputFormat};
