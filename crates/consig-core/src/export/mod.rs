//! Serialization of the normalized table.

mod csv;
mod json;
mod xlsx;

pub use self::csv::CsvWriter;
pub use self::json::JsonWriter;
pub use self::xlsx::XlsxWriter;

use crate::error::ExportError;
use crate::models::record::NormalizedTable;

/// Trait for tabular output formats.
///
/// Writers emit the fixed header row followed by one row per record.
pub trait TableWriter {
    /// Serialize the table to bytes.
    fn write(&self, table: &NormalizedTable) -> Result<Vec<u8>, ExportError>;

    /// File extension for this format, without the dot.
    fn extension(&self) -> &'static str;
}
