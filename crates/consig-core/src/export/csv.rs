//! CSV writer.

use super::TableWriter;
use crate::error::ExportError;
use crate::models::record::{HEADERS, NormalizedTable};

/// CSV writer with the spreadsheet header row.
#[derive(Debug, Clone)]
pub struct CsvWriter {
    delimiter: u8,
}

impl CsvWriter {
    pub fn new() -> Self {
        Self { delimiter: b',' }
    }

    /// Set the field delimiter (`;` is common for Brazilian spreadsheets).
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl TableWriter for CsvWriter {
    fn write(&self, table: &NormalizedTable) -> Result<Vec<u8>, ExportError> {
        let mut wtr = csv::WriterBuilder::new()
            .delimiter(self.delimiter)
            .from_writer(vec![]);

        wtr.write_record(HEADERS)?;
        for row in &table.rows {
            wtr.write_record(row.cells())?;
        }

        wtr.into_inner().map_err(|e| ExportError::Io(e.into_error()))
    }

    fn extension(&self) -> &'static str {
        "csv"
    }
}
