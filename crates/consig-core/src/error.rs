//! Error types for the consig-core library.

use thiserror::Error;

/// Main error type for the consig library.
#[derive(Error, Debug)]
pub enum ConsigError {
    /// PDF processing error.
    #[error("PDF error: {0}")]
    Pdf(#[from] PdfError),

    /// Statistics could not be computed over the extracted rows.
    #[error("aggregation error: {0}")]
    Aggregation(#[from] AggregationError),

    /// Output serialization error.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to PDF processing.
#[derive(Error, Debug)]
pub enum PdfError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Invalid page number requested.
    #[error("invalid page number: {0}")]
    InvalidPage(u32),
}

/// Errors raised while reducing rows to summary statistics.
#[derive(Error, Debug)]
pub enum AggregationError {
    /// A monetary value could not be read as a number.
    #[error("invalid amount {value:?} in row {row}")]
    InvalidAmount { row: usize, value: String },
}

/// Errors related to writing the output table.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Writing the workbook archive failed.
    #[error("failed to write workbook: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Writing sheet XML failed.
    #[error("failed to write sheet XML: {0}")]
    Xml(String),

    /// Writing CSV failed.
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Writing JSON failed.
    #[error("failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Underlying buffer I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for the consig library.
pub type Result<T> = std::result::Result<T, ConsigError>;
