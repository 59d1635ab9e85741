//! Core library for consigned loan guide processing.
//!
//! This crate provides:
//! - PDF text extraction per page
//! - Loan deduction record extraction anchored on the worker CPF
//! - Normalization of records into the fixed output table
//! - Summary statistics and spreadsheet/CSV/JSON export

pub mod driver;
pub mod error;
pub mod export;
pub mod guide;
pub mod models;
pub mod normalize;
pub mod pdf;
pub mod stats;

pub use driver::{Extraction, PageDriver, ProgressObserver};
pub use error::{AggregationError, ConsigError, ExportError, PdfError, Result};
pub use export::{CsvWriter, JsonWriter, TableWriter, XlsxWriter};
pub use guide::{GuideParser, LineParser};
pub use models::config::ConsigConfig;
pub use models::record::{LoanDeductionRecord, NormalizedRow, NormalizedTable, HEADERS};
pub use normalize::normalize;
pub use pdf::{PdfExtractor, PdfProcessor};
pub use stats::{SummaryStatistics, aggregate};
