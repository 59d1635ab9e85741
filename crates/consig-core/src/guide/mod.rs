//! Loan deduction extraction from guide text.

mod parser;
pub mod rules;

pub use parser::GuideParser;

use crate::models::record::LoanDeductionRecord;

/// Trait for line-oriented record parsers.
pub trait LineParser {
    /// Assemble a record from one line, or `None` when the line is not a record.
    fn parse_line(&self, line: &str) -> Option<LoanDeductionRecord>;

    /// Parse every line of a page, in source order.
    fn parse_page(&self, text: &str) -> Vec<LoanDeductionRecord> {
        text.lines().filter_map(|line| self.parse_line(line)).collect()
    }
}
