//! Rule-based field extractors for consigned loan guides.

pub mod amounts;
pub mod cpf;
pub mod institution;
pub mod patterns;

pub use amounts::{AmountFormat, format_brl_amount, parse_amount};
pub use cpf::{AnchorMatch, CpfExtractor, locate_anchor};
pub use institution::pad_institution;
pub use patterns::*;

/// Trait for field extractors.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the first occurrence of the field.
    fn extract(&self, text: &str) -> Option<Self::Output>;
}

/// A matched value with its byte span in the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Start offset in source text.
    pub start: usize,
    /// End offset in source text (exclusive).
    pub end: usize,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, start: usize, end: usize) -> Self {
        Self { value, start, end }
    }
}
