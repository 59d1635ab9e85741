//! CPF anchor location within a guide line.
//!
//! Every record line carries exactly one worker CPF between the payment
//! columns and the contract columns, so the CPF is used as the split point.

use super::patterns::CPF_PATTERN;
use super::{ExtractionMatch, FieldExtractor};

/// CPF field extractor.
pub struct CpfExtractor;

impl CpfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CpfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CpfExtractor {
    type Output = ExtractionMatch<String>;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        CPF_PATTERN
            .find(text)
            .map(|m| ExtractionMatch::new(m.as_str().to_string(), m.start(), m.end()))
    }
}

/// A line split around its first CPF.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorMatch<'a> {
    /// The CPF text.
    pub cpf: &'a str,
    /// Byte offset of the CPF in the line.
    pub offset: usize,
    /// Text strictly before the CPF.
    pub before: &'a str,
    /// Text strictly after the CPF.
    pub after: &'a str,
}

/// Locate the first CPF in `line` and split the line around it.
///
/// Returns `None` when the line has no CPF. Later CPF-shaped substrings stay
/// inside `after`.
pub fn locate_anchor(line: &str) -> Option<AnchorMatch<'_>> {
    let m = CpfExtractor::new().extract(line)?;

    Some(AnchorMatch {
        cpf: &line[m.start..m.end],
        offset: m.start,
        before: &line[..m.start],
        after: &line[m.end..],
    })
}
