//! PDF page text extraction using lopdf and pdf-extract.

use lopdf::Document;
use std::panic::{AssertUnwindSafe, catch_unwind};
use tracing::{debug, trace};

use super::{PdfProcessor, Result};
use crate::error::PdfError;

/// PDF text extractor.
///
/// The whole document is parsed once in [`PdfProcessor::load`]; page text is
/// then served from memory.
pub struct PdfExtractor {
    document: Option<Document>,
    pages: Vec<String>,
    try_empty_password: bool,
}

impl PdfExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            pages: Vec::new(),
            try_empty_password: true,
        }
    }

    /// Set whether PDFs encrypted with an empty user password are decrypted.
    pub fn with_empty_password(mut self, enabled: bool) -> Self {
        self.try_empty_password = enabled;
        self
    }

    /// Bytes pdf-extract should read: the input itself, or a re-saved copy
    /// once an empty user password has opened an encrypted document.
    fn text_source(&self, doc: &mut Document, data: &[u8]) -> Result<Vec<u8>> {
        if !doc.is_encrypted() {
            return Ok(data.to_vec());
        }

        if !self.try_empty_password || doc.decrypt("").is_err() {
            return Err(PdfError::Encrypted);
        }
        debug!("Decrypted PDF with empty password");

        let mut decrypted_data = Vec::new();
        doc.save_to(&mut decrypted_data)
            .map_err(|e| PdfError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
        Ok(decrypted_data)
    }

    fn extract_pages(data: &[u8]) -> Result<Vec<String>> {
        // pdf-extract can panic on malformed content streams
        match catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(data)
        })) {
            Ok(Ok(pages)) => Ok(pages),
            Ok(Err(e)) => Err(PdfError::TextExtraction(e.to_string())),
            Err(_) => Err(PdfError::TextExtraction(
                "text extractor panicked".to_string(),
            )),
        }
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| PdfError::Parse(e.to_string()))?;
        let text_source = self.text_source(&mut doc, data)?;

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(PdfError::NoPages);
        }

        let pages = Self::extract_pages(&text_source)?;
        trace!(
            "Extracted {} chars of text",
            pages.iter().map(String::len).sum::<usize>()
        );

        debug!("Loaded PDF with {} pages", page_count);
        self.pages = pages;
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        if page == 0 || page > self.page_count() {
            return Err(PdfError::InvalidPage(page));
        }

        Ok(self
            .pages
            .get((page - 1) as usize)
            .cloned()
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Object, Stream, dictionary};

    /// Build a PDF with one text line per entry of `pages`.
    fn build_pdf(pages: &[&str]) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 8.into()]),
                    Operation::new("Td", vec![20.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let count = kids.len() as i64;
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).unwrap();
        bytes
    }

    #[test]
    fn test_load_reads_text_per_page() {
        let data = build_pdf(&[
            "1.234,56 10/2024 000123 111.222.333-44 202410 998877 12 JOAO DA SILVA",
            "Total da guia",
        ]);
        let mut extractor = PdfExtractor::new();
        extractor.load(&data).unwrap();

        assert_eq!(extractor.page_count(), 2);
        assert!(extractor.extract_page_text(1).unwrap().contains("111.222.333-44"));
        assert!(extractor.extract_page_text(2).unwrap().contains("Total da guia"));
        assert!(matches!(
            extractor.extract_page_text(3),
            Err(PdfError::InvalidPage(3))
        ));
    }

    #[test]
    fn test_run_pdf_extracts_records_in_page_order() {
        use crate::driver::{Extraction, PageDriver};
        use crate::guide::rules::AmountFormat;
        use crate::models::config::PdfConfig;
        use crate::{aggregate, normalize};
        use rust_decimal::Decimal;

        let data = build_pdf(&[
            "1.234,56 10/2024 000123 111.222.333-44 202410 998877 12 JOAO DA SILVA PEREIRA",
            "10,00 11/2024 000123 111.222.333-44 202411 998878 104 JOAO DA SILVA PEREIRA",
        ]);
        let extraction = PageDriver::new()
            .run_pdf(&data, &PdfConfig::default(), None)
            .unwrap();
        let Extraction::Records(records) = extraction else {
            panic!("expected records");
        };

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].valor, "1.234,56");
        assert_eq!(records[0].matricula, "000123");
        assert_eq!(records[0].contrato, "998877");
        assert_eq!(records[0].nome, "JOAO DA SILVA PEREIRA");
        assert_eq!(records[1].instituicao, "104");

        let table = normalize(&records);
        assert_eq!(table.rows[0].instituicao, "012");

        let stats = aggregate(&table, AmountFormat::Brazilian).unwrap();
        assert_eq!(stats.unique_workers, 1);
        assert_eq!(stats.unique_institutions, 2);
        assert_eq!(stats.total_value, Decimal::new(124456, 2));
    }

    #[test]
    fn test_run_pdf_without_record_lines_is_empty() {
        use crate::driver::{Extraction, PageDriver};
        use crate::models::config::PdfConfig;

        let data = build_pdf(&["Detalhe da Guia Emitida"]);
        let extraction = PageDriver::new()
            .run_pdf(&data, &PdfConfig::default(), None)
            .unwrap();

        assert_eq!(extraction, Extraction::Empty { pages: 1 });
    }

    /// Mark an in-memory document as encrypted with a handler no password opens.
    fn lock(doc: &mut Document) {
        let encrypt_id = doc.add_object(dictionary! {
            "Filter" => "Standard",
            "V" => 99,
            "R" => 99,
        });
        doc.trailer.set("Encrypt", encrypt_id);
    }

    #[test]
    fn test_plain_document_is_read_as_is() {
        let data = build_pdf(&["x"]);
        let mut doc = Document::load_mem(&data).unwrap();

        let source = PdfExtractor::new().text_source(&mut doc, &data).unwrap();
        assert_eq!(source, data);
    }

    #[test]
    fn test_encrypted_document_without_empty_password_is_rejected() {
        let data = build_pdf(&["x"]);
        let mut doc = Document::load_mem(&data).unwrap();
        lock(&mut doc);
        assert!(doc.is_encrypted());

        let disabled = PdfExtractor::new().with_empty_password(false);
        assert!(matches!(
            disabled.text_source(&mut doc, &data),
            Err(PdfError::Encrypted)
        ));

        let enabled = PdfExtractor::new();
        assert!(matches!(
            enabled.text_source(&mut doc, &data),
            Err(PdfError::Encrypted)
        ));
    }

    #[test]
    fn test_pdf_extractor_new() {
        let extractor = PdfExtractor::new();
        assert!(extractor.document.is_none());
        assert_eq!(extractor.page_count(), 0);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let mut extractor = PdfExtractor::new();
        let err = extractor.load(b"not a pdf at all").unwrap_err();
        assert!(matches!(err, PdfError::Parse(_)));
        assert_eq!(extractor.page_count(), 0);
    }

    #[test]
    fn test_invalid_page_numbers() {
        let extractor = PdfExtractor::new();
        assert!(matches!(
            extractor.extract_page_text(0),
            Err(PdfError::InvalidPage(0))
        ));
        assert!(matches!(
            extractor.extract_page_text(1),
            Err(PdfError::InvalidPage(1))
        ));
    }
}
