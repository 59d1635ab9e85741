//! Page-by-page record extraction over a loaded document.

use tracing::{debug, info};

use crate::error::Result;
use crate::guide::{GuideParser, LineParser};
use crate::models::config::PdfConfig;
use crate::models::record::LoanDeductionRecord;
use crate::pdf::{PdfExtractor, PdfProcessor};

/// Receives progress after each processed page.
pub trait ProgressObserver {
    /// `fraction` is in `[0, 1]`; `status` includes the running record count.
    fn on_page(&mut self, fraction: f32, status: &str);
}

impl<F: FnMut(f32, &str)> ProgressObserver for F {
    fn on_page(&mut self, fraction: f32, status: &str) {
        self(fraction, status)
    }
}

/// Outcome of a structurally successful extraction run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Records in page order, then line order within a page.
    Records(Vec<LoanDeductionRecord>),
    /// The document was readable but no line produced a record.
    Empty { pages: u32 },
}

/// Drives a [`LineParser`] across every page of a document.
#[derive(Debug, Clone)]
pub struct PageDriver<P = GuideParser> {
    parser: P,
    max_pages: usize,
}

impl PageDriver<GuideParser> {
    /// Create a driver using the guide line layout.
    pub fn new() -> Self {
        Self::with_parser(GuideParser::new())
    }
}

impl Default for PageDriver<GuideParser> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: LineParser> PageDriver<P> {
    /// Create a driver with a custom line parser.
    pub fn with_parser(parser: P) -> Self {
        Self {
            parser,
            max_pages: 0,
        }
    }

    /// Limit the number of pages read (0 = unlimited).
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Extract records from an already loaded document.
    pub fn run(
        &self,
        source: &dyn PdfProcessor,
        mut observer: Option<&mut dyn ProgressObserver>,
    ) -> Result<Extraction> {
        let mut total_pages = source.page_count();
        if self.max_pages > 0 {
            total_pages = total_pages.min(u32::try_from(self.max_pages).unwrap_or(u32::MAX));
        }

        let mut records = Vec::new();

        for page in 1..=total_pages {
            let text = source.extract_page_text(page)?;
            let found = self.parser.parse_page(&text);
            debug!("Page {}: {} records", page, found.len());
            records.extend(found);

            if let Some(observer) = observer.as_deref_mut() {
                let status = format!(
                    "Processing page {} of {}... ({} loans)",
                    page,
                    total_pages,
                    records.len()
                );
                observer.on_page(page as f32 / total_pages as f32, &status);
            }
        }

        info!("Extracted {} records from {} pages", records.len(), total_pages);

        if records.is_empty() {
            Ok(Extraction::Empty { pages: total_pages })
        } else {
            Ok(Extraction::Records(records))
        }
    }

    /// Load a PDF from bytes and extract its records.
    pub fn run_pdf(
        &self,
        data: &[u8],
        config: &PdfConfig,
        observer: Option<&mut dyn ProgressObserver>,
    ) -> Result<Extraction> {
        let mut extractor = PdfExtractor::new().with_empty_password(config.try_empty_password);
        extractor.load(data)?;
        self.run(&extractor, observer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConsigError, PdfError};
    use pretty_assertions::assert_eq;

    /// In-memory document with fixed page text.
    struct TextPages(Vec<&'static str>);

    impl PdfProcessor for TextPages {
        fn load(&mut self, _data: &[u8]) -> crate::pdf::Result<()> {
            Ok(())
        }

        fn page_count(&self) -> u32 {
            self.0.len() as u32
        }

        fn extract_page_text(&self, page: u32) -> crate::pdf::Result<String> {
            self.0
                .get(page as usize - 1)
                .map(|s| s.to_string())
                .ok_or(PdfError::InvalidPage(page))
        }
    }

    fn records(extraction: Extraction) -> Vec<LoanDeductionRecord> {
        match extraction {
            Extraction::Records(records) => records,
            Extraction::Empty { pages } => panic!("no records in {} pages", pages),
        }
    }

    fn guide() -> TextPages {
        TextPages(vec![
            "Detalhe da Guia Emitida\n\
             10,00 10/2024 1 111.111.111-11 202410 1 1 ANA\n\
             20,00 10/2024 2 222.222.222-22 202410 2 2 BRUNO",
            "Página sem registros",
            "30,00 10/2024 3 333.333.333-33 202410 3 3 CARLA\n\
             Total 60,00",
        ])
    }

    #[test]
    fn test_records_keep_page_then_line_order() {
        let records = records(PageDriver::new().run(&guide(), None).unwrap());
        let names: Vec<&str> = records.iter().map(|r| r.nome.as_str()).collect();

        assert_eq!(names, vec!["ANA", "BRUNO", "CARLA"]);
    }

    #[test]
    fn test_progress_reported_per_page() {
        let mut seen: Vec<(f32, String)> = Vec::new();
        let mut observer = |fraction: f32, status: &str| seen.push((fraction, status.to_string()));

        PageDriver::new().run(&guide(), Some(&mut observer)).unwrap();

        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0].1, "Processing page 1 of 3... (2 loans)");
        assert_eq!(seen[1].1, "Processing page 2 of 3... (2 loans)");
        assert_eq!(seen[2].0, 1.0);
        assert!(seen.windows(2).all(|w| w[0].0 <= w[1].0));
    }

    #[test]
    fn test_observer_does_not_change_result() {
        let driver = PageDriver::new();
        let mut observer = |_: f32, _: &str| {};

        let with = driver.run(&guide(), Some(&mut observer)).unwrap();
        let without = driver.run(&guide(), None).unwrap();
        assert_eq!(with, without);
    }

    #[test]
    fn test_no_matching_lines_is_empty_not_error() {
        let doc = TextPages(vec!["cabeçalho", "rodapé"]);
        let extraction = PageDriver::new().run(&doc, None).unwrap();

        assert_eq!(extraction, Extraction::Empty { pages: 2 });
    }

    #[test]
    fn test_max_pages_limits_reading() {
        let extraction = PageDriver::new().with_max_pages(1).run(&guide(), None).unwrap();
        assert_eq!(records(extraction).len(), 2);
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn test_max_pages_beyond_u32_reads_every_page() {
        let extraction = PageDriver::new()
            .with_max_pages(1usize << 32)
            .run(&guide(), None)
            .unwrap();
        assert_eq!(records(extraction).len(), 3);
    }

    #[test]
    fn test_unreadable_pdf_is_terminal() {
        let err = PageDriver::new()
            .run_pdf(b"%PDF-broken", &PdfConfig::default(), None)
            .unwrap_err();
        assert!(matches!(err, ConsigError::Pdf(_)));
    }
}
