//! Configuration structures for the conversion pipeline.

use serde::{Deserialize, Serialize};

use crate::error::{ConsigError, Result};
use crate::guide::rules::AmountFormat;

/// Main configuration for the consig pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsigConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Record extraction configuration.
    pub extraction: ExtractionConfig,

    /// Output configuration.
    pub export: ExportConfig,
}

/// PDF processing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Decrypt PDFs protected with an empty user password.
    pub try_empty_password: bool,

    /// Maximum pages to process (0 = unlimited).
    pub max_pages: usize,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            try_empty_password: true,
            max_pages: 0,
        }
    }
}

/// Record extraction configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// How monetary values are read when totals are computed.
    pub amount_format: AmountFormat,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Worksheet name in generated workbooks.
    pub sheet_name: String,

    /// Prefix for generated output file names.
    pub file_prefix: String,

    /// Number of rows shown in previews.
    pub preview_rows: usize,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            sheet_name: "Trabalhadores".to_string(),
            file_prefix: "FGTS_Trabalhadores".to_string(),
            preview_rows: 20,
        }
    }
}

impl ConsigConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| ConsigError::Config(format!("{}: {}", path.display(), e)))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> std::io::Result<()> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
