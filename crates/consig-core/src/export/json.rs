//! JSON writer.

use serde::Serialize;

use super::TableWriter;
use crate::error::ExportError;
use crate::models::record::{HEADERS, NormalizedRow, NormalizedTable};
use crate::stats::SummaryStatistics;

/// JSON writer; optionally embeds summary statistics.
#[derive(Debug, Clone, Default)]
pub struct JsonWriter {
    statistics: Option<SummaryStatistics>,
    pretty: bool,
}

#[derive(Serialize)]
struct JsonDocument<'a> {
    headers: &'a [&'a str],
    rows: &'a [NormalizedRow],
    #[serde(skip_serializing_if = "Option::is_none")]
    statistics: Option<&'a SummaryStatistics>,
}

impl JsonWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Include statistics in the document.
    pub fn with_statistics(mut self, statistics: SummaryStatistics) -> Self {
        self.statistics = Some(statistics);
        self
    }

    /// Indent output.
    pub fn pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }
}

impl TableWriter for JsonWriter {
    fn write(&self, table: &NormalizedTable) -> Result<Vec<u8>, ExportError> {
        let document = JsonDocument {
            headers: &HEADERS,
            rows: &table.rows,
            statistics: self.statistics.as_ref(),
        };

        let bytes = if self.pretty {
            serde_json::to_vec_pretty(&document)?
        } else {
            serde_json::to_vec(&document)?
        };
        Ok(bytes)
    }

    fn extension(&self) -> &'static str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_json_document_shape() {
        let table = NormalizedTable {
            rows: vec![NormalizedRow {
                qt: 1,
                comp_apuracao: "202410".to_string(),
                vencimento: "10/2024".to_string(),
                nome: "ANA".to_string(),
                matricula: "007".to_string(),
                cpf: "111.222.333-44".to_string(),
                contrato: "1".to_string(),
                instituicao: "001".to_string(),
                valor: "10,00".to_string(),
            }],
        };
        let stats = SummaryStatistics {
            unique_workers: 1,
            total_records: 1,
            total_value: Decimal::new(1000, 2),
            unique_institutions: 1,
        };

        let bytes = JsonWriter::new().with_statistics(stats).write(&table).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["headers"][4], "Matrícula");
        assert_eq!(value["rows"][0]["matricula"], "007");
        assert_eq!(value["rows"][0]["qt"], 1);
        assert_eq!(value["statistics"]["unique_workers"], 1);
    }

    #[test]
    fn test_statistics_omitted_by_default() {
        let bytes = JsonWriter::new().write(&NormalizedTable::default()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert!(value.get("statistics").is_none());
        assert_eq!(value["rows"].as_array().unwrap().len(), 0);
    }
}
