//! Summary statistics over the normalized table.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::AggregationError;
use crate::guide::rules::{AmountFormat, parse_amount};
use crate::models::record::NormalizedTable;

/// Totals shown after a conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    /// Distinct CPF strings.
    pub unique_workers: usize,
    /// Number of rows (loans).
    pub total_records: usize,
    /// Sum of all deducted amounts.
    pub total_value: Decimal,
    /// Distinct institution codes after padding.
    pub unique_institutions: usize,
}

/// Reduce a table to its summary statistics.
///
/// Fails on the first amount that cannot be parsed under `format`.
pub fn aggregate(
    table: &NormalizedTable,
    format: AmountFormat,
) -> Result<SummaryStatistics, AggregationError> {
    let mut cpfs = HashSet::new();
    let mut institutions = HashSet::new();
    let mut total_value = Decimal::ZERO;

    for row in &table.rows {
        let value = parse_amount(&row.valor, format).ok_or_else(|| {
            AggregationError::InvalidAmount {
                row: row.qt,
                value: row.valor.clone(),
            }
        })?;

        total_value += value;
        cpfs.insert(row.cpf.as_str());
        institutions.insert(row.instituicao.as_str());
    }

    Ok(SummaryStatistics {
        unique_workers: cpfs.len(),
        total_records: table.len(),
        total_value,
        unique_institutions: institutions.len(),
    })
}
