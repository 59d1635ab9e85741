//! Formatting of assembled records into the output table.

use crate::guide::rules::pad_institution;
use crate::models::record::{LoanDeductionRecord, NormalizedRow, NormalizedTable};

/// Number and format records for tabular output.
///
/// Sequence numbers run `1..=N` in emission order. Institution codes are
/// zero-padded; every other field is copied as text.
pub fn normalize(records: &[LoanDeductionRecord]) -> NormalizedTable {
    let rows = records
        .iter()
        .enumerate()
        .map(|(i, record)| NormalizedRow {
            qt: i + 1,
            comp_apuracao: record.comp_apuracao.clone(),
            vencimento: record.vencimento.clone(),
            nome: record.nome.clone(),
            matricula: record.matricula.clone(),
            cpf: record.cpf.clone(),
            contrato: record.contrato.clone(),
            instituicao: pad_institution(&record.instituicao),
            valor: record.valor.clone(),
        })
        .collect();

    NormalizedTable { rows }
}
