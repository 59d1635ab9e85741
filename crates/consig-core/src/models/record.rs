//! Loan deduction records and the normalized output table.

use serde::{Deserialize, Serialize};

/// Output column labels, in the order downstream consumers expect.
pub const HEADERS: [&str; 9] = [
    "Qt",
    "Comp. Apuração",
    "Vencimento",
    "Nome Trabalhador",
    "Matrícula",
    "CPF",
    "Número do Contrato",
    "Instituição Financeira",
    "Valor Consignado na Guia",
];

/// One payroll loan deduction, assembled from a single line of guide text.
///
/// All fields are kept as the source text. Numeric-looking identifiers such
/// as `matricula` and `instituicao` carry significant leading zeros.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanDeductionRecord {
    /// Assessment period (competência de apuração).
    pub comp_apuracao: String,

    /// Due date of the guide installment.
    pub vencimento: String,

    /// Worker name, internal spacing preserved.
    pub nome: String,

    /// Worker registration number.
    pub matricula: String,

    /// Worker CPF in `DDD.DDD.DDD-DD` form.
    pub cpf: String,

    /// Loan contract number.
    pub contrato: String,

    /// Financial institution code.
    pub instituicao: String,

    /// Deducted amount, comma-decimal text.
    pub valor: String,
}

/// A record formatted for tabular output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRow {
    /// 1-based sequence number.
    pub qt: usize,
    pub comp_apuracao: String,
    pub vencimento: String,
    pub nome: String,
    pub matricula: String,
    pub cpf: String,
    pub contrato: String,
    pub instituicao: String,
    pub valor: String,
}

impl NormalizedRow {
    /// Cell text in [`HEADERS`] order.
    pub fn cells(&self) -> [String; 9] {
        [
            self.qt.to_string(),
            self.comp_apuracao.clone(),
            self.vencimento.clone(),
            self.nome.clone(),
            self.matricula.clone(),
            self.cpf.clone(),
            self.contrato.clone(),
            self.instituicao.clone(),
            self.valor.clone(),
        ]
    }
}

/// Ordered output rows with contiguous sequence numbers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedTable {
    pub rows: Vec<NormalizedRow>,
}

impl NormalizedTable {
    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// First `n` rows, for previews.
    pub fn head(&self, n: usize) -> &[NormalizedRow] {
        &self.rows[..n.min(self.rows.len())]
    }
}
