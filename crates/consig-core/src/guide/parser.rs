//! Record assembly from guide lines.

use tracing::trace;

use super::LineParser;
use super::rules::locate_anchor;
use crate::models::record::LoanDeductionRecord;

/// Tokens required before the CPF: valor, vencimento, matricula.
const MIN_LEFT_TOKENS: usize = 3;

/// Pieces taken after the CPF: comp_apuracao, contrato, instituicao, nome.
const RIGHT_PIECES: usize = 4;

/// Parser for the worker listing of a consigned loan guide.
///
/// A record line reads, left to right:
/// `valor vencimento matricula CPF comp_apuracao contrato instituicao nome...`
#[derive(Debug, Clone, Copy, Default)]
pub struct GuideParser;

impl GuideParser {
    pub fn new() -> Self {
        Self
    }
}

impl LineParser for GuideParser {
    fn parse_line(&self, line: &str) -> Option<LoanDeductionRecord> {
        let line = line.trim();
        let anchor = locate_anchor(line)?;

        let left: Vec<&str> = anchor.before.split_whitespace().collect();
        if left.len() < MIN_LEFT_TOKENS {
            trace!("Skipping line with {} tokens before CPF", left.len());
            return None;
        }

        let right = split_whitespace_capped(anchor.after, RIGHT_PIECES);
        if right.len() < RIGHT_PIECES {
            trace!("Skipping line with {} pieces after CPF", right.len());
            return None;
        }

        Some(LoanDeductionRecord {
            comp_apuracao: right[0].to_string(),
            vencimento: left[1].to_string(),
            nome: right[3].to_string(),
            matricula: left[2].to_string(),
            cpf: anchor.cpf.to_string(),
            contrato: right[1].to_string(),
            instituicao: right[2].to_string(),
            valor: left[0].to_string(),
        })
    }
}

/// Split on whitespace runs into at most `max` pieces.
///
/// The last piece keeps the rest of the text verbatim, minus outer whitespace.
fn split_whitespace_capped(s: &str, max: usize) -> Vec<&str> {
    let mut pieces = Vec::with_capacity(max);
    let mut rest = s.trim();

    while !rest.is_empty() {
        if pieces.len() + 1 == max {
            pieces.push(rest);
            break;
        }

        match rest.find(char::is_whitespace) {
            Some(idx) => {
                pieces.push(&rest[..idx]);
                rest = rest[idx..].trim_start();
            }
            None => {
                pieces.push(rest);
                break;
            }
        }
    }

    pieces
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str =
        "1.234,56 10/2024 000123 111.222.333-44 202410 998877 12 JOAO DA SILVA PEREIRA";

    #[test]
    fn test_parse_sample_line() {
        let record = GuideParser::new().parse_line(SAMPLE).unwrap();

        assert_eq!(
            record,
            LoanDeductionRecord {
                comp_apuracao: "202410".to_string(),
                vencimento: "10/2024".to_string(),
                nome: "JOAO DA SILVA PEREIRA".to_string(),
                matricula: "000123".to_string(),
                cpf: "111.222.333-44".to_string(),
                contrato: "998877".to_string(),
                instituicao: "12".to_string(),
                valor: "1.234,56".to_string(),
            }
        );
    }

    #[test]
    fn test_line_without_cpf_is_skipped() {
        let parser = GuideParser::new();
        assert!(parser.parse_line("1.234,56 10/2024 000123 202410 998877 12 JOAO").is_none());
        assert!(parser.parse_line("Detalhe da Guia Emitida").is_none());
        assert!(parser.parse_line("   ").is_none());
    }

    #[test]
    fn test_too_few_left_tokens() {
        let line = "10/2024 000123 111.222.333-44 202410 998877 12 JOAO DA SILVA";
        assert!(GuideParser::new().parse_line(line).is_none());
    }

    #[test]
    fn test_too_few_right_pieces() {
        let line = "1.234,56 10/2024 000123 111.222.333-44 202410 998877 12";
        assert!(GuideParser::new().parse_line(line).is_none());
        let line = "1.234,56 10/2024 000123 111.222.333-44";
        assert!(GuideParser::new().parse_line(line).is_none());
    }

    #[test]
    fn test_extra_left_tokens_are_ignored() {
        let line = "50,00 01/2025 77 EXTRA TOKENS 111.222.333-44 202501 1 2 ANA";
        let record = GuideParser::new().parse_line(line).unwrap();

        assert_eq!(record.valor, "50,00");
        assert_eq!(record.vencimento, "01/2025");
        assert_eq!(record.matricula, "77");
    }

    #[test]
    fn test_name_keeps_internal_spacing() {
        let line = "  50,00 01/2025 77 111.222.333-44  202501\t1   2   ANA  DE   SOUZA  ";
        let record = GuideParser::new().parse_line(line).unwrap();

        assert_eq!(record.comp_apuracao, "202501");
        assert_eq!(record.contrato, "1");
        assert_eq!(record.instituicao, "2");
        assert_eq!(record.nome, "ANA  DE   SOUZA");
    }

    #[test]
    fn test_second_cpf_lands_in_name() {
        let line = "50,00 01/2025 77 111.222.333-44 202501 1 2 ANA 999.888.777-66";
        let record = GuideParser::new().parse_line(line).unwrap();

        assert_eq!(record.cpf, "111.222.333-44");
        assert_eq!(record.nome, "ANA 999.888.777-66");
    }

    #[test]
    fn test_parse_page_keeps_line_order() {
        let text = "Cabeçalho\n\
                    10,00 10/2024 1 111.111.111-11 202410 1 1 PRIMEIRO\n\
                    linha solta\n\
                    20,00 10/2024 2 222.222.222-22 202410 2 2 SEGUNDO\r\n";
        let records = GuideParser::new().parse_page(text);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].nome, "PRIMEIRO");
        assert_eq!(records[1].nome, "SEGUNDO");
    }

    #[test]
    fn test_split_whitespace_capped() {
        assert_eq!(split_whitespace_capped(" a  b c d e ", 4), vec!["a", "b", "c", "d e"]);
        assert_eq!(split_whitespace_capped("a b", 4), vec!["a", "b"]);
        assert!(split_whitespace_capped("   ", 4).is_empty());
    }
}
