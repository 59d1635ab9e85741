//! Monetary value parsing for guide amounts (e.g. `1.234,56`).

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How comma-decimal amounts are turned into numbers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountFormat {
    /// Dots are thousands separators and the comma is the decimal mark.
    #[default]
    Brazilian,
    /// Only the comma is swapped for a period; `1.234,56` does not parse.
    Literal,
}

/// Parse a guide amount according to `format`.
pub fn parse_amount(s: &str, format: AmountFormat) -> Option<Decimal> {
    let s = s.trim();

    let normalized = match format {
        AmountFormat::Literal => s.replace(',', "."),
        AmountFormat::Brazilian if s.contains(',') => s.replace('.', "").replace(',', "."),
        AmountFormat::Brazilian => s.to_string(),
    };

    Decimal::from_str(&normalized).ok()
}

/// Format an amount as Brazilian currency (R$ 1.234,56).
pub fn format_brl_amount(amount: Decimal) -> String {
    let s = format!("{:.2}", amount.abs());
    let Some((integer_part, decimal_part)) = s.split_once('.') else {
        return format!("R$ {}", s);
    };

    // Add thousand separators
    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(*c);
    }

    let sign = if amount.is_sign_negative() && !amount.is_zero() { "-" } else { "" };
    format!("{}R$ {},{}", sign, formatted, decimal_part)
}
