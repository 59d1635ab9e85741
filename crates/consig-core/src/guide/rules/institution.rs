//! Financial institution code formatting.

/// Canonical width of short institution codes.
pub const INSTITUTION_CODE_WIDTH: usize = 3;

/// Zero-pad purely numeric codes of up to three digits (`1` -> `001`).
///
/// Longer or non-numeric identifiers are returned unchanged.
pub fn pad_institution(code: &str) -> String {
    let numeric = !code.is_empty() && code.chars().all(|c| c.is_ascii_digit());

    if numeric && code.len() <= INSTITUTION_CODE_WIDTH {
        format!("{:0>width$}", code, width = INSTITUTION_CODE_WIDTH)
    } else {
        code.to_string()
    }
}
