//! Common regex patterns for guide line extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // CPF (Brazilian individual taxpayer ID), punctuated form only
    pub static ref CPF_PATTERN: Regex = Regex::new(
        r"\d{3}\.\d{3}\.\d{3}-\d{2}"
    ).unwrap();
}
