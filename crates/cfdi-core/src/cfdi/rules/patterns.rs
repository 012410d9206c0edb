//! Regex patterns for CFDI field extraction.

use lazy_static::lazy_static;
use regex::Regex;

/// Substring that switches code extraction to the donation rule.
pub const DONATION_TRIGGER: &str = "Donativo -";

lazy_static! {
    // Issue date prefix: YYYY-MM-DD, nothing else
    pub static ref ISO_DATE: Regex = Regex::new(
        r"^\d{4}-\d{2}-\d{2}$"
    ).unwrap();

    // "Donativo - 99.00.100"
    pub static ref DONATION_CODE: Regex = Regex::new(
        r"Donativo - (\d{2}\.\d{2}\.\d{3})"
    ).unwrap();

    // Bare code anywhere in the text
    pub static ref BARE_CODE: Regex = Regex::new(
        r"(\d{2}\.\d{2}\.\d{3})"
    ).unwrap();
}
