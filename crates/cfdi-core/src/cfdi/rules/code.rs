//! Classification code extraction from concept descriptions.
//!
//! Two rules are tried in order. The first rule whose trigger applies is the
//! only one evaluated: if its pattern then fails, no code is produced, even
//! if a later rule would have matched.

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::FieldExtractor;
use super::patterns::{BARE_CODE, DONATION_CODE, DONATION_TRIGGER};

/// Which rule produced a code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CodeRule {
    /// `Donativo - DD.DD.DDD`.
    Donation,
    /// `DD.DD.DDD` anywhere in the text.
    Bare,
}

impl std::fmt::Display for CodeRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodeRule::Donation => write!(f, "donation"),
            CodeRule::Bare => write!(f, "bare"),
        }
    }
}

/// A rule: when `applies` holds for the text, `pattern`'s first capture
/// group is the code.
struct Rule {
    kind: CodeRule,
    applies: fn(&str) -> bool,
    pattern: &'static Regex,
}

fn has_donation_trigger(text: &str) -> bool {
    text.contains(DONATION_TRIGGER)
}

fn has_digit(text: &str) -> bool {
    text.chars().any(char::is_numeric)
}

fn rules() -> [Rule; 2] {
    [
        Rule {
            kind: CodeRule::Donation,
            applies: has_donation_trigger,
            pattern: &DONATION_CODE,
        },
        Rule {
            kind: CodeRule::Bare,
            applies: has_digit,
            pattern: &BARE_CODE,
        },
    ]
}

/// A code found in a description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeMatch {
    /// The `DD.DD.DDD` code.
    pub code: String,
    /// Rule that matched.
    pub rule: CodeRule,
}

/// Extracts `DD.DD.DDD` classification codes.
pub struct CodeExtractor;

impl CodeExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for CodeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor for CodeExtractor {
    type Output = CodeMatch;

    fn extract(&self, text: &str) -> Option<Self::Output> {
        let rule = rules().into_iter().find(|rule| (rule.applies)(text))?;

        let caps = rule.pattern.captures(text)?;
        let code = caps.get(1)?;

        Some(CodeMatch {
            code: code.as_str().to_string(),
            rule: rule.kind,
        })
    }
}

/// Extract the code from a description, if any rule yields one.
pub fn extract_code(description: &str) -> Option<String> {
    CodeExtractor::new().extract(description).map(|m| m.code)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_donation_code() {
        let result = CodeExtractor::new().extract("Donativo - 99.00.100").unwrap();

        assert_eq!(result.code, "99.00.100");
        assert_eq!(result.rule, CodeRule::Donation);
    }

    #[test]
    fn test_donation_code_wins_over_earlier_bare_code() {
        assert_eq!(
            extract_code("Folio 11.22.333 Donativo - 12.34.567"),
            Some("12.34.567".to_string())
        );
    }

    #[test]
    fn test_bare_code() {
        let result = CodeExtractor::new()
            .extract("Aportacion proyecto 12.34.567 anual")
            .unwrap();

        assert_eq!(result.code, "12.34.567");
        assert_eq!(result.rule, CodeRule::Bare);
    }

    #[test]
    fn test_trigger_without_pattern_does_not_fall_back() {
        // The trigger is present, so the bare rule is never consulted.
        assert_eq!(extract_code("Donativo - sin folio 12.34.567"), None);
        assert_eq!(extract_code("Donativo - 1.2.3"), None);
    }

    #[test]
    fn test_trigger_requires_exact_spacing() {
        // "Donativo-" is not the trigger, so the bare rule applies.
        assert_eq!(
            extract_code("Donativo-12.34.567"),
            Some("12.34.567".to_string())
        );
    }

    #[test]
    fn test_no_digits() {
        assert_eq!(extract_code("Servicio de consultoria"), None);
        assert_eq!(extract_code(""), None);
    }

    #[test]
    fn test_digits_without_code_shape() {
        assert_eq!(extract_code("Factura 2024 pago 1 de 3"), None);
        assert_eq!(extract_code("1.23.456"), None);
    }

    #[test]
    fn test_first_bare_code_is_taken() {
        assert_eq!(
            extract_code("12.34.567 y 76.54.321"),
            Some("12.34.567".to_string())
        );
    }
}
