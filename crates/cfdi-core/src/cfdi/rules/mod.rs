//! Rule-based field extractors for CFDI documents.

pub mod code;
pub mod dates;
pub mod patterns;

pub use code::{CodeExtractor, CodeMatch, CodeRule, extract_code};
pub use dates::{DateExtractor, date_folder};
pub use patterns::*;

/// Trait for field extractors working on a single attribute value.
pub trait FieldExtractor {
    /// The type of value this extractor produces.
    type Output;

    /// Extract the field from text.
    fn extract(&self, text: &str) -> Option<Self::Output>;
}

/// An extracted value together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionMatch<T> {
    /// Extracted value.
    pub value: T,
    /// Source text that was matched.
    pub source: String,
}

impl<T> ExtractionMatch<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            source: source.into(),
        }
    }
}
