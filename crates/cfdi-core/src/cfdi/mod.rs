//! CFDI classification key extraction.

pub mod rules;

use tracing::trace;

use crate::document::{Document, Element};
use crate::models::config::{CFDI_V4_NAMESPACE, ExtractionConfig};
use crate::models::key::ClassificationKey;

use self::rules::{CodeExtractor, CodeMatch, FieldExtractor, date_folder};

/// Root attribute holding the issue timestamp.
pub const DATE_ATTRIBUTE: &str = "Fecha";

/// Root attribute holding the invoice series.
pub const SERIES_ATTRIBUTE: &str = "Serie";

/// Line item element name.
pub const CONCEPT_ELEMENT: &str = "Concepto";

/// Line item description attribute.
pub const DESCRIPTION_ATTRIBUTE: &str = "Descripcion";

/// Trait for deriving a classification key from a parsed document.
pub trait KeyExtractor {
    /// Derive the key. Never fails: missing fields become sentinels.
    fn extract_key(&self, document: &Document) -> ClassificationKey;
}

/// Full extraction detail for one document.
#[derive(Debug, Clone)]
pub struct Classification {
    /// The derived key.
    pub key: ClassificationKey,
    /// Description the code was looked for in.
    pub description: Option<String>,
    /// How the code was found, if it was.
    pub code: Option<CodeMatch>,
}

/// Extractor for CFDI `Comprobante` documents.
pub struct ComprobanteExtractor {
    /// Namespace URI of the concept elements.
    namespace: String,
    code_extractor: CodeExtractor,
}

impl ComprobanteExtractor {
    /// Create an extractor for CFDI 4.0.
    pub fn new() -> Self {
        Self {
            namespace: CFDI_V4_NAMESPACE.to_string(),
            code_extractor: CodeExtractor::new(),
        }
    }

    /// Create an extractor from configuration.
    pub fn from_config(config: &ExtractionConfig) -> Self {
        Self::new().with_namespace(config.namespace.clone())
    }

    /// Set the namespace concept elements must belong to.
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    /// Description of the first concept that has a non-empty one.
    /// Later concepts are never consulted.
    pub fn first_description<'a>(&self, root: &'a Element) -> Option<&'a str> {
        root.find_all(&self.namespace, CONCEPT_ELEMENT)
            .filter_map(|concept| concept.attribute(DESCRIPTION_ATTRIBUTE))
            .find(|description| !description.is_empty())
    }

    /// Derive the key along with the details of how it was found.
    pub fn classify(&self, document: &Document) -> Classification {
        let root = &document.root;

        let date = date_folder(root.attribute(DATE_ATTRIBUTE));
        let series = root.attribute(SERIES_ATTRIBUTE).map(str::to_string);
        let description = self.first_description(root);
        let code = description.and_then(|d| self.code_extractor.extract(d));

        trace!(
            "Extracted date={:?} series={:?} code={:?}",
            date,
            series,
            code.as_ref().map(|c| &c.code)
        );

        Classification {
            key: ClassificationKey::new(date, series, code.as_ref().map(|c| c.code.clone())),
            description: description.map(str::to_string),
            code,
        }
    }
}

impl Default for ComprobanteExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyExtractor for ComprobanteExtractor {
    fn extract_key(&self, document: &Document) -> ClassificationKey {
        self.classify(document).key
    }
}
