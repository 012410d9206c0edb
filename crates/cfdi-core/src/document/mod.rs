//! Namespace-aware XML document tree.

mod encoding;
mod parser;

pub use parser::parse_document;

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::ParseError;

/// A single element with its resolved namespace.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Namespace URI the element's prefix (or default namespace) resolves to.
    pub namespace: Option<String>,

    /// Local name without prefix.
    pub name: String,

    /// Attributes by qualified name, in source order. Namespace
    /// declarations are not included.
    pub attributes: Vec<(String, String)>,

    /// Child elements in document order.
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(name: impl Into<String>, namespace: Option<String>) -> Self {
        Self {
            namespace,
            name: name.into(),
            ..Default::default()
        }
    }

    /// Look up an attribute by its qualified name.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Whether this element is `{namespace}name`.
    pub fn is(&self, namespace: &str, name: &str) -> bool {
        self.name == name && self.namespace.as_deref() == Some(namespace)
    }

    /// All elements below this one, depth-first in document order.
    /// The element itself is not included.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: vec![self.children.iter()],
        }
    }

    /// Descendants matching `{namespace}name`, in document order.
    pub fn find_all<'a>(
        &'a self,
        namespace: &str,
        name: &str,
    ) -> impl Iterator<Item = &'a Element> {
        self.descendants().filter(move |e| e.is(namespace, name))
    }
}

/// Pre-order iterator over an element's descendants.
pub struct Descendants<'a> {
    stack: Vec<std::slice::Iter<'a, Element>>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            match top.next() {
                Some(element) => {
                    self.stack.push(element.children.iter());
                    return Some(element);
                }
                None => {
                    self.stack.pop();
                }
            }
        }
    }
}

/// A parsed document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub root: Element,
}

impl Document {
    /// Parse well-formed XML bytes.
    pub fn parse(content: &[u8]) -> Result<Self, ParseError> {
        parse_document(content)
    }
}

/// A source file loaded for processing.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub content: Vec<u8>,
}

impl SourceDocument {
    /// Read a file's raw bytes.
    pub fn load(path: &Path) -> std::io::Result<Self> {
        Ok(Self {
            path: path.to_path_buf(),
            content: fs::read(path)?,
        })
    }

    /// Parse the loaded content into a document tree.
    pub fn parse(&self) -> Result<Document, ParseError> {
        Document::parse(&self.content)
    }
}
