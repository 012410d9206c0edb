//! Well-formedness checking XML reader that builds an [`Element`] tree.

use quick_xml::NsReader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, QName, ResolveResult};

use super::encoding::{check_chars, decode, is_xml_char, normalize_line_endings};
use super::{Document, Element};
use crate::error::ParseError;

/// Parse raw bytes into a document tree.
///
/// The bytes are decoded per their byte order mark or declared encoding.
/// Fails on anything that is not well-formed: syntax errors, invalid names
/// or characters, mismatched or unclosed tags, duplicate attributes,
/// undefined entities, unbound prefixes, a misplaced XML declaration, a
/// missing root, or content outside the root element.
pub fn parse_document(content: &[u8]) -> Result<Document, ParseError> {
    let decoded = decode(content)?;
    check_chars(&decoded)?;
    let text = normalize_line_endings(&decoded);

    let mut reader = NsReader::from_str(&text);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;
    let mut at_start = true;

    loop {
        let event = reader.read_event().map_err(|e| malformed(&reader, e))?;

        match event {
            Event::Decl(_) if !at_start => {
                return Err(malformed(&reader, "XML declaration not at start of document"));
            }
            Event::Start(start) => {
                ensure_single_root(&root, &start)?;
                stack.push(open_element(&reader, &start)?);
            }
            Event::Empty(start) => {
                ensure_single_root(&root, &start)?;
                let element = open_element(&reader, &start)?;
                close_element(element, &mut stack, &mut root);
            }
            Event::End(end) => {
                let element = stack.pop().ok_or_else(|| {
                    malformed(
                        &reader,
                        format!("unexpected closing tag </{}>", lossy(end.name())),
                    )
                })?;
                close_element(element, &mut stack, &mut root);
            }
            Event::Text(t) => {
                let value = t.unescape().map_err(|e| malformed(&reader, e))?;
                check_referenced_chars(&reader, &value)?;
                ensure_inside_root(&stack, &value)?;
            }
            Event::CData(c) => {
                ensure_inside_root(&stack, &String::from_utf8_lossy(&c))?;
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype.
            _ => {}
        }
        at_start = false;
    }

    if let Some(open) = stack.last() {
        return Err(ParseError::Unclosed(open.name.clone()));
    }

    root.map(|root| Document { root }).ok_or(ParseError::NoRoot)
}

fn malformed(reader: &NsReader<&[u8]>, message: impl ToString) -> ParseError {
    ParseError::Malformed {
        position: reader.buffer_position() as u64,
        message: message.to_string(),
    }
}

fn lossy(name: QName<'_>) -> String {
    String::from_utf8_lossy(name.as_ref()).into_owned()
}

fn ensure_single_root(root: &Option<Element>, start: &BytesStart<'_>) -> Result<(), ParseError> {
    if root.is_some() {
        return Err(ParseError::OutsideRoot(format!("<{}>", lossy(start.name()))));
    }
    Ok(())
}

fn open_element(reader: &NsReader<&[u8]>, start: &BytesStart<'_>) -> Result<Element, ParseError> {
    check_name(reader, start.name())?;

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|e| malformed(reader, e))?;
        check_name(reader, attr.key)?;

        let raw = std::str::from_utf8(&attr.value).map_err(|e| malformed(reader, e))?;
        let value = attribute_value(reader, raw)?;

        // Namespace declarations are consumed by the reader's resolver.
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let (resolved, _) = reader.resolve_attribute(attr.key);
        namespace_of(resolved)?;
        attributes.push((lossy(attr.key), value));
    }

    let (resolved, local) = reader.resolve_element(start.name());
    let namespace = namespace_of(resolved)?;
    let local = String::from_utf8_lossy(local.as_ref()).into_owned();

    let mut element = Element::new(local, namespace);
    element.attributes = attributes;
    Ok(element)
}

/// Unescape an attribute value after whitespace normalization.
///
/// Literal tabs and newlines become spaces; the same characters written as
/// character references survive.
fn attribute_value(reader: &NsReader<&[u8]>, raw: &str) -> Result<String, ParseError> {
    if raw.contains('<') {
        return Err(malformed(reader, "'<' not allowed in attribute value"));
    }

    let spaced = raw.replace(['\t', '\n'], " ");
    let value = unescape(&spaced).map_err(|e| malformed(reader, e))?;
    check_referenced_chars(reader, &value)?;
    Ok(value.into_owned())
}

fn namespace_of(resolved: ResolveResult<'_>) -> Result<Option<String>, ParseError> {
    match resolved {
        ResolveResult::Bound(Namespace(uri)) => Ok(Some(String::from_utf8_lossy(uri).into_owned())),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(ParseError::UnboundPrefix(
            String::from_utf8_lossy(&prefix).into_owned(),
        )),
    }
}

/// Character references can produce characters the raw text may not contain.
fn check_referenced_chars(reader: &NsReader<&[u8]>, value: &str) -> Result<(), ParseError> {
    match value.chars().find(|c| !is_xml_char(*c)) {
        Some(c) => Err(malformed(
            reader,
            format!("reference to invalid character U+{:04X}", c as u32),
        )),
        None => Ok(()),
    }
}

/// Qualified names: a valid XML name with at most one colon, and non-empty
/// prefix and local part.
fn check_name(reader: &NsReader<&[u8]>, name: QName<'_>) -> Result<(), ParseError> {
    let text = std::str::from_utf8(name.as_ref()).map_err(|e| malformed(reader, e))?;
    let mut chars = text.chars();

    let valid = chars.next().is_some_and(is_name_start_char)
        && chars.all(is_name_char)
        && text.matches(':').count() <= 1
        && !text.starts_with(':')
        && !text.ends_with(':');

    if valid {
        Ok(())
    } else {
        Err(malformed(reader, format!("invalid name '{}'", text)))
    }
}

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        ':' | 'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}' | '\u{D8}'..='\u{F6}' | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}' | '\u{37F}'..='\u{1FFF}' | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}' | '\u{2C00}'..='\u{2FEF}' | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}' | '\u{FDF0}'..='\u{FFFD}' | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}' | '\u{300}'..='\u{36F}' | '\u{203F}'..='\u{2040}')
}

fn close_element(element: Element, stack: &mut [Element], root: &mut Option<Element>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

fn ensure_inside_root(stack: &[Element], value: &str) -> Result<(), ParseError> {
    if stack.is_empty() && !value.trim().is_empty() {
        return Err(ParseError::OutsideRoot(value.trim().to_string()));
    }
    Ok(())
}
