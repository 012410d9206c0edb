//! Character decoding and XML character-level checks.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE};
use lazy_static::lazy_static;
use regex::bytes::Regex;

use crate::error::ParseError;

lazy_static! {
    // encoding="..." inside a leading <?xml ...?> declaration
    static ref DECLARED_ENCODING: Regex = Regex::new(
        r#"^<\?xml\s[^>]*?encoding\s*=\s*["']([A-Za-z][A-Za-z0-9._\-]*)["']"#
    ).unwrap();
}

/// Decode raw document bytes to text.
///
/// A byte order mark wins; otherwise the encoding named in the XML
/// declaration is used, defaulting to UTF-8. Bytes that are invalid in the
/// chosen encoding make the document malformed.
pub fn decode(content: &[u8]) -> Result<Cow<'_, str>, ParseError> {
    let (encoding, body) = match Encoding::for_bom(content) {
        Some((encoding, bom_len)) => (encoding, &content[bom_len..]),
        None => (declared_encoding(content)?, content),
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| ParseError::Malformed {
            position: 0,
            message: format!("invalid {} content", encoding.name()),
        })
}

fn declared_encoding(content: &[u8]) -> Result<&'static Encoding, ParseError> {
    let Some(caps) = DECLARED_ENCODING.captures(content) else {
        return Ok(UTF_8);
    };

    let label = &caps[1];
    match Encoding::for_label(label) {
        // The declaration itself was readable as ASCII, so a UTF-16 label
        // without a byte order mark cannot describe these bytes.
        Some(encoding) if encoding != UTF_16LE && encoding != UTF_16BE => Ok(encoding),
        _ => Err(ParseError::Malformed {
            position: 0,
            message: format!("unsupported encoding {}", String::from_utf8_lossy(label)),
        }),
    }
}

/// Whether `c` is allowed anywhere in an XML 1.0 document.
pub fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Fail on the first character outside the XML character set.
pub fn check_chars(text: &str) -> Result<(), ParseError> {
    match text.char_indices().find(|(_, c)| !is_xml_char(*c)) {
        Some((position, c)) => Err(ParseError::Malformed {
            position: position as u64,
            message: format!("invalid character U+{:04X}", c as u32),
        }),
        None => Ok(()),
    }
}

/// XML end-of-line handling: `\r\n` and lone `\r` become `\n`.
pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_declared_latin1() {
        let mut bytes = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><r Serie=\"Se".to_vec();
        bytes.push(0xF1);
        bytes.extend_from_slice(b"or\"/>");

        let text = decode(&bytes).unwrap();
        assert!(text.ends_with("<r Serie=\"Señor\"/>"));
    }

    #[test]
    fn test_decode_declared_windows_1252() {
        let mut bytes = b"<?xml version='1.0' encoding='windows-1252'?><r Serie=\"A".to_vec();
        bytes.push(0x93);
        bytes.extend_from_slice(b"B\"/>");

        let text = decode(&bytes).unwrap();
        assert!(text.contains("A\u{201C}B"));
    }

    #[test]
    fn test_decode_utf16_with_bom() {
        let xml = "<?xml version=\"1.0\" encoding=\"UTF-16\"?><r/>";
        let mut bytes = vec![0xFF, 0xFE];
        for unit in xml.encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }

        assert_eq!(decode(&bytes).unwrap(), xml);
    }

    #[test]
    fn test_decode_rejects_invalid_utf8() {
        assert!(decode(&[b'<', b'a', b'>', 0xFF, b'<', b'/', b'a', b'>']).is_err());
    }

    #[test]
    fn test_decode_rejects_utf16_label_without_bom() {
        assert!(decode(b"<?xml version=\"1.0\" encoding=\"UTF-16\"?><r/>").is_err());
    }

    #[test]
    fn test_check_chars() {
        assert!(check_chars("<r>\t\n ok</r>").is_ok());
        assert!(check_chars("<r>\u{1}</r>").is_err());
        assert!(check_chars("<r>\u{FFFF}</r>").is_err());
    }

    #[test]
    fn test_normalize_line_endings() {
        assert_eq!(normalize_line_endings("a\r\nb\rc\nd"), "a\nb\nc\nd");
    }
}
