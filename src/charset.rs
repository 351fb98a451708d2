//! Decoding of comment source bytes
//!
//! Comments are usually extracted from UTF-8 source files, but older code
//! bases still ship Latin-1 or Shift_JIS sources. [`decode_source`] turns the
//! raw bytes into a UTF-8 string using an explicit encoding label.
//!
//! # Examples
//!
//! ```rust
//! use doc_comment_formatter::charset::decode_source;
//!
//! assert_eq!(decode_source(b"plain", None).unwrap(), "plain");
//! assert_eq!(decode_source(b"caf\xE9", Some("ISO-8859-1")).unwrap(), "café");
//! ```

use std::borrow::Cow;

use crate::error::FormatError;

/// Encoding assumed when none is given
pub const DEFAULT_ENCODING: &str = "UTF-8";

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Decode `bytes` using the encoding named by `label` (UTF-8 when `None`)
///
/// A leading UTF-8 byte order mark is dropped. Labels are resolved with the
/// WHATWG encoding label rules, so `latin1`, `ISO-8859-1` and
/// `windows-1252` all work.
///
/// # Errors
///
/// - `FormatError::Encoding` when the label is unknown or the bytes are not
///   valid in the named encoding
pub fn decode_source<'a>(bytes: &'a [u8], label: Option<&str>) -> Result<Cow<'a, str>, FormatError> {
    let label = label.unwrap_or(DEFAULT_ENCODING);

    if label.eq_ignore_ascii_case("UTF-8") || label.eq_ignore_ascii_case("utf8") {
        let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
        return std::str::from_utf8(bytes).map(Cow::Borrowed).map_err(|e| {
            FormatError::Encoding(format!(
                "Invalid UTF-8 at byte position {}: {}",
                e.valid_up_to(),
                e
            ))
        });
    }

    let encoding = encoding_rs::Encoding::for_label(label.as_bytes())
        .ok_or_else(|| FormatError::Encoding(format!("Unsupported encoding '{}'", label)))?;

    encoding
        .decode_without_bom_handling_and_without_replacement(bytes)
        .ok_or_else(|| FormatError::Encoding(format!("Invalid byte sequence for encoding '{}'", label)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_is_borrowed() {
        let decoded = decode_source("日本語".as_bytes(), None).unwrap();
        assert!(matches!(decoded, Cow::Borrowed("日本語")));
    }

    #[test]
    fn test_utf8_bom_is_stripped() {
        assert_eq!(decode_source(b"\xEF\xBB\xBFtext", Some("utf-8")).unwrap(), "text");
    }

    #[test]
    fn test_invalid_utf8() {
        let result = decode_source(b"\xFF\xFEbad", None);
        match result {
            Err(FormatError::Encoding(msg)) => assert!(msg.contains("byte position 0")),
            other => panic!("Expected Encoding error, got {other:?}"),
        }
    }

    #[test]
    fn test_latin1_label() {
        assert_eq!(decode_source(b"na\xEFve", Some("latin1")).unwrap(), "naïve");
    }

    #[test]
    fn test_shift_jis() {
        // "日本" in Shift_JIS
        assert_eq!(decode_source(b"\x93\xFA\x96\x7B", Some("Shift_JIS")).unwrap(), "日本");
    }

    #[test]
    fn test_unknown_label() {
        assert!(matches!(
            decode_source(b"x", Some("klingon-8")),
            Err(FormatError::Encoding(_))
        ));
    }
}
