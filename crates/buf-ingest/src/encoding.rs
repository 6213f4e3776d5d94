//! Byte-encoding detection and decoding.
//!
//! Decoding tries the primary encoding (UTF-8, or whatever a byte-order mark
//! announces) strictly, and retries once with [`FALLBACK_ENCODING`], which
//! accepts every byte sequence.

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

/// Single-byte encoding used when the primary decode fails.
pub const FALLBACK_ENCODING: &Encoding = WINDOWS_1252;

/// Text decoded from an upload.
#[derive(Debug, Clone)]
pub struct Decoded {
    pub text: String,
    /// Encoding that produced `text`.
    pub encoding: &'static Encoding,
    /// True when the primary decode failed and the fallback was used.
    pub used_fallback: bool,
}

/// Best-effort label for the encoding of `bytes`.
///
/// Returns `None` for empty input. Labels: `ascii`, `UTF-8-SIG`, `utf-8`,
/// `UTF-16` and `Windows-1252` for anything else.
pub fn detect_encoding(bytes: &[u8]) -> Option<&'static str> {
    if bytes.is_empty() {
        return None;
    }
    if bytes.starts_with(&[0xEF, 0xBB, 0xBF]) {
        return Some("UTF-8-SIG");
    }
    if bytes.starts_with(&[0xFF, 0xFE]) || bytes.starts_with(&[0xFE, 0xFF]) {
        return Some("UTF-16");
    }
    if bytes.is_ascii() {
        return Some("ascii");
    }
    if std::str::from_utf8(bytes).is_ok() {
        return Some("utf-8");
    }
    Some("Windows-1252")
}

/// Decode `bytes` with the primary encoding, falling back once on error.
pub fn decode(bytes: &[u8]) -> Decoded {
    let (primary, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => (UTF_8, bytes),
    };

    if let Some(text) = primary.decode_without_bom_handling_and_without_replacement(body) {
        return Decoded {
            text: text.into_owned(),
            encoding: primary,
            used_fallback: false,
        };
    }

    tracing::debug!(
        primary = primary.name(),
        fallback = FALLBACK_ENCODING.name(),
        "primary decode failed, retrying with fallback encoding"
    );
    let (text, _) = FALLBACK_ENCODING.decode_without_bom_handling(body);
    Decoded {
        text: text.into_owned(),
        encoding: FALLBACK_ENCODING,
        used_fallback: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_encoding_labels() {
        assert_eq!(detect_encoding(b""), None);
        assert_eq!(detect_encoding(b"a,b\n1,2\n"), Some("ascii"));
        assert_eq!(detect_encoding("a,é\n".as_bytes()), Some("utf-8"));
        assert_eq!(detect_encoding(b"\xEF\xBB\xBFa,b\n"), Some("UTF-8-SIG"));
        assert_eq!(detect_encoding(b"\xFF\xFEa\x00"), Some("UTF-16"));
        assert_eq!(detect_encoding(b"caf\xE9\n"), Some("Windows-1252"));
    }

    #[test]
    fn test_decode_utf8() {
        let decoded = decode("x,caf\u{e9}".as_bytes());
        assert_eq!(decoded.text, "x,caf\u{e9}");
        assert!(!decoded.used_fallback);
    }

    #[test]
    fn test_decode_strips_utf8_bom() {
        let decoded = decode(b"\xEF\xBB\xBFa,b");
        assert_eq!(decoded.text, "a,b");
        assert!(!decoded.used_fallback);
    }

    #[test]
    fn test_decode_falls_back_to_windows_1252() {
        let decoded = decode(b"caf\xE9");
        assert_eq!(decoded.text, "caf\u{e9}");
        assert!(decoded.used_fallback);
        assert_eq!(decoded.encoding, FALLBACK_ENCODING);
    }
}
