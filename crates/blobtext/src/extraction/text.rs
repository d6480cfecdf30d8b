//! Text decoding.
//!
//! Byte order marks win, then UTF-16 recognised by its zero high bytes;
//! otherwise valid UTF-8 is taken as is, and anything else goes through
//! charset detection. Decoded text is returned unchanged,
//! without trimming or line-ending normalization.

use crate::Result;
use chardetng::EncodingDetector;
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE};
use tracing::debug;

/// Decode `bytes` into a `String`.
///
/// # Example
///
/// ```rust
/// use blobtext::extraction::decode_text;
///
/// assert_eq!(decode_text(b"hello world").unwrap(), "hello world");
/// assert_eq!(decode_text(b"\xEF\xBB\xBFbom").unwrap(), "bom");
/// ```
pub fn decode_text(bytes: &[u8]) -> Result<String> {
    if let Some((encoding, bom_len)) = Encoding::for_bom(bytes) {
        let (text, had_errors) = encoding.decode_without_bom_handling(&bytes[bom_len..]);
        if had_errors {
            debug!(encoding = encoding.name(), "Replaced malformed sequences while decoding");
        }
        return Ok(text.into_owned());
    }

    if let Some(encoding) = sniff_utf16(bytes) {
        let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
        debug!(encoding = encoding.name(), had_errors, "Decoded UTF-16 text without byte order mark");
        return Ok(text.into_owned());
    }

    if let Some(text) = as_utf8(bytes) {
        return Ok(text.to_string());
    }

    let mut detector = EncodingDetector::new();
    detector.feed(bytes, true);
    let encoding = detector.guess(None, true);

    let (text, had_errors) = encoding.decode_without_bom_handling(bytes);
    debug!(
        encoding = encoding.name(),
        had_errors, "Decoded text with detected charset"
    );
    Ok(text.into_owned())
}

/// Share of code units that must look like ASCII text for BOM-less UTF-16.
const UTF16_TEXT_RATIO: f64 = 0.9;

/// Recognise UTF-16 without a byte order mark.
///
/// Mostly-ASCII UTF-16 has a zero byte in every code unit, on the odd
/// positions for little endian and the even ones for big endian. Only the
/// first 8 KiB are inspected.
pub(crate) fn sniff_utf16(bytes: &[u8]) -> Option<&'static Encoding> {
    let head = &bytes[..bytes.len().min(8 * 1024)];
    let units = head.len() / 2;
    if units < 2 {
        return None;
    }

    let is_text = |b: u8| b >= 0x20 || matches!(b, b'\t' | b'\n' | b'\r');
    let (mut le, mut be) = (0usize, 0usize);
    for unit in head.chunks_exact(2) {
        match (unit[0], unit[1]) {
            (lo, 0) if lo != 0 && is_text(lo) => le += 1,
            (0, lo) if lo != 0 && is_text(lo) => be += 1,
            _ => {}
        }
    }

    let threshold = units as f64 * UTF16_TEXT_RATIO;
    if le as f64 >= threshold {
        Some(UTF_16LE)
    } else if be as f64 >= threshold {
        Some(UTF_16BE)
    } else {
        None
    }
}

#[cfg(feature = "simd-utf8")]
pub(crate) fn as_utf8(bytes: &[u8]) -> Option<&str> {
    simdutf8::basic::from_utf8(bytes).ok()
}

#[cfg(not(feature = "simd-utf8"))]
pub(crate) fn as_utf8(bytes: &[u8]) -> Option<&str> {
    std::str::from_utf8(bytes).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_utf8_passthrough() {
        let text = "line one\r\n  indented \u{1F600}\n";
        assert_eq!(decode_text(text.as_bytes()).unwrap(), text);
    }

    #[test]
    fn test_utf8_bom_stripped() {
        assert_eq!(decode_text(b"\xEF\xBB\xBFhello").unwrap(), "hello");
    }

    #[test]
    fn test_utf16_le_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "h\u{e9}llo".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(decode_text(&bytes).unwrap(), "h\u{e9}llo");
    }

    #[test]
    fn test_utf16_be_bom() {
        let mut bytes = vec![0xFE, 0xFF];
        for unit in "abc".encode_utf16() {
            bytes.extend_from_slice(&unit.to_be_bytes());
        }
        assert_eq!(decode_text(&bytes).unwrap(), "abc");
    }

    #[test]
    fn test_utf16_without_bom() {
        let le: Vec<u8> = "hello world".encode_utf16().flat_map(u16::to_le_bytes).collect();
        assert_eq!(sniff_utf16(&le), Some(UTF_16LE));
        assert_eq!(decode_text(&le).unwrap(), "hello world");

        let be: Vec<u8> = "hello world".encode_utf16().flat_map(u16::to_be_bytes).collect();
        assert_eq!(sniff_utf16(&be), Some(UTF_16BE));
        assert_eq!(decode_text(&be).unwrap(), "hello world");
    }

    #[test]
    fn test_binary_is_not_utf16() {
        assert_eq!(sniff_utf16(&[0x00, 0x01, 0x02, 0x03, 0xfe, 0x00]), None);
        assert_eq!(sniff_utf16(&[0x00, 0x01, 0x00, 0x02]), None);
        assert_eq!(sniff_utf16(b"plain ascii"), None);
        assert_eq!(sniff_utf16(b"a"), None);
    }

    #[test]
    fn test_legacy_encoding_detected() {
        let bytes = b"Caf\xe9 cr\xe8me br\xfbl\xe9e, \xe0 la fran\xe7aise, tr\xe8s d\xe9licieuse.";
        let text = decode_text(bytes).unwrap();
        assert!(text.starts_with("Caf\u{e9}"));
        assert!(!text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_empty() {
        assert_eq!(decode_text(b"").unwrap(), "");
    }
}
