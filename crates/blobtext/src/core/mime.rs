//! Content-based format detection.
//!
//! Formats are detected from the payload bytes only. Magic numbers are
//! matched first (via `infer`); ZIP containers are then refined by the names
//! of their entries, and payloads without a signature are sniffed as text.

use crate::extraction::text::sniff_utf16;
use memchr::{memchr, memmem};

pub const HTML_MIME_TYPE: &str = "text/html";
pub const MARKDOWN_MIME_TYPE: &str = "text/markdown";
pub const PLAIN_TEXT_MIME_TYPE: &str = "text/plain";
pub const CSV_MIME_TYPE: &str = "text/csv";
pub const JSON_MIME_TYPE: &str = "application/json";
pub const XML_MIME_TYPE: &str = "application/xml";
pub const XML_TEXT_MIME_TYPE: &str = "text/xml";
pub const SVG_MIME_TYPE: &str = "image/svg+xml";
pub const PDF_MIME_TYPE: &str = "application/pdf";
pub const DOCX_MIME_TYPE: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const POWER_POINT_MIME_TYPE: &str = "application/vnd.openxmlformats-officedocument.presentationml.presentation";
pub const EXCEL_MIME_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
pub const OPENDOC_TEXT_MIME_TYPE: &str = "application/vnd.oasis.opendocument.text";
pub const OPENDOC_SPREADSHEET_MIME_TYPE: &str = "application/vnd.oasis.opendocument.spreadsheet";
pub const OPENDOC_PRESENTATION_MIME_TYPE: &str = "application/vnd.oasis.opendocument.presentation";
pub const EPUB_MIME_TYPE: &str = "application/epub+zip";
pub const ZIP_MIME_TYPE: &str = "application/zip";
pub const TAR_MIME_TYPE: &str = "application/x-tar";
pub const OCTET_STREAM_MIME_TYPE: &str = "application/octet-stream";

/// Bytes inspected when sniffing text.
const SNIFF_LEN: usize = 8 * 1024;

/// Detect the MIME type of `content`.
///
/// Never fails: content that matches nothing is reported as
/// `application/octet-stream`. Empty content is `text/plain`.
///
/// # Example
///
/// ```rust
/// use blobtext::detect_mime_type_from_bytes;
///
/// assert_eq!(detect_mime_type_from_bytes(b"%PDF-1.7\n"), "application/pdf");
/// assert_eq!(detect_mime_type_from_bytes(b"{\"a\": 1}"), "application/json");
/// assert_eq!(detect_mime_type_from_bytes(b"hello world"), "text/plain");
/// ```
pub fn detect_mime_type_from_bytes(content: &[u8]) -> String {
    if content.is_empty() {
        return PLAIN_TEXT_MIME_TYPE.to_string();
    }

    if let Some(kind) = infer::get(content) {
        let mime = kind.mime_type();
        if mime == ZIP_MIME_TYPE
            && let Some(refined) = refine_zip(content)
        {
            return refined;
        }
        return mime.to_string();
    }

    sniff_text(content).to_string()
}

/// Look inside a ZIP container for the entries that identify office and
/// e-book formats.
#[cfg(any(feature = "office", feature = "archives"))]
fn refine_zip(content: &[u8]) -> Option<String> {
    use std::io::{Cursor, Read};

    let mut archive = zip::ZipArchive::new(Cursor::new(content)).ok()?;

    let mut has_word = false;
    let mut has_ppt = false;
    let mut has_xl = false;
    let mut has_mimetype = false;
    for name in archive.file_names() {
        match name {
            "word/document.xml" => has_word = true,
            "ppt/presentation.xml" => has_ppt = true,
            "xl/workbook.xml" => has_xl = true,
            "mimetype" => has_mimetype = true,
            _ => {}
        }
    }

    if has_word {
        return Some(DOCX_MIME_TYPE.to_string());
    }
    if has_ppt {
        return Some(POWER_POINT_MIME_TYPE.to_string());
    }
    if has_xl {
        return Some(EXCEL_MIME_TYPE.to_string());
    }

    if has_mimetype {
        let mut declared = String::new();
        let mut entry = archive.by_name("mimetype").ok()?;
        entry.by_ref().take(256).read_to_string(&mut declared).ok()?;
        let declared = declared.trim();
        if declared.starts_with("application/") {
            return Some(declared.to_string());
        }
    }

    None
}

#[cfg(not(any(feature = "office", feature = "archives")))]
fn refine_zip(_content: &[u8]) -> Option<String> {
    None
}

fn sniff_text(content: &[u8]) -> &'static str {
    if content.starts_with(&[0xFF, 0xFE]) || content.starts_with(&[0xFE, 0xFF]) {
        return PLAIN_TEXT_MIME_TYPE;
    }

    let head = &content[..content.len().min(SNIFF_LEN)];
    if sniff_utf16(head).is_some() {
        return PLAIN_TEXT_MIME_TYPE;
    }
    if memchr(0, head).is_some() || control_ratio(head) > 0.1 {
        return OCTET_STREAM_MIME_TYPE;
    }

    let body = skip_preamble(content);
    match body.first() {
        Some(b'<') => sniff_markup(body),
        Some(b'{') | Some(b'[') if serde_json::from_slice::<serde::de::IgnoredAny>(body).is_ok() => JSON_MIME_TYPE,
        _ => PLAIN_TEXT_MIME_TYPE,
    }
}

/// Content after a UTF-8 byte order mark and leading whitespace.
fn skip_preamble(content: &[u8]) -> &[u8] {
    let body = content.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(content);
    let start = body.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(body.len());
    &body[start..]
}

/// Whether `content` opens with an XML declaration.
pub(crate) fn declares_xml(content: &[u8]) -> bool {
    skip_preamble(content).starts_with(b"<?xml")
}

/// Elements that mark a document without a doctype as HTML.
const HTML_ELEMENTS: &[&[u8]] = &[
    b"html", b"head", b"body", b"title", b"meta", b"link", b"p", b"div", b"span", b"a", b"b", b"i", b"em", b"strong",
    b"br", b"h1", b"h2", b"h3", b"h4", b"h5", b"h6", b"ul", b"ol", b"li", b"table", b"section", b"article",
    b"header", b"footer", b"nav", b"main", b"script", b"style",
];

fn sniff_markup(body: &[u8]) -> &'static str {
    let prefix: Vec<u8> = body.iter().take(64).map(u8::to_ascii_lowercase).collect();

    if prefix.starts_with(b"<!doctype html") || prefix.starts_with(b"<html") {
        return HTML_MIME_TYPE;
    }
    if prefix.starts_with(b"<?xml") {
        return XML_MIME_TYPE;
    }

    let Some(name) = element_name(body) else {
        return PLAIN_TEXT_MIME_TYPE;
    };
    let lower = name.to_ascii_lowercase();
    if lower == b"svg" {
        SVG_MIME_TYPE
    } else if HTML_ELEMENTS.contains(&lower.as_slice()) {
        HTML_MIME_TYPE
    } else if is_balanced_root(body, name) {
        XML_MIME_TYPE
    } else {
        PLAIN_TEXT_MIME_TYPE
    }
}

/// Name of the element opening `body`, if `body` starts with a start tag.
fn element_name(body: &[u8]) -> Option<&[u8]> {
    let rest = body.strip_prefix(b"<")?;
    let first = *rest.first()?;
    if !(first.is_ascii_alphabetic() || first == b'_') {
        return None;
    }

    let len = rest
        .iter()
        .position(|b| !(b.is_ascii_alphanumeric() || matches!(b, b'_' | b'-' | b'.' | b':')))
        .unwrap_or(rest.len());
    match rest.get(len) {
        Some(b) if b.is_ascii_whitespace() || matches!(b, b'>' | b'/') => Some(&rest[..len]),
        _ => None,
    }
}

/// Whether the root element `name` is self-closing or closed later in `body`.
fn is_balanced_root(body: &[u8], name: &[u8]) -> bool {
    if let Some(end) = memchr(b'>', body)
        && end > 0
        && body[end - 1] == b'/'
    {
        return true;
    }

    let mut closing = Vec::with_capacity(name.len() + 2);
    closing.extend_from_slice(b"</");
    closing.extend_from_slice(name);
    memmem::rfind(body, &closing).is_some()
}

/// Share of bytes that are control characters other than common whitespace.
fn control_ratio(head: &[u8]) -> f64 {
    if head.is_empty() {
        return 0.0;
    }
    let controls = head
        .iter()
        .filter(|&&b| b < 0x20 && !matches!(b, b'\t' | b'\n' | b'\r' | 0x0C | 0x1B))
        .count();
    controls as f64 / head.len() as f64
}
