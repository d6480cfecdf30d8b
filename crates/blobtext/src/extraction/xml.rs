//! XML text extraction.
//!
//! Streams the document with `quick-xml` and collects character data. Text
//! runs are separated by a single space at element boundaries; entity
//! references and CDATA sections are kept as text.
//!
//! Documents are decoded to UTF-8 before parsing: a byte order mark wins,
//! then the encoding named in the XML declaration, then UTF-8, and finally
//! charset detection.
//!
//! The same streaming walker, configured with element names, extracts
//! paragraphs from office document parts (see `extraction::office`).
//!
//! # Example
//!
//! ```rust
//! use blobtext::extraction::{ContentBuffer, extract_xml_text};
//!
//! # fn example() -> blobtext::Result<()> {
//! let mut out = ContentBuffer::unbounded();
//! extract_xml_text(b"<root><item>Hello</item><item>World</item></root>", &mut out)?;
//! assert_eq!(out.as_str(), "Hello World");
//! # Ok(())
//! # }
//! ```
use crate::error::{BlobtextError, Result};
use crate::extraction::content::ContentBuffer;
use crate::extraction::text::{as_utf8, decode_text};
use encoding_rs::{Encoding, UTF_8};
use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use std::borrow::Cow;
use std::fmt::Display;
use tracing::debug;

/// Decode an XML document to UTF-8.
pub(crate) fn decode_document(xml_bytes: &[u8]) -> Result<Cow<'_, str>> {
    if Encoding::for_bom(xml_bytes).is_some() {
        return decode_text(xml_bytes).map(Cow::Owned);
    }

    if let Some(encoding) = declared_encoding(xml_bytes)
        && encoding != UTF_8
        && encoding.is_ascii_compatible()
    {
        let (text, had_errors) = encoding.decode_without_bom_handling(xml_bytes);
        debug!(
            encoding = encoding.name(),
            had_errors, "Decoded XML with declared encoding"
        );
        return Ok(text);
    }

    match as_utf8(xml_bytes) {
        Some(text) => Ok(Cow::Borrowed(text)),
        None => decode_text(xml_bytes).map(Cow::Owned),
    }
}

/// Encoding named by the XML declaration, when there is one and it is known.
fn declared_encoding(xml_bytes: &[u8]) -> Option<&'static Encoding> {
    let mut reader = Reader::from_reader(xml_bytes);
    match reader.read_event() {
        Ok(Event::Decl(decl)) => {
            let label = decl.encoding()?.ok()?;
            Encoding::for_label(&label)
        }
        _ => None,
    }
}

fn parse_error(position: u64, err: impl Display) -> BlobtextError {
    BlobtextError::parsing(format!("XML parsing error at position {}: {}", position, err))
}

/// Character data of one event. Input is decoded up front, so this never fails in practice.
fn event_text(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| BlobtextError::parsing_with_source("Invalid UTF-8 in XML text", e))
}

/// Extract the character data of an XML document into `out`.
///
/// # Errors
///
/// `BlobtextError::Parsing` for malformed XML, with the byte position.
pub fn extract_xml_text(xml_bytes: &[u8], out: &mut ContentBuffer) -> Result<()> {
    let document = decode_document(xml_bytes)?;
    let mut reader = Reader::from_str(&document);
    reader.config_mut().check_end_names = false;

    let mut run = String::new();
    let mut wrote_any = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(_)) | Ok(Event::End(_)) | Ok(Event::Empty(_)) => {
                flush_run(&mut run, &mut wrote_any, out)?;
            }
            Ok(Event::Text(e)) => run.push_str(event_text(&e)?),
            Ok(Event::GeneralRef(e)) => push_reference(&mut run, event_text(&e)?),
            Ok(Event::CData(e)) => run.push_str(event_text(&e)?),
            Ok(Event::Eof) => break,
            Err(e) => return Err(parse_error(reader.buffer_position(), e)),
            _ => {}
        }
    }

    flush_run(&mut run, &mut wrote_any, out)
}

fn flush_run(run: &mut String, wrote_any: &mut bool, out: &mut ContentBuffer) -> Result<()> {
    let trimmed = run.trim();
    if !trimmed.is_empty() {
        if *wrote_any {
            out.push(' ')?;
        }
        out.push_str(trimmed)?;
        *wrote_any = true;
    }
    run.clear();
    Ok(())
}

/// Append the expansion of an entity reference, or the reference itself when unknown.
fn push_reference(run: &mut String, name: &str) {
    if let Some(expanded) = resolve_predefined_entity(name) {
        run.push_str(expanded);
    } else if let Some(c) = resolve_char_ref(name) {
        run.push(c);
    } else {
        run.push('&');
        run.push_str(name);
        run.push(';');
    }
}

/// Resolve a character reference body such as `#233` or `#xE9`.
fn resolve_char_ref(name: &str) -> Option<char> {
    let numeric = name.strip_prefix('#')?;
    let code = match numeric.strip_prefix('x') {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => numeric.parse::<u32>().ok()?,
    };
    char::from_u32(code).filter(|c| *c != '\0')
}

/// Element names that drive [`extract_markup_text`].
///
/// Names are matched against local names, so namespace prefixes (`w:`,
/// `a:`, `text:`) are ignored.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TextMarkup {
    /// Elements that start a new line of output.
    pub blocks: &'static [&'static str],
    /// Elements whose character data is captured; `None` captures all text
    /// inside block elements.
    pub text: Option<&'static [&'static str]>,
    pub tabs: &'static [&'static str],
    pub breaks: &'static [&'static str],
    pub spaces: &'static [&'static str],
    /// Elements whose whole subtree is ignored.
    pub skip: &'static [&'static str],
}

/// Extract paragraph text from an XML document part described by `markup`.
pub(crate) fn extract_markup_text(xml_bytes: &[u8], markup: &TextMarkup, out: &mut ContentBuffer) -> Result<()> {
    let document = decode_document(xml_bytes)?;
    let mut reader = Reader::from_str(&document);
    reader.config_mut().check_end_names = false;

    let mut in_block = 0usize;
    let mut in_text = 0usize;
    let mut skipping = 0usize;

    loop {
        let event = match reader.read_event() {
            Ok(event) => event,
            Err(e) => return Err(parse_error(reader.buffer_position(), e)),
        };

        match event {
            Event::Start(e) => {
                let name = e.local_name();
                let name = name.as_ref();
                if skipping > 0 || is_one_of(name, markup.skip) {
                    skipping += 1;
                } else {
                    if is_one_of(name, markup.blocks) {
                        in_block += 1;
                        out.start_block()?;
                    }
                    if markup.text.is_some_and(|names| is_one_of(name, names)) {
                        in_text += 1;
                    }
                }
            }
            Event::End(e) => {
                let name = e.local_name();
                let name = name.as_ref();
                if skipping > 0 {
                    skipping -= 1;
                } else {
                    if markup.text.is_some_and(|names| is_one_of(name, names)) {
                        in_text = in_text.saturating_sub(1);
                    }
                    if is_one_of(name, markup.blocks) {
                        in_block = in_block.saturating_sub(1);
                    }
                }
            }
            Event::Empty(e) if skipping == 0 => {
                let name = e.local_name();
                let name = name.as_ref();
                if is_one_of(name, markup.tabs) {
                    out.push('\t')?;
                } else if is_one_of(name, markup.breaks) {
                    out.push('\n')?;
                } else if is_one_of(name, markup.spaces) {
                    out.push(' ')?;
                } else if is_one_of(name, markup.blocks) {
                    out.start_block()?;
                }
            }
            Event::Text(e) if skipping == 0 && captures(markup, in_block, in_text) => {
                out.push_str(event_text(&e)?)?;
            }
            Event::CData(e) if skipping == 0 && captures(markup, in_block, in_text) => {
                out.push_str(event_text(&e)?)?;
            }
            Event::GeneralRef(e) if skipping == 0 && captures(markup, in_block, in_text) => {
                let mut expanded = String::new();
                push_reference(&mut expanded, event_text(&e)?);
                out.push_str(&expanded)?;
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(())
}

fn captures(markup: &TextMarkup, in_block: usize, in_text: usize) -> bool {
    match markup.text {
        Some(_) => in_text > 0,
        None => in_block > 0,
    }
}

fn is_one_of(name: &[u8], names: &[&str]) -> bool {
    names.iter().any(|candidate| candidate.as_bytes() == name)
}
