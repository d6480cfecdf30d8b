//! XML and SVG extractor.

use crate::core::engine::ExtractionContext;
use crate::core::mime::{SVG_MIME_TYPE, XML_MIME_TYPE, XML_TEXT_MIME_TYPE, declares_xml};
use crate::extraction::text::decode_text;
use crate::extraction::xml::extract_xml_text;
use crate::plugins::{FormatParser, Plugin};
use crate::{BlobtextError, Result};
use tracing::debug;

/// XML extractor.
///
/// Emits the character data of the document. SVG is handled here too so
/// that its `<text>` content is kept, ahead of the image parser that would
/// otherwise claim `image/*`.
///
/// Content that was only recognised as XML by its markup, without an XML
/// declaration, falls back to plain text when it does not parse.
pub struct XmlExtractor;

impl XmlExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for XmlExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for XmlExtractor {
    fn name(&self) -> &str {
        "xml"
    }

    fn version(&self) -> String {
        env!("CARGO_PKG_VERSION").to_string()
    }

    fn initialize(&self) -> Result<()> {
        Ok(())
    }

    fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    fn description(&self) -> &str {
        "Extracts character data from XML and SVG documents"
    }
}

impl FormatParser for XmlExtractor {
    fn parse(&self, content: &[u8], mime_type: &str, ctx: &mut ExtractionContext<'_>) -> Result<()> {
        let mark = ctx.out().mark();
        match extract_xml_text(content, ctx.out()) {
            Err(err @ BlobtextError::Parsing { .. }) if !declares_xml(content) => {
                debug!(mime_type, error = %err, "Markup did not parse as XML, reading it as plain text");
                ctx.out().rollback(mark);
                let text = decode_text(content)?;
                ctx.out().push_str(&text)
            }
            other => other,
        }
    }

    fn supported_mime_types(&self) -> &[&str] {
        &[XML_MIME_TYPE, XML_TEXT_MIME_TYPE, SVG_MIME_TYPE]
    }

    fn priority(&self) -> i32 {
        60
    }
}
