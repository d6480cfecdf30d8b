//! Plain text extractor.

use crate::Result;
use crate::core::engine::ExtractionContext;
use crate::core::mime::{CSV_MIME_TYPE, JSON_MIME_TYPE, MARKDOWN_MIME_TYPE, PLAIN_TEXT_MIME_TYPE};
use crate::extraction::text::decode_text;
use crate::plugins::{FormatParser, Plugin};

/// Plain text extractor.
///
/// Decodes the payload to UTF-8 and passes it through unchanged. JSON, CSV and Markdown are treated as text, and the
/// `text/*` wildcard catches every textual subtype without a dedicated parser.
pub struct PlainTextExtractor;

impl PlainTextExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PlainTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for PlainTextExtractor {
    fn name(&self) -> &str {
        "plain-text"
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
        "Extracts content from plain text, JSON, CSV and Markdown"
    }
}

impl FormatParser for PlainTextExtractor {
    fn parse(&self, content: &[u8], _mime_type: &str, ctx: &mut ExtractionContext<'_>) -> Result<()> {
        let text = decode_text(content)?;
        ctx.out().push_str(&text)
    }

    fn supported_mime_types(&self) -> &[&str] {
        &[
            PLAIN_TEXT_MIME_TYPE,
            MARKDOWN_MIME_TYPE,
            CSV_MIME_TYPE,
            JSON_MIME_TYPE,
            "text/*",
        ]
    }
}
