//! HTML extractor.

use crate::Result;
use crate::core::engine::ExtractionContext;
use crate::core::mime::HTML_MIME_TYPE;
use crate::extraction::html::html_to_text;
use crate::extraction::text::decode_text;
use crate::plugins::{FormatParser, Plugin};

/// HTML extractor: visible body text, one line per block element.
pub struct HtmlExtractor;

impl HtmlExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for HtmlExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for HtmlExtractor {
    fn name(&self) -> &str {
        "html"
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
        "Extracts visible text from HTML documents"
    }
}

impl FormatParser for HtmlExtractor {
    fn parse(&self, content: &[u8], _mime_type: &str, ctx: &mut ExtractionContext<'_>) -> Result<()> {
        let html = decode_text(content)?;
        ctx.checkpoint()?;
        ctx.out().push_str(&html_to_text(&html))
    }

    fn supported_mime_types(&self) -> &[&str] {
        &[HTML_MIME_TYPE, "application/xhtml+xml"]
    }
}
