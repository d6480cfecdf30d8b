//! PDF extractor.

use crate::Result;
use crate::core::engine::ExtractionContext;
use crate::core::mime::PDF_MIME_TYPE;
use crate::extraction::pdf::extract_pdf;
use crate::plugins::{FormatParser, Plugin};

/// PDF extractor: text layer only, one block per page.
///
/// Scanned pages without a text layer produce no text.
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for PdfExtractor {
    fn name(&self) -> &str {
        "pdf"
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
        "Extracts page text from PDF documents"
    }
}

impl FormatParser for PdfExtractor {
    fn parse(&self, content: &[u8], _mime_type: &str, ctx: &mut ExtractionContext<'_>) -> Result<()> {
        let deadline = ctx.deadline().clone();
        extract_pdf(content, ctx.out(), &deadline)
    }

    fn supported_mime_types(&self) -> &[&str] {
        &[PDF_MIME_TYPE]
    }
}
