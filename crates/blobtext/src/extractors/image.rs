//! Image extractor.

use crate::Result;
use crate::core::engine::ExtractionContext;
use crate::plugins::{FormatParser, Plugin};

/// Image extractor.
///
/// Raster images carry no text layer and there is no OCR backend, so every
/// image yields empty content. Registering a parser keeps images out of the
/// unsupported-format path.
pub struct ImageExtractor;

impl ImageExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ImageExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for ImageExtractor {
    fn name(&self) -> &str {
        "image"
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
}

impl FormatParser for ImageExtractor {
    fn parse(&self, _content: &[u8], _mime_type: &str, ctx: &mut ExtractionContext<'_>) -> Result<()> {
        ctx.checkpoint()
    }

    fn supported_mime_types(&self) -> &[&str] {
        &["image/*"]
    }

    fn priority(&self) -> i32 {
        10
    }
}
