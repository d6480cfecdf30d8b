//! Office document extractor (OOXML and OpenDocument).

use crate::core::engine::ExtractionContext;
use crate::core::mime::{
    DOCX_MIME_TYPE, EXCEL_MIME_TYPE, OPENDOC_PRESENTATION_MIME_TYPE, OPENDOC_SPREADSHEET_MIME_TYPE,
    OPENDOC_TEXT_MIME_TYPE, POWER_POINT_MIME_TYPE,
};
use crate::extraction::excel::{extract_ods, extract_xlsx};
use crate::extraction::office::{extract_docx, extract_odf, extract_pptx};
use crate::plugins::{FormatParser, Plugin};
use crate::{BlobtextError, Result};

/// Office document extractor.
///
/// Handles Word, PowerPoint and Excel packages and the three OpenDocument
/// types, choosing the part layout from the detected MIME type. Spreadsheets
/// are read through `calamine`.
pub struct OfficeExtractor;

impl OfficeExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for OfficeExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Plugin for OfficeExtractor {
    fn name(&self) -> &str {
        "office"
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
        "Extracts text from DOCX, PPTX, XLSX and OpenDocument files"
    }
}

impl FormatParser for OfficeExtractor {
    fn parse(&self, content: &[u8], mime_type: &str, ctx: &mut ExtractionContext<'_>) -> Result<()> {
        let limits = ctx.limits();
        let deadline = ctx.deadline().clone();
        match mime_type {
            DOCX_MIME_TYPE => extract_docx(content, limits, ctx.out()),
            POWER_POINT_MIME_TYPE => extract_pptx(content, limits, ctx.out(), &deadline),
            EXCEL_MIME_TYPE => extract_xlsx(content, limits, ctx.out(), &deadline),
            OPENDOC_SPREADSHEET_MIME_TYPE => extract_ods(content, limits, ctx.out(), &deadline),
            OPENDOC_TEXT_MIME_TYPE | OPENDOC_PRESENTATION_MIME_TYPE => extract_odf(content, limits, ctx.out()),
            other => Err(BlobtextError::UnsupportedFormat(other.to_string())),
        }
    }

    fn supported_mime_types(&self) -> &[&str] {
        &[
            DOCX_MIME_TYPE,
            POWER_POINT_MIME_TYPE,
            EXCEL_MIME_TYPE,
            OPENDOC_TEXT_MIME_TYPE,
            OPENDOC_SPREADSHEET_MIME_TYPE,
            OPENDOC_PRESENTATION_MIME_TYPE,
        ]
    }
}
