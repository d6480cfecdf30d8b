//! PDF text extraction with `lopdf`.
//!
//! Text is extracted page by page in page order, one block per page. The
//! deadline is checked before every page.
use crate::core::io::Deadline;
use crate::error::{BlobtextError, Result};
use crate::extraction::content::ContentBuffer;
use lopdf::Document;
use tracing::debug;

pub fn extract_pdf(bytes: &[u8], out: &mut ContentBuffer, deadline: &Deadline) -> Result<()> {
    let doc = Document::load_mem(bytes)?;

    if doc.is_encrypted() {
        return Err(BlobtextError::parsing("PDF is encrypted"));
    }

    let pages = doc.get_pages();
    debug!(pages = pages.len(), "Extracting PDF text");

    for page_number in pages.keys() {
        deadline.check()?;

        let text = doc
            .extract_text(&[*page_number])
            .map_err(|e| BlobtextError::parsing_with_source(format!("Failed to extract text of page {}", page_number), e))?;

        let text = text.trim();
        if !text.is_empty() {
            out.start_block()?;
            out.push_str(text)?;
        }
    }

    Ok(())
}
