//! Archive extraction.
//!
//! ZIP and TAR entries are handed back to the format registry one by one
//! through [`ExtractionContext::extract_embedded`], so an archive of PDFs or
//! an archive of archives is extracted the same way as a single payload.
//! Nesting stops at the configured depth.
//!
//! An entry that cannot be decoded (unsupported or corrupt content) is
//! skipped with a warning. Size limits, deadlines and cancellation abort
//! the whole archive.
use crate::core::engine::ExtractionContext;
use crate::core::io::read_member;
use crate::error::{BlobtextError, Result};
use crate::extraction::html::html_to_text;
use crate::extraction::text::decode_text;
use std::io::Cursor;
use tar::Archive as TarArchive;
use tracing::warn;
use zip::ZipArchive;

/// Extract every file entry of a ZIP archive.
pub fn extract_zip(bytes: &[u8], ctx: &mut ExtractionContext<'_>) -> Result<()> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| BlobtextError::parsing_with_source("Failed to read ZIP archive", e))?;

    for i in 0..archive.len() {
        ctx.checkpoint()?;

        let mut file = archive
            .by_index(i)
            .map_err(|e| BlobtextError::parsing_with_source("Failed to read ZIP entry", e))?;
        if file.is_dir() {
            continue;
        }

        let name = file.name().to_string();
        let data = read_member(&mut file, &name, ctx.limits().max_input_bytes);
        drop(file);

        extract_entry(ctx, &name, data)?;
    }

    Ok(())
}

/// Extract every regular file of a TAR archive.
pub fn extract_tar(bytes: &[u8], ctx: &mut ExtractionContext<'_>) -> Result<()> {
    let mut archive = TarArchive::new(Cursor::new(bytes));
    let entries = archive
        .entries()
        .map_err(|e| BlobtextError::parsing_with_source("Failed to read TAR archive", e))?;

    for entry_result in entries {
        ctx.checkpoint()?;

        let mut entry =
            entry_result.map_err(|e| BlobtextError::parsing_with_source("Failed to read TAR entry", e))?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let name = entry
            .path()
            .map_err(|e| BlobtextError::parsing_with_source("Failed to read TAR entry path", e))?
            .to_string_lossy()
            .to_string();
        let data = read_member(&mut entry, &name, ctx.limits().max_input_bytes);

        extract_entry(ctx, &name, data)?;
    }

    Ok(())
}

/// Extract the text of the XHTML documents of an EPUB book, in archive order.
pub fn extract_epub(bytes: &[u8], ctx: &mut ExtractionContext<'_>) -> Result<()> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| BlobtextError::parsing_with_source("Failed to read EPUB container", e))?;

    for i in 0..archive.len() {
        ctx.checkpoint()?;

        let mut file = archive
            .by_index(i)
            .map_err(|e| BlobtextError::parsing_with_source("Failed to read EPUB entry", e))?;
        let name = file.name().to_string();
        if file.is_dir() || !is_xhtml(&name) {
            continue;
        }

        let data = read_member(&mut file, &name, ctx.limits().max_input_bytes)?;
        let text = html_to_text(&decode_text(&data)?);
        if !text.is_empty() {
            ctx.out().start_block()?;
            ctx.out().push_str(&text)?;
        }
    }

    Ok(())
}

fn is_xhtml(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    [".xhtml", ".html", ".htm"].iter().any(|ext| lower.ends_with(ext))
}

/// Extract one entry into its own block, rolling back its output when it is skipped.
fn extract_entry(ctx: &mut ExtractionContext<'_>, name: &str, data: Result<Vec<u8>>) -> Result<()> {
    let before = ctx.out().mark();

    let outcome = data.and_then(|data| {
        ctx.out().start_block()?;
        let after_break = ctx.out().mark();
        let extracted = ctx.extract_embedded(name, &data)?;
        Ok(extracted && ctx.out().mark() != after_break)
    });

    match outcome {
        Ok(true) => Ok(()),
        Ok(false) => {
            ctx.out().rollback(before);
            Ok(())
        }
        Err(err @ (BlobtextError::Parsing { .. } | BlobtextError::UnsupportedFormat(_))) => {
            warn!(entry = name, error = %err, "Skipping archive entry that could not be extracted");
            ctx.out().rollback(before);
            Ok(())
        }
        Err(err) => Err(err),
    }
}
