//! Office document text extraction (OOXML and OpenDocument).
//!
//! All supported office formats are ZIP packages of XML parts. Each function
//! opens the package, picks the parts carrying body text, and streams them
//! through the markup walker in `extraction::xml`. Parts are inflated under
//! the input byte limit.
//!
//! - DOCX: `word/document.xml`, one line per paragraph
//! - PPTX: `ppt/slides/slideN.xml` in slide order
//! - ODF text and presentation: `content.xml`
//!
//! Spreadsheets are read cell by cell in `extraction::excel`.
use crate::core::config::ExtractionLimits;
use crate::core::io::{Deadline, read_member};
use crate::error::{BlobtextError, Result, SizeUnit};
use crate::extraction::content::ContentBuffer;
use crate::extraction::xml::{TextMarkup, extract_markup_text};
use std::io::Cursor;
use zip::ZipArchive;

const DOCX_MARKUP: TextMarkup = TextMarkup {
    blocks: &["p"],
    text: Some(&["t"]),
    tabs: &["tab"],
    breaks: &["br", "cr"],
    spaces: &[],
    skip: &["tabs", "instrText"],
};

const PPTX_MARKUP: TextMarkup = TextMarkup {
    blocks: &["p"],
    text: Some(&["t"]),
    tabs: &[],
    breaks: &["br"],
    spaces: &[],
    skip: &[],
};

const ODF_MARKUP: TextMarkup = TextMarkup {
    blocks: &["p", "h"],
    text: None,
    tabs: &["tab"],
    breaks: &["line-break"],
    spaces: &["s"],
    skip: &["note-citation", "tracked-changes"],
};

type Package<'a> = ZipArchive<Cursor<&'a [u8]>>;

fn open_package(bytes: &[u8]) -> Result<Package<'_>> {
    ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| BlobtextError::parsing_with_source("Failed to open office package", e))
}

fn read_part(package: &mut Package<'_>, name: &str, max_bytes: Option<u64>) -> Result<Vec<u8>> {
    let mut part = package
        .by_name(name)
        .map_err(|e| BlobtextError::parsing_with_source(format!("Missing office part '{}'", name), e))?;
    read_member(&mut part, name, max_bytes)
}

/// Fail when any part of the package declares an uncompressed size above `max_bytes`.
///
/// Used where a third-party reader inflates the parts itself.
pub(crate) fn check_part_sizes(bytes: &[u8], max_bytes: Option<u64>) -> Result<()> {
    let Some(limit) = max_bytes else {
        return Ok(());
    };

    let mut package = open_package(bytes)?;
    for i in 0..package.len() {
        let part = package
            .by_index_raw(i)
            .map_err(|e| BlobtextError::parsing_with_source("Failed to read office package entry", e))?;
        if part.size() > limit {
            return Err(BlobtextError::ContentTooLarge {
                limit,
                unit: SizeUnit::Bytes,
            });
        }
    }
    Ok(())
}

/// Extract paragraph text from a DOCX document.
pub fn extract_docx(bytes: &[u8], limits: &ExtractionLimits, out: &mut ContentBuffer) -> Result<()> {
    let mut package = open_package(bytes)?;
    let document = read_part(&mut package, "word/document.xml", limits.max_input_bytes)?;
    extract_markup_text(&document, &DOCX_MARKUP, out)
}

/// Extract slide text from a PPTX presentation, one block per slide.
pub fn extract_pptx(bytes: &[u8], limits: &ExtractionLimits, out: &mut ContentBuffer, deadline: &Deadline) -> Result<()> {
    let mut package = open_package(bytes)?;

    let mut slides: Vec<(u32, String)> = package
        .file_names()
        .filter_map(|name| slide_number(name).map(|n| (n, name.to_string())))
        .collect();
    slides.sort();

    for (_, name) in slides {
        deadline.check()?;
        let slide = read_part(&mut package, &name, limits.max_input_bytes)?;
        out.start_block()?;
        extract_markup_text(&slide, &PPTX_MARKUP, out)?;
    }

    Ok(())
}

fn slide_number(name: &str) -> Option<u32> {
    name.strip_prefix("ppt/slides/slide")?.strip_suffix(".xml")?.parse().ok()
}

/// Extract paragraph and heading text from an OpenDocument text or presentation.
pub fn extract_odf(bytes: &[u8], limits: &ExtractionLimits, out: &mut ContentBuffer) -> Result<()> {
    let mut package = open_package(bytes)?;
    let content = read_part(&mut package, "content.xml", limits.max_input_bytes)?;
    extract_markup_text(&content, &ODF_MARKUP, out)
}
