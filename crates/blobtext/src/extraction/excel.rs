//! Spreadsheet text extraction with `calamine`.
//!
//! Every worksheet is read row by row; each non-empty row becomes one line
//! with its cells separated by tabs. Shared strings, inline strings, numbers,
//! booleans, dates and cached formula results are all emitted.
//!
//! # Example
//!
//! ```rust,no_run
//! use blobtext::ExtractionLimits;
//! use blobtext::core::io::Deadline;
//! use blobtext::extraction::{ContentBuffer, extract_xlsx};
//!
//! # fn example(workbook: &[u8]) -> blobtext::Result<()> {
//! let mut out = ContentBuffer::unbounded();
//! extract_xlsx(workbook, &ExtractionLimits::default(), &mut out, &Deadline::unlimited())?;
//! println!("{}", out.as_str());
//! # Ok(())
//! # }
//! ```
use crate::core::config::ExtractionLimits;
use crate::core::io::Deadline;
use crate::error::{BlobtextError, Result};
use crate::extraction::content::ContentBuffer;
use crate::extraction::office::check_part_sizes;
use calamine::{Data, Ods, Range, Reader, Xlsx};
use std::io::{Cursor, Read, Seek};
use tracing::{debug, warn};

/// Extract cell text from an XLSX workbook.
pub fn extract_xlsx(bytes: &[u8], limits: &ExtractionLimits, out: &mut ContentBuffer, deadline: &Deadline) -> Result<()> {
    check_part_sizes(bytes, limits.max_input_bytes)?;
    let workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| BlobtextError::parsing(format!("Failed to parse XLSX: {}", e)))?;
    extract_workbook(workbook, out, deadline)
}

/// Extract cell text from an OpenDocument spreadsheet.
pub fn extract_ods(bytes: &[u8], limits: &ExtractionLimits, out: &mut ContentBuffer, deadline: &Deadline) -> Result<()> {
    check_part_sizes(bytes, limits.max_input_bytes)?;
    let workbook: Ods<_> =
        Ods::new(Cursor::new(bytes)).map_err(|e| BlobtextError::parsing(format!("Failed to parse ODS: {}", e)))?;
    extract_workbook(workbook, out, deadline)
}

fn extract_workbook<RS, R>(mut workbook: R, out: &mut ContentBuffer, deadline: &Deadline) -> Result<()>
where
    RS: Read + Seek,
    R: Reader<RS>,
{
    let sheet_names = workbook.sheet_names();
    debug!(sheets = sheet_names.len(), "Reading workbook");

    for name in &sheet_names {
        deadline.check()?;
        match workbook.worksheet_range(name) {
            Ok(range) => push_sheet(&range, out)?,
            Err(e) => warn!(sheet = %name, error = ?e, "Skipping worksheet that could not be read"),
        }
    }

    Ok(())
}

fn push_sheet(range: &Range<Data>, out: &mut ContentBuffer) -> Result<()> {
    for row in range.rows() {
        let Some(last) = row.iter().rposition(|cell| !matches!(cell, Data::Empty)) else {
            continue;
        };

        out.start_block()?;
        for (i, cell) in row[..=last].iter().enumerate() {
            if i > 0 {
                out.push('\t')?;
            }
            push_cell(cell, out)?;
        }
    }
    Ok(())
}

fn push_cell(cell: &Data, out: &mut ContentBuffer) -> Result<()> {
    match cell {
        Data::Empty => Ok(()),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => out.push_str(s),
        Data::Float(f) => out.push_str(&f.to_string()),
        Data::Int(i) => out.push_str(&i.to_string()),
        Data::Bool(b) => out.push_str(if *b { "true" } else { "false" }),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(datetime) => out.push_str(&datetime.format("%Y-%m-%d %H:%M:%S").to_string()),
            None => out.push_str(&dt.as_f64().to_string()),
        },
        Data::Error(e) => out.push_str(&format!("#ERR: {:?}", e)),
    }
}
