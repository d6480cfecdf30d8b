//! Raw per-format text extraction.
//!
//! Functions here know one format each and write into a [`ContentBuffer`].
//! Format detection and parser selection live in `core::engine`; the
//! `extractors` module wraps these functions as registry plugins.

pub mod content;
pub mod html;
pub mod text;

#[cfg(feature = "archives")]
pub mod archive;

#[cfg(feature = "office")]
pub mod excel;

#[cfg(feature = "office")]
pub mod office;

#[cfg(feature = "pdf")]
pub mod pdf;

#[cfg(any(feature = "xml", feature = "office"))]
pub mod xml;

pub use content::{BufferMark, ContentBuffer};
pub use html::html_to_text;
pub use text::decode_text;

#[cfg(feature = "archives")]
pub use archive::{extract_epub, extract_tar, extract_zip};

#[cfg(feature = "office")]
pub use excel::{extract_ods, extract_xlsx};

#[cfg(feature = "office")]
pub use office::{extract_docx, extract_odf, extract_pptx};

#[cfg(feature = "pdf")]
pub use pdf::extract_pdf;

#[cfg(any(feature = "xml", feature = "office"))]
pub use xml::extract_xml_text;
