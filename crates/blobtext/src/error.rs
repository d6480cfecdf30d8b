//! Error types for blobtext.
//!
//! Every fallible operation in the crate returns [`BlobtextError`]. Error
//! chains are preserved with `#[source]` so the record-level error routed to
//! the host still carries the underlying decoder or I/O cause.
//!
//! # Error Handling Philosophy
//!
//! **I/O errors stay I/O errors:**
//! - `BlobtextError::Io` (from `std::io::Error`) covers failures to open or read
//!   the byte stream behind a file reference.
//! - Parsers never re-wrap an `io::Error` coming from the stream as a parsing
//!   failure; the distinction drives retry decisions downstream.
//!
//! **Content errors are wrapped with context:**
//! - `Parsing` - corrupt or undecodable content
//! - `UnsupportedFormat` - no parser for the detected format
//! - `ContentTooLarge` - a configured size limit was exceeded
//! - `TimedOut` / `Cancelled` - the extraction deadline or cancel flag fired
//! - `Validation` - invalid configuration or record shape
//!
//! # Example
//!
//! ```rust
//! use blobtext::{BlobtextError, Result};
//!
//! fn load(path: &str) -> Result<String> {
//!     let content = std::fs::read_to_string(path)?;
//!
//!     if content.is_empty() {
//!         return Err(BlobtextError::validation(format!("File is empty: {}", path)));
//!     }
//!
//!     Ok(content)
//! }
//! ```
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Result type alias using `BlobtextError`.
pub type Result<T> = std::result::Result<T, BlobtextError>;

/// Unit of a size limit reported by [`BlobtextError::ContentTooLarge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeUnit {
    /// Raw bytes read from the input stream.
    Bytes,
    /// Characters of extracted text.
    Chars,
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizeUnit::Bytes => f.write_str("bytes"),
            SizeUnit::Chars => f.write_str("characters"),
        }
    }
}

/// Main error type for all blobtext operations.
#[derive(Debug, Error)]
pub enum BlobtextError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parsing error: {message}")]
    Parsing {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Validation error: {message}")]
    Validation {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Content too large: limit of {limit} {unit} exceeded")]
    ContentTooLarge { limit: u64, unit: SizeUnit },

    #[error("Extraction timed out after {0:?}")]
    TimedOut(Duration),

    #[error("Extraction cancelled")]
    Cancelled,

    #[error("Plugin error in '{plugin_name}': {message}")]
    Plugin { message: String, plugin_name: String },

    #[error("{0}")]
    Other(String),
}

#[cfg(feature = "pdf")]
impl From<lopdf::Error> for BlobtextError {
    fn from(err: lopdf::Error) -> Self {
        BlobtextError::Parsing {
            message: err.to_string(),
            source: Some(Box::new(err)),
        }
    }
}

macro_rules! error_constructor {
    ($name:ident, $variant:ident) => {
        pastey::paste! {
            #[doc = "Create a " $variant " error"]
            pub fn $name<S: Into<String>>(message: S) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: None,
                }
            }

            #[doc = "Create a " $variant " error with source"]
            pub fn [<$name _with_source>]<S: Into<String>, E: std::error::Error + Send + Sync + 'static>(
                message: S,
                source: E,
            ) -> Self {
                Self::$variant {
                    message: message.into(),
                    source: Some(Box::new(source)),
                }
            }
        }
    };
}

impl BlobtextError {
    error_constructor!(parsing, Parsing);
    error_constructor!(validation, Validation);

    /// Whether the error originated from reading the byte stream.
    pub fn is_io(&self) -> bool {
        matches!(self, BlobtextError::Io(_))
    }
}
