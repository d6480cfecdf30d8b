//! blobtext - content extraction stage for record pipelines
//!
//! blobtext receives records whose `/fileRef` field points at a binary
//! payload of unknown format, extracts the payload's plain text, and emits a
//! new record holding `fileInfo`, `fileRef` and `content`. A record that
//! cannot be read or decoded is diverted to an error channel with a stable
//! error code; the rest of the batch keeps flowing.
//!
//! # Quick Start
//!
//! ```rust
//! use blobtext::{BytesFileRef, ContentExtractProcessor, Field, Record, StageConfig, VecBatch};
//! use std::sync::Arc;
//!
//! # fn main() -> blobtext::Result<()> {
//! let processor = ContentExtractProcessor::new(StageConfig::default())?;
//! assert!(processor.init().is_empty());
//!
//! let record = Record::new(
//!     "doc-1",
//!     Field::map([
//!         ("fileInfo", Arc::new(Field::string("notes.txt"))),
//!         ("fileRef", Arc::new(Field::file_ref(BytesFileRef::new(b"hello world".to_vec())))),
//!     ]),
//! );
//!
//! let mut batch = VecBatch::default();
//! processor.process_batch([record], &mut batch);
//! assert_eq!(batch.records[0].get("/content").unwrap().as_str(), Some("hello world"));
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Record model** (`record`): immutable field trees, file references, reshaping
//! - **Core** (`core`): stage config and validation, format detection, guarded
//!   stream reads, the extraction engine, error classification, the processing loop
//! - **Plugins** (`plugins`): `FormatParser` trait and priority-based registry
//! - **Extraction** (`extraction`): raw per-format text extraction functions
//! - **Extractors** (`extractors`): built-in `FormatParser` implementations

#![deny(unsafe_code)]

pub mod core;
pub mod error;
pub mod extraction;
pub mod extractors;
pub mod plugins;
pub mod record;
pub mod types;

pub use error::{BlobtextError, Result, SizeUnit};
pub use types::ExtractionResult;

pub use record::{BytesFileRef, Field, FieldType, FileRef, LocalFileRef, Record, RecordHeader, reshape};

pub use crate::core::classify::{ErrorCode, RecordError, classify};
pub use crate::core::config::{ExtractionLimits, StageConfig};
pub use crate::core::engine::{AutoDetectExtractor, ContentExtractor, ExtractionContext};
pub use crate::core::io::CancellationFlag;
pub use crate::core::mime::detect_mime_type_from_bytes;
pub use crate::core::processor::{BatchSink, ContentExtractProcessor, ProcessingStats, VecBatch};
pub use crate::core::validation::{ConfigGroup, ConfigIssue, validate};

pub use plugins::registry::FormatParserRegistry;
pub use plugins::{FormatParser, Plugin};
