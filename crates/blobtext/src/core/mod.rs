//! Core stage logic.
//!
//! This module holds everything between an inbound record and the batch sink:
//!
//! - **Configuration** (`config`, `validation`): loading `StageConfig` and
//!   reporting semantic issues at startup
//! - **Detection** (`mime`): inferring a payload's format from its bytes
//! - **I/O** (`io`): reading a stream under size, deadline and cancel limits
//! - **Engine** (`engine`): the `ContentExtractor` capability and its
//!   auto-detecting implementation
//! - **Errors** (`classify`): stable codes and the per-record error wrapper
//! - **Loop** (`processor`): per-record processing with failure isolation

pub mod classify;
pub mod config;
pub mod engine;
pub mod io;
pub mod mime;
pub mod processor;
pub mod validation;

pub use classify::{ErrorCode, RecordError, classify};
pub use config::{ExtractionLimits, StageConfig};
pub use engine::{AutoDetectExtractor, ContentExtractor, ExtractionContext};
pub use processor::{BatchSink, ContentExtractProcessor, ProcessingStats, VecBatch};
pub use validation::{ConfigGroup, ConfigIssue, validate};
