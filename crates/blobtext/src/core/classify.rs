//! Error classification for record processing.
//!
//! Every failure that reaches the processing boundary is mapped to an
//! [`ErrorCode`] and wrapped in a [`RecordError`] carrying the failed record.
//! I/O failures and content failures always receive different codes.

use crate::{BlobtextError, Record};
use serde::{Deserialize, Serialize};
use std::error::Error as _;
use std::fmt;
use thiserror::Error;

/// Stable error codes reported by the stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    #[serde(rename = "CONTENT_00")]
    ConfigInvalid,
    #[serde(rename = "CONTENT_01")]
    StreamIo,
    #[serde(rename = "CONTENT_02")]
    ParseFailed,
    #[serde(rename = "CONTENT_03")]
    ContentTooLarge,
    #[serde(rename = "CONTENT_04")]
    Interrupted,
    #[serde(rename = "CONTENT_05")]
    InvalidRecord,
}

impl ErrorCode {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalid => "CONTENT_00",
            ErrorCode::StreamIo => "CONTENT_01",
            ErrorCode::ParseFailed => "CONTENT_02",
            ErrorCode::ContentTooLarge => "CONTENT_03",
            ErrorCode::Interrupted => "CONTENT_04",
            ErrorCode::InvalidRecord => "CONTENT_05",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            ErrorCode::ConfigInvalid => "Invalid stage configuration",
            ErrorCode::StreamIo => "Failed to read the file stream",
            ErrorCode::ParseFailed => "Failed to parse the file content",
            ErrorCode::ContentTooLarge => "Extracted content exceeds the configured limit",
            ErrorCode::Interrupted => "Extraction was interrupted",
            ErrorCode::InvalidRecord => "Record has no readable file reference",
        }
    }

    /// Whether a later attempt on the same record may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorCode::StreamIo | ErrorCode::Interrupted)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Map an extraction failure to its stable code.
pub fn classify(error: &BlobtextError) -> ErrorCode {
    match error {
        BlobtextError::Io(_) => ErrorCode::StreamIo,
        BlobtextError::Parsing { .. }
        | BlobtextError::UnsupportedFormat(_)
        | BlobtextError::Plugin { .. }
        | BlobtextError::Other(_) => ErrorCode::ParseFailed,
        BlobtextError::ContentTooLarge { .. } => ErrorCode::ContentTooLarge,
        BlobtextError::TimedOut(_) | BlobtextError::Cancelled => ErrorCode::Interrupted,
        BlobtextError::Validation { .. } => ErrorCode::InvalidRecord,
    }
}

/// A failed record routed to the error channel.
#[derive(Debug, Error)]
#[error("{code} for record '{}': {message}", .record.id())]
pub struct RecordError {
    record: Record,
    code: ErrorCode,
    message: String,
    #[source]
    source: BlobtextError,
}

impl RecordError {
    /// Classify `source` and attach it to `record`.
    ///
    /// The message is the code's description followed by the full cause chain.
    pub fn new(record: Record, source: BlobtextError) -> Self {
        let code = classify(&source);
        let mut message = format!("{}: {}", code.description(), source);
        let mut cause = source.source();
        while let Some(err) = cause {
            message.push_str(": ");
            message.push_str(&err.to_string());
            cause = err.source();
        }

        Self {
            record,
            code,
            message,
            source,
        }
    }

    pub fn record(&self) -> &Record {
        &self.record
    }

    pub fn record_id(&self) -> &str {
        self.record.id()
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn cause(&self) -> &BlobtextError {
        &self.source
    }
}
