use serde::{Deserialize, Serialize};

/// Successful outcome of one extraction pass.
///
/// Extraction is all-or-nothing: a failed pass produces an error and never a
/// partially filled result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Plain text extracted from the payload.
    pub content: String,
    /// MIME type detected from the payload's bytes.
    pub mime_type: String,
}
