//! Content extraction engine.
//!
//! [`ContentExtractor`] is the boundary between the processing loop and
//! whatever turns a byte stream into text. The built-in
//! [`AutoDetectExtractor`] reads the stream under the configured limits,
//! detects the format from the bytes, and dispatches to the highest-priority
//! parser in its [`FormatParserRegistry`].
//!
//! Parsers run against an [`ExtractionContext`], which owns the bounded
//! output buffer and the deadline, and lets container formats (archives,
//! e-books) hand their entries back to the registry with depth tracking.

use crate::core::config::ExtractionLimits;
use crate::core::io::{CancellationFlag, Deadline, read_stream};
use crate::core::mime::{PLAIN_TEXT_MIME_TYPE, detect_mime_type_from_bytes};
use crate::extraction::content::ContentBuffer;
use crate::plugins::registry::FormatParserRegistry;
use crate::types::ExtractionResult;
use crate::Result;
use std::io::Read;
use std::sync::Arc;
use tracing::debug;

/// Capability to turn a byte stream of unknown format into plain text.
///
/// Implementations consume the stream forward-only and must drop it before
/// returning. Extraction is all-or-nothing: on error no text is returned.
pub trait ContentExtractor: Send + Sync {
    /// Extract the text of `stream`.
    ///
    /// # Errors
    ///
    /// - `BlobtextError::Io` - the stream could not be read
    /// - `BlobtextError::Parsing` / `BlobtextError::UnsupportedFormat` - the
    ///   content was read but could not be decoded
    /// - `BlobtextError::ContentTooLarge` - a size limit was exceeded
    /// - `BlobtextError::TimedOut` / `BlobtextError::Cancelled` - interrupted
    fn extract(&self, stream: Box<dyn Read + Send>) -> Result<ExtractionResult>;

    /// Release resources held by the extractor.
    fn shutdown(&self) -> Result<()> {
        Ok(())
    }
}

/// State threaded through one extraction pass.
pub struct ExtractionContext<'a> {
    registry: &'a FormatParserRegistry,
    limits: &'a ExtractionLimits,
    deadline: Deadline,
    depth: usize,
    output: ContentBuffer,
}

impl<'a> ExtractionContext<'a> {
    pub fn new(registry: &'a FormatParserRegistry, limits: &'a ExtractionLimits, deadline: Deadline) -> Self {
        Self {
            registry,
            limits,
            deadline,
            depth: 0,
            output: ContentBuffer::new(limits.max_content_chars),
        }
    }

    /// Fail with `TimedOut` or `Cancelled` if the pass must stop.
    pub fn checkpoint(&self) -> Result<()> {
        self.deadline.check()
    }

    /// Nesting level of the content being parsed; 0 for the record's payload.
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn limits(&self) -> &'a ExtractionLimits {
        self.limits
    }

    pub fn deadline(&self) -> &Deadline {
        &self.deadline
    }

    /// Output buffer receiving extracted text.
    pub fn out(&mut self) -> &mut ContentBuffer {
        &mut self.output
    }

    pub fn into_output(self) -> ContentBuffer {
        self.output
    }

    /// Detect the format of `content` and run the matching parser.
    ///
    /// Returns the detected MIME type.
    ///
    /// # Errors
    ///
    /// `BlobtextError::UnsupportedFormat` if no parser handles the format,
    /// otherwise whatever the parser reports.
    pub fn dispatch(&mut self, content: &[u8]) -> Result<String> {
        self.checkpoint()?;

        let mime_type = detect_mime_type_from_bytes(content);
        let parser = self.registry.get(&mime_type)?;

        debug!(
            mime_type = %mime_type,
            parser = parser.name(),
            bytes = content.len(),
            depth = self.depth,
            "Dispatching content to format parser"
        );

        parser.parse(content, &mime_type, self)?;
        Ok(mime_type)
    }

    /// Extract a nested payload (an archive entry, an e-book chapter).
    ///
    /// Returns `Ok(false)` without parsing when the nesting limit is reached.
    pub fn extract_embedded(&mut self, name: &str, content: &[u8]) -> Result<bool> {
        if self.depth >= self.limits.max_archive_depth {
            debug!(
                entry = name,
                depth = self.depth,
                max_depth = self.limits.max_archive_depth,
                "Skipping entry beyond archive depth limit"
            );
            return Ok(false);
        }

        self.depth += 1;
        let result = self.dispatch(content);
        self.depth -= 1;

        result.map(|_| true)
    }
}

/// Extractor that detects formats from content and dispatches to a parser registry.
///
/// # Example
///
/// ```rust
/// use blobtext::{AutoDetectExtractor, ContentExtractor, ExtractionLimits};
/// use std::io::Cursor;
///
/// # fn main() -> blobtext::Result<()> {
/// let extractor = AutoDetectExtractor::new(ExtractionLimits::default())?;
/// let result = extractor.extract(Box::new(Cursor::new(b"<p>Hi &amp; bye</p>".to_vec())))?;
/// assert_eq!(result.content, "Hi & bye");
/// assert_eq!(result.mime_type, "text/html");
/// # Ok(())
/// # }
/// ```
pub struct AutoDetectExtractor {
    registry: Arc<FormatParserRegistry>,
    limits: ExtractionLimits,
    cancel: CancellationFlag,
}

impl AutoDetectExtractor {
    /// Create an extractor with every built-in parser registered.
    pub fn new(limits: ExtractionLimits) -> Result<Self> {
        Ok(Self::with_registry(Arc::new(FormatParserRegistry::with_defaults()?), limits))
    }

    /// Create an extractor over a caller-built registry.
    pub fn with_registry(registry: Arc<FormatParserRegistry>, limits: ExtractionLimits) -> Self {
        Self {
            registry,
            limits,
            cancel: CancellationFlag::new(),
        }
    }

    /// Use `flag` to abort in-flight extractions.
    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancel = flag;
        self
    }

    pub fn cancellation_flag(&self) -> &CancellationFlag {
        &self.cancel
    }

    pub fn registry(&self) -> &FormatParserRegistry {
        &self.registry
    }

    pub fn limits(&self) -> &ExtractionLimits {
        &self.limits
    }

    /// Extract text from bytes already in memory.
    pub fn extract_bytes(&self, content: &[u8]) -> Result<ExtractionResult> {
        self.run(content, self.deadline())
    }

    fn deadline(&self) -> Deadline {
        Deadline::start(self.limits.timeout, Some(self.cancel.clone()))
    }

    fn run(&self, content: &[u8], deadline: Deadline) -> Result<ExtractionResult> {
        if content.is_empty() {
            deadline.check()?;
            return Ok(ExtractionResult {
                content: String::new(),
                mime_type: PLAIN_TEXT_MIME_TYPE.to_string(),
            });
        }

        let mut ctx = ExtractionContext::new(&self.registry, &self.limits, deadline);
        let mime_type = ctx.dispatch(content)?;
        let output = ctx.into_output();

        debug!(
            mime_type = %mime_type,
            content.chars = output.len_chars(),
            "Extraction finished"
        );

        Ok(ExtractionResult {
            content: output.into_string(),
            mime_type,
        })
    }
}

impl ContentExtractor for AutoDetectExtractor {
    fn extract(&self, stream: Box<dyn Read + Send>) -> Result<ExtractionResult> {
        let deadline = self.deadline();
        let content = read_stream(stream, self.limits.max_input_bytes, &deadline)?;
        self.run(&content, deadline)
    }

    fn shutdown(&self) -> Result<()> {
        self.registry.shutdown_all()
    }
}
