//! Format parser plugin trait.

use crate::Result;
use crate::core::engine::ExtractionContext;
use crate::plugins::Plugin;

/// Turns the bytes of one format into plain text.
///
/// Parsers write into the context's output buffer instead of returning a
/// string, so the content limit applies while text accumulates. Long-running
/// parsers should call [`ExtractionContext::checkpoint`] between units of work
/// (pages, entries, slides) so deadlines and cancellation take effect.
///
/// # Errors
///
/// - `BlobtextError::Parsing` - the content is corrupt or undecodable
/// - `BlobtextError::ContentTooLarge` - raised by the output buffer
/// - `BlobtextError::TimedOut` / `BlobtextError::Cancelled` - raised by checkpoints
///
/// I/O errors are reserved for the input stream; parsers working on
/// in-memory bytes must not report decoder failures as `Io`.
pub trait FormatParser: Plugin {
    /// Extract the text of `content` into `ctx`.
    fn parse(&self, content: &[u8], mime_type: &str, ctx: &mut ExtractionContext<'_>) -> Result<()>;

    /// MIME types this parser handles. A `type/*` entry matches any subtype.
    fn supported_mime_types(&self) -> &[&str];

    /// Higher wins when several parsers claim a MIME type. Built-ins use 50.
    fn priority(&self) -> i32 {
        50
    }
}
