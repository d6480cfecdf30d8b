//! Plugin system for format parsers.
//!
//! Parsers implement [`FormatParser`] (which builds on the lifecycle trait
//! [`Plugin`]) and are stored as `Arc<dyn FormatParser>` in a
//! [`registry::FormatParserRegistry`]. The registry picks the highest-priority
//! parser for a detected MIME type, falling back to `type/*` wildcards.
//!
//! # Example
//!
//! ```rust
//! use blobtext::core::engine::ExtractionContext;
//! use blobtext::plugins::registry::FormatParserRegistry;
//! use blobtext::plugins::{FormatParser, Plugin};
//! use blobtext::Result;
//! use std::sync::Arc;
//!
//! struct UpperCaseParser;
//!
//! impl Plugin for UpperCaseParser {
//!     fn name(&self) -> &str { "upper-case" }
//!     fn version(&self) -> String { "1.0.0".to_string() }
//!     fn initialize(&self) -> Result<()> { Ok(()) }
//!     fn shutdown(&self) -> Result<()> { Ok(()) }
//! }
//!
//! impl FormatParser for UpperCaseParser {
//!     fn parse(&self, content: &[u8], _mime_type: &str, ctx: &mut ExtractionContext<'_>) -> Result<()> {
//!         ctx.out().push_str(&String::from_utf8_lossy(content).to_uppercase())
//!     }
//!
//!     fn supported_mime_types(&self) -> &[&str] {
//!         &["text/plain"]
//!     }
//!
//!     fn priority(&self) -> i32 {
//!         100
//!     }
//! }
//!
//! # fn main() -> Result<()> {
//! let mut registry = FormatParserRegistry::with_defaults()?;
//! registry.register(Arc::new(UpperCaseParser))?;
//! assert_eq!(registry.get("text/plain")?.name(), "upper-case");
//! # Ok(())
//! # }
//! ```

pub mod parser;
pub mod registry;
pub mod traits;

pub use parser::FormatParser;
pub use traits::Plugin;
