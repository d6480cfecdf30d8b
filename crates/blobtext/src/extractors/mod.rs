//! Built-in format parsers.
//!
//! Each parser wraps one or more functions from `extraction` as a
//! [`FormatParser`](crate::plugins::FormatParser) plugin. Which parsers exist
//! depends on the enabled crate features.

use crate::Result;
use crate::plugins::registry::FormatParserRegistry;
use std::sync::Arc;

pub mod html;
pub mod image;
pub mod text;

#[cfg(feature = "archives")]
pub mod archive;

#[cfg(feature = "office")]
pub mod office;

#[cfg(feature = "pdf")]
pub mod pdf;

#[cfg(feature = "xml")]
pub mod xml;

pub use html::HtmlExtractor;
pub use image::ImageExtractor;
pub use text::PlainTextExtractor;

#[cfg(feature = "archives")]
pub use archive::{EpubExtractor, TarExtractor, ZipExtractor};

#[cfg(feature = "office")]
pub use office::OfficeExtractor;

#[cfg(feature = "pdf")]
pub use pdf::PdfExtractor;

#[cfg(feature = "xml")]
pub use xml::XmlExtractor;

/// Register every built-in parser enabled by crate features.
///
/// # Example
///
/// ```rust
/// use blobtext::extractors::register_default_parsers;
/// use blobtext::FormatParserRegistry;
///
/// # fn main() -> blobtext::Result<()> {
/// let mut registry = FormatParserRegistry::new();
/// register_default_parsers(&mut registry)?;
/// assert!(registry.list().contains(&"plain-text".to_string()));
/// # Ok(())
/// # }
/// ```
pub fn register_default_parsers(registry: &mut FormatParserRegistry) -> Result<()> {
    registry.register(Arc::new(PlainTextExtractor::new()))?;
    registry.register(Arc::new(HtmlExtractor::new()))?;
    registry.register(Arc::new(ImageExtractor::new()))?;

    #[cfg(feature = "xml")]
    registry.register(Arc::new(XmlExtractor::new()))?;

    #[cfg(feature = "office")]
    registry.register(Arc::new(OfficeExtractor::new()))?;

    #[cfg(feature = "pdf")]
    registry.register(Arc::new(PdfExtractor::new()))?;

    #[cfg(feature = "archives")]
    {
        registry.register(Arc::new(ZipExtractor::new()))?;
        registry.register(Arc::new(TarExtractor::new()))?;
        registry.register(Arc::new(EpubExtractor::new()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_default_parsers() {
        let mut registry = FormatParserRegistry::new();
        register_default_parsers(&mut registry).unwrap();
        let names = registry.list();

        #[allow(unused_mut)]
        let mut expected_count = 3;
        assert!(names.contains(&"plain-text".to_string()));
        assert!(names.contains(&"html".to_string()));
        assert!(names.contains(&"image".to_string()));

        #[cfg(feature = "xml")]
        {
            expected_count += 1;
            assert!(names.contains(&"xml".to_string()));
        }

        #[cfg(feature = "office")]
        {
            expected_count += 1;
            assert!(names.contains(&"office".to_string()));
        }

        #[cfg(feature = "pdf")]
        {
            expected_count += 1;
            assert!(names.contains(&"pdf".to_string()));
        }

        #[cfg(feature = "archives")]
        {
            expected_count += 3;
            assert!(names.contains(&"zip".to_string()));
            assert!(names.contains(&"tar".to_string()));
            assert!(names.contains(&"epub".to_string()));
        }

        assert_eq!(names.len(), expected_count);
    }

    #[test]
    fn test_routing() {
        let registry = FormatParserRegistry::with_defaults().unwrap();
        assert_eq!(registry.get("text/html").unwrap().name(), "html");
        assert_eq!(registry.get("text/csv").unwrap().name(), "plain-text");
        assert_eq!(registry.get("image/png").unwrap().name(), "image");

        #[cfg(feature = "xml")]
        assert_eq!(registry.get("image/svg+xml").unwrap().name(), "xml");
    }
}
