//! Archive extractors (ZIP, TAR, EPUB).

use crate::Result;
use crate::core::engine::ExtractionContext;
use crate::core::mime::{EPUB_MIME_TYPE, TAR_MIME_TYPE, ZIP_MIME_TYPE};
use crate::extraction::archive::{extract_epub, extract_tar, extract_zip};
use crate::plugins::{FormatParser, Plugin};

macro_rules! archive_extractor {
    ($name:ident, $plugin_name:literal, $description:literal, $mime_types:expr, $extract:path) => {
        #[doc = $description]
        pub struct $name;

        impl $name {
            pub fn new() -> Self {
                Self
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Plugin for $name {
            fn name(&self) -> &str {
                $plugin_name
            }

            fn version(&self) -> String {
                env!("CARGO_PKG_VERSION").to_string()
            }

            fn initialize(&self) -> Result<()> {
                Ok(())
            }

            fn shutdown(&self) -> Result<()> {
                Ok(())
            }

            fn description(&self) -> &str {
                $description
            }
        }

        impl FormatParser for $name {
            fn parse(&self, content: &[u8], _mime_type: &str, ctx: &mut ExtractionContext<'_>) -> Result<()> {
                $extract(content, ctx)
            }

            fn supported_mime_types(&self) -> &[&str] {
                $mime_types
            }
        }
    };
}

archive_extractor!(
    ZipExtractor,
    "zip",
    "Extracts the text of every entry of a ZIP archive",
    &[ZIP_MIME_TYPE, "application/x-zip-compressed"],
    extract_zip
);

archive_extractor!(
    TarExtractor,
    "tar",
    "Extracts the text of every file of a TAR archive",
    &[TAR_MIME_TYPE, "application/tar"],
    extract_tar
);

archive_extractor!(
    EpubExtractor,
    "epub",
    "Extracts chapter text from EPUB books",
    &[EPUB_MIME_TYPE],
    extract_epub
);
