//! Output record construction.

use super::{Field, Record};
use std::sync::Arc;

pub const FILE_INFO_FIELD: &str = "fileInfo";
pub const FILE_REF_FIELD: &str = "fileRef";
pub const CONTENT_FIELD: &str = "content";

/// Lineage entry appended to records produced by this stage.
pub const STAGE_NAME: &str = "content-extract";

/// Build the output record for `original` carrying `content`.
///
/// The new root is a map with exactly `fileInfo`, `fileRef` and `content`.
/// The first two share the input's subtrees (a missing field becomes
/// `Field::Null`); the input record is not modified.
pub fn reshape(original: &Record, content: impl Into<String>) -> Record {
    let carried = |name: &str| {
        original
            .get(&format!("/{name}"))
            .map(Arc::clone)
            .unwrap_or_else(|| Arc::new(Field::Null))
    };

    let root = Field::map([
        (FILE_INFO_FIELD, carried(FILE_INFO_FIELD)),
        (FILE_REF_FIELD, carried(FILE_REF_FIELD)),
        (CONTENT_FIELD, Arc::new(Field::String(content.into()))),
    ]);

    original.derive(STAGE_NAME, root)
}
