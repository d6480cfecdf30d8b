//! Pipeline record model.
//!
//! A [`Record`] is an immutable tree of named [`Field`]s plus a header that
//! identifies where the record came from. Children are held behind `Arc` so a
//! derived record can share subtrees with its parent without copying them,
//! and without any way to mutate the parent through the child.
//!
//! Fields are addressed with slash paths: `/` is the root, `/fileRef` a
//! top-level map entry, `/items/0` the first element of a list.

pub mod file_ref;
pub mod reshape;

pub use file_ref::{BytesFileRef, FileRef, LocalFileRef};
pub use reshape::{CONTENT_FIELD, FILE_INFO_FIELD, FILE_REF_FIELD, reshape};

use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;

/// A single node in a record's field tree.
#[derive(Debug, Clone)]
pub enum Field {
    Null,
    Bool(bool),
    Long(i64),
    Double(f64),
    String(String),
    Bytes(Vec<u8>),
    /// Capability to open the binary content a record points at.
    FileRef(Arc<dyn FileRef>),
    List(Vec<Arc<Field>>),
    Map(IndexMap<String, Arc<Field>>),
}

/// Type tag of a [`Field`], used in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Null,
    Bool,
    Long,
    Double,
    String,
    Bytes,
    FileRef,
    List,
    Map,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::Null => "NULL",
            FieldType::Bool => "BOOLEAN",
            FieldType::Long => "LONG",
            FieldType::Double => "DOUBLE",
            FieldType::String => "STRING",
            FieldType::Bytes => "BYTE_ARRAY",
            FieldType::FileRef => "FILE_REF",
            FieldType::List => "LIST",
            FieldType::Map => "MAP",
        };
        f.write_str(name)
    }
}

impl Field {
    /// Build a map field from `(name, field)` pairs, keeping insertion order.
    pub fn map<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Arc<Field>)>,
    {
        Field::Map(entries.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }

    pub fn string(value: impl Into<String>) -> Self {
        Field::String(value.into())
    }

    pub fn file_ref(file_ref: impl FileRef + 'static) -> Self {
        Field::FileRef(Arc::new(file_ref))
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            Field::Null => FieldType::Null,
            Field::Bool(_) => FieldType::Bool,
            Field::Long(_) => FieldType::Long,
            Field::Double(_) => FieldType::Double,
            Field::String(_) => FieldType::String,
            Field::Bytes(_) => FieldType::Bytes,
            Field::FileRef(_) => FieldType::FileRef,
            Field::List(_) => FieldType::List,
            Field::Map(_) => FieldType::Map,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Field::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Field::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_file_ref(&self) -> Option<&Arc<dyn FileRef>> {
        match self {
            Field::FileRef(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&IndexMap<String, Arc<Field>>> {
        match self {
            Field::Map(m) => Some(m),
            _ => None,
        }
    }

    fn child(&self, segment: &str) -> Option<&Arc<Field>> {
        match self {
            Field::Map(m) => m.get(segment),
            Field::List(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        }
    }
}

/// Record identity and lineage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordHeader {
    source_id: String,
    stages_path: Vec<String>,
}

impl RecordHeader {
    pub fn new(source_id: impl Into<String>) -> Self {
        Self {
            source_id: source_id.into(),
            stages_path: Vec::new(),
        }
    }

    /// Identifier assigned by the origin of the record.
    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Stages this record has passed through, oldest first.
    pub fn stages_path(&self) -> &[String] {
        &self.stages_path
    }
}

/// An immutable record flowing through the pipeline.
///
/// Cloning is cheap: the header is small and the field tree is shared.
#[derive(Debug, Clone)]
pub struct Record {
    header: RecordHeader,
    root: Arc<Field>,
}

impl Record {
    pub fn new(source_id: impl Into<String>, root: Field) -> Self {
        Self {
            header: RecordHeader::new(source_id),
            root: Arc::new(root),
        }
    }

    /// Create a record with a generated source id.
    pub fn with_root(root: Field) -> Self {
        Self::new(uuid::Uuid::new_v4().to_string(), root)
    }

    /// Create a new record that descends from `self`.
    ///
    /// The header keeps the source id and gains `stage` in its lineage; the
    /// root is replaced. `self` is left untouched.
    pub fn derive(&self, stage: &str, root: Field) -> Record {
        let mut header = self.header.clone();
        header.stages_path.push(stage.to_string());
        Record {
            header,
            root: Arc::new(root),
        }
    }

    pub fn header(&self) -> &RecordHeader {
        &self.header
    }

    pub fn id(&self) -> &str {
        self.header.source_id()
    }

    pub fn root(&self) -> &Arc<Field> {
        &self.root
    }

    /// Look up a field by slash path. Returns `None` for unknown paths and
    /// for paths that do not start with `/`.
    pub fn get(&self, path: &str) -> Option<&Arc<Field>> {
        let rest = path.strip_prefix('/')?;
        let mut current = &self.root;
        for segment in rest.split('/').filter(|s| !s.is_empty()) {
            current = current.child(segment)?;
        }
        Some(current)
    }

    pub fn has(&self, path: &str) -> bool {
        self.get(path).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Record {
        let root = Field::map([
            ("name", Arc::new(Field::string("report.pdf"))),
            (
                "tags",
                Arc::new(Field::List(vec![
                    Arc::new(Field::string("a")),
                    Arc::new(Field::string("b")),
                ])),
            ),
            (
                "nested",
                Arc::new(Field::map([("size", Arc::new(Field::Long(42)))])),
            ),
        ]);
        Record::new("origin::1", root)
    }

    #[test]
    fn test_get_root_and_children() {
        let record = sample();
        assert!(record.get("/").unwrap().as_map().is_some());
        assert_eq!(record.get("/name").unwrap().as_str(), Some("report.pdf"));
        assert_eq!(record.get("/tags/1").unwrap().as_str(), Some("b"));
        assert!(matches!(**record.get("/nested/size").unwrap(), Field::Long(42)));
    }

    #[test]
    fn test_get_missing_paths() {
        let record = sample();
        assert!(record.get("/missing").is_none());
        assert!(record.get("/tags/7").is_none());
        assert!(record.get("/name/deeper").is_none());
        assert!(record.get("name").is_none());
        assert!(!record.has("/missing"));
    }

    #[test]
    fn test_derive_keeps_source_and_appends_stage() {
        let record = sample();
        let derived = record.derive("content-extract", Field::Null);

        assert_eq!(derived.id(), "origin::1");
        assert_eq!(derived.header().stages_path(), &["content-extract".to_string()]);
        assert!(record.header().stages_path().is_empty());
        assert!(record.get("/name").is_some());
        assert!(derived.get("/name").is_none());
    }

    #[test]
    fn test_with_root_generates_unique_ids() {
        let a = Record::with_root(Field::Null);
        let b = Record::with_root(Field::Null);
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_field_type_display() {
        assert_eq!(Field::string("x").field_type().to_string(), "STRING");
        assert_eq!(Field::Null.field_type().to_string(), "NULL");
        assert_eq!(
            Field::file_ref(BytesFileRef::new(b"x".to_vec())).field_type(),
            FieldType::FileRef
        );
    }
}
