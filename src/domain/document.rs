//! Document type shared by loaders, chunking and vector indexes

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Metadata attached to a document or chunk
pub type Metadata = HashMap<String, serde_json::Value>;

/// Well-known metadata keys
pub mod keys {
    pub const SOURCE: &str = "source";
    pub const FILE_TYPE: &str = "file_type";
    pub const LANGUAGE: &str = "language";
    pub const LAST_MODIFIED: &str = "last_modified";
    pub const FILE_SIZE: &str = "file_size";
    pub const ENCODING: &str = "encoding";
    pub const TITLE: &str = "title";
    pub const FUNCTIONS: &str = "functions";
    pub const CLASSES: &str = "classes";
    pub const CHUNK_INDEX: &str = "chunk_index";
    pub const CHUNK_COUNT: &str = "chunk_count";
    pub const DOCUMENT_ID: &str = "document_id";
    pub const CHUNK_ID: &str = "chunk_id";

    /// Keys owned by the loaders and the coordinator; frontmatter never replaces them
    pub const RESERVED: &[&str] = &[
        SOURCE,
        FILE_TYPE,
        LANGUAGE,
        LAST_MODIFIED,
        FILE_SIZE,
        ENCODING,
        CHUNK_INDEX,
        CHUNK_COUNT,
        DOCUMENT_ID,
        CHUNK_ID,
    ];

    pub fn is_reserved(key: &str) -> bool {
        RESERVED.contains(&key)
    }
}

/// A unit of text plus metadata: a loaded file or one of its chunks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Text content
    pub content: String,
    /// Metadata key-value pairs
    #[serde(default)]
    pub metadata: Metadata,
}

impl Document {
    /// Create a document without metadata
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            metadata: Metadata::new(),
        }
    }

    /// Add one metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Replace all metadata
    pub fn with_all_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// The `source` metadata entry, if present
    pub fn source(&self) -> Option<&str> {
        self.metadata.get(keys::SOURCE).and_then(|v| v.as_str())
    }

    pub fn chunk_index(&self) -> Option<usize> {
        self.metadata
            .get(keys::CHUNK_INDEX)
            .and_then(|v| v.as_u64())
            .map(|v| v as usize)
    }

    pub fn chunk_count(&self) -> Option<usize> {
        self.metadata
            .get(keys::CHUNK_COUNT)
            .and_then(|v| v.as_u64())
            .map(|v| v as usize)
    }

    /// Stable identifier of a chunk, falling back to none for unchunked documents
    pub fn chunk_id(&self) -> Option<&str> {
        self.metadata.get(keys::CHUNK_ID).and_then(|v| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_builders() {
        let doc = Document::new("body")
            .with_metadata(keys::SOURCE, json!("/docs/a.md"))
            .with_metadata(keys::CHUNK_INDEX, json!(2))
            .with_metadata(keys::CHUNK_COUNT, json!(3));

        assert_eq!(doc.content, "body");
        assert_eq!(doc.source(), Some("/docs/a.md"));
        assert_eq!(doc.chunk_index(), Some(2));
        assert_eq!(doc.chunk_count(), Some(3));
        assert_eq!(doc.chunk_id(), None);
    }

    #[test]
    fn test_reserved_keys() {
        assert!(keys::is_reserved("source"));
        assert!(keys::is_reserved("chunk_index"));
        assert!(!keys::is_reserved("title"));
        assert!(!keys::is_reserved("author"));
    }

    #[test]
    fn test_document_serde() {
        let doc: Document = serde_json::from_value(json!({"content": "x"})).unwrap();
        assert!(doc.metadata.is_empty());
    }
}
