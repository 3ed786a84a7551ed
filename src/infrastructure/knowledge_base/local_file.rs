//! Local-file vector index
//!
//! The whole index lives in one JSON file under a directory. Entries are held
//! in memory, searched by brute-force cosine similarity and written back on
//! `persist`.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::document::{keys, Document, Metadata};
use crate::domain::embedding::{cosine_similarity, EmbeddingProvider};
use crate::domain::knowledge_base::{SourceInfo, SourceListing, VectorIndex};
use crate::domain::DomainError;

/// File name of the index inside its directory
pub const INDEX_FILE_NAME: &str = "index.json";

/// Content of the entry written when a new index is created
pub const PLACEHOLDER_CONTENT: &str = "Knowledge index initialized.";

/// Source recorded on the placeholder entry
pub const PLACEHOLDER_SOURCE: &str = "__placeholder__";

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexEntry {
    id: String,
    content: String,
    #[serde(default)]
    metadata: Metadata,
    embedding: Vec<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct IndexFile {
    version: u32,
    dimensions: usize,
    entries: Vec<IndexEntry>,
    /// Entry id to position in `entries`
    #[serde(skip)]
    positions: HashMap<String, usize>,
}

impl IndexFile {
    fn new(dimensions: usize) -> Self {
        Self {
            version: FORMAT_VERSION,
            dimensions,
            entries: Vec::new(),
            positions: HashMap::new(),
        }
    }

    fn rebuild_positions(&mut self) {
        self.positions = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.id.clone(), i))
            .collect();
    }

    fn upsert(&mut self, entry: IndexEntry) {
        match self.positions.get(&entry.id) {
            Some(&i) => self.entries[i] = entry,
            None => {
                self.positions.insert(entry.id.clone(), self.entries.len());
                self.entries.push(entry);
            }
        }
    }
}

/// Vector index stored as a JSON file on local disk
pub struct LocalFileIndex {
    path: PathBuf,
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<RwLock<IndexFile>>,
}

impl Debug for LocalFileIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalFileIndex")
            .field("path", &self.path)
            .field("entries", &self.store.read().entries.len())
            .field("embedder", &self.embedder.provider_name())
            .finish()
    }
}

impl LocalFileIndex {
    /// Open the index in `dir`, creating it with a placeholder entry when absent
    pub async fn open(
        dir: impl AsRef<Path>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self, DomainError> {
        let dir = dir.as_ref().to_path_buf();
        let path = dir.join(INDEX_FILE_NAME);

        let load_path = path.clone();
        let existing = tokio::task::spawn_blocking(move || load(&load_path))
            .await
            .map_err(|e| DomainError::internal(format!("Task join error: {}", e)))??;

        let index = match existing {
            Some(file) => {
                if file.dimensions != embedder.dimensions() {
                    return Err(DomainError::initialization(format!(
                        "index at {} has {} dimensions but the embedding provider produces {}",
                        path.display(),
                        file.dimensions,
                        embedder.dimensions()
                    )));
                }

                info!(
                    path = %path.display(),
                    entries = file.entries.len(),
                    "Opened local index"
                );

                Self {
                    path,
                    embedder,
                    store: Arc::new(RwLock::new(file)),
                }
            }
            None => {
                let index = Self {
                    path,
                    store: Arc::new(RwLock::new(IndexFile::new(embedder.dimensions()))),
                    embedder,
                };

                let placeholder = Document::new(PLACEHOLDER_CONTENT)
                    .with_metadata(keys::SOURCE, serde_json::json!(PLACEHOLDER_SOURCE));
                index.add_documents(vec![placeholder]).await?;
                index.persist().await?;

                info!(path = %index.path.display(), "Created local index");
                index
            }
        };

        Ok(index)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of stored entries, including the placeholder
    pub fn len(&self) -> usize {
        self.store.read().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn load(path: &Path) -> Result<Option<IndexFile>, DomainError> {
    let raw = match fs::read(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(DomainError::initialization(format!(
                "Failed to read index {}: {}",
                path.display(),
                e
            )))
        }
    };

    let mut file: IndexFile = serde_json::from_slice(&raw).map_err(|e| {
        DomainError::initialization(format!("Corrupt index {}: {}", path.display(), e))
    })?;
    file.rebuild_positions();

    Ok(Some(file))
}

fn save(path: &Path, file: &IndexFile) -> Result<(), DomainError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| DomainError::storage(format!("Failed to create index directory: {}", e)))?;
    }

    let json = serde_json::to_vec(file)
        .map_err(|e| DomainError::storage(format!("Failed to serialize index: {}", e)))?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json)
        .map_err(|e| DomainError::storage(format!("Failed to write index: {}", e)))?;
    fs::rename(&tmp, path)
        .map_err(|e| DomainError::storage(format!("Failed to replace index: {}", e)))?;

    Ok(())
}

#[async_trait]
impl VectorIndex for LocalFileIndex {
    fn provider_type(&self) -> &'static str {
        "local_file"
    }

    async fn add_documents(&self, documents: Vec<Document>) -> Result<usize, DomainError> {
        if documents.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = documents.iter().map(|d| d.content.clone()).collect();
        let embeddings = self.embedder.embed(texts).await?;

        if embeddings.len() != documents.len() {
            return Err(DomainError::storage(format!(
                "Embedding count mismatch: {} documents, {} embeddings",
                documents.len(),
                embeddings.len()
            )));
        }

        let count = documents.len();
        let entries: Vec<IndexEntry> = documents
            .into_iter()
            .zip(embeddings)
            .map(|(doc, embedding)| IndexEntry {
                id: doc
                    .chunk_id()
                    .map(str::to_string)
                    .unwrap_or_else(|| Uuid::new_v4().to_string()),
                content: doc.content,
                metadata: doc.metadata,
                embedding,
            })
            .collect();

        let store = Arc::clone(&self.store);
        let total = tokio::task::spawn_blocking(move || {
            let mut store = store.write();
            for entry in entries {
                store.upsert(entry);
            }
            let total = store.entries.len();
            total
        })
        .await
        .map_err(|e| DomainError::internal(format!("Task join error: {}", e)))?;

        debug!(added = count, total, "Added documents to local index");
        Ok(count)
    }

    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Document>, DomainError> {
        let query_embedding = self
            .embedder
            .embed(vec![query.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::storage("Failed to generate query embedding"))?;

        let store = Arc::clone(&self.store);

        tokio::task::spawn_blocking(move || {
            let store = store.read();

            let mut scored: Vec<(f32, &IndexEntry)> = store
                .entries
                .iter()
                .map(|entry| (cosine_similarity(&query_embedding, &entry.embedding), entry))
                .collect();

            scored.sort_by(|a, b| b.0.total_cmp(&a.0));

            let results: Vec<Document> = scored
                .into_iter()
                .take(k)
                .map(|(_, entry)| {
                    Document::new(entry.content.clone()).with_all_metadata(entry.metadata.clone())
                })
                .collect();
            results
        })
        .await
        .map_err(|e| DomainError::internal(format!("Task join error: {}", e)))
    }

    async fn persist(&self) -> Result<(), DomainError> {
        let store = Arc::clone(&self.store);
        let path = self.path.clone();

        tokio::task::spawn_blocking(move || {
            let file = store.read();
            save(&path, &file)
        })
        .await
        .map_err(|e| DomainError::internal(format!("Task join error: {}", e)))??;

        debug!(path = %self.path.display(), "Persisted local index");
        Ok(())
    }

    fn source_listing(&self) -> Option<&dyn SourceListing> {
        Some(self)
    }
}

#[async_trait]
impl SourceListing for LocalFileIndex {
    async fn list_sources(&self) -> Result<Vec<SourceInfo>, DomainError> {
        let store = self.store.read();
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();

        for entry in &store.entries {
            let source = entry.metadata.get(keys::SOURCE).and_then(|v| v.as_str());
            if let Some(source) = source.filter(|s| *s != PLACEHOLDER_SOURCE) {
                *counts.entry(source).or_default() += 1;
            }
        }

        Ok(counts
            .into_iter()
            .map(|(source, chunk_count)| SourceInfo {
                source: source.to_string(),
                chunk_count,
            })
            .collect())
    }
}
