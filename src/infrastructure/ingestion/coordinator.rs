//! Per-file and per-directory ingestion

use std::path::Path;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::domain::document::{keys, Document, Metadata};
use crate::domain::ingestion::{
    validate_max_files, ChunkingType, DirectoryIngestOptions, IngestionReport,
};
use crate::domain::DomainError;
use crate::infrastructure::filesystem::{FileDiscoverer, PathGuard};

use super::factory::{get_splitter, TextSplitter};
use super::loaders::DocumentLoader;

/// Turns files into chunk documents ready for indexing
#[derive(Debug, Clone)]
pub struct IngestionCoordinator {
    loader: DocumentLoader,
    discoverer: FileDiscoverer,
    default_strategy: ChunkingType,
    chunk_size: i64,
    chunk_overlap: i64,
}

impl IngestionCoordinator {
    pub fn new(
        guard: PathGuard,
        default_strategy: ChunkingType,
        chunk_size: i64,
        chunk_overlap: i64,
    ) -> Self {
        Self {
            loader: DocumentLoader::new(guard),
            discoverer: FileDiscoverer::new(),
            default_strategy,
            chunk_size,
            chunk_overlap,
        }
    }

    pub fn guard(&self) -> &PathGuard {
        self.loader.guard()
    }

    fn splitter(&self, strategy: Option<ChunkingType>) -> Result<TextSplitter, DomainError> {
        get_splitter(
            strategy.unwrap_or(self.default_strategy),
            self.chunk_size,
            self.chunk_overlap,
        )
    }

    /// Load, chunk and stamp one file
    ///
    /// `metadata_override` is merged over the loader metadata; `source` stays
    /// the validated path.
    pub fn ingest_document(
        &self,
        path: &Path,
        strategy: Option<ChunkingType>,
        metadata_override: Option<&Metadata>,
    ) -> Result<Vec<Document>, DomainError> {
        let splitter = self.splitter(strategy)?;
        self.ingest_with(path, &splitter, metadata_override)
    }

    fn ingest_with(
        &self,
        path: &Path,
        splitter: &TextSplitter,
        metadata_override: Option<&Metadata>,
    ) -> Result<Vec<Document>, DomainError> {
        let mut document = self.loader.load(path)?;

        if let Some(overrides) = metadata_override {
            for (key, value) in overrides {
                if key == keys::SOURCE {
                    debug!("Ignoring override of source metadata");
                    continue;
                }
                document.metadata.insert(key.clone(), value.clone());
            }
        }

        let chunks = splitter.split(&document.content);
        let chunk_count = chunks.len();
        let source = document.source().unwrap_or_default().to_string();

        debug!(
            source = %source,
            strategy = splitter.strategy_name(),
            chunks = chunk_count,
            "Chunked document"
        );

        Ok(chunks
            .into_iter()
            .enumerate()
            .map(|(index, content)| {
                let mut metadata = document.metadata.clone();
                metadata.insert(keys::CHUNK_INDEX.to_string(), json!(index));
                metadata.insert(keys::CHUNK_COUNT.to_string(), json!(chunk_count));
                metadata.insert(keys::DOCUMENT_ID.to_string(), json!(source));
                metadata.insert(
                    keys::CHUNK_ID.to_string(),
                    json!(format!("{}#{}", source, index)),
                );

                Document::new(content).with_all_metadata(metadata)
            })
            .collect())
    }

    /// Ingest every matching file under `root`
    ///
    /// Files are processed one at a time; a failing file is recorded in
    /// `errors` and does not stop the run.
    pub fn ingest_directory(
        &self,
        root: &Path,
        options: &DirectoryIngestOptions,
    ) -> Result<IngestionReport, DomainError> {
        let max_files = validate_max_files(options.max_files)?;
        let splitter = self.splitter(options.strategy)?;
        let root = self.guard().validate(root)?;

        let mut files =
            self.discoverer
                .discover(&root, options.patterns.as_deref(), options.recursive)?;

        if let Some(limit) = max_files {
            if files.len() > limit {
                debug!(found = files.len(), limit, "Truncating discovered files");
                files.truncate(limit);
            }
        }

        let mut report = IngestionReport::default();

        for file in &files {
            match self.ingest_with(file, &splitter, None) {
                Ok(chunks) => {
                    report.files_processed += 1;
                    report.total_chunks += chunks.len();
                    report.documents.extend(chunks);
                }
                Err(e) => {
                    warn!(path = %file.display(), error = %e, "Failed to ingest file");
                    report.errors.push(format!("{}: {}", file.display(), e));
                }
            }
        }

        info!(
            root = %root.display(),
            files_processed = report.files_processed,
            total_chunks = report.total_chunks,
            errors = report.errors.len(),
            "Directory ingestion finished"
        );

        Ok(report)
    }
}
