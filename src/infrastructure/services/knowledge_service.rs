//! Knowledge service: ingestion and retrieval behind one handle

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::config::{AppConfig, EmbeddingConfig};
use crate::domain::document::Metadata;
use crate::domain::embedding::EmbeddingProvider;
use crate::domain::ingestion::{DirectoryIngestOptions, IngestionSummary};
use crate::domain::knowledge_base::{QueryOutcome, SourceInfo};
use crate::domain::DomainError;
use crate::infrastructure::embedding::{HttpClient, OpenAiEmbeddingProvider};
use crate::infrastructure::filesystem::PathGuard;
use crate::infrastructure::ingestion::IngestionCoordinator;
use crate::infrastructure::knowledge_base::{BackendInitializer, BackendSettings, VectorIndexFacade};

use super::query_engine::QueryEngine;

const EMBEDDING_TIMEOUT: Duration = Duration::from_secs(60);

/// Entry point used by the CLI and by embedding applications
#[derive(Debug, Clone)]
pub struct KnowledgeService {
    coordinator: Arc<IngestionCoordinator>,
    facade: Arc<VectorIndexFacade>,
    query_engine: QueryEngine,
    batch_size: usize,
}

impl KnowledgeService {
    pub fn new(
        coordinator: IngestionCoordinator,
        facade: Arc<VectorIndexFacade>,
        default_top_k: usize,
        batch_size: usize,
    ) -> Self {
        Self {
            coordinator: Arc::new(coordinator),
            query_engine: QueryEngine::new(facade.clone(), default_top_k),
            facade,
            batch_size,
        }
    }

    /// Build the service from configuration with the given embedding provider
    pub fn with_embedder(
        config: &AppConfig,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self, DomainError> {
        let knowledge = &config.knowledge;
        knowledge.validate()?;

        let guard = PathGuard::new(knowledge.allowed_base_dirs.clone(), knowledge.max_file_size);
        let coordinator = IngestionCoordinator::new(
            guard,
            knowledge.chunk_strategy,
            knowledge.chunk_size,
            knowledge.chunk_overlap,
        );

        let facade = if knowledge.enabled {
            let settings = BackendSettings::from_config(knowledge);
            VectorIndexFacade::new(Arc::new(BackendInitializer::new(settings, embedder)))
        } else {
            VectorIndexFacade::disabled()
        };

        info!(
            enabled = knowledge.enabled,
            backend = knowledge.backend.as_str(),
            strategy = %knowledge.chunk_strategy,
            "Knowledge service configured"
        );

        Ok(Self::new(
            coordinator,
            Arc::new(facade),
            knowledge.top_k,
            knowledge.batch_size,
        ))
    }

    /// Build the service with the OpenAI-compatible embedding client
    pub fn from_config(config: &AppConfig) -> Result<Self, DomainError> {
        let embedder = openai_embedder(&config.embedding)?;
        Self::with_embedder(config, embedder)
    }

    pub fn facade(&self) -> &Arc<VectorIndexFacade> {
        &self.facade
    }

    pub fn query_engine(&self) -> &QueryEngine {
        &self.query_engine
    }

    /// Ingest one file and write its chunks; returns the chunk count
    pub async fn ingest_document(
        &self,
        path: &Path,
        metadata_override: Option<Metadata>,
    ) -> Result<usize, DomainError> {
        let coordinator = Arc::clone(&self.coordinator);
        let path: PathBuf = path.to_path_buf();

        let chunks = tokio::task::spawn_blocking(move || {
            coordinator.ingest_document(&path, None, metadata_override.as_ref())
        })
        .await
        .map_err(|e| DomainError::internal(format!("Task join error: {}", e)))??;

        let count = chunks.len();
        self.facade
            .add_documents_batched(chunks, self.batch_size)
            .await?;

        Ok(count)
    }

    /// Ingest a directory tree; per-file failures are reported, backend failures are fatal
    pub async fn ingest_directory(
        &self,
        path: &Path,
        options: DirectoryIngestOptions,
    ) -> Result<IngestionSummary, DomainError> {
        self.facade.index().await?;

        let coordinator = Arc::clone(&self.coordinator);
        let path: PathBuf = path.to_path_buf();

        let report = tokio::task::spawn_blocking(move || {
            coordinator.ingest_directory(&path, &options)
        })
        .await
        .map_err(|e| DomainError::internal(format!("Task join error: {}", e)))??;

        let summary = report.summary();
        self.facade
            .add_documents_batched(report.documents, self.batch_size)
            .await?;

        Ok(summary)
    }

    /// Context string for `query`; failures are folded into the text
    pub async fn query_knowledge(
        &self,
        query: &str,
        error_patterns: Option<&[String]>,
        top_k: Option<usize>,
    ) -> String {
        self.query_outcome(query, error_patterns, top_k)
            .await
            .into_text()
    }

    pub async fn query_outcome(
        &self,
        query: &str,
        error_patterns: Option<&[String]>,
        top_k: Option<usize>,
    ) -> QueryOutcome {
        self.query_engine.query(query, error_patterns, top_k).await
    }

    pub async fn list_sources(&self) -> Result<Vec<SourceInfo>, DomainError> {
        self.facade.list_sources().await
    }

    pub async fn delete_source(&self, source: &str) -> Result<usize, DomainError> {
        self.facade.delete_by_source(source).await
    }
}

fn openai_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn EmbeddingProvider>, DomainError> {
    let api_key = std::env::var(&config.api_key_env).unwrap_or_default();
    let client = HttpClient::with_timeout(EMBEDDING_TIMEOUT)?;

    let provider = OpenAiEmbeddingProvider::with_base_url(
        client,
        api_key,
        config.model.clone(),
        config.base_url.clone(),
    )
    .with_dimensions(config.dimensions);

    Ok(Arc::new(provider))
}
