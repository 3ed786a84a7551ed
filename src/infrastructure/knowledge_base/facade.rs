//! Lazily initialized entry point to the configured vector index

use std::fmt::Debug;
use std::sync::Arc;

use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::domain::document::Document;
use crate::domain::ingestion::validate_batch_size;
use crate::domain::knowledge_base::{IndexCapabilities, IndexInitializer, SourceInfo, VectorIndex};
use crate::domain::DomainError;

/// Single access point for writes and searches against the vector index
///
/// The backend is created on the first call that needs it. Concurrent first
/// calls share one initialization; a failed initialization is retried by the
/// next call.
pub struct VectorIndexFacade {
    enabled: bool,
    initializer: Option<Arc<dyn IndexInitializer>>,
    index: OnceCell<Arc<dyn VectorIndex>>,
}

impl Debug for VectorIndexFacade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorIndexFacade")
            .field("enabled", &self.enabled)
            .field("backend", &self.backend_name())
            .field("ready", &self.is_ready())
            .finish()
    }
}

impl VectorIndexFacade {
    pub fn new(initializer: Arc<dyn IndexInitializer>) -> Self {
        Self {
            enabled: true,
            initializer: Some(initializer),
            index: OnceCell::new(),
        }
    }

    /// A facade for a disabled knowledge base; every index access fails
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            initializer: None,
            index: OnceCell::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the backend has been initialized
    pub fn is_ready(&self) -> bool {
        self.index.initialized()
    }

    pub fn backend_name(&self) -> Option<&'static str> {
        self.initializer.as_ref().map(|i| i.backend_name())
    }

    /// Capabilities of the initialized backend, or none before initialization
    pub fn capabilities(&self) -> IndexCapabilities {
        self.index
            .get()
            .map(|index| index.capabilities())
            .unwrap_or_default()
    }

    /// Get the backend, initializing it on first use
    pub async fn index(&self) -> Result<&Arc<dyn VectorIndex>, DomainError> {
        let Some(initializer) = self.initializer.as_ref().filter(|_| self.enabled) else {
            return Err(DomainError::initialization("knowledge base is disabled"));
        };

        self.index
            .get_or_try_init(|| async {
                info!(backend = initializer.backend_name(), "Initializing vector index");
                initializer.initialize().await
            })
            .await
    }

    /// Write `documents` in sequential batches, then persist once
    pub async fn add_documents_batched(
        &self,
        documents: Vec<Document>,
        batch_size: usize,
    ) -> Result<usize, DomainError> {
        validate_batch_size(batch_size)?;

        let index = self.index().await?;
        if documents.is_empty() {
            return Ok(0);
        }

        let total = documents.len();
        let mut added = 0;

        for (batch_number, batch) in documents.chunks(batch_size).enumerate() {
            added += index.add_documents(batch.to_vec()).await?;
            debug!(
                batch = batch_number + 1,
                size = batch.len(),
                added,
                total,
                "Wrote batch"
            );
        }

        index.persist().await?;
        Ok(added)
    }

    pub async fn similarity_search(
        &self,
        query: &str,
        k: usize,
    ) -> Result<Vec<Document>, DomainError> {
        self.index().await?.similarity_search(query, k).await
    }

    /// Remove every chunk from `source`, if the backend supports it
    pub async fn delete_by_source(&self, source: &str) -> Result<usize, DomainError> {
        let index = self.index().await?;

        match index.source_deletion() {
            Some(deletion) => deletion.delete_by_source(source).await,
            None => Err(DomainError::not_implemented(format!(
                "the {} backend cannot delete by source; rebuild the index instead",
                index.provider_type()
            ))),
        }
    }

    /// List stored sources, if the backend supports it
    pub async fn list_sources(&self) -> Result<Vec<SourceInfo>, DomainError> {
        let index = self.index().await?;

        match index.source_listing() {
            Some(listing) => listing.list_sources().await,
            None => Err(DomainError::not_implemented(format!(
                "the {} backend cannot list sources; rebuild the index to inspect its contents",
                index.provider_type()
            ))),
        }
    }
}
