//! Vector index trait and optional capabilities

use async_trait::async_trait;
use std::fmt::Debug;
use std::sync::Arc;

#[cfg(test)]
use mockall::automock;

use crate::domain::document::Document;
use crate::domain::DomainError;

/// Information about a document source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceInfo {
    /// Source identifier (absolute file path)
    pub source: String,
    /// Number of chunks stored from this source
    pub chunk_count: usize,
}

/// Optional operations a backend supports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexCapabilities {
    pub delete_by_source: bool,
    pub list_sources: bool,
}

/// Removal of every chunk that came from one source
#[async_trait]
pub trait SourceDeletion: Send + Sync {
    /// Returns the number of chunks removed
    async fn delete_by_source(&self, source: &str) -> Result<usize, DomainError>;
}

/// Enumeration of stored sources
#[async_trait]
pub trait SourceListing: Send + Sync {
    async fn list_sources(&self) -> Result<Vec<SourceInfo>, DomainError>;
}

/// Backend-agnostic vector store
///
/// Implementations embed document content on write and the query on search.
/// Secondary operations are feature-detected through `source_deletion` and
/// `source_listing` rather than by calling them and catching an error.
#[async_trait]
pub trait VectorIndex: Send + Sync + Debug {
    /// Get the provider type name
    fn provider_type(&self) -> &'static str;

    /// Embed and store documents, returning the number stored
    async fn add_documents(&self, documents: Vec<Document>) -> Result<usize, DomainError>;

    /// Return up to `k` documents ranked by similarity to `query`
    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Document>, DomainError>;

    /// Flush pending writes; backends that write through keep the default
    async fn persist(&self) -> Result<(), DomainError> {
        Ok(())
    }

    fn source_deletion(&self) -> Option<&dyn SourceDeletion> {
        None
    }

    fn source_listing(&self) -> Option<&dyn SourceListing> {
        None
    }

    fn capabilities(&self) -> IndexCapabilities {
        IndexCapabilities {
            delete_by_source: self.source_deletion().is_some(),
            list_sources: self.source_listing().is_some(),
        }
    }
}

/// Builds the configured backend on first use
#[cfg_attr(test, automock)]
#[async_trait]
pub trait IndexInitializer: Send + Sync {
    /// Name of the backend this initializer produces
    fn backend_name(&self) -> &'static str;

    /// Connect to or open the backend
    async fn initialize(&self) -> Result<Arc<dyn VectorIndex>, DomainError>;
}
