//! Embedding provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Turns texts into fixed-length vectors for the vector indexes
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Generate one embedding per input text, in input order
    async fn embed(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>, DomainError>;

    /// Get the embedding dimensions
    fn dimensions(&self) -> usize;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
