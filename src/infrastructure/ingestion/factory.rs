//! Factory for creating chunkers and configured splitters

use std::sync::Arc;

use crate::domain::ingestion::{ChunkingConfig, ChunkingStrategy, ChunkingType};
use crate::domain::DomainError;

use super::chunkers::{FixedSizeChunker, RecursiveChunker};

/// Factory for creating chunking strategies
#[derive(Debug, Default)]
pub struct ChunkerFactory;

impl ChunkerFactory {
    /// Create a chunker for the given type
    pub fn create(chunking_type: ChunkingType) -> Result<Arc<dyn ChunkingStrategy>, DomainError> {
        match chunking_type {
            ChunkingType::Recursive => Ok(Arc::new(RecursiveChunker::new())),
            ChunkingType::Fixed => Ok(Arc::new(FixedSizeChunker::new())),
            ChunkingType::Semantic => Err(DomainError::not_implemented(
                "semantic chunking is not available; use 'recursive' or 'fixed'",
            )),
        }
    }
}

/// A chunking strategy bound to a validated window
#[derive(Debug, Clone)]
pub struct TextSplitter {
    strategy: Arc<dyn ChunkingStrategy>,
    config: ChunkingConfig,
}

impl TextSplitter {
    pub fn new(strategy: Arc<dyn ChunkingStrategy>, config: ChunkingConfig) -> Self {
        Self { strategy, config }
    }

    /// Split `text` into chunk texts; empty input yields no chunks
    pub fn split(&self, text: &str) -> Vec<String> {
        self.strategy.chunk(text, &self.config)
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    pub fn config(&self) -> &ChunkingConfig {
        &self.config
    }
}

/// Validate the window and build a splitter for `strategy`
///
/// Size and overlap are checked before the strategy is constructed.
pub fn get_splitter(
    strategy: ChunkingType,
    chunk_size: i64,
    chunk_overlap: i64,
) -> Result<TextSplitter, DomainError> {
    let config = ChunkingConfig::new(chunk_size, chunk_overlap)?;
    let chunker = ChunkerFactory::create(strategy)?;

    Ok(TextSplitter::new(chunker, config))
}

/// One-shot split of `text`
pub fn chunk_text(
    text: &str,
    strategy: ChunkingType,
    chunk_size: i64,
    chunk_overlap: i64,
) -> Result<Vec<String>, DomainError> {
    Ok(get_splitter(strategy, chunk_size, chunk_overlap)?.split(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_chunkers() {
        assert_eq!(ChunkerFactory::create(ChunkingType::Recursive).unwrap().name(), "recursive");
        assert_eq!(ChunkerFactory::create(ChunkingType::Fixed).unwrap().name(), "fixed");
    }

    #[test]
    fn test_semantic_not_implemented() {
        let err = get_splitter(ChunkingType::Semantic, 1000, 200).unwrap_err();
        assert!(matches!(err, DomainError::NotImplemented { .. }));
    }

    #[test]
    fn test_validation_precedes_construction() {
        let err = get_splitter(ChunkingType::Semantic, 0, 0).unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[test]
    fn test_invalid_windows() {
        for (size, overlap) in [(0, 0), (-1, 0), (100, -1), (100, 100), (100, 150)] {
            let err = get_splitter(ChunkingType::Recursive, size, overlap).unwrap_err();
            assert!(
                matches!(err, DomainError::Validation { .. }),
                "size={} overlap={}",
                size,
                overlap
            );
        }
    }

    #[test]
    fn test_chunk_text_empty() {
        let chunks = chunk_text("", ChunkingType::Recursive, 1000, 200).unwrap();
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_chunk_text_short() {
        let text = "A short note about configuration.";
        let chunks = chunk_text(text, ChunkingType::Recursive, 1000, 200).unwrap();
        assert_eq!(chunks, vec![text]);
    }

    #[test]
    fn test_default_window_bounds_chunks() {
        let text = "Sentence number one goes here. ".repeat(200);
        let splitter = get_splitter(ChunkingType::Recursive, 1000, 200).unwrap();
        let chunks = splitter.split(&text);

        assert!(chunks.len() > 1);
        assert_eq!(splitter.strategy_name(), "recursive");
        assert!(chunks.iter().all(|c| c.chars().count() <= splitter.config().chunk_size));
    }
}
