//! Ingestion request and result types

use serde::Serialize;

use super::chunker::ChunkingType;
use crate::domain::document::Document;

/// Options for ingesting a directory tree
#[derive(Debug, Clone)]
pub struct DirectoryIngestOptions {
    /// Filename glob patterns; the default set is used when `None`
    pub patterns: Option<Vec<String>>,
    /// Descend into subdirectories
    pub recursive: bool,
    /// Override the configured chunking strategy
    pub strategy: Option<ChunkingType>,
    /// Stop after this many files; must be positive when set
    pub max_files: Option<i64>,
}

impl Default for DirectoryIngestOptions {
    fn default() -> Self {
        Self {
            patterns: None,
            recursive: true,
            strategy: None,
            max_files: None,
        }
    }
}

impl DirectoryIngestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_patterns(mut self, patterns: Vec<String>) -> Self {
        self.patterns = Some(patterns);
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_strategy(mut self, strategy: ChunkingType) -> Self {
        self.strategy = Some(strategy);
        self
    }

    pub fn with_max_files(mut self, max_files: i64) -> Self {
        self.max_files = Some(max_files);
        self
    }
}

/// Outcome of a directory ingestion, including the produced chunks
#[derive(Debug, Clone, Default)]
pub struct IngestionReport {
    /// Files that loaded and chunked successfully
    pub files_processed: usize,
    /// Chunks produced across all processed files
    pub total_chunks: usize,
    /// One `"<path>: <error>"` entry per failed file
    pub errors: Vec<String>,
    /// Chunk documents, in file order
    pub documents: Vec<Document>,
}

impl IngestionReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Counts and errors without the documents
    pub fn summary(&self) -> IngestionSummary {
        IngestionSummary {
            files_processed: self.files_processed,
            total_chunks: self.total_chunks,
            errors: self.errors.clone(),
        }
    }
}

/// Counts reported to callers once chunks have been written
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct IngestionSummary {
    pub files_processed: usize,
    pub total_chunks: usize,
    pub errors: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_defaults() {
        let options = DirectoryIngestOptions::default();
        assert!(options.patterns.is_none());
        assert!(options.recursive);
        assert!(options.strategy.is_none());
        assert!(options.max_files.is_none());
    }

    #[test]
    fn test_options_builders() {
        let options = DirectoryIngestOptions::new()
            .with_patterns(vec!["*.md".to_string()])
            .with_recursive(false)
            .with_strategy(ChunkingType::Fixed)
            .with_max_files(3);

        assert_eq!(options.patterns.as_deref(), Some(&["*.md".to_string()][..]));
        assert!(!options.recursive);
        assert_eq!(options.strategy, Some(ChunkingType::Fixed));
        assert_eq!(options.max_files, Some(3));
    }

    #[test]
    fn test_report_summary() {
        let report = IngestionReport {
            files_processed: 2,
            total_chunks: 5,
            errors: vec!["a.md: File error: bad".to_string()],
            documents: vec![Document::new("x")],
        };

        let summary = report.summary();
        assert!(report.has_errors());
        assert_eq!(summary.files_processed, 2);
        assert_eq!(summary.total_chunks, 5);
        assert_eq!(summary.errors.len(), 1);
    }
}
