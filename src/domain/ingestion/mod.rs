//! Document ingestion domain types and traits
//!
//! This module provides:
//! - `DocumentFormat` detection for the loaders
//! - `ChunkingStrategy` trait for splitting documents into chunks
//! - Option and result types for directory ingestion

pub mod chunker;
pub mod loader;
pub mod pipeline;
pub mod validation;

// Re-export main types
pub use chunker::{helpers, ChunkingConfig, ChunkingStrategy, ChunkingType};
pub use loader::{DocumentFormat, ScriptDialect, SourceLanguage};
pub use pipeline::{DirectoryIngestOptions, IngestionReport, IngestionSummary};
pub use validation::{validate_batch_size, validate_glob_pattern, validate_max_files};
