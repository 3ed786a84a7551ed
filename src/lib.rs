//! Knowledge Pipeline
//!
//! Document ingestion and vector retrieval:
//! - Path-guarded discovery and loading of markdown, source code and text files
//! - Recursive and fixed-size chunking with provenance metadata
//! - Local-file and pgvector index backends behind a lazily initialized facade
//! - Query engine that always answers with formatted context or a status message

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::DomainError;
pub use infrastructure::services::{KnowledgeService, QueryEngine};
