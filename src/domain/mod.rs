//! Domain layer - Core types and traits

pub mod document;
pub mod embedding;
pub mod error;
pub mod ingestion;
pub mod knowledge_base;

pub use document::{Document, Metadata};
pub use error::DomainError;
