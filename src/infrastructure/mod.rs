//! Infrastructure layer - filesystem, parsing, embedding and index implementations

pub mod embedding;
pub mod filesystem;
pub mod ingestion;
pub mod knowledge_base;
pub mod observability;
pub mod services;
