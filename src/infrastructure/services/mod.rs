//! Infrastructure services

mod knowledge_service;
mod query_engine;

pub use knowledge_service::KnowledgeService;
pub use query_engine::QueryEngine;
