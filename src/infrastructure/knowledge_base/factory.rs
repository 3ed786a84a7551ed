//! Backend construction from configuration

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{BackendKind, KnowledgeConfig};
use crate::domain::embedding::EmbeddingProvider;
use crate::domain::knowledge_base::{IndexInitializer, VectorIndex};
use crate::domain::DomainError;

use super::local_file::LocalFileIndex;
use super::pgvector::{PgvectorConfig, PgvectorIndex};

/// Settings needed to open one of the backends
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendSettings {
    Durable {
        database_url: Option<String>,
        collection: String,
    },
    LocalFile {
        path: PathBuf,
    },
}

impl BackendSettings {
    pub fn from_config(config: &KnowledgeConfig) -> Self {
        match config.backend {
            BackendKind::Durable => Self::Durable {
                database_url: config.database_url.clone(),
                collection: config.collection.clone(),
            },
            BackendKind::LocalFile => Self::LocalFile {
                path: config.local_index_path.clone(),
            },
        }
    }
}

/// Creates the configured backend when the facade first needs it
#[derive(Debug)]
pub struct BackendInitializer {
    settings: BackendSettings,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl BackendInitializer {
    pub fn new(settings: BackendSettings, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { settings, embedder }
    }
}

#[async_trait]
impl IndexInitializer for BackendInitializer {
    fn backend_name(&self) -> &'static str {
        match self.settings {
            BackendSettings::Durable { .. } => BackendKind::Durable.as_str(),
            BackendSettings::LocalFile { .. } => BackendKind::LocalFile.as_str(),
        }
    }

    async fn initialize(&self) -> Result<Arc<dyn VectorIndex>, DomainError> {
        match &self.settings {
            BackendSettings::Durable {
                database_url,
                collection,
            } => {
                let database_url = database_url.as_deref().ok_or_else(|| {
                    DomainError::initialization(
                        "the durable backend requires knowledge.database_url",
                    )
                })?;

                let config =
                    PgvectorConfig::new(self.embedder.dimensions()).with_collection(collection);
                let index = PgvectorIndex::connect(database_url, config, self.embedder.clone())
                    .await?;

                Ok(Arc::new(index))
            }
            BackendSettings::LocalFile { path } => {
                let index = LocalFileIndex::open(path, self.embedder.clone()).await?;
                Ok(Arc::new(index))
            }
        }
    }
}
