use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::ingestion::{validate_batch_size, ChunkingConfig, ChunkingType};
use crate::domain::knowledge_base::validate_top_k;
use crate::domain::DomainError;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub knowledge: KnowledgeConfig,
    pub embedding: EmbeddingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

/// Vector index backend selection
#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// Server-side index in Postgres with pgvector
    Durable,
    /// JSON index file on local disk
    #[default]
    LocalFile,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Durable => "durable",
            Self::LocalFile => "local_file",
        }
    }
}

/// Ingestion and retrieval settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    pub enabled: bool,
    pub backend: BackendKind,
    pub chunk_strategy: ChunkingType,
    pub chunk_size: i64,
    pub chunk_overlap: i64,
    pub top_k: usize,
    /// Largest file the loaders accept, in bytes
    pub max_file_size: u64,
    /// Roots that ingestion may read from; empty means unrestricted
    pub allowed_base_dirs: Vec<PathBuf>,
    pub batch_size: usize,
    pub local_index_path: PathBuf,
    /// Required for the durable backend
    pub database_url: Option<String>,
    pub collection: String,
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            backend: BackendKind::default(),
            chunk_strategy: ChunkingType::default(),
            chunk_size: 1000,
            chunk_overlap: 200,
            top_k: 5,
            max_file_size: 10 * 1024 * 1024,
            allowed_base_dirs: Vec::new(),
            batch_size: 100,
            local_index_path: PathBuf::from("data/knowledge_index"),
            database_url: None,
            collection: "knowledge_chunks".to_string(),
        }
    }
}

impl KnowledgeConfig {
    /// Check the numeric settings, naming the offending value
    pub fn validate(&self) -> Result<(), DomainError> {
        ChunkingConfig::new(self.chunk_size, self.chunk_overlap)?;

        validate_batch_size(self.batch_size)?;
        validate_top_k(self.top_k)?;

        if self.max_file_size == 0 {
            return Err(DomainError::validation(
                "max_file_size must be positive, got 0",
            ));
        }

        Ok(())
    }
}

/// OpenAI-compatible embedding endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingConfig {
    pub base_url: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub model: String,
    pub dimensions: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimensions: 1536,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_with(None)
    }

    /// Load defaults, then `file` when given, then `KPIPE__` environment variables
    pub fn load_with(file: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false));

        if let Some(path) = file {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix("KPIPE")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("knowledge.allowed_base_dirs"),
            )
            .build()?;

        config.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert!(config.knowledge.enabled);
        assert_eq!(config.knowledge.backend, BackendKind::LocalFile);
        assert_eq!(config.knowledge.chunk_strategy, ChunkingType::Recursive);
        assert_eq!(config.knowledge.chunk_size, 1000);
        assert_eq!(config.knowledge.chunk_overlap, 200);
        assert_eq!(config.knowledge.top_k, 5);
        assert_eq!(config.knowledge.batch_size, 100);
        assert!(config.knowledge.allowed_base_dirs.is_empty());
        assert_eq!(config.embedding.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert!(config.knowledge.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_windows() {
        let cases = [(0, 0), (100, 100), (100, -1)];

        for (size, overlap) in cases {
            let config = KnowledgeConfig {
                chunk_size: size,
                chunk_overlap: overlap,
                ..Default::default()
            };
            let err = config.validate().unwrap_err();
            assert!(matches!(err, DomainError::Validation { .. }));
        }
    }

    #[test]
    fn test_validate_rejects_zero_counts() {
        let config = KnowledgeConfig {
            batch_size: 0,
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().to_string().contains("batch_size"));

        let config = KnowledgeConfig {
            top_k: 0,
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().to_string().contains("top_k"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("kpipe.yaml");
        fs::write(
            &path,
            r#"
logging:
  level: debug
  format: json
knowledge:
  backend: durable
  chunk_strategy: fixed
  chunk_size: 500
  allowed_base_dirs:
    - /srv/docs
  database_url: postgres://localhost/knowledge
"#,
        )
        .unwrap();

        let config = AppConfig::load_with(Some(&path)).unwrap();

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.knowledge.backend, BackendKind::Durable);
        assert_eq!(config.knowledge.chunk_strategy, ChunkingType::Fixed);
        assert_eq!(config.knowledge.chunk_size, 500);
        assert_eq!(config.knowledge.chunk_overlap, 200);
        assert_eq!(
            config.knowledge.allowed_base_dirs,
            vec![PathBuf::from("/srv/docs")]
        );
        assert_eq!(
            config.knowledge.database_url.as_deref(),
            Some("postgres://localhost/knowledge")
        );
    }
}
