mod app_config;

pub use app_config::{
    AppConfig, BackendKind, EmbeddingConfig, KnowledgeConfig, LogFormat, LoggingConfig,
};
