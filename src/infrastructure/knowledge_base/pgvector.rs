//! pgvector durable index implementation

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::domain::document::{Document, Metadata};
use crate::domain::embedding::EmbeddingProvider;
use crate::domain::knowledge_base::{validate_collection_name, VectorIndex};
use crate::domain::DomainError;

/// Configuration for the pgvector index
#[derive(Debug, Clone)]
pub struct PgvectorConfig {
    /// Embedding dimensions
    pub dimensions: usize,
    /// Table holding the vectors
    pub collection: String,
    /// Distance metric to use
    pub distance_metric: DistanceMetric,
    /// Maximum pool connections
    pub max_connections: u32,
    /// How long to wait for a connection before giving up
    pub connect_timeout: Duration,
}

impl PgvectorConfig {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions,
            collection: "knowledge_chunks".to_string(),
            distance_metric: DistanceMetric::Cosine,
            max_connections: 5,
            connect_timeout: Duration::from_secs(10),
        }
    }

    pub fn with_collection(mut self, name: impl Into<String>) -> Self {
        self.collection = name.into();
        self
    }

    pub fn with_distance_metric(mut self, metric: DistanceMetric) -> Self {
        self.distance_metric = metric;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }
}

/// Distance metric for vector similarity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistanceMetric {
    /// Cosine distance (1 - cosine similarity)
    Cosine,
    /// Euclidean (L2) distance
    Euclidean,
    /// Negative inner product
    InnerProduct,
}

impl DistanceMetric {
    /// pgvector operator for this metric
    fn operator(&self) -> &'static str {
        match self {
            Self::Cosine => "<=>",
            Self::Euclidean => "<->",
            Self::InnerProduct => "<#>",
        }
    }

    /// Operator class used for the ivfflat index
    fn ops_class(&self) -> &'static str {
        match self {
            Self::Cosine => "vector_cosine_ops",
            Self::Euclidean => "vector_l2_ops",
            Self::InnerProduct => "vector_ip_ops",
        }
    }
}

/// Durable vector index backed by Postgres with the pgvector extension
///
/// Deletion and source listing are not offered by this backend.
pub struct PgvectorIndex {
    pool: PgPool,
    config: PgvectorConfig,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl Debug for PgvectorIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgvectorIndex")
            .field("config", &self.config)
            .field("embedder", &self.embedder.provider_name())
            .finish()
    }
}

impl PgvectorIndex {
    /// Connect, make sure the extension and table exist, and return the index
    pub async fn connect(
        database_url: &str,
        config: PgvectorConfig,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self, DomainError> {
        validate_collection_name(&config.collection)?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.connect_timeout)
            .connect(database_url)
            .await
            .map_err(|e| {
                DomainError::initialization(format!("Failed to connect to vector database: {}", e))
            })?;

        let index = Self {
            pool,
            config,
            embedder,
        };
        index.ensure_table().await?;

        info!(collection = %index.config.collection, "Connected to pgvector index");
        Ok(index)
    }

    /// Ensure the vector table exists with pgvector extension
    async fn ensure_table(&self) -> Result<(), DomainError> {
        sqlx::query("CREATE EXTENSION IF NOT EXISTS vector")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::initialization(format!("Failed to create vector extension: {}", e))
            })?;

        let table = &self.config.collection;
        let query = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id VARCHAR(1100) PRIMARY KEY,
                content TEXT NOT NULL,
                embedding vector({}) NOT NULL,
                metadata JSONB NOT NULL DEFAULT '{{}}',
                source VARCHAR(1000),
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            table, self.config.dimensions
        );

        sqlx::query(&query).execute(&self.pool).await.map_err(|e| {
            DomainError::initialization(format!("Failed to create table {}: {}", table, e))
        })?;

        let vector_index = format!(
            "CREATE INDEX IF NOT EXISTS idx_{}_embedding ON {} USING ivfflat (embedding {})",
            table,
            table,
            self.config.distance_metric.ops_class()
        );

        // ivfflat needs rows to build
        if let Err(e) = sqlx::query(&vector_index).execute(&self.pool).await {
            warn!(table = %table, error = %e, "Could not create vector index yet");
        }

        Ok(())
    }
}

fn embedding_to_pgvector(embedding: &[f32]) -> String {
    let values: Vec<String> = embedding.iter().map(|v| v.to_string()).collect();
    format!("[{}]", values.join(","))
}

#[async_trait]
impl VectorIndex for PgvectorIndex {
    fn provider_type(&self) -> &'static str {
        "pgvector"
    }

    async fn add_documents(&self, documents: Vec<Document>) -> Result<usize, DomainError> {
        if documents.is_empty() {
            return Ok(0);
        }

        let texts: Vec<String> = documents.iter().map(|d| d.content.clone()).collect();
        let embeddings = self.embedder.embed(texts).await?;

        if embeddings.len() != documents.len() {
            return Err(DomainError::storage(format!(
                "Embedding count mismatch: {} documents, {} embeddings",
                documents.len(),
                embeddings.len()
            )));
        }

        let query = format!(
            r#"
            INSERT INTO {} (id, content, embedding, metadata, source)
            VALUES ($1, $2, $3::vector, $4, $5)
            ON CONFLICT (id) DO UPDATE SET
                content = EXCLUDED.content,
                embedding = EXCLUDED.embedding,
                metadata = EXCLUDED.metadata,
                source = EXCLUDED.source,
                updated_at = NOW()
            "#,
            self.config.collection
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to begin transaction: {}", e)))?;

        let count = documents.len();

        for (doc, embedding) in documents.into_iter().zip(embeddings) {
            let id = doc
                .chunk_id()
                .map(str::to_string)
                .unwrap_or_else(|| Uuid::new_v4().to_string());
            let source = doc.source().map(str::to_string);
            let metadata = serde_json::to_value(&doc.metadata)
                .map_err(|e| DomainError::storage(format!("Invalid metadata: {}", e)))?;

            sqlx::query(&query)
                .bind(&id)
                .bind(&doc.content)
                .bind(embedding_to_pgvector(&embedding))
                .bind(&metadata)
                .bind(&source)
                .execute(&mut *tx)
                .await
                .map_err(|e| {
                    error!(id = %id, error = %e, "Failed to insert chunk");
                    DomainError::storage(format!("Failed to insert chunk {}: {}", id, e))
                })?;
        }

        tx.commit()
            .await
            .map_err(|e| DomainError::storage(format!("Failed to commit chunks: {}", e)))?;

        debug!(collection = %self.config.collection, added = count, "Stored chunks");
        Ok(count)
    }

    async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Document>, DomainError> {
        let query_embedding = self
            .embedder
            .embed(vec![query.to_string()])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::storage("Failed to generate query embedding"))?;

        let sql = format!(
            r#"
            SELECT content, metadata, embedding {} $1::vector AS distance
            FROM {}
            ORDER BY distance
            LIMIT $2
            "#,
            self.config.distance_metric.operator(),
            self.config.collection
        );

        let rows = sqlx::query(&sql)
            .bind(embedding_to_pgvector(&query_embedding))
            .bind(k as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(collection = %self.config.collection, error = %e, "Search failed");
                DomainError::storage(format!("Search failed: {}", e))
            })?;

        let documents = rows
            .into_iter()
            .map(|row| {
                let content: String = row.get("content");
                let metadata: serde_json::Value = row.get("metadata");
                let metadata: Metadata =
                    serde_json::from_value(metadata).unwrap_or_else(|_| HashMap::new());

                Document::new(content).with_all_metadata(metadata)
            })
            .collect::<Vec<_>>();

        debug!(
            collection = %self.config.collection,
            results = documents.len(),
            "Search completed"
        );

        Ok(documents)
    }
}
