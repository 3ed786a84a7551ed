//! Retrieval of formatted context for a query

use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::knowledge_base::{enhance_query, format_results, QueryOutcome};
use crate::domain::DomainError;
use crate::infrastructure::knowledge_base::VectorIndexFacade;

/// Answers queries against the facade without ever failing
#[derive(Debug, Clone)]
pub struct QueryEngine {
    facade: Arc<VectorIndexFacade>,
    default_top_k: usize,
}

impl QueryEngine {
    pub fn new(facade: Arc<VectorIndexFacade>, default_top_k: usize) -> Self {
        Self {
            facade,
            default_top_k: default_top_k.max(1),
        }
    }

    pub fn default_top_k(&self) -> usize {
        self.default_top_k
    }

    /// Search for `query_text` plus any error patterns
    ///
    /// `top_k` of `None` or zero uses the configured default.
    pub async fn query(
        &self,
        query_text: &str,
        error_patterns: Option<&[String]>,
        top_k: Option<usize>,
    ) -> QueryOutcome {
        if !self.facade.is_enabled() {
            return QueryOutcome::Disabled;
        }

        let index = match self.facade.index().await {
            Ok(index) => index,
            Err(e) => {
                warn!(error = %e, "Vector index unavailable");
                return QueryOutcome::Unavailable;
            }
        };

        let k = top_k.filter(|k| *k > 0).unwrap_or(self.default_top_k);
        let query = enhance_query(query_text, error_patterns);

        match index.similarity_search(&query, k).await {
            Ok(results) => {
                debug!(k, results = results.len(), "Knowledge query completed");
                QueryOutcome::Context(format_results(&results))
            }
            Err(e) => degraded(&e, query_text),
        }
    }
}

fn degraded(error: &DomainError, query_text: &str) -> QueryOutcome {
    warn!(error = %error, kind = error.kind(), "Knowledge query failed");
    QueryOutcome::degraded(error.kind(), query_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::document::Document;
    use crate::domain::knowledge_base::{
        MockIndexInitializer, MockVectorIndex, SlowIndexInitializer, VectorIndex,
        NO_RESULTS_MESSAGE,
    };
    use serde_json::json;
    use std::time::Duration;

    fn facade_with(index: Arc<MockVectorIndex>, times: usize) -> Arc<VectorIndexFacade> {
        let mut initializer = MockIndexInitializer::new();
        initializer.expect_backend_name().return_const("mock");
        initializer.expect_initialize().times(times).returning(move || {
            let index: Arc<dyn VectorIndex> = index.clone();
            Ok(index)
        });
        Arc::new(VectorIndexFacade::new(Arc::new(initializer)))
    }

    #[tokio::test]
    async fn test_disabled() {
        let engine = QueryEngine::new(Arc::new(VectorIndexFacade::disabled()), 5);
        let outcome = engine.query("anything", None, None).await;

        assert_eq!(outcome, QueryOutcome::Disabled);
        assert!(outcome.into_text().to_lowercase().contains("not enabled"));
    }

    #[tokio::test]
    async fn test_unavailable() {
        let mut initializer = MockIndexInitializer::new();
        initializer.expect_backend_name().return_const("mock");
        initializer
            .expect_initialize()
            .returning(|| Err(DomainError::initialization("no database")));

        let engine = QueryEngine::new(Arc::new(VectorIndexFacade::new(Arc::new(initializer))), 5);
        let outcome = engine.query("anything", None, None).await;

        assert_eq!(outcome, QueryOutcome::Unavailable);
        assert!(outcome.into_text().contains("not available"));
    }

    #[tokio::test]
    async fn test_context() {
        let index = Arc::new(MockVectorIndex::new().with_search_results(vec![
            Document::new("Restart the pool").with_metadata("source", json!("/docs/db.md")),
        ]));
        let engine = QueryEngine::new(facade_with(index, 1), 5);

        let outcome = engine.query("pool exhausted", None, None).await;

        assert!(outcome.is_context());
        let text = outcome.into_text();
        assert!(text.contains("Document 1"));
        assert!(text.contains("/docs/db.md"));
        assert!(text.contains("Restart the pool"));
    }

    #[tokio::test]
    async fn test_no_results() {
        let engine = QueryEngine::new(facade_with(Arc::new(MockVectorIndex::new()), 1), 5);
        let outcome = engine.query("nothing", None, None).await;

        assert_eq!(outcome, QueryOutcome::Context(NO_RESULTS_MESSAGE.to_string()));
    }

    #[tokio::test]
    async fn test_top_k_defaults() {
        let results: Vec<Document> = (0..10).map(|i| Document::new(format!("doc {}", i))).collect();
        let index = Arc::new(MockVectorIndex::new().with_search_results(results));
        let engine = QueryEngine::new(facade_with(index, 1), 3);

        let count = |outcome: QueryOutcome| outcome.into_text().matches("Document ").count();

        assert_eq!(count(engine.query("q", None, None).await), 3);
        assert_eq!(count(engine.query("q", None, Some(0)).await), 3);
        assert_eq!(count(engine.query("q", None, Some(7)).await), 7);
    }

    #[tokio::test]
    async fn test_search_failure_is_degraded() {
        let index = Arc::new(MockVectorIndex::new());
        index.set_should_fail(true);
        let engine = QueryEngine::new(facade_with(index, 1), 5);

        let long_query = "x".repeat(250);
        let outcome = engine.query(&long_query, None, None).await;

        match &outcome {
            QueryOutcome::Degraded {
                error_type,
                query_preview,
            } => {
                assert_eq!(error_type, "StorageError");
                assert_eq!(query_preview.len(), 100);
            }
            other => panic!("expected degraded outcome, got {:?}", other),
        }
        assert!(outcome.into_text().contains("StorageError"));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_first_queries_initialize_once() {
        let index = Arc::new(MockVectorIndex::new());
        let initializer = Arc::new(SlowIndexInitializer::new(
            index.clone(),
            Duration::from_millis(50),
        ));
        let engine = QueryEngine::new(Arc::new(VectorIndexFacade::new(initializer.clone())), 5);

        let handles: Vec<_> = (0..6)
            .map(|i| {
                let engine = engine.clone();
                tokio::spawn(async move {
                    let patterns = vec![format!("E{}", i)];
                    engine.query("first", Some(patterns.as_slice()), None).await
                })
            })
            .collect();

        for handle in handles {
            assert!(handle.await.unwrap().is_context());
        }

        assert_eq!(initializer.calls(), 1);
        assert_eq!(index.search_count(), 6);
    }
}
