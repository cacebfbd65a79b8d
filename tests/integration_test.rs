//! Integration tests for the hybrid retrieval pipeline.
//!
//! These drive the full engine through in-memory mock collaborators, so
//! the whole flow runs without a vector index, a lexical backend, or an
//! embedding model.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use hybrid_retrieval::collaborators::{
    EmbeddingProvider, LexicalHit, LexicalSearch, PatternSearch, VectorHit, VectorSearch,
};
use hybrid_retrieval::{
    HybridSearchEngine, RetrievalConfig, RetrievalMethod, SearchError, SearchOptions,
};

/// Helper: hits simulating a small Rust project.
fn sample_vector_hits() -> Vec<VectorHit> {
    vec![
        VectorHit {
            content: "pub async fn connect(url: &str) -> Result<Pool> { Pool::connect(url).await }"
                .to_string(),
            file_path: "src/db.rs".to_string(),
            line_start: 1,
            line_end: 15,
            similarity: Some(0.91),
        },
        VectorHit {
            content: "pub struct User { pub id: i64, pub email: String }".to_string(),
            file_path: "src/models.rs".to_string(),
            line_start: 1,
            line_end: 12,
            similarity: Some(0.74),
        },
    ]
}

fn sample_lexical_hits() -> Vec<LexicalHit> {
    vec![
        LexicalHit {
            content: "pub async fn connect(url: &str) -> Result<Pool> { Pool::connect(url).await }"
                .to_string(),
            file_path: "src/db.rs".to_string(),
            line_start: 1,
            line_end: 15,
        },
        LexicalHit {
            content: "async fn health_check() -> &'static str { \"OK\" }".to_string(),
            file_path: "src/handlers.rs".to_string(),
            line_start: 1,
            line_end: 8,
        },
    ]
}

#[derive(Default)]
struct MockVector {
    /// When set, searches fail unless the query equals this string. Lets a
    /// test fail the concurrent phase (expanded query) while the fallback
    /// (original query) succeeds.
    only_accept: Option<String>,
    fail_always: bool,
}

#[async_trait]
impl VectorSearch for MockVector {
    async fn search(
        &self,
        query: &str,
        _limit: usize,
        exclude_file: Option<&str>,
    ) -> Result<Vec<VectorHit>> {
        if self.fail_always {
            anyhow::bail!("vector index offline");
        }
        if let Some(only) = &self.only_accept {
            if query != only {
                anyhow::bail!("vector index offline");
            }
        }
        Ok(sample_vector_hits()
            .into_iter()
            .filter(|h| Some(h.file_path.as_str()) != exclude_file)
            .collect())
    }
}

#[derive(Default)]
struct MockLexical {
    fail: bool,
}

#[async_trait]
impl LexicalSearch for MockLexical {
    async fn search(
        &self,
        _query: &str,
        _limit: usize,
        exclude_file: Option<&str>,
    ) -> Result<Vec<LexicalHit>> {
        if self.fail {
            anyhow::bail!("lexical backend offline");
        }
        Ok(sample_lexical_hits()
            .into_iter()
            .filter(|h| Some(h.file_path.as_str()) != exclude_file)
            .collect())
    }
}

#[derive(Default)]
struct MockPattern {
    fail: bool,
}

#[async_trait]
impl PatternSearch for MockPattern {
    async fn search(&self, token: &str, _limit: usize) -> Result<Vec<LexicalHit>> {
        if self.fail {
            anyhow::bail!("pattern backend offline");
        }
        Ok(vec![LexicalHit {
            content: format!("fn {token}() {{}}"),
            file_path: format!("src/{}.rs", token.to_lowercase()),
            line_start: 40,
            line_end: 60,
        }])
    }
}

#[derive(Default)]
struct MockEmbedder {
    fail: bool,
    cache: HashMap<String, Vec<f32>>,
}

#[async_trait]
impl EmbeddingProvider for MockEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        if self.fail {
            anyhow::bail!("embedding service offline");
        }
        Ok(vec![1.0, 0.0, 0.0])
    }

    async fn cached(&self, text: &str) -> Option<Vec<f32>> {
        self.cache.get(text).cloned()
    }
}

fn engine_with(
    config: RetrievalConfig,
    vector: MockVector,
    lexical: MockLexical,
    pattern: MockPattern,
    embedder: MockEmbedder,
) -> HybridSearchEngine {
    HybridSearchEngine::new(
        config,
        Arc::new(vector),
        Arc::new(lexical),
        Arc::new(pattern),
        Arc::new(embedder),
    )
}

fn default_engine() -> HybridSearchEngine {
    engine_with(
        RetrievalConfig::default(),
        MockVector::default(),
        MockLexical::default(),
        MockPattern::default(),
        MockEmbedder::default(),
    )
}

#[tokio::test]
async fn test_full_pipeline_end_to_end() {
    let engine = default_engine();
    let response = engine
        .search("database connect pool", &SearchOptions::default())
        .await
        .unwrap();

    assert!(!response.results.is_empty());
    assert_eq!(response.count, response.results.len());
    assert!(response.retrieval_methods.semantic > 0);
    assert!(response.retrieval_methods.keyword > 0);
    assert!(response.performance.reranked);

    // src/db.rs appears in vector, lexical, and bm25 results: it must be
    // fused into a single entry that leads the ranking.
    let db_entries: Vec<_> = response
        .results
        .iter()
        .filter(|r| r.fused.file_path == "src/db.rs")
        .collect();
    assert_eq!(db_entries.len(), 1);
    assert_eq!(response.results[0].fused.file_path, "src/db.rs");
}

#[tokio::test]
async fn test_duplicate_span_keeps_scores_from_multiple_methods() {
    let engine = default_engine();
    let response = engine
        .search("connect pool", &SearchOptions::default())
        .await
        .unwrap();

    let db = response
        .results
        .iter()
        .find(|r| r.fused.file_path == "src/db.rs")
        .unwrap();
    assert!(db.fused.method_scores.contains_key(&RetrievalMethod::Semantic));
    assert!(db.fused.method_scores.contains_key(&RetrievalMethod::Keyword));
}

#[tokio::test]
async fn test_pattern_tokens_reach_pattern_search() {
    let engine = default_engine();
    let response = engine
        .search("where is fn connect defined", &SearchOptions::default())
        .await
        .unwrap();
    assert!(response.retrieval_methods.pattern > 0);
    assert!(response
        .results
        .iter()
        .any(|r| r.fused.method_scores.contains_key(&RetrievalMethod::Pattern)));
}

#[tokio::test]
async fn test_single_retriever_failure_is_absorbed() {
    // Lexical down takes keyword and bm25 with it; the query still succeeds.
    let engine = engine_with(
        RetrievalConfig::default(),
        MockVector::default(),
        MockLexical { fail: true },
        MockPattern::default(),
        MockEmbedder::default(),
    );
    let response = engine
        .search("database connect", &SearchOptions::default())
        .await
        .unwrap();
    assert!(!response.results.is_empty());
    assert_eq!(response.retrieval_methods.keyword, 0);
    assert_eq!(response.retrieval_methods.bm25, 0);
    assert!(response.retrieval_methods.semantic > 0);
}

#[tokio::test]
async fn test_total_failure_falls_back_to_semantic_only() {
    // "fn" and "db" expand, so the concurrent phase sees an expanded query
    // the vector mock rejects; the fallback retries with the original. The
    // "fn connect" token makes the pattern retriever actually run and fail.
    let query = "fn connect db";
    let engine = engine_with(
        RetrievalConfig::default(),
        MockVector {
            only_accept: Some(query.to_string()),
            fail_always: false,
        },
        MockLexical { fail: true },
        MockPattern { fail: true },
        MockEmbedder::default(),
    );
    let response = engine.search(query, &SearchOptions::default()).await.unwrap();

    assert!(!response.results.is_empty());
    assert!(response.retrieval_methods.semantic > 0);
    assert_eq!(response.retrieval_methods.keyword, 0);
    assert_eq!(response.retrieval_methods.bm25, 0);
    assert_eq!(response.retrieval_methods.pattern, 0);
    assert!(!response.performance.reranked);
}

#[tokio::test]
async fn test_total_failure_with_failing_fallback_is_an_error() {
    let engine = engine_with(
        RetrievalConfig::default(),
        MockVector {
            only_accept: None,
            fail_always: true,
        },
        MockLexical { fail: true },
        MockPattern { fail: true },
        MockEmbedder::default(),
    );
    let err = engine
        .search("fn connect db", &SearchOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SearchError::TotalFailure(_)));
}

#[tokio::test]
async fn test_empty_query_is_rejected() {
    let engine = default_engine();
    let err = engine.search("   ", &SearchOptions::default()).await.unwrap_err();
    assert!(matches!(err, SearchError::EmptyQuery));
}

#[tokio::test]
async fn test_limit_is_respected() {
    let engine = default_engine();
    let options = SearchOptions {
        limit: Some(1),
        ..SearchOptions::default()
    };
    let response = engine.search("database connect", &options).await.unwrap();
    assert_eq!(response.results.len(), 1);
}

#[tokio::test]
async fn test_exclude_file_filters_all_paths() {
    let engine = default_engine();
    let options = SearchOptions {
        exclude_file: Some("src/db.rs".to_string()),
        ..SearchOptions::default()
    };
    let response = engine.search("database connect", &options).await.unwrap();
    assert!(response
        .results
        .iter()
        .all(|r| r.fused.file_path != "src/db.rs"));
}

#[tokio::test]
async fn test_rerank_disabled_reports_fused_order() {
    let config = RetrievalConfig {
        enable_rerank: false,
        ..RetrievalConfig::default()
    };
    let engine = engine_with(
        config,
        MockVector::default(),
        MockLexical::default(),
        MockPattern::default(),
        MockEmbedder::default(),
    );
    let response = engine
        .search("database connect", &SearchOptions::default())
        .await
        .unwrap();
    assert!(!response.performance.reranked);
    for pair in response.results.windows(2) {
        assert!(pair[0].fused.rrf_score >= pair[1].fused.rrf_score);
        assert_eq!(pair[0].rerank_score, pair[0].fused.rrf_score);
    }
}

#[tokio::test]
async fn test_embedding_failure_degrades_rerank_not_search() {
    let engine = engine_with(
        RetrievalConfig::default(),
        MockVector::default(),
        MockLexical::default(),
        MockPattern::default(),
        MockEmbedder {
            fail: true,
            cache: HashMap::new(),
        },
    );
    let response = engine
        .search("database connect", &SearchOptions::default())
        .await
        .unwrap();
    assert!(!response.results.is_empty());
    assert!(!response.performance.reranked);
}

#[tokio::test]
async fn test_threshold_filters_low_scores() {
    let engine = default_engine();
    let options = SearchOptions {
        threshold: Some(f32::MAX),
        ..SearchOptions::default()
    };
    let response = engine.search("database connect", &options).await.unwrap();
    assert!(response.results.is_empty());
    assert_eq!(response.count, 0);
}
