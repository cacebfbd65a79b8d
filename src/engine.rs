//! Orchestrator for the hybrid retrieval pipeline:
//!   1. Synonym query expansion (optional)
//!   2. Four sub-retrievers run concurrently, each under its own timeout
//!   3. Weighted RRF fusion
//!   4. Heuristic re-ranking of the fused top-K (optional)
//!   5. Threshold filter, truncation, diagnostics

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::anyhow;

use crate::collaborators::{EmbeddingProvider, LexicalSearch, PatternSearch, VectorSearch};
use crate::config::RetrievalConfig;
use crate::error::SearchError;
use crate::models::{
    Candidate, FusedResult, MethodCounts, RetrievalMethod, SearchOptions, SearchPerformance,
    SearchResponse,
};
use crate::query::{expand, keywords};
use crate::search::{bm25, fusion, keyword, pattern, rerank, semantic, RetrieveOptions};

/// The hybrid search engine. Holds the immutable config and the external
/// collaborators; everything per-query is recomputed from scratch, so one
/// engine can serve any number of concurrent queries.
pub struct HybridSearchEngine {
    config: RetrievalConfig,
    vector: Arc<dyn VectorSearch>,
    lexical: Arc<dyn LexicalSearch>,
    pattern: Arc<dyn PatternSearch>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl HybridSearchEngine {
    pub fn new(
        config: RetrievalConfig,
        vector: Arc<dyn VectorSearch>,
        lexical: Arc<dyn LexicalSearch>,
        pattern: Arc<dyn PatternSearch>,
        embedder: Arc<dyn EmbeddingProvider>,
    ) -> Self {
        Self {
            config,
            vector,
            lexical,
            pattern,
            embedder,
        }
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    /// Run the full hybrid pipeline for one query.
    ///
    /// Individual sub-retriever failures degrade to empty lists and show up
    /// only in the per-method counts. Only two things surface as errors: an
    /// empty query, and all four retrievers failing with the semantic-only
    /// fallback failing too.
    pub async fn search(
        &self,
        query: &str,
        options: &SearchOptions,
    ) -> Result<SearchResponse, SearchError> {
        let started = Instant::now();

        let query = query.trim();
        if query.is_empty() {
            return Err(SearchError::EmptyQuery);
        }

        let limit = options.limit.unwrap_or(self.config.limit);
        let retrieve_opts = RetrieveOptions {
            limit,
            exclude_file: options.exclude_file.clone(),
        };

        let expanded = if self.config.enable_expansion {
            expand::expand(query)
        } else {
            query.to_string()
        };
        if expanded != query {
            tracing::debug!("query expanded: '{query}' -> '{expanded}'");
        }
        // Context boosting keys off what the user actually typed.
        let query_keywords = keywords::content_words(query);

        let budget = Duration::from_millis(self.config.retriever_timeout_ms);
        let (semantic_r, keyword_r, bm25_r, pattern_r) = tokio::join!(
            run_guarded(
                RetrievalMethod::Semantic,
                budget,
                semantic::retrieve(self.vector.as_ref(), &expanded, &retrieve_opts),
            ),
            run_guarded(
                RetrievalMethod::Keyword,
                budget,
                keyword::retrieve(self.lexical.as_ref(), &expanded, &retrieve_opts),
            ),
            run_guarded(
                RetrievalMethod::Bm25,
                budget,
                bm25::retrieve(
                    self.lexical.as_ref(),
                    &expanded,
                    &self.config.bm25,
                    &retrieve_opts,
                ),
            ),
            run_guarded(
                RetrievalMethod::Pattern,
                budget,
                pattern::retrieve(self.pattern.as_ref(), &expanded, &retrieve_opts),
            ),
        );

        // All four failing (not merely empty) triggers the last-resort
        // degradation path: one semantic call with the original query.
        if semantic_r.is_err() && keyword_r.is_err() && bm25_r.is_err() && pattern_r.is_err() {
            tracing::info!("all sub-retrievers failed, falling back to semantic-only search");
            return self
                .semantic_fallback(query, &retrieve_opts, limit, started)
                .await;
        }

        let semantic_list = semantic_r.unwrap_or_default();
        let keyword_list = keyword_r.unwrap_or_default();
        let bm25_list = bm25_r.unwrap_or_default();
        let pattern_list = pattern_r.unwrap_or_default();

        let counts = MethodCounts {
            semantic: semantic_list.len(),
            keyword: keyword_list.len(),
            bm25: bm25_list.len(),
            pattern: pattern_list.len(),
        };
        tracing::debug!(
            "retrieved semantic={} keyword={} bm25={} pattern={}",
            counts.semantic,
            counts.keyword,
            counts.bm25,
            counts.pattern
        );

        let lists = [
            (semantic_list, self.config.semantic_weight),
            (keyword_list, self.config.keyword_weight),
            (bm25_list, self.config.bm25_weight),
            (pattern_list, self.config.pattern_weight),
        ];
        let mut fused = fusion::fuse(&lists, self.config.rrf_k);

        // Pattern search has no exclude parameter, so the filter is applied
        // here as well to keep excluded files out of every path.
        if let Some(excluded) = retrieve_opts.exclude() {
            fused.retain(|f| f.file_path != excluded);
        }

        let (mut results, reranked) = if self.config.enable_rerank {
            rerank::rerank(
                self.embedder.as_ref(),
                query,
                &query_keywords,
                fused,
                self.config.rerank_top_k,
            )
            .await
        } else {
            (rerank::passthrough(fused), false)
        };

        if let Some(threshold) = options.threshold {
            results.retain(|r| r.rerank_score >= threshold);
        }
        results.truncate(limit);

        Ok(SearchResponse {
            query: query.to_string(),
            count: results.len(),
            results,
            retrieval_methods: counts,
            performance: SearchPerformance {
                duration_ms: started.elapsed().as_millis() as u64,
                reranked,
            },
        })
    }

    /// Semantic-only degradation path: raw vector-search output, no fusion
    /// or re-ranking. Fails hard only if this call fails too.
    async fn semantic_fallback(
        &self,
        query: &str,
        retrieve_opts: &RetrieveOptions,
        limit: usize,
        started: Instant,
    ) -> Result<SearchResponse, SearchError> {
        let candidates = semantic::retrieve(self.vector.as_ref(), query, retrieve_opts)
            .await
            .map_err(SearchError::TotalFailure)?;

        let counts = MethodCounts {
            semantic: candidates.len(),
            ..MethodCounts::default()
        };
        let mut results = rerank::passthrough(wrap_fallback(candidates));
        results.truncate(limit);

        Ok(SearchResponse {
            query: query.to_string(),
            count: results.len(),
            results,
            retrieval_methods: counts,
            performance: SearchPerformance {
                duration_ms: started.elapsed().as_millis() as u64,
                reranked: false,
            },
        })
    }
}

/// Run one sub-retriever under a timeout, logging and returning `Err` on
/// failure so the orchestrator can tell "failed" apart from "found
/// nothing". Callers absorb the error into an empty list.
async fn run_guarded<F>(
    method: RetrievalMethod,
    budget: Duration,
    fut: F,
) -> anyhow::Result<Vec<Candidate>>
where
    F: Future<Output = anyhow::Result<Vec<Candidate>>>,
{
    match tokio::time::timeout(budget, fut).await {
        Ok(Ok(candidates)) => Ok(candidates),
        Ok(Err(e)) => {
            tracing::warn!("{} retrieval failed: {e:#}", method.as_str());
            Err(e)
        }
        Err(_) => {
            tracing::warn!("{} retrieval timed out after {budget:?}", method.as_str());
            Err(anyhow!("{} retrieval timed out", method.as_str()))
        }
    }
}

/// Dress raw semantic candidates in the fused shape so the fallback path
/// returns the same response type as the full pipeline.
fn wrap_fallback(candidates: Vec<Candidate>) -> Vec<FusedResult> {
    candidates
        .into_iter()
        .enumerate()
        .map(|(i, c)| FusedResult {
            content: c.content,
            file_path: c.file_path,
            line_start: c.line_start,
            line_end: c.line_end,
            rrf_score: c.method_score,
            method_scores: std::iter::once((RetrievalMethod::Semantic, c.method_score)).collect(),
            final_rank: i + 1,
        })
        .collect()
}
