use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Which retrieval strategy produced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalMethod {
    Semantic,
    Keyword,
    Bm25,
    Pattern,
}

impl RetrievalMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RetrievalMethod::Semantic => "semantic",
            RetrievalMethod::Keyword => "keyword",
            RetrievalMethod::Bm25 => "bm25",
            RetrievalMethod::Pattern => "pattern",
        }
    }
}

/// Stable identity of a logical code span: the same span returned by two
/// different methods must map to the same key.
///
/// Total ordering (path, then line range) is what makes tie-breaking in
/// fusion deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CandidateKey {
    pub file_path: String,
    pub line_start: usize,
    pub line_end: usize,
}

/// One retrieval hit from a single sub-retriever.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub content: String,
    pub file_path: String,
    pub line_start: usize,
    pub line_end: usize,
    pub method: RetrievalMethod,
    /// 1-based position within this method's own list.
    pub method_rank: usize,
    /// Method-local relevance. Scales differ per method and are never
    /// compared across methods; fusion goes by rank only.
    pub method_score: f32,
}

impl Candidate {
    /// Identity key, or `None` for malformed hits (no file path, or an
    /// inverted line range). Malformed hits are dropped by fusion.
    pub fn key(&self) -> Option<CandidateKey> {
        if self.file_path.is_empty() || self.line_end < self.line_start {
            return None;
        }
        Some(CandidateKey {
            file_path: self.file_path.clone(),
            line_start: self.line_start,
            line_end: self.line_end,
        })
    }
}

/// A deduplicated candidate after RRF fusion.
#[derive(Debug, Clone, Serialize)]
pub struct FusedResult {
    pub content: String,
    pub file_path: String,
    pub line_start: usize,
    pub line_end: usize,
    /// Accumulated weighted RRF score across all methods that returned
    /// this span.
    pub rrf_score: f32,
    /// Per-method weighted contribution, kept for explainability.
    pub method_scores: HashMap<RetrievalMethod, f32>,
    /// 1-based position after fusion.
    pub final_rank: usize,
}

impl FusedResult {
    pub fn key(&self) -> CandidateKey {
        CandidateKey {
            file_path: self.file_path.clone(),
            line_start: self.line_start,
            line_end: self.line_end,
        }
    }
}

/// A fused result after the re-ranking pass.
#[derive(Debug, Clone, Serialize)]
pub struct RankedResult {
    #[serde(flatten)]
    pub fused: FusedResult,
    /// Blended score: fused score, optionally mixed with embedding cosine
    /// similarity, then scaled by the context boost.
    pub rerank_score: f32,
    /// File-path keyword boost actually applied, 0.0 to 0.2.
    pub context_boost: f32,
}

/// Caller-side options for a single search.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchOptions {
    /// Overrides the configured result limit.
    pub limit: Option<usize>,
    /// Drops final results whose rerank score falls below this value.
    pub threshold: Option<f32>,
    /// File path to exclude from results (e.g. the file being edited).
    pub exclude_file: Option<String>,
}

/// Per-method candidate counts, reported in diagnostics.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct MethodCounts {
    pub semantic: usize,
    pub keyword: usize,
    pub bm25: usize,
    pub pattern: usize,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct SearchPerformance {
    pub duration_ms: u64,
    pub reranked: bool,
}

/// Search response: ranked results plus diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub results: Vec<RankedResult>,
    pub count: usize,
    pub retrieval_methods: MethodCounts,
    pub performance: SearchPerformance,
}
