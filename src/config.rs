use serde::{Deserialize, Serialize};

/// Immutable engine configuration. Built once, shared read-only across
/// queries; per-query state never lives here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Fusion weight for the semantic (vector) retriever.
    pub semantic_weight: f32,
    /// Fusion weight for the keyword (lexical) retriever.
    pub keyword_weight: f32,
    /// Fusion weight for the BM25 retriever.
    pub bm25_weight: f32,
    /// Fusion weight for the exact pattern retriever.
    pub pattern_weight: f32,
    /// RRF smoothing constant. Higher values flatten the influence of top
    /// ranks from any single list.
    pub rrf_k: f32,
    /// How many fused results the re-ranker re-scores; the rest pass
    /// through in fused order.
    pub rerank_top_k: usize,
    pub enable_rerank: bool,
    pub enable_expansion: bool,
    /// Default result limit when the caller doesn't override it.
    pub limit: usize,
    /// Per-sub-retriever timeout in milliseconds. A slow collaborator
    /// degrades to an empty list instead of stalling the query.
    pub retriever_timeout_ms: u64,
    pub bm25: Bm25Params,
}

/// BM25 scoring parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bm25Params {
    pub k1: f32,
    pub b: f32,
    /// Corpus-wide average document length in tokens. A fixed constant
    /// rather than a measured statistic.
    pub avg_doc_len: f32,
    /// Assumed corpus size for the simplified IDF. True corpus statistics
    /// are unavailable at this layer; changing this changes ranking.
    pub corpus_size: f32,
}

impl Default for Bm25Params {
    fn default() -> Self {
        Self {
            k1: 1.2,
            b: 0.75,
            avg_doc_len: 100.0,
            corpus_size: 10_000.0,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            semantic_weight: 0.4,
            keyword_weight: 0.3,
            bm25_weight: 0.2,
            pattern_weight: 0.1,
            rrf_k: 60.0,
            rerank_top_k: 20,
            enable_rerank: true,
            enable_expansion: true,
            limit: 10,
            retriever_timeout_ms: 2_000,
            bm25: Bm25Params::default(),
        }
    }
}

impl RetrievalConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("HYBRID_SEMANTIC_WEIGHT") {
            if let Ok(v) = val.parse() {
                config.semantic_weight = v;
            }
        }
        if let Ok(val) = std::env::var("HYBRID_KEYWORD_WEIGHT") {
            if let Ok(v) = val.parse() {
                config.keyword_weight = v;
            }
        }
        if let Ok(val) = std::env::var("HYBRID_BM25_WEIGHT") {
            if let Ok(v) = val.parse() {
                config.bm25_weight = v;
            }
        }
        if let Ok(val) = std::env::var("HYBRID_PATTERN_WEIGHT") {
            if let Ok(v) = val.parse() {
                config.pattern_weight = v;
            }
        }
        if let Ok(val) = std::env::var("HYBRID_RRF_K") {
            if let Ok(v) = val.parse() {
                config.rrf_k = v;
            }
        }
        if let Ok(val) = std::env::var("HYBRID_RERANK_TOP_K") {
            if let Ok(v) = val.parse() {
                config.rerank_top_k = v;
            }
        }
        if let Ok(val) = std::env::var("HYBRID_ENABLE_RERANK") {
            config.enable_rerank = val != "0" && val != "false";
        }
        if let Ok(val) = std::env::var("HYBRID_ENABLE_EXPANSION") {
            config.enable_expansion = val != "0" && val != "false";
        }
        if let Ok(val) = std::env::var("HYBRID_LIMIT") {
            if let Ok(v) = val.parse() {
                config.limit = v;
            }
        }
        if let Ok(val) = std::env::var("HYBRID_RETRIEVER_TIMEOUT_MS") {
            if let Ok(v) = val.parse() {
                config.retriever_timeout_ms = v;
            }
        }
        if let Ok(val) = std::env::var("HYBRID_BM25_AVG_DOC_LEN") {
            if let Ok(v) = val.parse() {
                config.bm25.avg_doc_len = v;
            }
        }
        if let Ok(val) = std::env::var("HYBRID_BM25_CORPUS_SIZE") {
            if let Ok(v) = val.parse() {
                config.bm25.corpus_size = v;
            }
        }

        config
    }
}
