//! External collaborator interfaces.
//!
//! The engine never talks to an index, a search backend, or an embedding
//! model directly; everything arrives through these traits so the
//! surrounding system can plug in whatever backends it runs.

use anyhow::Result;
use async_trait::async_trait;

/// A hit from the vector-search collaborator.
#[derive(Debug, Clone)]
pub struct VectorHit {
    pub content: String,
    pub file_path: String,
    pub line_start: usize,
    pub line_end: usize,
    /// Similarity as reported by the index, if it reports one.
    pub similarity: Option<f32>,
}

/// A hit from the lexical or pattern search collaborators (rank-only, no
/// score).
#[derive(Debug, Clone)]
pub struct LexicalHit {
    pub content: String,
    pub file_path: String,
    pub line_start: usize,
    pub line_end: usize,
}

/// Nearest-neighbor search over the embedded code corpus.
#[async_trait]
pub trait VectorSearch: Send + Sync {
    async fn search(
        &self,
        query: &str,
        limit: usize,
        exclude_file: Option<&str>,
    ) -> Result<Vec<VectorHit>>;
}

/// Lexical / fallback full-text search over the corpus.
#[async_trait]
pub trait LexicalSearch: Send + Sync {
    async fn search(
        &self,
        query: &str,
        limit: usize,
        exclude_file: Option<&str>,
    ) -> Result<Vec<LexicalHit>>;
}

/// Exact-match search for a single structural token.
#[async_trait]
pub trait PatternSearch: Send + Sync {
    async fn search(&self, token: &str, limit: usize) -> Result<Vec<LexicalHit>>;
}

/// Embedding provider with a read-through cache.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a query string. Implementations are expected to cache; the
    /// engine calls this once per search.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Cache-only lookup for a document embedding. Must never trigger a
    /// fresh embedding computation; returning `None` is the normal case
    /// for cold documents.
    async fn cached(&self, text: &str) -> Option<Vec<f32>>;
}
