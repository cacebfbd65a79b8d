use thiserror::Error;

/// Errors that cross the library boundary.
///
/// Partial degradations (a single sub-retriever failing, the re-ranker
/// degrading to fused order) are absorbed inside the pipeline and surface
/// only through diagnostics, never through this type.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("query is empty")]
    EmptyQuery,

    /// All four sub-retrievers failed and the semantic-only fallback
    /// failed as well.
    #[error("all retrieval methods failed: {0:#}")]
    TotalFailure(anyhow::Error),
}
