//! Semantic sub-retriever: delegates to the vector-search collaborator.

use anyhow::{Context, Result};

use crate::collaborators::VectorSearch;
use crate::models::{Candidate, RetrievalMethod};
use crate::search::RetrieveOptions;

/// Over-fetch factor applied to the caller's limit.
const OVERFETCH: usize = 2;

/// Run a vector search and annotate hits with method rank and score.
///
/// The score is the similarity reported by the index when available,
/// otherwise inverse rank position `1 - index/count`.
pub async fn retrieve(
    vector: &dyn VectorSearch,
    query: &str,
    options: &RetrieveOptions,
) -> Result<Vec<Candidate>> {
    let hits = vector
        .search(query, options.limit * OVERFETCH, options.exclude())
        .await
        .context("vector search failed")?;

    let count = hits.len();
    Ok(hits
        .into_iter()
        .enumerate()
        .map(|(i, hit)| Candidate {
            content: hit.content,
            file_path: hit.file_path,
            line_start: hit.line_start,
            line_end: hit.line_end,
            method: RetrievalMethod::Semantic,
            method_rank: i + 1,
            method_score: hit
                .similarity
                .unwrap_or_else(|| 1.0 - i as f32 / count as f32),
        })
        .collect())
}
