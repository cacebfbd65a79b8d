//! Keyword sub-retriever: delegates to the lexical/fallback search
//! collaborator. Rank-only backends carry no usable score, so the method
//! score is inverse rank position.

use anyhow::{Context, Result};

use crate::collaborators::LexicalSearch;
use crate::models::{Candidate, RetrievalMethod};
use crate::search::RetrieveOptions;

const OVERFETCH: usize = 2;

pub async fn retrieve(
    lexical: &dyn LexicalSearch,
    query: &str,
    options: &RetrieveOptions,
) -> Result<Vec<Candidate>> {
    let hits = lexical
        .search(query, options.limit * OVERFETCH, options.exclude())
        .await
        .context("lexical search failed")?;

    let count = hits.len();
    Ok(hits
        .into_iter()
        .enumerate()
        .map(|(i, hit)| Candidate {
            content: hit.content,
            file_path: hit.file_path,
            line_start: hit.line_start,
            line_end: hit.line_end,
            method: RetrievalMethod::Keyword,
            method_rank: i + 1,
            method_score: 1.0 - i as f32 / count as f32,
        })
        .collect())
}
