//! Pattern sub-retriever: exact search for structural tokens.
//!
//! Extracts declaration and call-site identifiers from the query and runs
//! one exact-match search per token. Exact structural matches aren't
//! similarity-ranked, so every hit carries the same fixed score and the
//! list is ordered by discovery.

use anyhow::Result;
use std::collections::HashSet;

use crate::collaborators::PatternSearch;
use crate::models::{Candidate, CandidateKey, RetrievalMethod};
use crate::query::keywords;
use crate::search::RetrieveOptions;

/// Fixed score for an exact structural match.
const EXACT_MATCH_SCORE: f32 = 0.8;

pub async fn retrieve(
    pattern: &dyn PatternSearch,
    query: &str,
    options: &RetrieveOptions,
) -> Result<Vec<Candidate>> {
    let tokens = keywords::structural_tokens(query);
    if tokens.is_empty() {
        return Ok(Vec::new());
    }

    let mut seen: HashSet<CandidateKey> = HashSet::new();
    let mut candidates = Vec::new();
    let mut failures = 0usize;
    let mut last_error = None;

    for token in &tokens {
        let hits = match pattern.search(token, options.limit).await {
            Ok(hits) => hits,
            Err(e) => {
                // One token failing shouldn't sink the hits of the others,
                // but every token failing means the method itself failed.
                tracing::warn!("pattern search for token '{token}' failed: {e:#}");
                failures += 1;
                last_error = Some(e);
                continue;
            }
        };
        for hit in hits {
            let candidate = Candidate {
                content: hit.content,
                file_path: hit.file_path,
                line_start: hit.line_start,
                line_end: hit.line_end,
                method: RetrievalMethod::Pattern,
                method_rank: 0,
                method_score: EXACT_MATCH_SCORE,
            };
            if let Some(key) = candidate.key() {
                if seen.insert(key) {
                    candidates.push(candidate);
                }
            }
        }
    }

    if failures == tokens.len() {
        if let Some(e) = last_error {
            return Err(e.context("pattern search failed for every token"));
        }
    }

    for (i, c) in candidates.iter_mut().enumerate() {
        c.method_rank = i + 1;
    }
    Ok(candidates)
}
