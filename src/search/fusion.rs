//! Weighted Reciprocal Rank Fusion.
//!
//! Method-local scores live on incomparable scales (cosine similarity vs.
//! BM25 vs. exact-match), so fusion goes by rank alone: each list
//! contributes `weight × 1/(k + rank)` per candidate, and contributions
//! are summed per unique code span. A span that several methods agree on,
//! or that any method ranks highly, rises — consensus and confidence both
//! pay off, which a raw-score average cannot guarantee.

use std::collections::HashMap;

use crate::models::{Candidate, CandidateKey, FusedResult, RetrievalMethod};

struct Accumulator {
    content: String,
    method_scores: HashMap<RetrievalMethod, f32>,
}

/// Fuse per-method ranked lists into one deduplicated ranking.
///
/// Each input pairs a method's candidate list with that method's fusion
/// weight. Within a single method the best contribution per span wins
/// (only Pattern can repeat a span, across tokens); across methods
/// contributions are summed. Ties in the final score break by span
/// identity so the ordering is deterministic.
pub fn fuse(lists: &[(Vec<Candidate>, f32)], k: f32) -> Vec<FusedResult> {
    let mut accums: HashMap<CandidateKey, Accumulator> = HashMap::new();

    for (list, weight) in lists {
        for candidate in list {
            let Some(key) = candidate.key() else {
                tracing::debug!(
                    "dropping malformed candidate from {}: '{}' {}..{}",
                    candidate.method.as_str(),
                    candidate.file_path,
                    candidate.line_start,
                    candidate.line_end
                );
                continue;
            };
            let contribution = weight * (1.0 / (k + candidate.method_rank as f32));

            let entry = accums.entry(key).or_insert_with(|| Accumulator {
                content: candidate.content.clone(),
                method_scores: HashMap::new(),
            });
            let slot = entry.method_scores.entry(candidate.method).or_insert(0.0);
            // Best contribution per method, never a sum: repeats within one
            // method must not inflate that method's weight.
            if contribution > *slot {
                *slot = contribution;
            }
        }
    }

    let mut fused: Vec<FusedResult> = accums
        .into_iter()
        .map(|(key, accum)| FusedResult {
            content: accum.content,
            file_path: key.file_path,
            line_start: key.line_start,
            line_end: key.line_end,
            rrf_score: accum.method_scores.values().sum(),
            method_scores: accum.method_scores,
            final_rank: 0,
        })
        .collect();

    fused.sort_by(|a, b| {
        b.rrf_score
            .partial_cmp(&a.rrf_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.key().cmp(&b.key()))
    });
    for (i, result) in fused.iter_mut().enumerate() {
        result.final_rank = i + 1;
    }
    fused
}
