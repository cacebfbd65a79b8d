//! Heuristic re-ranking of the fused top-K.
//!
//! Not a learned cross-encoder: the pass blends the fused score with
//! embedding cosine similarity when a cached document embedding exists,
//! then applies a small file-path keyword boost. Anything past the top-K
//! keeps its fused order and is appended untouched. Any failure degrades
//! the whole pass to a no-op; re-ranking is never allowed to break a
//! query that fusion already answered.

use crate::collaborators::EmbeddingProvider;
use crate::models::{FusedResult, RankedResult};

const FUSED_WEIGHT: f32 = 0.7;
const SIMILARITY_WEIGHT: f32 = 0.3;
const BOOST_PER_KEYWORD: f32 = 0.05;
const MAX_CONTEXT_BOOST: f32 = 0.2;

/// Re-score the first `top_k` fused results. Returns the full ranked list
/// and whether re-ranking actually ran (false when it degraded).
pub async fn rerank(
    embedder: &dyn EmbeddingProvider,
    query: &str,
    keywords: &[String],
    fused: Vec<FusedResult>,
    top_k: usize,
) -> (Vec<RankedResult>, bool) {
    if fused.is_empty() || top_k == 0 {
        return (passthrough(fused), false);
    }

    let query_embedding = match embedder.embed(query).await {
        Ok(v) if !v.is_empty() => v,
        Ok(_) => {
            tracing::warn!("embedding provider returned an empty query vector, skipping rerank");
            return (passthrough(fused), false);
        }
        Err(e) => {
            tracing::warn!("query embedding unavailable, skipping rerank: {e:#}");
            return (passthrough(fused), false);
        }
    };

    let split = top_k.min(fused.len());
    let mut iter = fused.into_iter();
    let head: Vec<FusedResult> = iter.by_ref().take(split).collect();
    let tail: Vec<FusedResult> = iter.collect();

    let mut ranked = Vec::with_capacity(split);
    for result in head {
        // Cache lookup only: a cold document costs nothing here.
        let sim = match embedder.cached(&result.content).await {
            Some(doc_embedding) => Some(cosine_similarity(&query_embedding, &doc_embedding)),
            None => None,
        };
        let mut score = match sim {
            Some(sim) => result.rrf_score * FUSED_WEIGHT + sim * SIMILARITY_WEIGHT,
            None => result.rrf_score,
        };
        let boost = context_boost(&result.file_path, keywords);
        score *= 1.0 + boost;
        ranked.push(RankedResult {
            fused: result,
            rerank_score: score,
            context_boost: boost,
        });
    }

    ranked.sort_by(|a, b| {
        b.rerank_score
            .partial_cmp(&a.rerank_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.fused.final_rank.cmp(&b.fused.final_rank))
    });

    ranked.extend(passthrough(tail));
    (ranked, true)
}

/// Wrap fused results without re-scoring; fused order is preserved.
pub fn passthrough(fused: Vec<FusedResult>) -> Vec<RankedResult> {
    fused
        .into_iter()
        .map(|result| RankedResult {
            rerank_score: result.rrf_score,
            context_boost: 0.0,
            fused: result,
        })
        .collect()
}

/// +0.05 per query keyword appearing in the file path, capped at +0.2.
fn context_boost(file_path: &str, keywords: &[String]) -> f32 {
    let path = file_path.to_lowercase();
    let mut boost = 0.0f32;
    for keyword in keywords {
        if path.contains(keyword.as_str()) {
            boost += BOOST_PER_KEYWORD;
            if boost >= MAX_CONTEXT_BOOST {
                return MAX_CONTEXT_BOOST;
            }
        }
    }
    boost
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for i in 0..a.len() {
        dot += a[i] * b[i];
        norm_a += a[i] * a[i];
        norm_b += b[i] * b[i];
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom == 0.0 {
        0.0
    } else {
        dot / denom
    }
}
