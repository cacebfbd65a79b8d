//! BM25 sub-retriever.
//!
//! Fetches a wide sample of lexical candidates and scores each one with
//! BM25 computed here, independent of whatever ranking the lexical backend
//! applied:
//!
//! ```text
//! score = Σ_term IDF(term) × (tf × (k1+1)) / (tf + k1 × (1 − b + b × docLen/avgDocLen))
//! ```
//!
//! IDF is the simplified `ln(N / (df + 1))` with a fixed corpus-size `N`
//! and document frequency estimated from the fetched sample. True corpus
//! statistics are not available at this layer; this approximation is kept
//! deliberately because replacing it changes ranking.

use std::collections::HashMap;

use anyhow::{Context, Result};

use crate::collaborators::{LexicalHit, LexicalSearch};
use crate::config::Bm25Params;
use crate::models::{Candidate, RetrievalMethod};
use crate::query::keywords;
use crate::search::RetrieveOptions;

/// Wider over-fetch than the other retrievers: the sample doubles as the
/// document-frequency estimate.
const OVERFETCH: usize = 3;

pub async fn retrieve(
    lexical: &dyn LexicalSearch,
    query: &str,
    params: &Bm25Params,
    options: &RetrieveOptions,
) -> Result<Vec<Candidate>> {
    let terms = keywords::content_words(query);
    if terms.is_empty() {
        return Ok(Vec::new());
    }

    let hits = lexical
        .search(query, options.limit * OVERFETCH, options.exclude())
        .await
        .context("lexical search for BM25 scoring failed")?;

    // Tokenize every candidate once; token counts give tf and doc length.
    let docs: Vec<(LexicalHit, HashMap<String, usize>, usize)> = hits
        .into_iter()
        .map(|hit| {
            let tokens = tokenize(&hit.content);
            let len = tokens.values().sum();
            (hit, tokens, len)
        })
        .collect();

    // Sample document frequency per query term.
    let mut df: HashMap<&str, usize> = HashMap::new();
    for term in &terms {
        let n = docs.iter().filter(|(_, tokens, _)| tokens.contains_key(term)).count();
        df.insert(term.as_str(), n);
    }

    let mut scored: Vec<(f32, Candidate)> = docs
        .into_iter()
        .map(|(hit, tokens, doc_len)| {
            let score = score_doc(&terms, &df, &tokens, doc_len, params);
            (
                score,
                Candidate {
                    content: hit.content,
                    file_path: hit.file_path,
                    line_start: hit.line_start,
                    line_end: hit.line_end,
                    method: RetrievalMethod::Bm25,
                    method_rank: 0, // assigned post-sort
                    method_score: score,
                },
            )
        })
        .collect();

    // A document containing no query term is not a BM25 candidate; keeping
    // it would hand unearned rank mass to fusion.
    scored.retain(|(score, _)| *score > 0.0);

    // Descending by score; equal scores ordered by identity for determinism.
    scored.sort_by(|a, b| {
        b.0.partial_cmp(&a.0)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.1.key().cmp(&b.1.key()))
    });

    let mut candidates: Vec<Candidate> = scored.into_iter().map(|(_, c)| c).collect();
    candidates.truncate(options.limit * 2);
    for (i, c) in candidates.iter_mut().enumerate() {
        c.method_rank = i + 1;
    }
    Ok(candidates)
}

/// BM25 score of one document against the query terms. Always ≥ 0; exactly
/// 0 when no query term occurs in the document.
fn score_doc(
    terms: &[String],
    df: &HashMap<&str, usize>,
    tokens: &HashMap<String, usize>,
    doc_len: usize,
    params: &Bm25Params,
) -> f32 {
    let mut score = 0.0f32;
    let len_norm = 1.0 - params.b + params.b * doc_len as f32 / params.avg_doc_len;

    for term in terms {
        let tf = tokens.get(term).copied().unwrap_or(0) as f32;
        if tf == 0.0 {
            continue;
        }
        let n = df.get(term.as_str()).copied().unwrap_or(0) as f32;
        let idf = (params.corpus_size / (n + 1.0)).ln().max(0.0);
        score += idf * (tf * (params.k1 + 1.0)) / (tf + params.k1 * len_norm);
    }
    score
}

/// Case-insensitive, word-boundary token counts.
fn tokenize(text: &str) -> HashMap<String, usize> {
    let mut counts = HashMap::new();
    for token in text
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|t| !t.is_empty())
    {
        *counts.entry(token.to_lowercase()).or_insert(0) += 1;
    }
    counts
}
