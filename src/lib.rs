//! # hybrid-retrieval
//!
//! A hybrid retrieval and re-ranking engine for code search: four
//! independent retrieval strategies fused with weighted Reciprocal Rank
//! Fusion, then refined by a heuristic similarity- and context-aware
//! re-scoring pass.
//!
//! ## Architecture
//!
//! ```text
//!                         ┌─────────────┐
//!                         │  User Query  │
//!                         └──────┬───────┘
//!                                │
//!                   ┌────────────┴────────────┐
//!                   ▼                         ▼
//!          ┌────────────────┐       ┌─────────────────┐
//!          │ Synonym Expand │       │ Keyword Extract  │
//!          └───────┬────────┘       └────────┬────────┘
//!                  │ expanded query          │ content words + tokens
//!        ┌─────────┼──────────┬──────────────┼─────┐
//!        ▼         ▼          ▼              ▼     │
//!   ┌─────────┐┌─────────┐┌─────────┐┌──────────┐  │
//!   │Semantic ││ Keyword ││  BM25   ││ Pattern  │  │  (concurrent,
//!   │(vector) ││(lexical)││(scored) ││ (exact)  │  │   per-call timeout)
//!   └────┬────┘└────┬────┘└────┬────┘└────┬─────┘  │
//!        │          │          │          │        │
//!        └──────────┴────┬─────┴──────────┘        │
//!                        ▼                         │
//!            ┌───────────────────────┐             │
//!            │  Weighted RRF Fusion  │             │
//!            │  w × 1/(k + rank)     │             │
//!            │  dedup by code span   │             │
//!            └───────────┬───────────┘             │
//!                        ▼                         │
//!            ┌───────────────────────┐             │
//!            │  Heuristic Re-Rank    │◄────────────┘
//!            │  0.7 fused + 0.3 sim  │  path keyword boost
//!            │  top-K only           │
//!            └───────────┬───────────┘
//!                        ▼
//!            ┌───────────────────────┐
//!            │ Truncate + Diagnostics│
//!            └───────────────────────┘
//! ```
//!
//! The vector index, lexical search, pattern search, and embedding
//! provider are external collaborators injected behind the traits in
//! [`collaborators`]. If every sub-retriever fails, the engine falls back
//! to a single semantic call with the original query before giving up.
//!
//! ## Module Overview
//!
//! - [`config`] - Immutable [`config::RetrievalConfig`]: fusion weights, RRF constant,
//!   re-rank depth, timeouts, BM25 parameters
//! - [`models`] - Shared data types: `Candidate`, `FusedResult`, `RankedResult`,
//!   options/response types
//! - [`collaborators`] - Traits for the external vector/lexical/pattern search
//!   backends and the embedding cache
//! - [`query::expand`] - Fixed-table synonym expansion (idempotent)
//! - [`query::keywords`] - Stop-word-filtered content words and structural code tokens
//! - [`search::semantic`] / [`search::keyword`] - Delegating sub-retrievers
//! - [`search::bm25`] - Self-contained BM25 scoring over lexical candidates
//! - [`search::pattern`] - Exact structural-token search
//! - [`search::fusion`] - Weighted Reciprocal Rank Fusion with identity dedup
//! - [`search::rerank`] - Cosine-similarity blend plus file-path context boost
//! - [`engine`] - [`engine::HybridSearchEngine`] orchestrating the whole pipeline

pub mod collaborators;
pub mod config;
pub mod engine;
pub mod error;
pub mod models;
pub mod query;
pub mod search;

pub use config::RetrievalConfig;
pub use engine::HybridSearchEngine;
pub use error::SearchError;
pub use models::{RankedResult, RetrievalMethod, SearchOptions, SearchResponse};
