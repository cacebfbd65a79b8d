pub mod bm25;
pub mod fusion;
pub mod keyword;
pub mod pattern;
pub mod rerank;
pub mod semantic;

/// Per-query options handed to every sub-retriever.
///
/// `limit` is the caller's final result limit; each retriever over-fetches
/// internally (2–3×) so fusion has enough material to work with.
#[derive(Debug, Clone)]
pub struct RetrieveOptions {
    pub limit: usize,
    pub exclude_file: Option<String>,
}

impl RetrieveOptions {
    pub fn exclude(&self) -> Option<&str> {
        self.exclude_file.as_deref()
    }
}
