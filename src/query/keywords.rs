//! Query tokenization: content words for scoring/boosting and structural
//! code-pattern tokens for exact search.

use lazy_static::lazy_static;
use regex::Regex;

/// Words carrying no search signal on their own.
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "but", "by", "can", "do",
    "does", "for", "from", "get", "has", "have", "how", "i", "in", "is",
    "it", "my", "no", "not", "of", "on", "or", "our", "set", "so", "that",
    "the", "their", "then", "there", "this", "to", "use", "was", "we",
    "what", "when", "where", "which", "why", "will", "with", "you",
];

lazy_static! {
    /// `function foo`, `fn foo`, `def foo`
    static ref FUNCTION_DECL: Regex =
        Regex::new(r"(?:function|fn|def)\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap();
    /// `class Foo`, `struct Foo`, `interface Foo`
    static ref TYPE_DECL: Regex =
        Regex::new(r"(?:class|struct|interface)\s+([A-Za-z_][A-Za-z0-9_]*)").unwrap();
    /// `.method(` style call sites
    static ref METHOD_CALL: Regex =
        Regex::new(r"\.([A-Za-z_][A-Za-z0-9_]*)\s*\(").unwrap();
    static ref WORD: Regex = Regex::new(r"[A-Za-z0-9_]+").unwrap();
}

/// Lowercased content words from a query, stop-words and single characters
/// removed. Order preserved, duplicates dropped.
pub fn content_words(query: &str) -> Vec<String> {
    let mut words = Vec::new();
    for m in WORD.find_iter(query) {
        let lower = m.as_str().to_lowercase();
        if lower.len() < 2 || STOP_WORDS.contains(&lower.as_str()) {
            continue;
        }
        if !words.contains(&lower) {
            words.push(lower);
        }
    }
    words
}

/// Structural code tokens in a query: identifiers introduced by function or
/// type declarations, and method-call targets. Deduplicated in discovery
/// order; case is preserved because pattern search is exact.
pub fn structural_tokens(query: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    for re in [&*FUNCTION_DECL, &*TYPE_DECL, &*METHOD_CALL] {
        for caps in re.captures_iter(query) {
            let token = caps[1].to_string();
            if !tokens.contains(&token) {
                tokens.push(token);
            }
        }
    }
    tokens
}
