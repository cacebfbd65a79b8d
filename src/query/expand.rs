//! Synonym expansion for code-search queries.
//!
//! Appends related terms for recognized abbreviations so the lexical
//! retrievers catch spellings the user didn't type, e.g.
//! "auth bug" → "auth bug authentication login session".

use std::collections::HashMap;

/// Code-aware synonym table. Synonyms deliberately never appear as keys of
/// other entries, so repeated expansion reaches a fixed point.
fn synonym_table() -> HashMap<&'static str, &'static [&'static str]> {
    let mut m: HashMap<&'static str, &'static [&'static str]> = HashMap::new();
    m.insert("auth", &["authentication", "authorization", "login", "session"]);
    m.insert("db", &["database", "sql", "schema"]);
    m.insert("fn", &["function"]);
    m.insert("func", &["function"]);
    m.insert("config", &["configuration", "settings", "environment"]);
    m.insert("err", &["error", "exception", "failure"]);
    m.insert("async", &["concurrent", "parallel", "await"]);
    m.insert("api", &["endpoint", "route", "handler"]);
    m.insert("cache", &["caching", "memoize", "ttl"]);
    m.insert("perf", &["performance", "latency", "throughput"]);
    m.insert("init", &["initialize", "setup", "bootstrap"]);
    m.insert("util", &["utility", "helper"]);
    m
}

/// Expand a query by appending synonyms for every recognized term.
///
/// Terms already present in the query are not appended again, which makes
/// expansion idempotent: expanding an expanded query returns it unchanged.
/// Unrecognized queries (and the empty query) pass through untouched.
pub fn expand(query: &str) -> String {
    let table = synonym_table();
    let words: Vec<&str> = query.split_whitespace().collect();
    let mut additions: Vec<&str> = Vec::new();

    for word in &words {
        let lower = word.to_lowercase();
        if let Some(synonyms) = table.get(lower.as_str()) {
            for syn in *synonyms {
                let present = words.iter().any(|w| w.eq_ignore_ascii_case(syn))
                    || additions.iter().any(|a| a.eq_ignore_ascii_case(syn));
                if !present {
                    additions.push(syn);
                }
            }
        }
    }

    if additions.is_empty() {
        return query.to_string();
    }
    format!("{} {}", query, additions.join(" "))
}
