//! Heuristic object-reference discovery in routine text.
//!
//! The catalog's expression-dependency view misses objects that a routine
//! only touches through temp tables, dynamic SQL or deferred name
//! resolution. Scanning the routine body for `FROM x`, `JOIN x`, `INTO x`
//! and `UPDATE x` recovers most of them, at the cost of false positives
//! inside string literals and comments. Callers go through the
//! [`ReferenceExtractor`] trait so a real parser can replace the pattern
//! without touching the resolver.

use regex::Regex;
use sd_core::ObjectName;
use std::sync::OnceLock;

/// Finds object references in SQL text.
pub trait ReferenceExtractor: Send + Sync {
    /// Return referenced object names in order of appearance.
    ///
    /// Duplicates are kept; de-duplication is the caller's concern.
    fn extract(&self, sql: &str) -> Vec<ObjectName>;
}

/// Keyword-pattern extractor.
#[derive(Debug, Default, Clone, Copy)]
pub struct PatternReferenceExtractor;

static REFERENCE_RE: OnceLock<Regex> = OnceLock::new();

/// `FROM|JOIN|INTO|UPDATE|INSERT INTO` followed by an identifier token.
///
/// The token runs until whitespace, a parenthesis, a comma or a semicolon,
/// except inside `[...]` or `"..."` delimiters.
fn reference_regex() -> &'static Regex {
    REFERENCE_RE.get_or_init(|| {
        Regex::new(
            r#"(?i)\b(?:FROM|JOIN|INTO|UPDATE|INSERT\s+INTO)\s+((?:\[[^\]]+\]|"[^"]+"|[^\s(),;\["])+)"#,
        )
        .expect("valid regex")
    })
}

impl ReferenceExtractor for PatternReferenceExtractor {
    fn extract(&self, sql: &str) -> Vec<ObjectName> {
        reference_regex()
            .captures_iter(sql)
            .filter_map(|caps| caps.get(1))
            .filter_map(|token| ObjectName::parse(token.as_str()))
            .collect()
    }
}

#[cfg(test)]
#[path = "references_test.rs"]
mod tests;
