//! Alert-keyword scanning.

use std::collections::HashSet;

/// Keywords from `keywords` that occur in `text` (case-insensitive substring).
///
/// Returned verbatim as configured, in configured order, without duplicates.
#[must_use]
pub fn find_keywords(text: &str, keywords: &[String]) -> Vec<String> {
    let lower = text.to_lowercase();
    let mut seen = HashSet::new();
    keywords
        .iter()
        .filter(|k| !k.trim().is_empty())
        .filter(|k| lower.contains(&k.to_lowercase()))
        .filter(|k| seen.insert(k.to_lowercase()))
        .cloned()
        .collect()
}

/// First sentence of `text` that contains any of `keywords`, trimmed.
///
/// Sentences end at `.`, `!`, `?` or a line break.
#[must_use]
pub fn sentence_containing(text: &str, keywords: &[String]) -> Option<String> {
    let wanted: Vec<String> = keywords.iter().map(|k| k.to_lowercase()).collect();
    text.split(['.', '!', '?', '\n'])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .find(|s| {
            let lower = s.to_lowercase();
            wanted.iter().any(|k| lower.contains(k.as_str()))
        })
        .map(str::to_string)
}
