//! Internal text-scanning primitives shared by the extractors.
//!
//! Functions that take a `lower` argument expect a pre-lowercased string.

use std::sync::LazyLock;

use regex::Regex;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:https?://|www\.)[^\s<>"')]+"#).expect("valid url regex")
});
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}\b").expect("valid email regex")
});
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\(?\b\d{3}\)?[-. ]\d{3}[-. ]\d{4}\b").expect("valid phone regex")
});
static CAPACITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(?:capacity(?:\s+of)?|holds|seats)\s*:?\s*(?:up\s+to\s+)?(\d{1,3}(?:,\d{3})?|\d{1,5})\b|\b(\d{1,3}(?:,\d{3})?|\d{1,5})\s*-?\s*(?:person|people|seats?|seater|capacity|cap)\b",
    )
    .expect("valid capacity regex")
});
static CITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z][A-Za-z.'’]*(?:\s+[A-Z][A-Za-z.'’]*){0,3}$").expect("valid city regex")
});

/// Line fragments that mark navigation or ad chrome rather than content.
const BOILERPLATE_MARKERS: [&str; 5] = [
    "click here",
    "read more",
    "advertisement",
    "sponsored",
    "sign up for",
];

const CLOSED_MARKERS: [&str; 5] = [
    "permanently closed",
    "closed permanently",
    "has closed",
    "now closed",
    "closed its doors",
];

const OPEN_MARKERS: [&str; 3] = ["now open", "grand opening", "newly opened"];

/// Genre labels recognised in free text before any act genres are added.
pub(crate) const DEFAULT_GENRES: [&str; 24] = [
    "acoustic",
    "alternative",
    "americana",
    "bluegrass",
    "blues",
    "classical",
    "country",
    "electronic",
    "folk",
    "funk",
    "hip hop",
    "indie",
    "jazz",
    "latin",
    "metal",
    "pop",
    "punk",
    "r&b",
    "reggae",
    "rock",
    "singer-songwriter",
    "soul",
    "swing",
    "world",
];

/// Venue-type labels recognised in free text before any act venue types are added.
pub(crate) const DEFAULT_VENUE_TYPES: [&str; 21] = [
    "amphitheater",
    "bar",
    "brewery",
    "cafe",
    "cidery",
    "club",
    "coffee house",
    "concert hall",
    "distillery",
    "jazz club",
    "listening room",
    "lounge",
    "music hall",
    "music venue",
    "pub",
    "restaurant",
    "taproom",
    "tavern",
    "theater",
    "theatre",
    "winery",
];

/// U.S. state names accepted after a city, mapped to their postal code.
const STATE_NAMES: [(&str, &str); 6] = [
    ("new york", "NY"),
    ("new jersey", "NJ"),
    ("connecticut", "CT"),
    ("massachusetts", "MA"),
    ("pennsylvania", "PA"),
    ("vermont", "VT"),
];

pub(crate) fn is_boilerplate(lower: &str) -> bool {
    BOILERPLATE_MARKERS.iter().any(|m| lower.contains(m))
}

/// First URL in `line`, with trailing sentence punctuation removed.
pub(crate) fn first_url(line: &str) -> Option<String> {
    URL_RE
        .find(line)
        .map(|m| m.as_str().trim_end_matches(['.', ',', ';', ':']).to_string())
}

/// `line` with every URL removed and whitespace runs collapsed.
pub(crate) fn strip_urls(line: &str) -> String {
    URL_RE
        .replace_all(line, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn first_email(line: &str) -> Option<String> {
    EMAIL_RE.find(line).map(|m| m.as_str().to_string())
}

pub(crate) fn first_phone(line: &str) -> Option<String> {
    PHONE_RE.find(line).map(|m| m.as_str().to_string())
}

/// Capacity stated on the line ("capacity 250", "300-person room", "holds 1,200").
pub(crate) fn parse_capacity(line: &str) -> Option<u32> {
    let caps = CAPACITY_RE.captures(line)?;
    let raw = caps.get(1).or_else(|| caps.get(2))?.as_str();
    raw.replace(',', "").parse::<u32>().ok().filter(|c| *c > 0)
}

/// Whether `text` reads like a city name: one to four capitalized words.
pub(crate) fn looks_like_city(text: &str) -> bool {
    CITY_RE.is_match(text.trim())
}

/// Postal code for a state token following a city ("NY", "New York").
pub(crate) fn parse_state(token: &str) -> Option<String> {
    let token = token.trim().trim_end_matches('.');
    if token.len() == 2 && token.chars().all(|c| c.is_ascii_uppercase()) {
        return Some(token.to_string());
    }
    let lower = token.to_lowercase();
    STATE_NAMES
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, code)| (*code).to_string())
}

/// Status implied by closure or opening language on the line, if any.
pub(crate) fn status_hint(lower: &str) -> Option<vscout_core::VenueStatus> {
    if CLOSED_MARKERS.iter().any(|m| lower.contains(m)) {
        Some(vscout_core::VenueStatus::Closed)
    } else if OPEN_MARKERS.iter().any(|m| lower.contains(m)) {
        Some(vscout_core::VenueStatus::Active)
    } else {
        None
    }
}

/// Byte offset of the first occurrence of `term` in `lower` that sits on
/// word boundaries at both ends.
pub(crate) fn find_term(lower: &str, term: &str) -> Option<usize> {
    if term.is_empty() {
        return None;
    }
    let mut search_from = 0usize;
    while let Some(rel) = lower[search_from..].find(term) {
        let start = search_from + rel;
        let end = start + term.len();
        let before_ok = !lower[..start]
            .chars()
            .next_back()
            .is_some_and(char::is_alphanumeric);
        let after_ok = !lower[end..].chars().next().is_some_and(char::is_alphanumeric);
        if before_ok && after_ok {
            return Some(start);
        }
        // Advance by one char so the next slice starts on a char boundary.
        search_from = start + lower[start..].chars().next().map_or(1, char::len_utf8);
    }
    None
}

/// Every vocabulary term present on word boundaries.
pub(crate) fn terms_present<'v>(lower: &str, vocab: &'v [String]) -> Vec<&'v str> {
    vocab
        .iter()
        .filter(|t| find_term(lower, t).is_some())
        .map(String::as_str)
        .collect()
}

/// The vocabulary term that appears earliest; the longest wins at a tie.
pub(crate) fn earliest_term<'v>(lower: &str, vocab: &'v [String]) -> Option<&'v str> {
    vocab
        .iter()
        .filter_map(|t| find_term(lower, t).map(|pos| (pos, t)))
        .min_by(|(pa, ta), (pb, tb)| pa.cmp(pb).then(tb.len().cmp(&ta.len())))
        .map(|(_, t)| t.as_str())
}

/// Truncate to at most `max` characters on a char boundary.
pub(crate) fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}
