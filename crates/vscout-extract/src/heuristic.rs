//! Line-oriented, regex-assisted venue extraction.

use std::collections::{BTreeSet, HashMap};
use std::sync::LazyLock;

use regex::Regex;
use vscout_core::{normalize_genre, normalize_key, Contact, ScoutConfig, VenueDraft};

use crate::extractor::ResultExtractor;
use crate::keywords::find_keywords;
use crate::parse_helpers::{
    earliest_term, first_email, first_phone, first_url, is_boilerplate, looks_like_city,
    parse_capacity, parse_state, status_hint, strip_urls, terms_present, truncate_chars,
    DEFAULT_GENRES, DEFAULT_VENUE_TYPES,
};
use crate::types::{Extraction, QueryHint};

/// Source tag recorded on drafts read from search results.
pub const WEB_SEARCH_SOURCE: &str = "web_search";

const MIN_LINE_CHARS: usize = 10;
const MAX_CONTEXT_CHARS: usize = 200;

/// `"Name - City, ST - description"` with hyphen, en- or em-dash separators.
static DASH_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+[-–—]\s+").expect("valid dash regex"));

/// `"Name in City"`, where City is one to four capitalized words.
static IN_CITY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?P<name>[A-Z0-9][^\n]*?)\s+in\s+(?P<city>[A-Z][A-Za-z.'’]*(?:\s+[A-Z][A-Za-z.'’]*){0,3})(?:\s*,\s*(?P<state>[A-Z]{2}))?\b",
    )
    .expect("valid in-city regex")
});

/// Default extractor: one candidate per line, at most.
///
/// Lines shorter than ten characters and ad or navigation chrome are
/// skipped. Candidate names must be between six and ninety-nine characters.
#[derive(Debug, Clone)]
pub struct HeuristicExtractor {
    keywords: Vec<String>,
    genres: Vec<String>,
    venue_types: Vec<String>,
    city_regions: HashMap<String, String>,
    default_state: String,
}

impl HeuristicExtractor {
    /// Build an extractor from the scout configuration.
    ///
    /// Alert keywords come from both alert lists; act genres and venue types
    /// extend the built-in vocabularies.
    #[must_use]
    pub fn from_config(config: &ScoutConfig) -> Self {
        let keywords = config.alerts.all_keywords().map(str::to_string).collect();

        let genres = DEFAULT_GENRES
            .iter()
            .map(|g| normalize_genre(g))
            .chain(
                config
                    .acts
                    .iter()
                    .flat_map(|a| a.genres.iter().map(|g| normalize_genre(g))),
            )
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let venue_types = DEFAULT_VENUE_TYPES
            .iter()
            .map(|t| normalize_key(t))
            .chain(
                config
                    .acts
                    .iter()
                    .flat_map(|a| a.venue_types.iter().map(|t| normalize_key(t))),
            )
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let city_regions = config
            .regions
            .iter()
            .flat_map(|r| r.cities.iter().map(|c| (normalize_key(c), r.name.clone())))
            .collect();

        Self {
            keywords,
            genres,
            venue_types,
            city_regions,
            default_state: config.settings.state.clone(),
        }
    }

    /// Parse a single line into a draft, or `None` when it names no venue.
    #[must_use]
    pub fn parse_line(&self, raw_line: &str, hint: &QueryHint) -> Option<VenueDraft> {
        let line = raw_line.trim();
        if line.chars().count() < MIN_LINE_CHARS {
            return None;
        }
        let lower = line.to_lowercase();
        if is_boilerplate(&lower) {
            return None;
        }

        let text = strip_urls(line);
        let text_lower = text.to_lowercase();
        let located = split_dash_form(&text).or_else(|| split_in_form(&text))?;
        let name = clean_name(located.name);
        let name_len = name.chars().count();
        if name_len <= 5 || name_len >= 100 {
            tracing::trace!(line, "candidate name length out of range");
            return None;
        }

        let city = located.city.or_else(|| hint.city.clone());
        let region = city
            .as_deref()
            .and_then(|c| self.city_regions.get(&normalize_key(c)).cloned())
            .or_else(|| hint.region.clone());

        let contact = Contact {
            website: first_url(line),
            phone: first_phone(line),
            email: first_email(line),
            ..Contact::default()
        };

        Some(VenueDraft {
            name,
            city,
            region,
            state: Some(located.state.unwrap_or_else(|| self.default_state.clone())),
            venue_type: earliest_term(&text_lower, &self.venue_types).map(str::to_string),
            capacity: parse_capacity(line),
            contact,
            genres: terms_present(&text_lower, &self.genres)
                .into_iter()
                .map(str::to_string)
                .collect(),
            status: status_hint(&text_lower),
            source: WEB_SEARCH_SOURCE.to_string(),
            context: Some(truncate_chars(line, MAX_CONTEXT_CHARS)),
        })
    }
}

impl ResultExtractor for HeuristicExtractor {
    fn extract<'a>(&'a self, text: &'a str, hint: &'a QueryHint) -> Extraction<'a> {
        Extraction {
            alert_hits: find_keywords(text, &self.keywords),
            drafts: Box::new(text.lines().filter_map(move |line| self.parse_line(line, hint))),
        }
    }
}

#[derive(Debug)]
struct Located<'t> {
    name: &'t str,
    city: Option<String>,
    state: Option<String>,
}

fn split_dash_form(text: &str) -> Option<Located<'_>> {
    let mut parts = DASH_SPLIT_RE.splitn(text, 3);
    let name = parts.next()?.trim();
    let location = parts.next()?.trim();

    let (city_part, state_part) = match location.split_once(',') {
        Some((city, state)) => (city.trim(), Some(state.trim())),
        None => (location, None),
    };
    if !looks_like_city(city_part) {
        return None;
    }

    // "Woodstock NY" without a comma.
    let (city, trailing_state) = match city_part.rsplit_once(' ') {
        Some((head, tail)) if tail.len() == 2 && parse_state(tail).is_some() => {
            (head, parse_state(tail))
        }
        _ => (city_part, None),
    };
    Some(Located {
        name,
        city: Some(city.to_string()),
        state: state_part.and_then(parse_state).or(trailing_state),
    })
}

fn split_in_form(text: &str) -> Option<Located<'_>> {
    let caps = IN_CITY_RE.captures(text)?;
    Some(Located {
        name: caps.name("name")?.as_str(),
        city: caps.name("city").map(|m| m.as_str().to_string()),
        state: caps.name("state").and_then(|m| parse_state(m.as_str())),
    })
}

fn clean_name(raw: &str) -> String {
    raw.trim()
        .trim_start_matches(['*', '•', '-', '#'])
        .trim_end_matches([':', ',', ';'])
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "parse_test.rs"]
mod tests;
