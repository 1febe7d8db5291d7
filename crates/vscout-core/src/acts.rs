//! Act profiles and the venue/act suitability matcher.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::venue::{normalize_key, Venue};

/// A performing act, as configured. Read-only input to the matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActProfile {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    pub genres: BTreeSet<String>,
    pub min_capacity: u32,
    pub ideal_capacity: u32,
    pub max_capacity: u32,
    pub venue_types: BTreeSet<String>,
    pub min_fee: u32,
    pub max_fee: u32,
    pub available_days: BTreeSet<String>,
    #[serde(default)]
    pub members: Option<u32>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ActProfile {
    /// Display name, falling back to the id.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

/// Whether `act` suits `venue`.
///
/// Every known venue attribute must pass; unknown ones are skipped:
/// - genres: non-empty intersection (case-insensitive)
/// - venue type: member of the act's venue types (case-insensitive)
/// - capacity: inside `[min_capacity, max_capacity]`, inclusive
#[must_use]
pub fn matches(venue: &Venue, act: &ActProfile) -> bool {
    genres_match(&venue.genres, &act.genres)
        && venue_type_matches(venue.venue_type.as_deref(), &act.venue_types)
        && capacity_matches(venue.capacity, act)
}

/// Ids of every act that suits `venue`, in the order `acts` lists them.
#[must_use]
pub fn matching_acts(venue: &Venue, acts: &[ActProfile]) -> Vec<String> {
    acts.iter()
        .filter(|act| matches(venue, act))
        .map(|act| act.id.clone())
        .collect()
}

fn genres_match(venue_genres: &BTreeSet<String>, act_genres: &BTreeSet<String>) -> bool {
    if venue_genres.is_empty() {
        return true;
    }
    let wanted: BTreeSet<String> = act_genres.iter().map(|g| normalize_key(g)).collect();
    venue_genres.iter().any(|g| wanted.contains(&normalize_key(g)))
}

fn venue_type_matches(venue_type: Option<&str>, act_types: &BTreeSet<String>) -> bool {
    let Some(venue_type) = venue_type.map(normalize_key).filter(|t| !t.is_empty()) else {
        return true;
    };
    act_types.iter().any(|t| normalize_key(t) == venue_type)
}

fn capacity_matches(capacity: Option<u32>, act: &ActProfile) -> bool {
    capacity.is_none_or(|c| (act.min_capacity..=act.max_capacity).contains(&c))
}
