//! Venue records, drafts, canonical identity and status transitions.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::ValidationError;

/// Hex characters kept from the identity digest.
pub const VENUE_ID_LEN: usize = 12;

/// City recorded when neither the text nor the query names one.
pub const UNKNOWN_CITY: &str = "Unknown";

/// State recorded when a draft carries none.
pub const DEFAULT_STATE: &str = "NY";

/// Deterministic venue identifier derived from the normalized `(name, city)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VenueId(String);

impl VenueId {
    /// Compute the id for a `(name, city)` pair.
    ///
    /// Both parts are normalized with [`normalize_key`] and joined as
    /// `"name:city"`; the SHA-256 hex digest is truncated to
    /// [`VENUE_ID_LEN`] characters.
    #[must_use]
    pub fn derive(name: &str, city: &str) -> Self {
        let key = format!("{}:{}", normalize_key(name), normalize_key(city));
        let digest = format!("{:x}", Sha256::digest(key.as_bytes()));
        Self(digest[..VENUE_ID_LEN].to_string())
    }

    /// Wrap an id read back from storage.
    #[must_use]
    pub fn from_stored(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for VenueId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trim and lower-case. Inner whitespace is kept as written.
///
/// Used for venue identity and for exclusion-list lookups.
#[must_use]
pub fn normalize_key(input: &str) -> String {
    input.trim().to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VenueStatus {
    Unverified,
    Active,
    Closed,
    Excluded,
}

impl VenueStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            VenueStatus::Unverified => "unverified",
            VenueStatus::Active => "active",
            VenueStatus::Closed => "closed",
            VenueStatus::Excluded => "excluded",
        }
    }

    /// Apply a requested status to the current one.
    ///
    /// Allowed moves: `unverified -> active`, any -> `excluded`, and any
    /// non-excluded status -> `closed`. Everything else (including every move
    /// out of `excluded`) leaves the current status unchanged; leaving
    /// `excluded` requires the explicit un-exclude path.
    #[must_use]
    pub fn transition(self, requested: VenueStatus) -> VenueStatus {
        match (self, requested) {
            (_, VenueStatus::Excluded) => VenueStatus::Excluded,
            (VenueStatus::Excluded, _) => VenueStatus::Excluded,
            (_, VenueStatus::Closed) => VenueStatus::Closed,
            (VenueStatus::Unverified, VenueStatus::Active) => VenueStatus::Active,
            (current, _) => current,
        }
    }
}

impl std::fmt::Display for VenueStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for VenueStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unverified" => Ok(VenueStatus::Unverified),
            "active" => Ok(VenueStatus::Active),
            "closed" => Ok(VenueStatus::Closed),
            "excluded" => Ok(VenueStatus::Excluded),
            other => Err(format!("unknown venue status '{other}'")),
        }
    }
}

/// Optional contact details. Each field is filled independently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub website: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub booking_contact: Option<String>,
}

impl Contact {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.website.is_none()
            && self.phone.is_none()
            && self.email.is_none()
            && self.address.is_none()
            && self.booking_contact.is_none()
    }

    /// Fill every field that is still `None` from `other`; known values win.
    pub fn fill_missing(&mut self, other: &Contact) {
        fill(&mut self.website, &other.website);
        fill(&mut self.phone, &other.phone);
        fill(&mut self.email, &other.email);
        fill(&mut self.address, &other.address);
        fill(&mut self.booking_contact, &other.booking_contact);
    }
}

fn fill(slot: &mut Option<String>, candidate: &Option<String>) {
    if slot.is_none() {
        slot.clone_from(candidate);
    }
}

/// An unpersisted candidate venue produced by extraction or manual entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenueDraft {
    pub name: String,
    pub city: Option<String>,
    pub region: Option<String>,
    pub state: Option<String>,
    pub venue_type: Option<String>,
    pub capacity: Option<u32>,
    pub contact: Contact,
    pub genres: BTreeSet<String>,
    /// Status the source text implies, if any.
    pub status: Option<VenueStatus>,
    pub source: String,
    /// The line of text the draft was read from.
    pub context: Option<String>,
}

impl VenueDraft {
    /// Trimmed name, rejecting drafts that carry none.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingName`] when the name is blank.
    pub fn validated_name(&self) -> Result<&str, ValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            Err(ValidationError::MissingName)
        } else {
            Ok(name)
        }
    }

    /// Trimmed city, or [`UNKNOWN_CITY`] when absent or blank.
    #[must_use]
    pub fn city_or_unknown(&self) -> &str {
        self.city
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(UNKNOWN_CITY)
    }

    /// Capacity, rejecting a stated capacity of zero.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ZeroCapacity`] for `Some(0)`.
    pub fn validated_capacity(&self) -> Result<Option<u32>, ValidationError> {
        match self.capacity {
            Some(0) => Err(ValidationError::ZeroCapacity),
            capacity => Ok(capacity),
        }
    }

    /// Canonical id of the venue this draft refers to.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingName`] when the name is blank.
    pub fn venue_id(&self) -> Result<VenueId, ValidationError> {
        Ok(VenueId::derive(self.validated_name()?, self.city_or_unknown()))
    }
}

/// Canonical registry record for one physical venue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Venue {
    pub id: VenueId,
    pub name: String,
    pub city: String,
    pub region: Option<String>,
    pub state: String,
    pub venue_type: Option<String>,
    pub capacity: Option<u32>,
    pub contact: Contact,
    pub genres: BTreeSet<String>,
    pub status: VenueStatus,
    pub source: Option<String>,
    pub first_seen: NaiveDate,
    pub last_seen: NaiveDate,
}

impl Venue {
    /// A first sighting of `draft`, seen `today`.
    ///
    /// The record starts `unverified`; a status the draft implies is then
    /// applied through [`VenueStatus::transition`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingName`] when the draft has no name,
    /// or [`ValidationError::ZeroCapacity`] for a capacity of zero.
    pub fn from_draft(draft: &VenueDraft, today: NaiveDate) -> Result<Self, ValidationError> {
        let name = draft.validated_name()?.to_string();
        let capacity = draft.validated_capacity()?;
        let city = draft.city_or_unknown().to_string();
        let status = draft
            .status
            .map_or(VenueStatus::Unverified, |s| VenueStatus::Unverified.transition(s));

        Ok(Self {
            id: VenueId::derive(&name, &city),
            name,
            city,
            region: non_blank(draft.region.as_deref()),
            state: non_blank(draft.state.as_deref()).unwrap_or_else(|| DEFAULT_STATE.to_string()),
            venue_type: non_blank(draft.venue_type.as_deref()),
            capacity,
            contact: draft.contact.clone(),
            genres: draft.genres.iter().map(|g| normalize_genre(g)).collect(),
            status,
            source: non_blank(Some(draft.source.as_str())),
            first_seen: today,
            last_seen: today,
        })
    }

    /// Fold a later sighting into this record.
    ///
    /// `last_seen` advances (never backwards), genres are unioned, and
    /// optional fields that are still unknown are filled from the draft.
    /// Known values are never overwritten. Status moves only as
    /// [`VenueStatus::transition`] allows.
    pub fn merge_draft(&mut self, draft: &VenueDraft, today: NaiveDate) {
        self.last_seen = self.last_seen.max(today);
        self.genres
            .extend(draft.genres.iter().map(|g| normalize_genre(g)));

        if self.region.is_none() {
            self.region = non_blank(draft.region.as_deref());
        }
        if self.venue_type.is_none() {
            self.venue_type = non_blank(draft.venue_type.as_deref());
        }
        if self.capacity.is_none() {
            self.capacity = draft.capacity.filter(|c| *c > 0);
        }
        if self.source.is_none() {
            self.source = non_blank(Some(draft.source.as_str()));
        }
        self.contact.fill_missing(&draft.contact);

        if let Some(requested) = draft.status {
            self.status = self.status.transition(requested);
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Normalize a genre label for set membership: trimmed and lower-cased.
#[must_use]
pub fn normalize_genre(genre: &str) -> String {
    normalize_key(genre)
}
