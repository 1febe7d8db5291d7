use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::venue::{normalize_key, UNKNOWN_CITY};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    NoResponse,
    BadExperience,
    Closed,
    NotBooking,
    WrongFit,
}

impl ExclusionReason {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ExclusionReason::NoResponse => "no_response",
            ExclusionReason::BadExperience => "bad_experience",
            ExclusionReason::Closed => "closed",
            ExclusionReason::NotBooking => "not_booking",
            ExclusionReason::WrongFit => "wrong_fit",
        }
    }
}

impl std::fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ExclusionReason {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no_response" => Ok(ExclusionReason::NoResponse),
            "bad_experience" => Ok(ExclusionReason::BadExperience),
            "closed" => Ok(ExclusionReason::Closed),
            "not_booking" => Ok(ExclusionReason::NotBooking),
            "wrong_fit" => Ok(ExclusionReason::WrongFit),
            other => Err(format!("unknown exclusion reason '{other}'")),
        }
    }
}

/// A venue the operator never wants surfaced again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedVenue {
    pub name: String,
    pub city: String,
    pub reason: ExclusionReason,
    pub date_excluded: Option<NaiveDate>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl ExcludedVenue {
    /// Normalized `(name, city)` lookup key.
    #[must_use]
    pub fn key(&self) -> (String, String) {
        exclusion_key(&self.name, &self.city)
    }
}

/// Normalized `(name, city)` key used to match venues against the exclusion
/// list. A blank city matches venues recorded under [`UNKNOWN_CITY`].
#[must_use]
pub fn exclusion_key(name: &str, city: &str) -> (String, String) {
    let city = if city.trim().is_empty() {
        UNKNOWN_CITY
    } else {
        city
    };
    (normalize_key(name), normalize_key(city))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_parses_snake_case() {
        assert_eq!(
            "bad_experience".parse::<ExclusionReason>(),
            Ok(ExclusionReason::BadExperience)
        );
        assert!("rude".parse::<ExclusionReason>().is_err());
    }

    #[test]
    fn key_is_case_and_space_insensitive() {
        let entry = ExcludedVenue {
            name: "  The Anchor ".to_string(),
            city: "KINGSTON".to_string(),
            reason: ExclusionReason::NoResponse,
            date_excluded: None,
            notes: None,
        };
        assert_eq!(
            entry.key(),
            ("the anchor".to_string(), "kingston".to_string())
        );
    }

    #[test]
    fn blank_city_keys_as_unknown() {
        assert_eq!(
            exclusion_key("The Anchor", " "),
            ("the anchor".to_string(), "unknown".to_string())
        );
    }
}
