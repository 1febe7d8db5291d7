use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::venue::VenueId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpportunityType {
    SeekingArtists,
    GoodPay,
}

impl OpportunityType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OpportunityType::SeekingArtists => "seeking_artists",
            OpportunityType::GoodPay => "good_pay",
        }
    }
}

impl std::fmt::Display for OpportunityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OpportunityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "seeking_artists" => Ok(OpportunityType::SeekingArtists),
            "good_pay" => Ok(OpportunityType::GoodPay),
            other => Err(format!("unknown opportunity type '{other}'")),
        }
    }
}

/// A booking lead tying a venue to the acts that suit it.
///
/// `(venue_id, detected_date, source_query)` is the natural key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Opportunity {
    pub venue_id: VenueId,
    pub opportunity_type: OpportunityType,
    pub matched_keywords: BTreeSet<String>,
    /// Act ids in configured act order.
    pub suitable_acts: Vec<String>,
    pub description: String,
    pub source_query: String,
    pub detected_date: NaiveDate,
}
