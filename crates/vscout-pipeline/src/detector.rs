//! Opportunity detection: alert-keyword hits plus act matching.

use chrono::NaiveDate;
use vscout_core::{
    matching_acts, AlertConfig, Opportunity, OpportunityType, ScoutConfig, Venue, VenueStatus,
};
use vscout_extract::sentence_containing;

const MAX_DESCRIPTION_CHARS: usize = 500;

/// Where an opportunity was found.
#[derive(Debug, Clone, Copy)]
pub struct Trigger<'a> {
    /// The blob the keywords were found in.
    pub text: &'a str,
    pub source_query: &'a str,
    pub detected_date: NaiveDate,
}

/// Build an opportunity for `venue` when `alert_hits` is non-empty and the
/// venue is not excluded.
///
/// `suitable_acts` lists every configured act that matches the venue, in
/// configured order; it may be empty. The description is the first sentence
/// of the blob that mentions a hit.
#[must_use]
pub fn detect_opportunity(
    config: &ScoutConfig,
    venue: &Venue,
    alert_hits: &[String],
    trigger: Trigger<'_>,
) -> Option<Opportunity> {
    if alert_hits.is_empty() || venue.status == VenueStatus::Excluded {
        return None;
    }

    let description = sentence_containing(trigger.text, alert_hits)
        .unwrap_or_else(|| alert_hits.join(", "))
        .chars()
        .take(MAX_DESCRIPTION_CHARS)
        .collect();

    Some(Opportunity {
        venue_id: venue.id.clone(),
        opportunity_type: classify(&config.alerts, alert_hits),
        matched_keywords: alert_hits.iter().cloned().collect(),
        suitable_acts: matching_acts(venue, &config.acts),
        description,
        source_query: trigger.source_query.to_string(),
        detected_date: trigger.detected_date,
    })
}

/// `seeking_artists` when any hit is a seeking-artists keyword, otherwise
/// `good_pay`.
#[must_use]
pub fn classify(alerts: &AlertConfig, alert_hits: &[String]) -> OpportunityType {
    let seeking = alert_hits.iter().any(|hit| {
        alerts
            .seeking_artists_keywords
            .iter()
            .any(|k| k.eq_ignore_ascii_case(hit))
    });
    if seeking {
        OpportunityType::SeekingArtists
    } else {
        OpportunityType::GoodPay
    }
}
