//! Database operations for the `opportunities` table.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use sqlx::{SqliteExecutor, SqlitePool};
use vscout_core::{Opportunity, OpportunityType, VenueId};

use crate::{from_json, to_json, DbError};

#[derive(Debug, Clone, sqlx::FromRow)]
struct OpportunityRow {
    venue_id: String,
    opportunity_type: String,
    matched_keywords: String,
    suitable_acts: String,
    description: String,
    source_query: String,
    detected_date: NaiveDate,
}

impl TryFrom<OpportunityRow> for Opportunity {
    type Error = DbError;

    fn try_from(row: OpportunityRow) -> Result<Self, Self::Error> {
        let opportunity_type = row
            .opportunity_type
            .parse::<OpportunityType>()
            .map_err(|reason| DbError::InvalidColumn {
                column: "opportunity_type",
                reason,
            })?;
        let matched_keywords: BTreeSet<String> =
            from_json("matched_keywords", &row.matched_keywords)?;
        let suitable_acts: Vec<String> = from_json("suitable_acts", &row.suitable_acts)?;

        Ok(Opportunity {
            venue_id: VenueId::from_stored(row.venue_id),
            opportunity_type,
            matched_keywords,
            suitable_acts,
            description: row.description,
            source_query: row.source_query,
            detected_date: row.detected_date,
        })
    }
}

/// Insert an opportunity unless one already exists for the same
/// `(venue_id, detected_date, source_query)`.
///
/// Returns `true` when a row was inserted.
///
/// # Errors
///
/// Returns [`DbError`] if serialization or the insert fails.
pub async fn insert_opportunity<'e, E>(
    executor: E,
    opportunity: &Opportunity,
) -> Result<bool, DbError>
where
    E: SqliteExecutor<'e>,
{
    let rows = sqlx::query(
        "INSERT INTO opportunities \
             (venue_id, opportunity_type, matched_keywords, suitable_acts, \
              description, source_query, detected_date) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
         ON CONFLICT (venue_id, detected_date, source_query) DO NOTHING",
    )
    .bind(opportunity.venue_id.as_str())
    .bind(opportunity.opportunity_type.as_str())
    .bind(to_json("matched_keywords", &opportunity.matched_keywords)?)
    .bind(to_json("suitable_acts", &opportunity.suitable_acts)?)
    .bind(&opportunity.description)
    .bind(&opportunity.source_query)
    .bind(opportunity.detected_date)
    .execute(executor)
    .await?
    .rows_affected();

    Ok(rows == 1)
}

/// Opportunities detected on or after `since` (all when `None`), newest first.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a stored column cannot be decoded.
pub async fn list_opportunities(
    pool: &SqlitePool,
    since: Option<NaiveDate>,
) -> Result<Vec<Opportunity>, DbError> {
    let rows = sqlx::query_as::<_, OpportunityRow>(
        "SELECT venue_id, opportunity_type, matched_keywords, suitable_acts, \
                description, source_query, detected_date \
         FROM opportunities \
         WHERE (?1 IS NULL OR detected_date >= ?1) \
         ORDER BY detected_date DESC, id",
    )
    .bind(since)
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(Opportunity::try_from).collect()
}
