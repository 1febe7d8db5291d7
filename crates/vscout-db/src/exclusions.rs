//! Database operations for the `excluded_venues` table.

use chrono::NaiveDate;
use sqlx::{SqliteExecutor, SqlitePool};
use vscout_core::{exclusion_key, ExcludedVenue, ExclusionReason, VenueId, UNKNOWN_CITY};

use crate::DbError;

#[derive(Debug, Clone, sqlx::FromRow)]
struct ExcludedVenueRow {
    name: String,
    city: String,
    reason: String,
    notes: Option<String>,
    date_excluded: NaiveDate,
}

impl TryFrom<ExcludedVenueRow> for ExcludedVenue {
    type Error = DbError;

    fn try_from(row: ExcludedVenueRow) -> Result<Self, Self::Error> {
        let reason = row
            .reason
            .parse::<ExclusionReason>()
            .map_err(|reason| DbError::InvalidColumn {
                column: "reason",
                reason,
            })?;
        Ok(ExcludedVenue {
            name: row.name,
            city: row.city,
            reason,
            date_excluded: Some(row.date_excluded),
            notes: row.notes,
        })
    }
}

fn venue_id_for(name: &str, city: &str) -> VenueId {
    let city = if city.trim().is_empty() {
        UNKNOWN_CITY
    } else {
        city
    };
    VenueId::derive(name, city)
}

/// Whether `(name, city)` is on the exclusion list, ignoring case and
/// surrounding whitespace.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn is_excluded<'e, E>(executor: E, name: &str, city: &str) -> Result<bool, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    let (name_key, city_key) = exclusion_key(name, city);
    let hit = sqlx::query_scalar::<_, i64>(
        "SELECT 1 FROM excluded_venues WHERE name_key = ?1 AND city_key = ?2",
    )
    .bind(name_key)
    .bind(city_key)
    .fetch_optional(executor)
    .await?;
    Ok(hit.is_some())
}

/// Add `entry` to the exclusion list and force a matching venue to `excluded`.
///
/// Idempotent: an entry already on the list keeps its original reason and
/// date. `date_excluded` defaults to `today`. Returns `true` when the entry
/// was newly added.
///
/// # Errors
///
/// Returns [`DbError`] if the transaction fails.
pub async fn exclude_venue(
    pool: &SqlitePool,
    entry: &ExcludedVenue,
    today: NaiveDate,
) -> Result<bool, DbError> {
    let (name_key, city_key) = entry.key();
    let mut tx = pool.begin().await?;

    let inserted = sqlx::query(
        "INSERT INTO excluded_venues \
             (name, city, name_key, city_key, reason, notes, date_excluded) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
         ON CONFLICT (name_key, city_key) DO NOTHING",
    )
    .bind(entry.name.trim())
    .bind(entry.city.trim())
    .bind(name_key)
    .bind(city_key)
    .bind(entry.reason.as_str())
    .bind(&entry.notes)
    .bind(entry.date_excluded.unwrap_or(today))
    .execute(&mut *tx)
    .await?
    .rows_affected()
        == 1;

    let venue_id = venue_id_for(&entry.name, &entry.city);
    let flipped = sqlx::query(
        "UPDATE venues SET status = 'excluded', updated_at = CURRENT_TIMESTAMP \
         WHERE id = ?1 AND status != 'excluded'",
    )
    .bind(venue_id.as_str())
    .execute(&mut *tx)
    .await?
    .rows_affected();

    tx.commit().await?;

    tracing::info!(
        name = %entry.name,
        city = %entry.city,
        reason = %entry.reason,
        inserted,
        venue_flipped = flipped > 0,
        "venue excluded"
    );
    Ok(inserted)
}

/// Remove `(name, city)` from the exclusion list.
///
/// This is the only way out of `excluded`: a matching venue is reinstated
/// as `active`. Returns `true` when an entry was removed.
///
/// # Errors
///
/// Returns [`DbError`] if the transaction fails.
pub async fn unexclude_venue(pool: &SqlitePool, name: &str, city: &str) -> Result<bool, DbError> {
    let (name_key, city_key) = exclusion_key(name, city);
    let mut tx = pool.begin().await?;

    let removed = sqlx::query("DELETE FROM excluded_venues WHERE name_key = ?1 AND city_key = ?2")
        .bind(name_key)
        .bind(city_key)
        .execute(&mut *tx)
        .await?
        .rows_affected()
        > 0;

    if removed {
        sqlx::query(
            "UPDATE venues SET status = 'active', updated_at = CURRENT_TIMESTAMP \
             WHERE id = ?1 AND status = 'excluded'",
        )
        .bind(venue_id_for(name, city).as_str())
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    tracing::info!(name, city, removed, "venue un-excluded");
    Ok(removed)
}

/// Every exclusion-list entry, most recently excluded first.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a stored reason is unknown.
pub async fn list_excluded_venues(pool: &SqlitePool) -> Result<Vec<ExcludedVenue>, DbError> {
    let rows = sqlx::query_as::<_, ExcludedVenueRow>(
        "SELECT name, city, reason, notes, date_excluded \
         FROM excluded_venues \
         ORDER BY date_excluded DESC, id DESC",
    )
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(ExcludedVenue::try_from).collect()
}

/// Seed the exclusion list from configuration. Existing entries are left as
/// they are. Returns the number of entries newly added.
///
/// # Errors
///
/// Returns [`DbError`] if any insert fails.
pub async fn sync_config_exclusions(
    pool: &SqlitePool,
    entries: &[ExcludedVenue],
    today: NaiveDate,
) -> Result<usize, DbError> {
    let mut added = 0;
    for entry in entries {
        if exclude_venue(pool, entry, today).await? {
            added += 1;
        }
    }
    Ok(added)
}
