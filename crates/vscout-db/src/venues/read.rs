//! Read operations for the `venues` table.

use sqlx::{SqliteExecutor, SqlitePool};
use vscout_core::{Venue, VenueId, VenueStatus};

use super::types::{VenueRow, VENUE_COLUMNS};
use crate::DbError;

/// Fetch one venue by id.
///
/// Generic over the executor so the registry can read inside its upsert
/// transaction.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a stored column cannot be decoded.
pub async fn get_venue<'e, E>(executor: E, id: &VenueId) -> Result<Option<Venue>, DbError>
where
    E: SqliteExecutor<'e>,
{
    let sql = format!("SELECT {VENUE_COLUMNS} FROM venues WHERE id = ?1");
    let row = sqlx::query_as::<_, VenueRow>(&sql)
        .bind(id.as_str())
        .fetch_optional(executor)
        .await?;
    row.map(Venue::try_from).transpose()
}

/// List venues, optionally restricted to one status.
///
/// Ordered by region, city, then name.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a stored column cannot be decoded.
pub async fn list_venues(
    pool: &SqlitePool,
    status: Option<VenueStatus>,
) -> Result<Vec<Venue>, DbError> {
    let sql = format!(
        "SELECT {VENUE_COLUMNS} FROM venues \
         WHERE (?1 IS NULL OR status = ?1) \
         ORDER BY region, city, name, id"
    );
    let rows = sqlx::query_as::<_, VenueRow>(&sql)
        .bind(status.map(VenueStatus::as_str))
        .fetch_all(pool)
        .await?;
    rows.into_iter().map(Venue::try_from).collect()
}

/// All `active` venues, ordered by region, city, name.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a stored column cannot be decoded.
pub async fn list_active_venues(pool: &SqlitePool) -> Result<Vec<Venue>, DbError> {
    list_venues(pool, Some(VenueStatus::Active)).await
}

/// Total number of venues in the registry, regardless of status.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn count_venues(pool: &SqlitePool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM venues")
        .fetch_one(pool)
        .await
}
