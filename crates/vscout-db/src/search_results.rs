//! Database operations for `search_results` and `search_result_venues`.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use sqlx::{Acquire, Sqlite, SqliteExecutor};
use vscout_core::VenueId;

/// A raw result blob about to be recorded.
#[derive(Debug, Clone)]
pub struct NewSearchResult {
    pub query: String,
    pub region: Option<String>,
    pub city: Option<String>,
    pub result_text: String,
    pub searched_at: DateTime<Utc>,
}

/// SHA-256 hex digest identifying one `(query, text)` pair.
#[must_use]
pub fn content_hash(query: &str, text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(query.as_bytes());
    hasher.update([0u8]);
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Store a result blob unless the identical `(query, text)` pair is already
/// stored.
///
/// Returns `(id, newly_recorded)`.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn record_search_result<'c, A>(
    conn: A,
    result: &NewSearchResult,
) -> Result<(i64, bool), sqlx::Error>
where
    A: Acquire<'c, Database = Sqlite>,
{
    let mut conn = conn.acquire().await?;
    let hash = content_hash(&result.query, &result.result_text);

    let inserted = sqlx::query_scalar::<_, i64>(
        "INSERT INTO search_results \
             (query, region, city, result_text, content_hash, searched_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
         ON CONFLICT (content_hash) DO NOTHING \
         RETURNING id",
    )
    .bind(&result.query)
    .bind(&result.region)
    .bind(&result.city)
    .bind(&result.result_text)
    .bind(&hash)
    .bind(result.searched_at)
    .fetch_optional(&mut *conn)
    .await?;

    if let Some(id) = inserted {
        return Ok((id, true));
    }

    let id = sqlx::query_scalar::<_, i64>("SELECT id FROM search_results WHERE content_hash = ?1")
        .bind(&hash)
        .fetch_one(&mut *conn)
        .await?;
    Ok((id, false))
}

/// Record that `venue_id` was extracted from search result `search_result_id`.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn link_search_result_venue<'e, E>(
    executor: E,
    search_result_id: i64,
    venue_id: &VenueId,
) -> Result<(), sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query(
        "INSERT INTO search_result_venues (search_result_id, venue_id) \
         VALUES (?1, ?2) \
         ON CONFLICT (search_result_id, venue_id) DO NOTHING",
    )
    .bind(search_result_id)
    .bind(venue_id.as_str())
    .execute(executor)
    .await?;
    Ok(())
}
