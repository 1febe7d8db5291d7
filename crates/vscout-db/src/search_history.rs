//! Database operations for the append-only `search_history` table.

use chrono::{DateTime, Utc};
use sqlx::{SqliteExecutor, SqlitePool};
use vscout_core::{HistoryFilter, SearchHistoryEntry};

use crate::{i64_to_u32, DbError};

#[derive(Debug, Clone, sqlx::FromRow)]
struct SearchHistoryRow {
    query_text: String,
    region: Option<String>,
    executed_at: DateTime<Utc>,
    result_count: i64,
    new_venues: i64,
    opportunities: i64,
}

impl TryFrom<SearchHistoryRow> for SearchHistoryEntry {
    type Error = DbError;

    fn try_from(row: SearchHistoryRow) -> Result<Self, Self::Error> {
        Ok(SearchHistoryEntry {
            query_text: row.query_text,
            region: row.region,
            executed_at: row.executed_at,
            result_count: i64_to_u32("result_count", row.result_count)?,
            new_venues: i64_to_u32("new_venues", row.new_venues)?,
            opportunities: i64_to_u32("opportunities", row.opportunities)?,
        })
    }
}

/// Per-region query count over a history window.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct RegionQueryCount {
    pub region: Option<String>,
    pub queries: i64,
}

// Timestamps are compared through julianday() so that differing fractional
// second precision in the stored text does not affect ordering.
const FILTER_SQL: &str = "(?1 IS NULL OR julianday(executed_at) >= julianday(?1)) \
     AND (?2 IS NULL OR julianday(executed_at) <= julianday(?2)) \
     AND (?3 IS NULL OR region = ?3)";

/// Append one history entry. Returns the new row id.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the insert fails.
pub async fn append_search_history<'e, E>(
    executor: E,
    entry: &SearchHistoryEntry,
) -> Result<i64, sqlx::Error>
where
    E: SqliteExecutor<'e>,
{
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO search_history \
             (query_text, region, executed_at, result_count, new_venues, opportunities) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6) \
         RETURNING id",
    )
    .bind(&entry.query_text)
    .bind(&entry.region)
    .bind(entry.executed_at)
    .bind(i64::from(entry.result_count))
    .bind(i64::from(entry.new_venues))
    .bind(i64::from(entry.opportunities))
    .fetch_one(executor)
    .await
}

/// History entries matching `filter`, oldest first. The date range is
/// inclusive at both ends.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails or a stored count is out of range.
pub async fn list_search_history(
    pool: &SqlitePool,
    filter: &HistoryFilter,
) -> Result<Vec<SearchHistoryEntry>, DbError> {
    let sql = format!(
        "SELECT query_text, region, executed_at, result_count, new_venues, opportunities \
         FROM search_history \
         WHERE {FILTER_SQL} \
         ORDER BY julianday(executed_at), id"
    );
    let rows = sqlx::query_as::<_, SearchHistoryRow>(&sql)
        .bind(filter.from)
        .bind(filter.to)
        .bind(&filter.region)
        .fetch_all(pool)
        .await?;
    rows.into_iter().map(SearchHistoryEntry::try_from).collect()
}

/// Number of queries run per region within `filter`, by region name.
///
/// # Errors
///
/// Returns [`sqlx::Error`] if the query fails.
pub async fn region_query_counts(
    pool: &SqlitePool,
    filter: &HistoryFilter,
) -> Result<Vec<RegionQueryCount>, sqlx::Error> {
    let sql = format!(
        "SELECT region, COUNT(*) AS queries \
         FROM search_history \
         WHERE {FILTER_SQL} \
         GROUP BY region \
         ORDER BY region"
    );
    sqlx::query_as::<_, RegionQueryCount>(&sql)
        .bind(filter.from)
        .bind(filter.to)
        .bind(&filter.region)
        .fetch_all(pool)
        .await
}
