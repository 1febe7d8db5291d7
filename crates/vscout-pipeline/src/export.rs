use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use sqlx::SqlitePool;
use vscout_db::list_active_venues;

use crate::error::PipelineError;
use crate::plan::write_file;

/// Write every active venue (ordered by region, city, name) as pretty JSON
/// to `<data_dir>/venues_export_YYYYMMDD.json`.
///
/// Returns the written path and the number of venues exported.
///
/// # Errors
///
/// Returns [`PipelineError`] if the venues cannot be read, encoded, or written.
pub async fn export_active_venues(
    pool: &SqlitePool,
    data_dir: &Path,
    today: NaiveDate,
) -> Result<(PathBuf, usize), PipelineError> {
    let venues = list_active_venues(pool).await?;
    let path = data_dir.join(format!("venues_export_{}.json", today.format("%Y%m%d")));
    let body = serde_json::to_string_pretty(&venues).map_err(|source| PipelineError::Encode {
        what: "venue export",
        source,
    })?;
    write_file(&path, body).await?;

    tracing::info!(path = %path.display(), venues = venues.len(), "venues exported");
    Ok((path, venues.len()))
}
