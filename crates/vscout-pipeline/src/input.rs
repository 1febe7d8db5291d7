//! Results-file parsing.
//!
//! The canonical form is a JSON array of
//! `{ query, region, city, result_text, timestamp }` records. Files written
//! by the older search runner, `{ date, results: [{ query_info, text }] }`,
//! are accepted too; their records all take the file's `date`.

use std::path::Path;

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use vscout_extract::QueryHint;

use crate::error::PipelineError;

/// One search result blob as handed over by the search collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    pub query: String,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    pub result_text: String,
    pub timestamp: DateTime<Utc>,
}

impl ResultRecord {
    #[must_use]
    pub fn hint(&self) -> QueryHint {
        QueryHint {
            query: self.query.clone(),
            city: self.city.clone(),
            region: self.region.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DatedFile {
    date: String,
    #[serde(default)]
    results: Vec<DatedResult>,
}

#[derive(Debug, Deserialize)]
struct DatedResult {
    query_info: QueryHint,
    #[serde(default)]
    text: String,
}

/// Read and parse a results file.
///
/// # Errors
///
/// Returns [`PipelineError::InputFormat`] if the file cannot be read or is
/// not a recognised results document.
pub async fn read_results_file(path: &Path) -> Result<Vec<ResultRecord>, PipelineError> {
    let display = path.display().to_string();
    let raw = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| PipelineError::InputFormat {
            path: display.clone(),
            reason: e.to_string(),
        })?;
    parse_results(&display, &raw)
}

/// Parse the contents of a results file. `path` is used for error messages.
///
/// # Errors
///
/// Returns [`PipelineError::InputFormat`] if `raw` is not a recognised
/// results document.
pub fn parse_results(path: &str, raw: &str) -> Result<Vec<ResultRecord>, PipelineError> {
    let bad = |reason: String| PipelineError::InputFormat {
        path: path.to_string(),
        reason,
    };

    let value: Value = serde_json::from_str(raw).map_err(|e| bad(e.to_string()))?;
    if value.is_array() {
        return serde_json::from_value(value).map_err(|e| bad(e.to_string()));
    }
    if value.get("results").is_none() {
        return Err(bad(
            "expected an array of result records or an object with `results`".to_string(),
        ));
    }

    let file: DatedFile = serde_json::from_value(value).map_err(|e| bad(e.to_string()))?;
    let timestamp = parse_timestamp(&file.date)
        .ok_or_else(|| bad(format!("unrecognised date '{}'", file.date)))?;
    Ok(file
        .results
        .into_iter()
        .map(|r| ResultRecord {
            query: r.query_info.query,
            region: r.query_info.region,
            city: r.query_info.city,
            result_text: r.text,
            timestamp,
        })
        .collect())
}

/// RFC 3339, or a zone-less ISO timestamp taken as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
        .or_else(|| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .ok()
                .map(|naive| naive.and_utc())
        })
}
