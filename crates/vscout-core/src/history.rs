use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One executed search query and what it yielded. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHistoryEntry {
    pub query_text: String,
    pub region: Option<String>,
    pub executed_at: DateTime<Utc>,
    pub result_count: u32,
    pub new_venues: u32,
    pub opportunities: u32,
}

/// Filter for reading search history. `None` fields match everything;
/// the date range is inclusive on both ends.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistoryFilter {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub region: Option<String>,
}
