//! Query plan export for the external search collaborator.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vscout_core::{build_search_queries, ConfigError, ScoutConfig, SearchQuery};

use crate::error::PipelineError;

/// An ordered list of queries to run, as written to `queries_YYYYMMDD.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryPlan {
    pub date: DateTime<Utc>,
    pub queries: Vec<SearchQuery>,
}

impl QueryPlan {
    /// Generate the plan for `config`, capped at `max_queries`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a search template does not parse.
    pub fn build(
        config: &ScoutConfig,
        max_queries: Option<usize>,
        now: DateTime<Utc>,
    ) -> Result<Self, ConfigError> {
        let queries =
            build_search_queries(&config.regions, &config.search_templates, max_queries)?;
        Ok(Self { date: now, queries })
    }

    #[must_use]
    pub fn region_counts(&self) -> BTreeMap<&str, usize> {
        count_by(&self.queries, |q| q.region.as_str())
    }

    #[must_use]
    pub fn category_counts(&self) -> BTreeMap<&str, usize> {
        count_by(&self.queries, |q| q.category.as_str())
    }

    #[must_use]
    pub fn file_name(&self) -> String {
        format!("queries_{}.json", self.date.format("%Y%m%d"))
    }

    /// Write the plan as pretty JSON into `data_dir`, creating it if needed.
    /// Returns the written path.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] if the plan cannot be encoded or written.
    pub async fn write_to(&self, data_dir: &Path) -> Result<PathBuf, PipelineError> {
        let path = data_dir.join(self.file_name());
        let body = serde_json::to_string_pretty(self).map_err(|source| PipelineError::Encode {
            what: "query plan",
            source,
        })?;
        write_file(&path, body).await?;

        tracing::info!(
            path = %path.display(),
            queries = self.queries.len(),
            by_region = ?self.region_counts(),
            by_category = ?self.category_counts(),
            "query plan written"
        );
        Ok(path)
    }
}

fn count_by<'q>(
    queries: &'q [SearchQuery],
    key: impl Fn(&'q SearchQuery) -> &'q str,
) -> BTreeMap<&'q str, usize> {
    let mut counts = BTreeMap::new();
    for query in queries {
        *counts.entry(key(query)).or_insert(0) += 1;
    }
    counts
}

pub(crate) async fn write_file(path: &Path, body: String) -> Result<(), PipelineError> {
    let output = |source| PipelineError::Output {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await.map_err(output)?;
    }
    tokio::fs::write(path, body).await.map_err(output)
}
