//! Batch processing of search results into the registry.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::SqlitePool;
use vscout_core::{ScoutConfig, SearchHistoryEntry};
use vscout_db::{
    append_search_history, insert_opportunity, link_search_result_venue, record_search_result,
    sync_config_exclusions, upsert_venue, DbError, NewSearchResult,
};
use vscout_extract::ResultExtractor;

use crate::detector::{detect_opportunity, Trigger};
use crate::error::PipelineError;
use crate::events::{EventSink, PipelineEvent};
use crate::input::{read_results_file, ResultRecord};

/// Counts for one record, file, or run.
///
/// `accepted` counts every stored draft; `duplicates` is the part of it that
/// resolved to a venue already in the registry. `rejected` drafts were
/// skipped for failing validation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub records: usize,
    /// Records whose `(query, text)` was already stored by an earlier run.
    pub repeated_results: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub duplicates: usize,
    pub new_venues: usize,
    pub opportunities: usize,
    /// Records with alert-keyword hits but no extractable venue.
    pub unattributed_alerts: usize,
}

impl BatchSummary {
    pub fn absorb(&mut self, other: &BatchSummary) {
        self.records += other.records;
        self.repeated_results += other.repeated_results;
        self.accepted += other.accepted;
        self.rejected += other.rejected;
        self.duplicates += other.duplicates;
        self.new_venues += other.new_venues;
        self.opportunities += other.opportunities;
        self.unattributed_alerts += other.unattributed_alerts;
    }
}

/// A results file that was skipped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Outcome of a multi-file run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub files_processed: usize,
    pub failures: Vec<FileFailure>,
    pub exclusions_synced: usize,
    pub totals: BatchSummary,
}

/// Everything one processing run needs. `today` stamps every venue sighting
/// and opportunity made by the run.
pub struct Processor<'a> {
    pool: &'a SqlitePool,
    config: &'a ScoutConfig,
    extractor: &'a dyn ResultExtractor,
    today: NaiveDate,
}

impl<'a> Processor<'a> {
    #[must_use]
    pub fn new(
        pool: &'a SqlitePool,
        config: &'a ScoutConfig,
        extractor: &'a dyn ResultExtractor,
        today: NaiveDate,
    ) -> Self {
        Self {
            pool,
            config,
            extractor,
            today,
        }
    }

    /// Process several results files.
    ///
    /// 1. Seed the exclusion list from configuration.
    /// 2. Process each file in order. A file that cannot be read or parsed
    ///    is recorded in [`RunSummary::failures`] and the run moves on.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Storage`] on a datastore failure. Records
    /// committed before the failure stay committed.
    pub async fn process_files(
        &self,
        paths: &[PathBuf],
        sink: &mut dyn EventSink,
    ) -> Result<RunSummary, PipelineError> {
        let mut run = RunSummary {
            exclusions_synced: sync_config_exclusions(self.pool, &self.config.excluded, self.today)
                .await?,
            ..RunSummary::default()
        };

        for path in paths {
            match self.process_file(path, sink).await {
                Ok(tally) => {
                    run.files_processed += 1;
                    run.totals.absorb(&tally);
                }
                Err(err) if err.is_per_file() => {
                    tracing::warn!(path = %path.display(), error = %err, "skipping results file");
                    run.failures.push(FileFailure {
                        path: path.clone(),
                        reason: err.to_string(),
                    });
                }
                Err(err) => return Err(err),
            }
        }

        tracing::info!(
            files = run.files_processed,
            failed = run.failures.len(),
            new_venues = run.totals.new_venues,
            opportunities = run.totals.opportunities,
            "results run complete"
        );
        Ok(run)
    }

    /// Process one results file and emit `QueryBatchProcessed` for it.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::InputFormat`] if the file is unreadable, or
    /// [`PipelineError::Storage`] on a datastore failure.
    pub async fn process_file(
        &self,
        path: &Path,
        sink: &mut dyn EventSink,
    ) -> Result<BatchSummary, PipelineError> {
        let records = read_results_file(path).await?;
        let tally = self.process_records(&records, sink).await?;
        tracing::info!(
            path = %path.display(),
            records = tally.records,
            accepted = tally.accepted,
            rejected = tally.rejected,
            "results file processed"
        );
        Ok(tally)
    }

    /// Process already-parsed records as one batch.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Storage`] on a datastore failure.
    pub async fn process_records(
        &self,
        records: &[ResultRecord],
        sink: &mut dyn EventSink,
    ) -> Result<BatchSummary, PipelineError> {
        let mut tally = BatchSummary::default();
        for record in records {
            tally.absorb(&self.process_record(record, sink).await?);
        }
        sink.emit(PipelineEvent::QueryBatchProcessed {
            accepted: tally.accepted,
            rejected: tally.rejected,
            duplicates: tally.duplicates,
        });
        Ok(tally)
    }

    /// Process one result blob as a single unit of work.
    ///
    /// The blob is stored once per `(query, text)`. Every extracted draft is
    /// upserted and linked to the blob; a draft failing validation is
    /// counted and skipped. Alert hits apply to every venue in the blob.
    /// History is appended only the first time a blob is seen.
    ///
    /// All writes for the record share one transaction, and its events are
    /// emitted only once that transaction commits. A storage failure leaves
    /// nothing of the record behind, so a rerun treats it as new.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Storage`] on a datastore failure.
    pub async fn process_record(
        &self,
        record: &ResultRecord,
        sink: &mut dyn EventSink,
    ) -> Result<BatchSummary, PipelineError> {
        let mut tally = BatchSummary {
            records: 1,
            ..BatchSummary::default()
        };
        let mut events = Vec::new();
        let mut tx = self.pool.begin().await?;

        let (result_id, fresh) = record_search_result(
            &mut *tx,
            &NewSearchResult {
                query: record.query.clone(),
                region: record.region.clone(),
                city: record.city.clone(),
                result_text: record.result_text.clone(),
                searched_at: record.timestamp,
            },
        )
        .await?;
        if !fresh {
            tally.repeated_results = 1;
        }

        let hint = record.hint();
        let extraction = self.extractor.extract(&record.result_text, &hint);
        let alert_hits = extraction.alert_hits;

        for draft in extraction.drafts {
            let (venue, created) = match upsert_venue(&mut *tx, &draft, self.today).await {
                Ok(stored) => stored,
                Err(DbError::Validation(err)) => {
                    tracing::warn!(query = %record.query, error = %err, "draft rejected");
                    tally.rejected += 1;
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            tally.accepted += 1;
            if created {
                tally.new_venues += 1;
            } else {
                tally.duplicates += 1;
            }
            link_search_result_venue(&mut *tx, result_id, &venue.id).await?;

            let opportunity = detect_opportunity(
                self.config,
                &venue,
                &alert_hits,
                Trigger {
                    text: &record.result_text,
                    source_query: &record.query,
                    detected_date: self.today,
                },
            );
            events.push(PipelineEvent::VenueUpserted { venue, created });

            if let Some(opportunity) = opportunity {
                if insert_opportunity(&mut *tx, &opportunity).await? {
                    tally.opportunities += 1;
                    events.push(PipelineEvent::OpportunityDetected(opportunity));
                }
            }
        }

        if !alert_hits.is_empty() && tally.accepted == 0 {
            tracing::info!(
                query = %record.query,
                hits = ?alert_hits,
                "alert keywords found without an extractable venue"
            );
            tally.unattributed_alerts = 1;
        }

        if fresh {
            append_search_history(
                &mut *tx,
                &SearchHistoryEntry {
                    query_text: record.query.clone(),
                    region: record.region.clone(),
                    executed_at: record.timestamp,
                    result_count: saturating_u32(tally.accepted + tally.rejected),
                    new_venues: saturating_u32(tally.new_venues),
                    opportunities: saturating_u32(tally.opportunities),
                },
            )
            .await?;
        }

        tx.commit().await?;
        for event in events {
            sink.emit(event);
        }
        Ok(tally)
    }
}

fn saturating_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
