//! `plan` and `process` command handlers.

use std::path::PathBuf;

use chrono::NaiveDate;
use vscout_core::{AppConfig, ScoutConfig};
use vscout_extract::HeuristicExtractor;
use vscout_pipeline::{Processor, QueryPlan, TracingSink};

/// Generate the query plan and write it to the data directory.
///
/// # Errors
///
/// Returns an error if a template is invalid or the plan cannot be written.
pub(crate) async fn run_plan(
    config: &AppConfig,
    scout: &ScoutConfig,
    max_queries: usize,
) -> anyhow::Result<()> {
    let plan = QueryPlan::build(scout, Some(max_queries), chrono::Utc::now())?;
    if plan.queries.is_empty() {
        println!("no queries generated; check regions and search_templates in the config");
        return Ok(());
    }

    let path = plan.write_to(&config.data_dir).await?;
    println!("wrote {} queries to {}", plan.queries.len(), path.display());

    println!("by region:");
    for (region, count) in plan.region_counts() {
        println!("  {region}: {count}");
    }
    println!("by category:");
    for (category, count) in plan.category_counts() {
        println!("  {category}: {count}");
    }
    Ok(())
}

/// Process results files into the registry.
///
/// Unreadable files are reported and skipped; the run fails only when every
/// file was unreadable or the datastore fails.
///
/// # Errors
///
/// Returns an error on a storage failure or when no file could be processed.
pub(crate) async fn run_process(
    pool: &sqlx::SqlitePool,
    scout: &ScoutConfig,
    files: &[PathBuf],
    today: NaiveDate,
) -> anyhow::Result<()> {
    let extractor = HeuristicExtractor::from_config(scout);
    let processor = Processor::new(pool, scout, &extractor, today);
    let run = processor.process_files(files, &mut TracingSink).await?;

    for failure in &run.failures {
        eprintln!("skipped {}: {}", failure.path.display(), failure.reason);
    }

    let totals = &run.totals;
    println!(
        "processed {} of {} files: {} results ({} seen before)",
        run.files_processed,
        files.len(),
        totals.records,
        totals.repeated_results
    );
    println!(
        "venues: {} accepted, {} new, {} already known, {} rejected",
        totals.accepted, totals.new_venues, totals.duplicates, totals.rejected
    );
    println!(
        "opportunities: {} new, {} alert hits without a venue",
        totals.opportunities, totals.unattributed_alerts
    );

    if run.files_processed == 0 {
        anyhow::bail!("all {} results files failed to load", files.len());
    }
    Ok(())
}
