//! Read-only listings: acts, search history, opportunities.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use vscout_core::{HistoryFilter, ScoutConfig};

pub(crate) fn print_acts(scout: &ScoutConfig) {
    if scout.acts.is_empty() {
        println!("no acts configured");
        return;
    }
    for act in &scout.acts {
        println!("{} ({})", act.display_name(), act.id);
        println!("  genres:      {}", join(&act.genres));
        println!("  venue types: {}", join(&act.venue_types));
        println!(
            "  capacity:    {}-{} (ideal {})",
            act.min_capacity, act.max_capacity, act.ideal_capacity
        );
        println!("  fee:         ${}-${}", act.min_fee, act.max_fee);
        println!("  days:        {}", join(&act.available_days));
        if let Some(notes) = &act.notes {
            println!("  notes:       {notes}");
        }
    }
}

fn join<'a>(items: impl IntoIterator<Item = &'a String>) -> String {
    items
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

pub(crate) fn history_filter(
    since: Option<NaiveDate>,
    until: Option<NaiveDate>,
    region: Option<String>,
) -> HistoryFilter {
    HistoryFilter {
        from: since.map(start_of_day),
        to: until.and_then(end_of_day),
        region,
    }
}

fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

fn end_of_day(day: NaiveDate) -> Option<DateTime<Utc>> {
    day.and_hms_milli_opt(23, 59, 59, 999).map(|dt| dt.and_utc())
}

pub(crate) async fn run_history(
    pool: &sqlx::SqlitePool,
    since: Option<NaiveDate>,
    until: Option<NaiveDate>,
    region: Option<String>,
) -> anyhow::Result<()> {
    let filter = history_filter(since, until, region);
    let entries = vscout_db::list_search_history(pool, &filter).await?;
    if entries.is_empty() {
        println!("no searches recorded in that range");
        return Ok(());
    }

    for e in &entries {
        println!(
            "{}  {:<45} {:<18} results={} new={} opportunities={}",
            e.executed_at.format("%Y-%m-%d %H:%M"),
            e.query_text,
            e.region.as_deref().unwrap_or("-"),
            e.result_count,
            e.new_venues,
            e.opportunities
        );
    }

    println!("queries by region:");
    for count in vscout_db::region_query_counts(pool, &filter).await? {
        println!(
            "  {}: {}",
            count.region.as_deref().unwrap_or("(none)"),
            count.queries
        );
    }
    Ok(())
}

pub(crate) async fn run_opportunities(
    pool: &sqlx::SqlitePool,
    since: Option<NaiveDate>,
) -> anyhow::Result<()> {
    let opportunities = vscout_db::list_opportunities(pool, since).await?;
    if opportunities.is_empty() {
        println!("no opportunities found");
        return Ok(());
    }

    for o in &opportunities {
        let venue = vscout_db::get_venue(pool, &o.venue_id).await?;
        let (name, city, status) = venue.map_or_else(
            || ("?".to_string(), "?".to_string(), None),
            |v| (v.name, v.city, Some(v.status)),
        );
        // Opportunities for venues excluded after detection stay in storage
        // but are not reported.
        if status == Some(vscout_core::VenueStatus::Excluded) {
            continue;
        }
        println!(
            "{}  {} ({})  [{}]  acts: {}",
            o.detected_date,
            name,
            city,
            o.opportunity_type,
            if o.suitable_acts.is_empty() {
                "-".to_string()
            } else {
                o.suitable_acts.join(", ")
            }
        );
        println!("    {}", o.description);
    }
    Ok(())
}
