//! `venues` sub-commands: manual entry, listing, export and the exclusion
//! list.

use chrono::NaiveDate;
use clap::Subcommand;
use vscout_core::{
    AppConfig, Contact, ExcludedVenue, ExclusionReason, VenueDraft, VenueId, VenueStatus,
};

const MANUAL_SOURCE: &str = "manual";

#[derive(Debug, Subcommand)]
pub enum VenueCommands {
    /// Add (or merge) a venue by hand; it is recorded as active
    Add {
        name: String,
        city: String,
        #[arg(long)]
        region: Option<String>,
        #[arg(long)]
        state: Option<String>,
        #[arg(long = "type")]
        venue_type: Option<String>,
        #[arg(long)]
        website: Option<String>,
        /// Genre label; repeat for several
        #[arg(long = "genre")]
        genres: Vec<String>,
    },
    /// List venues in the registry
    List {
        /// Only venues with this status
        #[arg(long)]
        status: Option<VenueStatus>,
    },
    /// Mark a venue as confirmed active
    Verify { name: String, city: String },
    /// Mark a venue as closed
    Close { name: String, city: String },
    /// Export active venues as JSON into the data directory
    Export,
    /// Put a venue on the exclusion list
    Exclude {
        name: String,
        city: String,
        #[arg(long, default_value = "no_response")]
        reason: ExclusionReason,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Take a venue off the exclusion list and reinstate it
    Unexclude { name: String, city: String },
    /// Show the exclusion list
    Excluded,
}

pub(crate) async fn run(
    pool: &sqlx::SqlitePool,
    config: &AppConfig,
    command: VenueCommands,
    today: NaiveDate,
) -> anyhow::Result<()> {
    match command {
        VenueCommands::Add {
            name,
            city,
            region,
            state,
            venue_type,
            website,
            genres,
        } => {
            let region = region.or_else(|| region_from_config(config, &city));
            let draft = VenueDraft {
                name,
                city: Some(city),
                region,
                state,
                venue_type,
                contact: Contact {
                    website,
                    ..Contact::default()
                },
                genres: genres.into_iter().collect(),
                status: Some(VenueStatus::Active),
                source: MANUAL_SOURCE.to_string(),
                ..VenueDraft::default()
            };
            let (venue, created) = vscout_db::upsert_venue(pool, &draft, today).await?;
            let verb = if created { "added" } else { "updated" };
            println!(
                "{verb} {} ({}, {}) [{}] status={}",
                venue.name, venue.city, venue.state, venue.id, venue.status
            );
        }
        VenueCommands::List { status } => {
            let venues = vscout_db::list_venues(pool, status).await?;
            if venues.is_empty() {
                println!("no venues found");
            }
            for v in &venues {
                println!(
                    "{}  {:<32} {:<20} {:<18} {}",
                    v.id,
                    v.name,
                    v.city,
                    v.region.as_deref().unwrap_or("-"),
                    v.status
                );
            }
        }
        VenueCommands::Verify { name, city } => {
            request_status(pool, &name, &city, VenueStatus::Active).await?;
        }
        VenueCommands::Close { name, city } => {
            request_status(pool, &name, &city, VenueStatus::Closed).await?;
        }
        VenueCommands::Export => {
            let (path, count) =
                vscout_pipeline::export_active_venues(pool, &config.data_dir, today).await?;
            println!("exported {count} venues to {}", path.display());
        }
        VenueCommands::Exclude {
            name,
            city,
            reason,
            notes,
        } => {
            let entry = ExcludedVenue {
                name,
                city,
                reason,
                date_excluded: None,
                notes,
            };
            if vscout_db::exclude_venue(pool, &entry, today).await? {
                println!("excluded {} ({}): {}", entry.name, entry.city, entry.reason);
            } else {
                println!("{} ({}) is already excluded", entry.name, entry.city);
            }
        }
        VenueCommands::Unexclude { name, city } => {
            if vscout_db::unexclude_venue(pool, &name, &city).await? {
                println!("removed {name} ({city}) from the exclusion list");
            } else {
                println!("{name} ({city}) is not on the exclusion list");
            }
        }
        VenueCommands::Excluded => {
            let entries = vscout_db::list_excluded_venues(pool).await?;
            if entries.is_empty() {
                println!("exclusion list is empty");
            }
            for e in &entries {
                let date = e
                    .date_excluded
                    .map_or_else(|| "-".to_string(), |d| d.to_string());
                println!(
                    "{date}  {} ({})  {}{}",
                    e.name,
                    e.city,
                    e.reason,
                    e.notes
                        .as_deref()
                        .map(|n| format!("  {n}"))
                        .unwrap_or_default()
                );
            }
        }
    }
    Ok(())
}

async fn request_status(
    pool: &sqlx::SqlitePool,
    name: &str,
    city: &str,
    requested: VenueStatus,
) -> anyhow::Result<()> {
    let id = VenueId::derive(name, city);
    match vscout_db::request_venue_status(pool, &id, requested).await? {
        Some(venue) if venue.status == requested => {
            println!("{} ({}) is now {}", venue.name, venue.city, venue.status);
        }
        Some(venue) => {
            println!(
                "{} ({}) stays {}; it cannot move to {requested}",
                venue.name, venue.city, venue.status
            );
        }
        None => anyhow::bail!("no venue named {name} in {city}"),
    }
    Ok(())
}

/// Region for `city` from the scout config, when the config can be read.
fn region_from_config(config: &AppConfig, city: &str) -> Option<String> {
    match vscout_core::load_scout_config(&config.config_path) {
        Ok(scout) => scout.region_for_city(city).map(|r| r.name.clone()),
        Err(e) => {
            tracing::warn!(error = %e, "scout config unavailable; venue region left unset");
            None
        }
    }
}
