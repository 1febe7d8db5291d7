mod pipeline;
mod report;
mod venues;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::venues::VenueCommands;

#[derive(Debug, Parser)]
#[command(name = "vscout")]
#[command(about = "Venue scouting: query plans, result processing, and the venue registry")]
struct Cli {
    /// Scout configuration file (overrides VSCOUT_CONFIG_PATH)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Database maintenance
    Db {
        #[command(subcommand)]
        command: DbCommands,
    },
    /// Write today's query plan to the data directory
    Plan {
        /// Maximum number of queries (defaults to VSCOUT_MAX_QUERIES)
        #[arg(long)]
        max_queries: Option<usize>,
    },
    /// Process one or more search results files
    Process {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Manage the venue registry and exclusion list
    Venues {
        #[command(subcommand)]
        command: VenueCommands,
    },
    /// List configured acts and their booking criteria
    Acts,
    /// Show search history, optionally filtered
    History {
        /// First day to include (YYYY-MM-DD)
        #[arg(long)]
        since: Option<NaiveDate>,
        /// Last day to include (YYYY-MM-DD)
        #[arg(long)]
        until: Option<NaiveDate>,
        #[arg(long)]
        region: Option<String>,
    },
    /// List detected booking opportunities
    Opportunities {
        /// Only opportunities detected on or after this day (YYYY-MM-DD)
        #[arg(long)]
        since: Option<NaiveDate>,
    },
}

#[derive(Debug, Subcommand)]
enum DbCommands {
    /// Verify the database is reachable
    Ping,
    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = vscout_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let cli = Cli::parse();
    if let Some(path) = cli.config {
        config.config_path = path;
    }
    let Some(command) = cli.command else {
        println!("vscout: no command given; run `vscout --help` for usage");
        return Ok(());
    };
    let today = chrono::Local::now().date_naive();

    match command {
        Commands::Db { command } => {
            let pool = connect(&config).await?;
            match command {
                DbCommands::Ping => {
                    vscout_db::ping(&pool).await?;
                    println!("database ok");
                }
                DbCommands::Migrate => {
                    let applied = vscout_db::run_migrations(&pool).await?;
                    println!("applied {applied} migrations");
                }
            }
        }
        Commands::Plan { max_queries } => {
            let scout = vscout_core::load_scout_config(&config.config_path)?;
            pipeline::run_plan(&config, &scout, max_queries.unwrap_or(config.max_queries)).await?;
        }
        Commands::Process { files } => {
            let scout = vscout_core::load_scout_config(&config.config_path)?;
            let pool = open_store(&config).await?;
            pipeline::run_process(&pool, &scout, &files, today).await?;
        }
        Commands::Venues { command } => {
            let pool = open_store(&config).await?;
            venues::run(&pool, &config, command, today).await?;
        }
        Commands::Acts => {
            let scout = vscout_core::load_scout_config(&config.config_path)?;
            report::print_acts(&scout);
        }
        Commands::History {
            since,
            until,
            region,
        } => {
            let pool = open_store(&config).await?;
            report::run_history(&pool, since, until, region).await?;
        }
        Commands::Opportunities { since } => {
            let pool = open_store(&config).await?;
            report::run_opportunities(&pool, since).await?;
        }
    }

    Ok(())
}

async fn connect(config: &vscout_core::AppConfig) -> anyhow::Result<sqlx::SqlitePool> {
    let pool_config = vscout_db::PoolConfig::from_app_config(config);
    Ok(vscout_db::connect_pool(&config.database_url, pool_config).await?)
}

/// Connect and bring the schema up to date.
async fn open_store(config: &vscout_core::AppConfig) -> anyhow::Result<sqlx::SqlitePool> {
    let pool = connect(config).await?;
    vscout_db::run_migrations(&pool).await?;
    Ok(pool)
}
