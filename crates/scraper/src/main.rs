// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod fetch;
mod import;
mod pipeline;
#[cfg(test)]
mod test_support;
mod watch;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use tracing::info;
use votewatch_domain::{DEFAULT_STATEWIDE_DISTRICT, JurisdictionType};
use votewatch_ingest::ParseOptions;
use votewatch_persistence::{Election, Persistence};

use crate::error::ScraperError;
use crate::fetch::{Feed, FeedClient};
use crate::import::{ImportOptions, import_directory, prepare_election};
use crate::watch::{WatchConfig, watch};

const ELECTION_DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Votewatch Scraper - versioned ingestion of published election results
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, env = "DATABASE_PATH")]
    database: Option<String>,

    /// Display name of the election (e.g. "2024 General Election")
    #[arg(short = 'n', long, env = "ELECTION_NAME")]
    election_name: String,

    /// Election day, as YYYY-MM-DD
    #[arg(long, env = "ELECTION_DATE")]
    election_date: String,

    /// District assigned to statewide races that carry no district prefix
    #[arg(long, default_value = DEFAULT_STATEWIDE_DISTRICT)]
    statewide_district: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Poll the live results feeds until Ctrl-C
    Watch {
        /// URL of the statewide results export
        #[arg(long, env = "STATE_DATA", required_unless_present = "county_url")]
        state_url: Option<String>,

        /// URL of the county results export
        #[arg(long, env = "COUNTY_DATA")]
        county_url: Option<String>,

        /// Seconds between update checks
        #[arg(long, default_value_t = 60)]
        interval_secs: u64,

        /// Seconds before a feed request is abandoned
        #[arg(long, default_value_t = 30)]
        fetch_timeout_secs: u64,
    },
    /// Import archived result files from a directory
    Import {
        /// Directory holding `*_allstate.csv` and `webresults-*.csv` files
        dir: PathBuf,

        /// Replace updates whose fingerprint already exists
        #[arg(short, long)]
        overwrite: bool,

        /// Delete the election and everything it owns before importing
        #[arg(long)]
        reset_election: bool,
    },
}

fn parse_election_date(value: &str) -> Result<Date, ScraperError> {
    Date::parse(value, ELECTION_DATE_FORMAT)
        .map_err(|e| ScraperError::Config(format!("Invalid election date '{value}': {e}")))
}

fn configured_feeds(state_url: Option<String>, county_url: Option<String>) -> Vec<Feed> {
    JurisdictionType::ALL
        .into_iter()
        .zip([state_url, county_url])
        .filter_map(|(jurisdiction, url)| url.map(|url| Feed::new(jurisdiction, url)))
        .collect()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command-line arguments
    let args: Args = Args::parse();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Votewatch Scraper");

    let election_date: Date = parse_election_date(&args.election_date)?;
    let parse_options: ParseOptions = ParseOptions {
        statewide_district: args.statewide_district.clone(),
    };

    // Initialize persistence (in-memory or file-based based on CLI argument)
    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    match args.command {
        Command::Watch {
            state_url,
            county_url,
            interval_secs,
            fetch_timeout_secs,
        } => {
            let election: Election =
                persistence.find_or_create_election(&args.election_name, election_date)?;
            let client: FeedClient = FeedClient::new(Duration::from_secs(fetch_timeout_secs))?;
            let config: WatchConfig = WatchConfig {
                feeds: configured_feeds(state_url, county_url),
                interval: Duration::from_secs(interval_secs.max(1)),
                parse_options,
            };
            watch(&mut persistence, &election, &client, &config).await?;
        }
        Command::Import {
            dir,
            overwrite,
            reset_election,
        } => {
            let election: Election = prepare_election(
                &mut persistence,
                &args.election_name,
                election_date,
                reset_election,
            )?;
            let options: ImportOptions = ImportOptions {
                overwrite,
                parse_options,
            };
            import_directory(&mut persistence, &election, &dir, &options)?;
        }
    }

    Ok(())
}
