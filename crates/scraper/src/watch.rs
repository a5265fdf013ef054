// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The polling driver.
//!
//! One cycle fetches and ingests every configured feed in order. Cycles run
//! one at a time on a fixed interval; the first one starts immediately.
//! A failed feed is logged and never stops the loop.

use std::time::Duration;

use time::OffsetDateTime;
use tokio::time::{Interval, MissedTickBehavior};
use tracing::{error, info};
use votewatch_ingest::ParseOptions;
use votewatch_persistence::{DuplicatePolicy, Election, Persistence, UpdateOutcome};

use crate::error::ScraperError;
use crate::fetch::{Feed, FeedClient};
use crate::pipeline::{IngestSummary, ingest_snapshot};

/// Settings for the polling loop.
#[derive(Debug, Clone)]
pub struct WatchConfig {
    pub feeds: Vec<Feed>,
    pub interval: Duration,
    pub parse_options: ParseOptions,
}

async fn process_feed(
    persistence: &mut Persistence,
    election: &Election,
    client: &FeedClient,
    feed: &Feed,
    parse_options: &ParseOptions,
) -> Result<UpdateOutcome, ScraperError> {
    let body: Vec<u8> = client.fetch(feed).await?;
    ingest_snapshot(
        persistence,
        election,
        body.as_slice(),
        feed.jurisdiction,
        parse_options,
        OffsetDateTime::now_utc(),
        DuplicatePolicy::Skip,
    )
}

/// Runs one polling cycle over every feed.
pub async fn run_cycle(
    persistence: &mut Persistence,
    election: &Election,
    client: &FeedClient,
    config: &WatchConfig,
) -> IngestSummary {
    let mut summary: IngestSummary = IngestSummary::default();

    for feed in &config.feeds {
        let result: Result<UpdateOutcome, ScraperError> =
            process_feed(persistence, election, client, feed, &config.parse_options).await;
        if let Err(e) = &result {
            error!(
                jurisdiction = %feed.jurisdiction,
                url = %feed.url,
                "Error checking for updates: {}", e
            );
        }
        summary.record(&result);
    }

    summary
}

/// Polls the feeds until Ctrl-C.
///
/// A cycle in progress always finishes before shutdown.
///
/// # Errors
///
/// Returns an error if the shutdown signal handler cannot be installed.
pub async fn watch(
    persistence: &mut Persistence,
    election: &Election,
    client: &FeedClient,
    config: &WatchConfig,
) -> Result<(), ScraperError> {
    let mut ticker: Interval = tokio::time::interval(config.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!(
        election = %election.election_key,
        feeds = config.feeds.len(),
        interval_secs = config.interval.as_secs(),
        "Update checker is running. Press Ctrl+C to stop."
    );

    loop {
        tokio::select! {
            biased;
            signal = &mut shutdown => {
                signal?;
                info!("Shutdown signal received; stopping update checker");
                return Ok(());
            }
            _ = ticker.tick() => {
                let summary: IngestSummary = run_cycle(persistence, election, client, config).await;
                info!(
                    committed = summary.committed,
                    unchanged = summary.unchanged,
                    failed = summary.failed,
                    "Update check complete"
                );
            }
        }
    }
}
