// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Glue between the snapshot parser and the persistence layer.

use std::io::Read;

use time::OffsetDateTime;
use tracing::info;
use votewatch_domain::JurisdictionType;
use votewatch_ingest::{ParseOptions, ParsedSnapshot, parse_snapshot};
use votewatch_persistence::{DuplicatePolicy, Election, Persistence, UpdateOutcome};

use crate::error::ScraperError;

/// Parses one snapshot and runs it through the ingest transaction.
///
/// # Arguments
///
/// * `persistence` - The store to write to
/// * `election` - The election the snapshot belongs to
/// * `reader` - The raw snapshot bytes
/// * `jurisdiction` - Which feed published the snapshot
/// * `options` - Parser settings
/// * `ingested_at` - When the snapshot was captured
/// * `policy` - What to do when the fingerprint is already committed
///
/// # Errors
///
/// Returns an error if the snapshot cannot be parsed or stored. Nothing is
/// written in that case.
pub fn ingest_snapshot<R: Read>(
    persistence: &mut Persistence,
    election: &Election,
    reader: R,
    jurisdiction: JurisdictionType,
    options: &ParseOptions,
    ingested_at: OffsetDateTime,
    policy: DuplicatePolicy,
) -> Result<UpdateOutcome, ScraperError> {
    let snapshot: ParsedSnapshot = parse_snapshot(reader, jurisdiction, options)?;
    let outcome: UpdateOutcome = persistence.ingest(
        &snapshot.records,
        &snapshot.fingerprint,
        ingested_at,
        election,
        policy,
    )?;

    match &outcome {
        UpdateOutcome::Committed(committed) => info!(
            jurisdiction = %jurisdiction,
            update_id = committed.update.update_id,
            tallies = committed.tallies_inserted,
            "Committed new update"
        ),
        UpdateOutcome::Replaced {
            previous,
            committed,
        } => info!(
            jurisdiction = %jurisdiction,
            previous_update_id = previous.update_id,
            update_id = committed.update.update_id,
            tallies = committed.tallies_inserted,
            "Replaced existing update"
        ),
        UpdateOutcome::Unchanged(fingerprint) => info!(
            jurisdiction = %jurisdiction,
            fingerprint = %fingerprint,
            "Snapshot unchanged"
        ),
    }

    Ok(outcome)
}

/// Tally of snapshot outcomes across a cycle or an import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestSummary {
    pub committed: usize,
    pub replaced: usize,
    pub unchanged: usize,
    pub failed: usize,
    pub skipped: usize,
}

impl IngestSummary {
    /// Counts the result of one snapshot.
    pub const fn record(&mut self, result: &Result<UpdateOutcome, ScraperError>) {
        match result {
            Ok(UpdateOutcome::Committed(_)) => self.committed += 1,
            Ok(UpdateOutcome::Replaced { .. }) => self.replaced += 1,
            Ok(UpdateOutcome::Unchanged(_)) => self.unchanged += 1,
            Err(_) => self.failed += 1,
        }
    }
}
