// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Snapshot version lifecycle.
//!
//! A fingerprint moves through `unseen -> committed`, and on overwrite
//! `committed -> deleted -> committed`. The unique index on
//! `updates.fingerprint` guarantees at most one committed update per
//! fingerprint.

use std::collections::BTreeSet;

use diesel::SqliteConnection;
use diesel::prelude::*;
use time::OffsetDateTime;
use tracing::{debug, info};
use votewatch_domain::{CanonicalVoteRecord, Fingerprint, JurisdictionType, validate_snapshot};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{
    CommittedUpdate, Contest, DeletedUpdate, DuplicatePolicy, NewVoteTally, Update,
    UpdateOutcome, format_timestamp, parse_timestamp,
};
use crate::diesel_schema::{contests, updates, vote_tallies};
use crate::error::{PersistenceError, is_unique_violation};
use crate::mutations::entities::load_entities;
use crate::queries::entities::get_contest;
use crate::queries::updates::{
    contest_ids_for_update, find_update_by_fingerprint, reporting_jurisdictions,
};
use crate::resolution::EntityIndex;

/// Number of vote tally rows written per insert statement.
pub const TALLY_BATCH_SIZE: usize = 100;

fn insert_update(
    conn: &mut SqliteConnection,
    election_id: i64,
    fingerprint: &Fingerprint,
    jurisdiction: JurisdictionType,
    ingested_at: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(updates::table)
        .values((
            updates::election_id.eq(election_id),
            updates::fingerprint.eq(fingerprint.as_str()),
            updates::jurisdiction_type.eq(jurisdiction.as_str()),
            updates::ingested_at.eq(ingested_at),
        ))
        .execute(conn)
        .map_err(|e| {
            if is_unique_violation(&e) {
                PersistenceError::DuplicateFingerprint(fingerprint.to_string())
            } else {
                PersistenceError::from(e)
            }
        })?;

    get_last_insert_rowid(conn)
}

fn write_jurisdictions(
    conn: &mut SqliteConnection,
    contest_id: i64,
    jurisdictions: &[JurisdictionType],
) -> Result<(), PersistenceError> {
    let encoded: String = serde_json::to_string(jurisdictions)?;
    diesel::update(contests::table.filter(contests::contest_id.eq(contest_id)))
        .set(contests::jurisdictions.eq(encoded))
        .execute(conn)?;
    Ok(())
}

/// Appends `jurisdiction` to every touched contest that lacks it.
fn tag_contests(
    conn: &mut SqliteConnection,
    index: &EntityIndex,
    tallies: &[NewVoteTally],
    jurisdiction: JurisdictionType,
) -> Result<usize, PersistenceError> {
    let touched: BTreeSet<i64> = tallies.iter().map(|t| t.contest_id).collect();
    let untagged: Vec<&Contest> = index
        .contests()
        .filter(|c| touched.contains(&c.contest_id) && !c.jurisdictions.contains(&jurisdiction))
        .collect();

    for contest in &untagged {
        let mut jurisdictions: Vec<JurisdictionType> = contest.jurisdictions.clone();
        jurisdictions.push(jurisdiction);
        write_jurisdictions(conn, contest.contest_id, &jurisdictions)?;
    }

    Ok(untagged.len())
}

/// Commits a snapshot as a new update.
///
/// Inserts the update, resolves every record against the election's
/// registered entities, tags touched contests with the jurisdiction and
/// writes the tallies in batches of [`TALLY_BATCH_SIZE`]. Everything happens
/// in one transaction; on any error nothing is written.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `records` - The snapshot's canonical records
/// * `fingerprint` - The snapshot's content fingerprint
/// * `ingested_at` - When the snapshot was captured
/// * `election_id` - The election the update belongs to
///
/// # Errors
///
/// Returns an error if:
/// - The snapshot is empty or mixes jurisdictions
/// - An update with this fingerprint exists (`DuplicateFingerprint`)
/// - A record's contest or candidate is not registered
/// - The database operation fails
pub fn commit_update(
    conn: &mut SqliteConnection,
    records: &[CanonicalVoteRecord],
    fingerprint: &Fingerprint,
    ingested_at: OffsetDateTime,
    election_id: i64,
) -> Result<CommittedUpdate, PersistenceError> {
    let jurisdiction: JurisdictionType = validate_snapshot(records)?;
    let stored_ingested_at: String = format_timestamp(ingested_at)?;

    conn.transaction::<_, PersistenceError, _>(|conn| {
        let update_id: i64 =
            insert_update(conn, election_id, fingerprint, jurisdiction, &stored_ingested_at)?;

        let index: EntityIndex = EntityIndex::load(conn, election_id)?;
        let tallies: Vec<NewVoteTally> = index.tallies_for(update_id, records)?;
        let contests_tagged: usize = tag_contests(conn, &index, &tallies, jurisdiction)?;

        for batch in tallies.chunks(TALLY_BATCH_SIZE) {
            diesel::insert_into(vote_tallies::table)
                .values(batch)
                .execute(conn)?;
            debug!(update_id, batch_size = batch.len(), "Inserted vote tally batch");
        }

        info!(
            update_id,
            election_id,
            jurisdiction = jurisdiction.as_str(),
            fingerprint = fingerprint.as_str(),
            tallies = tallies.len(),
            contests_tagged,
            "Committed update"
        );

        Ok(CommittedUpdate {
            update: Update {
                update_id,
                election_id,
                fingerprint: fingerprint.clone(),
                jurisdiction,
                ingested_at: parse_timestamp(&stored_ingested_at)?,
            },
            tallies_inserted: tallies.len(),
            contests_tagged,
        })
    })
}

/// Commits a snapshot unless its fingerprint is already committed.
///
/// # Errors
///
/// Returns any error of [`commit_update`] except `DuplicateFingerprint`,
/// which is reported as [`UpdateOutcome::Unchanged`].
pub fn check_and_process_update(
    conn: &mut SqliteConnection,
    records: &[CanonicalVoteRecord],
    fingerprint: &Fingerprint,
    ingested_at: OffsetDateTime,
    election_id: i64,
) -> Result<UpdateOutcome, PersistenceError> {
    if find_update_by_fingerprint(conn, fingerprint)?.is_some() {
        info!(fingerprint = fingerprint.as_str(), "No change in snapshot");
        return Ok(UpdateOutcome::Unchanged(fingerprint.clone()));
    }

    match commit_update(conn, records, fingerprint, ingested_at, election_id) {
        Ok(committed) => Ok(UpdateOutcome::Committed(committed)),
        Err(PersistenceError::DuplicateFingerprint(_)) => {
            info!(
                fingerprint = fingerprint.as_str(),
                "Snapshot committed concurrently; no change"
            );
            Ok(UpdateOutcome::Unchanged(fingerprint.clone()))
        }
        Err(e) => Err(e),
    }
}

/// Deletes an update and its tallies.
///
/// Contests and ballot responses stay registered. Each contest that lost
/// tallies has its jurisdiction tags recomputed from the updates that still
/// report it.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the update does not exist, or an
/// error if the database operation fails.
pub fn delete_update(
    conn: &mut SqliteConnection,
    update: &Update,
) -> Result<DeletedUpdate, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let contest_ids: Vec<i64> = contest_ids_for_update(conn, update.update_id)?;

        let tallies_deleted: usize = diesel::delete(
            vote_tallies::table.filter(vote_tallies::update_id.eq(update.update_id)),
        )
        .execute(conn)?;

        let updates_deleted: usize =
            diesel::delete(updates::table.filter(updates::update_id.eq(update.update_id)))
                .execute(conn)?;
        if updates_deleted == 0 {
            return Err(PersistenceError::NotFound(format!(
                "Update {}",
                update.update_id
            )));
        }

        let mut contests_retagged: usize = 0;
        for contest_id in contest_ids {
            let contest: Contest = get_contest(conn, contest_id)?;
            let remaining: BTreeSet<JurisdictionType> = reporting_jurisdictions(conn, contest_id)?;
            let kept: Vec<JurisdictionType> = contest
                .jurisdictions
                .iter()
                .copied()
                .filter(|j| remaining.contains(j))
                .collect();
            if kept != contest.jurisdictions {
                write_jurisdictions(conn, contest_id, &kept)?;
                contests_retagged += 1;
            }
        }

        info!(
            update_id = update.update_id,
            fingerprint = update.fingerprint.as_str(),
            tallies_deleted,
            contests_retagged,
            "Deleted update"
        );

        Ok(DeletedUpdate {
            update_id: update.update_id,
            fingerprint: update.fingerprint.clone(),
            tallies_deleted,
            contests_retagged,
        })
    })
}

/// Ingests a snapshot: the full duplicate-check, overwrite and commit flow.
///
/// With [`DuplicatePolicy::Skip`] an already committed fingerprint is left
/// alone. With [`DuplicatePolicy::Overwrite`] the committed update is deleted
/// and the snapshot committed again. Entities are registered before the
/// commit. The whole flow is one transaction.
///
/// # Errors
///
/// Returns an error if validation, resolution or any database operation
/// fails; nothing is written.
pub fn ingest_snapshot(
    conn: &mut SqliteConnection,
    records: &[CanonicalVoteRecord],
    fingerprint: &Fingerprint,
    ingested_at: OffsetDateTime,
    election_id: i64,
    policy: DuplicatePolicy,
) -> Result<UpdateOutcome, PersistenceError> {
    validate_snapshot(records)?;

    conn.transaction::<_, PersistenceError, _>(|conn| {
        let existing: Option<Update> = find_update_by_fingerprint(conn, fingerprint)?;
        let previous: Option<DeletedUpdate> = match existing {
            Some(_) if policy == DuplicatePolicy::Skip => {
                info!(fingerprint = fingerprint.as_str(), "No change in snapshot");
                return Ok(UpdateOutcome::Unchanged(fingerprint.clone()));
            }
            Some(existing) => Some(delete_update(conn, &existing)?),
            None => None,
        };

        load_entities(conn, records, election_id)?;

        let outcome: UpdateOutcome =
            check_and_process_update(conn, records, fingerprint, ingested_at, election_id)?;
        Ok(match (previous, outcome) {
            (Some(previous), UpdateOutcome::Committed(committed)) => {
                UpdateOutcome::Replaced { previous, committed }
            }
            (_, outcome) => outcome,
        })
    })
}
