// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for votewatch.
//!
//! Stores every accepted results snapshot as an immutable, timestamped
//! update. Built on Diesel over `SQLite` with embedded migrations.
//!
//! ## Versioning
//!
//! - A snapshot is identified by the SHA-256 of its bytes. Committing the same
//!   bytes twice creates nothing the second time.
//! - Vote tallies are never modified. A newer count arrives as a newer update.
//! - Each commit is one transaction: the update and all of its tallies land
//!   together or not at all.
//!
//! ## Ownership
//!
//! Elections own contests, ballot responses and updates. Deleting an update
//! removes exactly its tallies; contests and ballot responses stay registered.
//!
//! ## Testing
//!
//! Tests run against a fresh shared in-memory database per test.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::{Date, OffsetDateTime};
use votewatch_domain::{CanonicalVoteRecord, Fingerprint, JurisdictionType};

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod resolution;

#[cfg(test)]
mod tests;

pub use data_models::{
    BallotResponse, CommittedUpdate, Contest, DeletedUpdate, DuplicatePolicy, Election,
    LoadSummary, NewVoteTally, Standing, Update, UpdateOutcome, VoteTally,
};
pub use error::PersistenceError;
pub use mutations::updates::TALLY_BATCH_SIZE;
pub use resolution::{EntityIndex, ResolvedRecord};

/// Persistence adapter for elections and their versioned vote counts.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique shared in-memory database, so tests are
    /// isolated from one another.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String =
            format!("file:memdb_votewatch_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Elections
    // ========================================================================

    /// Returns the election with this name and date, creating it if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if another election already uses the derived key or
    /// the database operation fails.
    pub fn find_or_create_election(
        &mut self,
        name: &str,
        election_date: Date,
    ) -> Result<Election, PersistenceError> {
        mutations::elections::find_or_create_election(&mut self.conn, name, election_date)
    }

    /// Deletes an election and everything it owns.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the election does not exist.
    pub fn delete_election(&mut self, election_id: i64) -> Result<Election, PersistenceError> {
        mutations::elections::delete_election(&mut self.conn, election_id)
    }

    /// Lists every election, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_elections(&mut self) -> Result<Vec<Election>, PersistenceError> {
        queries::elections::list_elections(&mut self.conn)
    }

    /// Finds an election by its key.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn find_election_by_key(
        &mut self,
        election_key: &str,
    ) -> Result<Option<Election>, PersistenceError> {
        queries::elections::find_election_by_key(&mut self.conn, election_key)
    }

    // ========================================================================
    // Ingestion
    // ========================================================================

    /// Registers every contest and ballot response a snapshot mentions.
    ///
    /// # Errors
    ///
    /// Returns an error if the database operation fails; nothing is written.
    pub fn load_entities(
        &mut self,
        records: &[CanonicalVoteRecord],
        election: &Election,
    ) -> Result<LoadSummary, PersistenceError> {
        mutations::entities::load_entities(&mut self.conn, records, election.election_id)
    }

    /// Commits a snapshot as a new update in one transaction.
    ///
    /// # Arguments
    ///
    /// * `records` - The snapshot's canonical records
    /// * `fingerprint` - The snapshot's content fingerprint
    /// * `ingested_at` - When the snapshot was captured
    /// * `election` - The election the update belongs to
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The snapshot is empty or mixes jurisdictions
    /// - The fingerprint is already committed
    /// - A record's contest or candidate is not registered
    /// - The database operation fails
    pub fn commit_update(
        &mut self,
        records: &[CanonicalVoteRecord],
        fingerprint: &Fingerprint,
        ingested_at: OffsetDateTime,
        election: &Election,
    ) -> Result<CommittedUpdate, PersistenceError> {
        mutations::updates::commit_update(
            &mut self.conn,
            records,
            fingerprint,
            ingested_at,
            election.election_id,
        )
    }

    /// Commits a snapshot unless its fingerprint is already committed.
    ///
    /// # Errors
    ///
    /// Returns any error of [`Self::commit_update`] except a duplicate
    /// fingerprint, which yields [`UpdateOutcome::Unchanged`].
    pub fn check_and_process_update(
        &mut self,
        records: &[CanonicalVoteRecord],
        fingerprint: &Fingerprint,
        ingested_at: OffsetDateTime,
        election: &Election,
    ) -> Result<UpdateOutcome, PersistenceError> {
        mutations::updates::check_and_process_update(
            &mut self.conn,
            records,
            fingerprint,
            ingested_at,
            election.election_id,
        )
    }

    /// Returns the update committed with this fingerprint, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn update_exists(
        &mut self,
        fingerprint: &Fingerprint,
    ) -> Result<Option<Update>, PersistenceError> {
        queries::updates::find_update_by_fingerprint(&mut self.conn, fingerprint)
    }

    /// Deletes an update and exactly its tallies.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the update does not exist.
    pub fn delete_update(&mut self, update: &Update) -> Result<DeletedUpdate, PersistenceError> {
        mutations::updates::delete_update(&mut self.conn, update)
    }

    /// Runs the full ingest flow for one snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if validation, resolution or any database operation
    /// fails; nothing is written.
    pub fn ingest(
        &mut self,
        records: &[CanonicalVoteRecord],
        fingerprint: &Fingerprint,
        ingested_at: OffsetDateTime,
        election: &Election,
        policy: DuplicatePolicy,
    ) -> Result<UpdateOutcome, PersistenceError> {
        mutations::updates::ingest_snapshot(
            &mut self.conn,
            records,
            fingerprint,
            ingested_at,
            election.election_id,
            policy,
        )
    }

    // ========================================================================
    // Readers
    // ========================================================================

    /// Lists the contests of an election.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_contests(&mut self, election_id: i64) -> Result<Vec<Contest>, PersistenceError> {
        queries::entities::list_contests(&mut self.conn, election_id)
    }

    /// Finds a contest by key within an election.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn find_contest_by_key(
        &mut self,
        election_id: i64,
        contest_key: &str,
    ) -> Result<Option<Contest>, PersistenceError> {
        queries::entities::find_contest_by_key(&mut self.conn, election_id, contest_key)
    }

    /// Lists the ballot responses of a contest.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_ballot_responses(
        &mut self,
        contest_id: i64,
    ) -> Result<Vec<BallotResponse>, PersistenceError> {
        queries::entities::list_ballot_responses(&mut self.conn, contest_id)
    }

    /// Lists the updates of an election, most recent first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_updates(&mut self, election_id: i64) -> Result<Vec<Update>, PersistenceError> {
        queries::updates::list_updates(&mut self.conn, election_id)
    }

    /// Lists the tallies recorded by one update.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn list_vote_tallies_for_update(
        &mut self,
        update_id: i64,
    ) -> Result<Vec<VoteTally>, PersistenceError> {
        queries::updates::list_vote_tallies_for_update(&mut self.conn, update_id)
    }

    /// Returns each ballot response of a contest with its latest count in
    /// the given jurisdiction's series.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn latest_standings(
        &mut self,
        contest_id: i64,
        jurisdiction: JurisdictionType,
    ) -> Result<Vec<Standing>, PersistenceError> {
        queries::updates::latest_standings(&mut self.conn, contest_id, jurisdiction)
    }

    /// Counts the contests of an election.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_contests(&mut self, election_id: i64) -> Result<i64, PersistenceError> {
        queries::counts::count_contests(&mut self.conn, election_id)
    }

    /// Counts the ballot responses of an election.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_ballot_responses(&mut self, election_id: i64) -> Result<i64, PersistenceError> {
        queries::counts::count_ballot_responses(&mut self.conn, election_id)
    }

    /// Counts the updates of an election.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_updates(&mut self, election_id: i64) -> Result<i64, PersistenceError> {
        queries::counts::count_updates(&mut self.conn, election_id)
    }

    /// Counts the vote tallies of an election.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub fn count_vote_tallies(&mut self, election_id: i64) -> Result<i64, PersistenceError> {
        queries::counts::count_vote_tallies(&mut self.conn, election_id)
    }
}
