// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Entity resolution.
//!
//! An [`EntityIndex`] holds every contest and ballot response of one election,
//! keyed by contest key and candidate key. It is built inside the commit
//! transaction and dropped with it.

use std::collections::HashMap;

use diesel::SqliteConnection;
use votewatch_domain::{CanonicalVoteRecord, candidate_key};

use crate::data_models::{BallotResponse, Contest, NewVoteTally};
use crate::error::PersistenceError;
use crate::queries::entities::{list_contests, list_election_ballot_responses};

/// Contest and ballot response IDs a record resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRecord {
    pub contest_id: i64,
    pub ballot_response_id: i64,
}

/// Lookup maps for one election's contests and ballot responses.
#[derive(Debug, Default)]
pub struct EntityIndex {
    contests: HashMap<String, Contest>,
    ballot_responses: HashMap<String, i64>,
}

impl EntityIndex {
    /// Builds an index from already-loaded rows.
    #[must_use]
    pub fn new(contests: Vec<Contest>, ballot_responses: &[BallotResponse]) -> Self {
        Self {
            ballot_responses: ballot_responses
                .iter()
                .map(|r| (candidate_key(r.contest_id, &r.name), r.ballot_response_id))
                .collect(),
            contests: contests
                .into_iter()
                .map(|c| (c.contest_key.clone(), c))
                .collect(),
        }
    }

    /// Loads the index for an election.
    ///
    /// # Errors
    ///
    /// Returns an error if a database query fails.
    pub fn load(conn: &mut SqliteConnection, election_id: i64) -> Result<Self, PersistenceError> {
        let contests: Vec<Contest> = list_contests(conn, election_id)?;
        let ballot_responses: Vec<BallotResponse> =
            list_election_ballot_responses(conn, election_id)?;
        Ok(Self::new(contests, &ballot_responses))
    }

    /// Looks up a contest by key.
    #[must_use]
    pub fn contest(&self, contest_key: &str) -> Option<&Contest> {
        self.contests.get(contest_key)
    }

    /// Iterates over the indexed contests.
    pub fn contests(&self) -> impl Iterator<Item = &Contest> {
        self.contests.values()
    }

    /// Returns `true` if a ballot response with this candidate key is indexed.
    #[must_use]
    pub fn contains_candidate(&self, candidate_key: &str) -> bool {
        self.ballot_responses.contains_key(candidate_key)
    }

    /// Adds a newly created contest.
    pub fn register_contest(&mut self, contest: Contest) {
        self.contests.insert(contest.contest_key.clone(), contest);
    }

    /// Adds a newly created ballot response.
    pub fn register_ballot_response(&mut self, ballot_response: &BallotResponse) {
        self.ballot_responses.insert(
            candidate_key(ballot_response.contest_id, &ballot_response.name),
            ballot_response.ballot_response_id,
        );
    }

    /// Resolves a record to its contest and ballot response IDs.
    ///
    /// # Errors
    ///
    /// Returns `ContestNotFound` or `CandidateNotFound` if the record's
    /// entities are not registered.
    pub fn resolve(&self, record: &CanonicalVoteRecord) -> Result<ResolvedRecord, PersistenceError> {
        let contest_key: String = record.contest_key();
        let contest: &Contest = self
            .contests
            .get(&contest_key)
            .ok_or(PersistenceError::ContestNotFound { contest_key })?;

        let candidate_key: String = candidate_key(contest.contest_id, &record.ballot_response);
        let ballot_response_id: i64 = *self
            .ballot_responses
            .get(&candidate_key)
            .ok_or(PersistenceError::CandidateNotFound { candidate_key })?;

        Ok(ResolvedRecord {
            contest_id: contest.contest_id,
            ballot_response_id,
        })
    }

    /// Resolves every record into a tally row for `update_id`.
    ///
    /// # Errors
    ///
    /// Returns the first resolution failure.
    pub fn tallies_for(
        &self,
        update_id: i64,
        records: &[CanonicalVoteRecord],
    ) -> Result<Vec<NewVoteTally>, PersistenceError> {
        records
            .iter()
            .map(|record| {
                let resolved: ResolvedRecord = self.resolve(record)?;
                Ok(NewVoteTally {
                    update_id,
                    ballot_response_id: resolved.ballot_response_id,
                    contest_id: resolved.contest_id,
                    votes: record.votes,
                    vote_percentage: record.vote_percentage,
                })
            })
            .collect()
    }
}
