// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Contest and ballot response queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use votewatch_domain::JurisdictionType;

use crate::data_models::{BallotResponse, Contest};
use crate::diesel_schema::{ballot_responses, contests};
use crate::error::PersistenceError;

/// Diesel Queryable struct for contest rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = contests)]
struct ContestRow {
    contest_id: i64,
    election_id: i64,
    ballot_title: String,
    district: String,
    contest_key: String,
    jurisdictions: String,
}

impl TryFrom<ContestRow> for Contest {
    type Error = PersistenceError;

    fn try_from(row: ContestRow) -> Result<Self, Self::Error> {
        let jurisdictions: Vec<JurisdictionType> = serde_json::from_str(&row.jurisdictions)?;
        Ok(Self {
            contest_id: row.contest_id,
            election_id: row.election_id,
            ballot_title: row.ballot_title,
            district: row.district,
            contest_key: row.contest_key,
            jurisdictions,
        })
    }
}

/// Diesel Queryable struct for ballot response rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = ballot_responses)]
struct BallotResponseRow {
    ballot_response_id: i64,
    election_id: i64,
    contest_id: i64,
    name: String,
    party: Option<String>,
}

impl From<BallotResponseRow> for BallotResponse {
    fn from(row: BallotResponseRow) -> Self {
        Self {
            ballot_response_id: row.ballot_response_id,
            election_id: row.election_id,
            contest_id: row.contest_id,
            name: row.name,
            party: row.party,
        }
    }
}

/// Lists the contests of an election, ordered by title then district.
///
/// # Errors
///
/// Returns an error if the query fails or a tag list cannot be decoded.
pub fn list_contests(
    conn: &mut SqliteConnection,
    election_id: i64,
) -> Result<Vec<Contest>, PersistenceError> {
    contests::table
        .filter(contests::election_id.eq(election_id))
        .order((contests::ballot_title.asc(), contests::district.asc()))
        .select(ContestRow::as_select())
        .load(conn)?
        .into_iter()
        .map(Contest::try_from)
        .collect()
}

/// Finds a contest by its key within an election.
///
/// # Errors
///
/// Returns an error if the query fails or the tag list cannot be decoded.
pub fn find_contest_by_key(
    conn: &mut SqliteConnection,
    election_id: i64,
    contest_key: &str,
) -> Result<Option<Contest>, PersistenceError> {
    contests::table
        .filter(contests::election_id.eq(election_id))
        .filter(contests::contest_key.eq(contest_key))
        .select(ContestRow::as_select())
        .first(conn)
        .optional()?
        .map(Contest::try_from)
        .transpose()
}

/// Retrieves a contest by ID.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no contest has this ID.
pub fn get_contest(conn: &mut SqliteConnection, contest_id: i64) -> Result<Contest, PersistenceError> {
    let row: ContestRow = contests::table
        .filter(contests::contest_id.eq(contest_id))
        .select(ContestRow::as_select())
        .first(conn)
        .map_err(|e| match e {
            diesel::result::Error::NotFound => {
                PersistenceError::NotFound(format!("Contest {contest_id}"))
            }
            other => PersistenceError::from(other),
        })?;
    Contest::try_from(row)
}

/// Lists the ballot responses of a contest, ordered by name.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_ballot_responses(
    conn: &mut SqliteConnection,
    contest_id: i64,
) -> Result<Vec<BallotResponse>, PersistenceError> {
    Ok(ballot_responses::table
        .filter(ballot_responses::contest_id.eq(contest_id))
        .order(ballot_responses::name.asc())
        .select(BallotResponseRow::as_select())
        .load(conn)?
        .into_iter()
        .map(BallotResponse::from)
        .collect())
}

/// Lists every ballot response of an election.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_election_ballot_responses(
    conn: &mut SqliteConnection,
    election_id: i64,
) -> Result<Vec<BallotResponse>, PersistenceError> {
    Ok(ballot_responses::table
        .filter(ballot_responses::election_id.eq(election_id))
        .select(BallotResponseRow::as_select())
        .load(conn)?
        .into_iter()
        .map(BallotResponse::from)
        .collect())
}
