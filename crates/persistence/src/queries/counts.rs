// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row counts scoped to one election.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::diesel_schema::{ballot_responses, contests, updates, vote_tallies};
use crate::error::PersistenceError;

/// Counts the contests of an election.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_contests(conn: &mut SqliteConnection, election_id: i64) -> Result<i64, PersistenceError> {
    Ok(contests::table
        .filter(contests::election_id.eq(election_id))
        .count()
        .get_result(conn)?)
}

/// Counts the ballot responses of an election.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_ballot_responses(
    conn: &mut SqliteConnection,
    election_id: i64,
) -> Result<i64, PersistenceError> {
    Ok(ballot_responses::table
        .filter(ballot_responses::election_id.eq(election_id))
        .count()
        .get_result(conn)?)
}

/// Counts the updates of an election.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_updates(conn: &mut SqliteConnection, election_id: i64) -> Result<i64, PersistenceError> {
    Ok(updates::table
        .filter(updates::election_id.eq(election_id))
        .count()
        .get_result(conn)?)
}

/// Counts the vote tallies of every update of an election.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn count_vote_tallies(
    conn: &mut SqliteConnection,
    election_id: i64,
) -> Result<i64, PersistenceError> {
    Ok(vote_tallies::table
        .inner_join(updates::table)
        .filter(updates::election_id.eq(election_id))
        .count()
        .get_result(conn)?)
}
