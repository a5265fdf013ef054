// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Update, vote tally and standings queries.

use std::collections::{BTreeSet, HashMap};

use diesel::SqliteConnection;
use diesel::prelude::*;
use votewatch_domain::{Fingerprint, JurisdictionType};

use crate::data_models::{BallotResponse, Standing, Update, VoteTally, parse_timestamp};
use crate::diesel_schema::{updates, vote_tallies};
use crate::error::PersistenceError;
use crate::queries::entities::list_ballot_responses;

/// Diesel Queryable struct for update rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = updates)]
struct UpdateRow {
    update_id: i64,
    election_id: i64,
    fingerprint: String,
    jurisdiction_type: String,
    ingested_at: String,
}

impl TryFrom<UpdateRow> for Update {
    type Error = PersistenceError;

    fn try_from(row: UpdateRow) -> Result<Self, Self::Error> {
        Ok(Self {
            update_id: row.update_id,
            election_id: row.election_id,
            fingerprint: Fingerprint::new(row.fingerprint)?,
            jurisdiction: row.jurisdiction_type.parse()?,
            ingested_at: parse_timestamp(&row.ingested_at)?,
        })
    }
}

/// Diesel Queryable struct for vote tally rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = vote_tallies)]
struct VoteTallyRow {
    vote_tally_id: i64,
    update_id: i64,
    ballot_response_id: i64,
    contest_id: i64,
    votes: i64,
    vote_percentage: f64,
}

impl From<VoteTallyRow> for VoteTally {
    fn from(row: VoteTallyRow) -> Self {
        Self {
            vote_tally_id: row.vote_tally_id,
            update_id: row.update_id,
            ballot_response_id: row.ballot_response_id,
            contest_id: row.contest_id,
            votes: row.votes,
            vote_percentage: row.vote_percentage,
        }
    }
}

/// Finds the update committed with this fingerprint, in any election.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row cannot be decoded.
pub fn find_update_by_fingerprint(
    conn: &mut SqliteConnection,
    fingerprint: &Fingerprint,
) -> Result<Option<Update>, PersistenceError> {
    updates::table
        .filter(updates::fingerprint.eq(fingerprint.as_str()))
        .select(UpdateRow::as_select())
        .first(conn)
        .optional()?
        .map(Update::try_from)
        .transpose()
}

/// Lists the updates of an election, most recently ingested first.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row cannot be decoded.
pub fn list_updates(
    conn: &mut SqliteConnection,
    election_id: i64,
) -> Result<Vec<Update>, PersistenceError> {
    updates::table
        .filter(updates::election_id.eq(election_id))
        .order((updates::ingested_at.desc(), updates::update_id.desc()))
        .select(UpdateRow::as_select())
        .load(conn)?
        .into_iter()
        .map(Update::try_from)
        .collect()
}

/// Lists the tallies recorded by one update.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_vote_tallies_for_update(
    conn: &mut SqliteConnection,
    update_id: i64,
) -> Result<Vec<VoteTally>, PersistenceError> {
    Ok(vote_tallies::table
        .filter(vote_tallies::update_id.eq(update_id))
        .order(vote_tallies::vote_tally_id.asc())
        .select(VoteTallyRow::as_select())
        .load(conn)?
        .into_iter()
        .map(VoteTally::from)
        .collect())
}

/// Returns each ballot response of a contest with its most recent count in
/// one jurisdiction's series.
///
/// The count comes from the latest update of `jurisdiction` (by ingest time)
/// that reports the response; updates of the other jurisdiction are ignored.
/// Responses no such update reports have zero votes. Sorted by votes,
/// highest first, then by name.
///
/// # Errors
///
/// Returns an error if a database query fails.
pub fn latest_standings(
    conn: &mut SqliteConnection,
    contest_id: i64,
    jurisdiction: JurisdictionType,
) -> Result<Vec<Standing>, PersistenceError> {
    let tallies: Vec<VoteTallyRow> = vote_tallies::table
        .inner_join(updates::table)
        .filter(vote_tallies::contest_id.eq(contest_id))
        .filter(updates::jurisdiction_type.eq(jurisdiction.as_str()))
        .order((
            updates::ingested_at.desc(),
            updates::update_id.desc(),
            vote_tallies::vote_tally_id.asc(),
        ))
        .select(VoteTallyRow::as_select())
        .load(conn)?;

    let mut latest: HashMap<i64, VoteTallyRow> = HashMap::new();
    for tally in tallies {
        latest.entry(tally.ballot_response_id).or_insert(tally);
    }

    let responses: Vec<BallotResponse> = list_ballot_responses(conn, contest_id)?;
    let mut standings: Vec<Standing> = responses
        .into_iter()
        .map(|ballot_response| match latest.remove(&ballot_response.ballot_response_id) {
            Some(tally) => Standing {
                ballot_response,
                votes: tally.votes,
                vote_percentage: tally.vote_percentage,
                update_id: Some(tally.update_id),
            },
            None => Standing {
                ballot_response,
                votes: 0,
                vote_percentage: 0.0,
                update_id: None,
            },
        })
        .collect();

    standings.sort_by(|a, b| {
        b.votes
            .cmp(&a.votes)
            .then_with(|| a.ballot_response.name.cmp(&b.ballot_response.name))
    });

    Ok(standings)
}

/// Returns the distinct contests an update recorded tallies for.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn contest_ids_for_update(
    conn: &mut SqliteConnection,
    update_id: i64,
) -> Result<Vec<i64>, PersistenceError> {
    Ok(vote_tallies::table
        .filter(vote_tallies::update_id.eq(update_id))
        .select(vote_tallies::contest_id)
        .distinct()
        .order(vote_tallies::contest_id.asc())
        .load(conn)?)
}

/// Returns the jurisdictions of the updates that still hold tallies for a contest.
///
/// # Errors
///
/// Returns an error if the query fails or a stored tag is unknown.
pub fn reporting_jurisdictions(
    conn: &mut SqliteConnection,
    contest_id: i64,
) -> Result<BTreeSet<JurisdictionType>, PersistenceError> {
    let tags: Vec<String> = vote_tallies::table
        .inner_join(updates::table)
        .filter(vote_tallies::contest_id.eq(contest_id))
        .select(updates::jurisdiction_type)
        .distinct()
        .load(conn)?;

    tags.iter()
        .map(|tag| tag.parse::<JurisdictionType>().map_err(PersistenceError::from))
        .collect()
}
