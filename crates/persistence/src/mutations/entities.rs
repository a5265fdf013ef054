// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Contest and ballot response registration.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::debug;
use votewatch_domain::{CanonicalVoteRecord, candidate_key};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{BallotResponse, Contest, LoadSummary};
use crate::diesel_schema::{ballot_responses, contests};
use crate::error::PersistenceError;
use crate::resolution::EntityIndex;

fn insert_contest(
    conn: &mut SqliteConnection,
    election_id: i64,
    record: &CanonicalVoteRecord,
    contest_key: String,
) -> Result<Contest, PersistenceError> {
    diesel::insert_into(contests::table)
        .values((
            contests::election_id.eq(election_id),
            contests::ballot_title.eq(&record.ballot_title),
            contests::district.eq(&record.district),
            contests::contest_key.eq(&contest_key),
        ))
        .execute(conn)?;

    let contest_id: i64 = get_last_insert_rowid(conn)?;
    debug!(election_id, contest_id, contest_key = %contest_key, "Created contest");

    Ok(Contest {
        contest_id,
        election_id,
        ballot_title: record.ballot_title.clone(),
        district: record.district.clone(),
        contest_key,
        jurisdictions: Vec::new(),
    })
}

fn insert_ballot_response(
    conn: &mut SqliteConnection,
    election_id: i64,
    contest_id: i64,
    record: &CanonicalVoteRecord,
) -> Result<BallotResponse, PersistenceError> {
    diesel::insert_into(ballot_responses::table)
        .values((
            ballot_responses::election_id.eq(election_id),
            ballot_responses::contest_id.eq(contest_id),
            ballot_responses::name.eq(&record.ballot_response),
            ballot_responses::party.eq(record.party_preference.as_deref()),
        ))
        .execute(conn)?;

    let ballot_response_id: i64 = get_last_insert_rowid(conn)?;
    debug!(
        contest_id,
        ballot_response_id,
        name = %record.ballot_response,
        "Created ballot response"
    );

    Ok(BallotResponse {
        ballot_response_id,
        election_id,
        contest_id,
        name: record.ballot_response.clone(),
        party: record.party_preference.clone(),
    })
}

/// Registers every contest and ballot response a snapshot mentions.
///
/// Existing rows are left untouched, including their party. Running this
/// twice on the same records creates nothing the second time.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `records` - The snapshot's canonical records
/// * `election_id` - The election that owns the entities
///
/// # Errors
///
/// Returns an error if any database operation fails; nothing is written.
pub fn load_entities(
    conn: &mut SqliteConnection,
    records: &[CanonicalVoteRecord],
    election_id: i64,
) -> Result<LoadSummary, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let mut index: EntityIndex = EntityIndex::load(conn, election_id)?;
        let mut summary: LoadSummary = LoadSummary {
            records_seen: records.len(),
            ..LoadSummary::default()
        };

        for record in records {
            let contest_key: String = record.contest_key();
            let contest_id: i64 = if let Some(contest) = index.contest(&contest_key) {
                contest.contest_id
            } else {
                let contest: Contest = insert_contest(conn, election_id, record, contest_key)?;
                let contest_id: i64 = contest.contest_id;
                index.register_contest(contest);
                summary.contests_created += 1;
                contest_id
            };

            if !index.contains_candidate(&candidate_key(contest_id, &record.ballot_response)) {
                let ballot_response: BallotResponse =
                    insert_ballot_response(conn, election_id, contest_id, record)?;
                index.register_ballot_response(&ballot_response);
                summary.ballot_responses_created += 1;
            }
        }

        debug!(
            election_id,
            records_seen = summary.records_seen,
            contests_created = summary.contests_created,
            ballot_responses_created = summary.ballot_responses_created,
            "Loaded snapshot entities"
        );
        Ok(summary)
    })
}
