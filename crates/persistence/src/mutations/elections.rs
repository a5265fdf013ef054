// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use time::Date;
use tracing::info;
use votewatch_domain::election_key;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::data_models::{Election, format_date};
use crate::diesel_schema::{elections, updates, vote_tallies};
use crate::error::{PersistenceError, is_unique_violation};
use crate::queries::elections::{find_election, get_election};

/// Returns the election with this name and date, creating it if needed.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `name` - The display name, e.g. `2024 General Election`
/// * `election_date` - Election day
///
/// # Errors
///
/// Returns an error if:
/// - Another election already derives the same key from its name
/// - The database operation fails
pub fn find_or_create_election(
    conn: &mut SqliteConnection,
    name: &str,
    election_date: Date,
) -> Result<Election, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        if let Some(existing) = find_election(conn, name, election_date)? {
            return Ok(existing);
        }

        let key: String = election_key(name);
        let date: String = format_date(election_date)?;

        diesel::insert_into(elections::table)
            .values((
                elections::election_key.eq(&key),
                elections::name.eq(name),
                elections::election_date.eq(&date),
            ))
            .execute(conn)
            .map_err(|e| {
                if is_unique_violation(&e) {
                    PersistenceError::ElectionKeyConflict(key.clone())
                } else {
                    PersistenceError::from(e)
                }
            })?;

        let election_id: i64 = get_last_insert_rowid(conn)?;
        info!(election_id, election_key = %key, %election_date, "Created election");

        Ok(Election {
            election_id,
            election_key: key,
            name: name.to_string(),
            election_date,
        })
    })
}

/// Deletes an election and everything it owns.
///
/// Vote tallies are removed first because updates do not cascade to them.
/// The remaining rows go through the storage cascade.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the election does not exist, or an
/// error if the database operation fails.
pub fn delete_election(
    conn: &mut SqliteConnection,
    election_id: i64,
) -> Result<Election, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let election: Election = get_election(conn, election_id)?;

        let election_updates = updates::table
            .filter(updates::election_id.eq(election_id))
            .select(updates::update_id);
        let tallies_deleted: usize = diesel::delete(
            vote_tallies::table.filter(vote_tallies::update_id.eq_any(election_updates)),
        )
        .execute(conn)?;

        diesel::delete(elections::table.filter(elections::election_id.eq(election_id)))
            .execute(conn)?;

        info!(
            election_id,
            election_key = %election.election_key,
            tallies_deleted,
            "Deleted election"
        );
        Ok(election)
    })
}
