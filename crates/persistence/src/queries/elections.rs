// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;
use time::Date;

use crate::data_models::{Election, format_date, parse_date};
use crate::diesel_schema::elections;
use crate::error::PersistenceError;

/// Diesel Queryable struct for election rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = elections)]
struct ElectionRow {
    election_id: i64,
    election_key: String,
    name: String,
    election_date: String,
}

impl TryFrom<ElectionRow> for Election {
    type Error = PersistenceError;

    fn try_from(row: ElectionRow) -> Result<Self, Self::Error> {
        Ok(Self {
            election_id: row.election_id,
            election_key: row.election_key,
            name: row.name,
            election_date: parse_date(&row.election_date)?,
        })
    }
}

/// Finds an election by its display name and date.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_election(
    conn: &mut SqliteConnection,
    name: &str,
    election_date: Date,
) -> Result<Option<Election>, PersistenceError> {
    let date: String = format_date(election_date)?;
    elections::table
        .filter(elections::name.eq(name))
        .filter(elections::election_date.eq(&date))
        .select(ElectionRow::as_select())
        .first(conn)
        .optional()?
        .map(Election::try_from)
        .transpose()
}

/// Finds an election by its key.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn find_election_by_key(
    conn: &mut SqliteConnection,
    election_key: &str,
) -> Result<Option<Election>, PersistenceError> {
    elections::table
        .filter(elections::election_key.eq(election_key))
        .select(ElectionRow::as_select())
        .first(conn)
        .optional()?
        .map(Election::try_from)
        .transpose()
}

/// Retrieves an election by ID.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if no election has this ID.
pub fn get_election(
    conn: &mut SqliteConnection,
    election_id: i64,
) -> Result<Election, PersistenceError> {
    let row: ElectionRow = elections::table
        .filter(elections::election_id.eq(election_id))
        .select(ElectionRow::as_select())
        .first(conn)
        .map_err(|e| match e {
            diesel::result::Error::NotFound => {
                PersistenceError::NotFound(format!("Election {election_id}"))
            }
            other => PersistenceError::from(other),
        })?;
    Election::try_from(row)
}

/// Lists every election, newest first.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_elections(conn: &mut SqliteConnection) -> Result<Vec<Election>, PersistenceError> {
    elections::table
        .order((elections::election_date.desc(), elections::election_id.desc()))
        .select(ElectionRow::as_select())
        .load(conn)?
        .into_iter()
        .map(Election::try_from)
        .collect()
}
