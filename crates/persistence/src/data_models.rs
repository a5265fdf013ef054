// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};
use votewatch_domain::{Fingerprint, JurisdictionType};

use crate::diesel_schema::vote_tallies;

/// An election: the root every other row belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Election {
    pub election_id: i64,
    pub election_key: String,
    pub name: String,
    pub election_date: Date,
}

/// A race or measure within an election.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contest {
    pub contest_id: i64,
    pub election_id: i64,
    pub ballot_title: String,
    pub district: String,
    pub contest_key: String,
    /// Jurisdictions this contest has been reported under, first-reported first.
    pub jurisdictions: Vec<JurisdictionType>,
}

/// A candidate or choice within a contest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BallotResponse {
    pub ballot_response_id: i64,
    pub election_id: i64,
    pub contest_id: i64,
    pub name: String,
    pub party: Option<String>,
}

/// One committed snapshot version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub election_id: i64,
    pub fingerprint: Fingerprint,
    pub jurisdiction: JurisdictionType,
    pub ingested_at: OffsetDateTime,
}

/// The count for one ballot response within one update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteTally {
    pub vote_tally_id: i64,
    pub update_id: i64,
    pub ballot_response_id: i64,
    pub contest_id: i64,
    pub votes: i64,
    pub vote_percentage: f64,
}

/// Insertable vote tally row.
#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = vote_tallies)]
pub struct NewVoteTally {
    pub update_id: i64,
    pub ballot_response_id: i64,
    pub contest_id: i64,
    pub votes: i64,
    pub vote_percentage: f64,
}

/// A ballot response with its count from the most recent update that reported it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Standing {
    pub ballot_response: BallotResponse,
    pub votes: i64,
    pub vote_percentage: f64,
    /// The update the count came from; `None` if no update reports this response.
    pub update_id: Option<i64>,
}

/// Result of registering a snapshot's contests and ballot responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub records_seen: usize,
    pub contests_created: usize,
    pub ballot_responses_created: usize,
}

/// Result of committing one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommittedUpdate {
    pub update: Update,
    pub tallies_inserted: usize,
    /// Contests that gained this update's jurisdiction tag.
    pub contests_tagged: usize,
}

/// Result of deleting one update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletedUpdate {
    pub update_id: i64,
    pub fingerprint: Fingerprint,
    pub tallies_deleted: usize,
    /// Contests whose jurisdiction tags changed.
    pub contests_retagged: usize,
}

/// What happens when a snapshot's fingerprint is already committed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Leave the committed update in place.
    #[default]
    Skip,
    /// Delete the committed update and commit the snapshot again.
    Overwrite,
}

/// Outcome of ingesting one snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The snapshot was new and is now committed.
    Committed(CommittedUpdate),
    /// A prior update with the same fingerprint was deleted and the snapshot committed again.
    Replaced {
        previous: DeletedUpdate,
        committed: CommittedUpdate,
    },
    /// An update with the same fingerprint already exists; nothing was written.
    Unchanged(Fingerprint),
}

impl UpdateOutcome {
    /// Returns the committed update, if the outcome wrote one.
    #[must_use]
    pub const fn committed(&self) -> Option<&CommittedUpdate> {
        match self {
            Self::Committed(committed) | Self::Replaced { committed, .. } => Some(committed),
            Self::Unchanged(_) => None,
        }
    }
}

const DATE_FORMAT: &[time::format_description::BorrowedFormatItem<'_>] =
    time::macros::format_description!("[year]-[month]-[day]");

/// Formats an election date as stored (`YYYY-MM-DD`).
pub(crate) fn format_date(date: Date) -> Result<String, time::error::Format> {
    date.format(DATE_FORMAT)
}

pub(crate) fn parse_date(value: &str) -> Result<Date, time::error::Parse> {
    Date::parse(value, DATE_FORMAT)
}

/// Formats a timestamp as stored: RFC 3339 in UTC, so text order is time order.
pub(crate) fn format_timestamp(timestamp: OffsetDateTime) -> Result<String, time::error::Format> {
    timestamp
        .to_offset(time::UtcOffset::UTC)
        .format(&time::format_description::well_known::Rfc3339)
}

pub(crate) fn parse_timestamp(value: &str) -> Result<OffsetDateTime, time::error::Parse> {
    OffsetDateTime::parse(value, &time::format_description::well_known::Rfc3339)
}
