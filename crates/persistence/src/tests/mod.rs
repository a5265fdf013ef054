// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod election_tests;
mod ingestion_tests;
mod initialization_tests;

use time::macros::{date, datetime};
use time::{Date, OffsetDateTime};
use votewatch_domain::{CanonicalVoteRecord, Fingerprint, JurisdictionType};

use crate::{Election, Persistence};

pub fn create_test_persistence() -> Persistence {
    Persistence::new_in_memory().expect("Failed to create in-memory persistence")
}

pub fn create_test_election_date() -> Date {
    date!(2024 - 11 - 05)
}

pub fn create_test_election(persistence: &mut Persistence) -> Election {
    persistence
        .find_or_create_election("2024 General Election", create_test_election_date())
        .expect("Failed to create election")
}

/// Election night, 8 PM Pacific, plus `minutes`.
pub fn create_test_timestamp(minutes: i64) -> OffsetDateTime {
    datetime!(2024-11-06 04:00 UTC) + time::Duration::minutes(minutes)
}

/// A deterministic fingerprint distinct for each `seed`.
pub fn create_test_fingerprint(seed: u64) -> Fingerprint {
    Fingerprint::new(format!("{seed:064x}")).expect("Valid test fingerprint")
}

pub fn create_test_record(
    ballot_title: &str,
    district: &str,
    ballot_response: &str,
    votes: i64,
    jurisdiction: JurisdictionType,
) -> CanonicalVoteRecord {
    CanonicalVoteRecord {
        district: district.to_string(),
        ballot_title: ballot_title.to_string(),
        ballot_response: ballot_response.to_string(),
        votes,
        vote_percentage: 50.0,
        party_preference: None,
        jurisdiction,
    }
}

/// Two presidential candidates and one gubernatorial candidate.
pub fn create_test_snapshot(jurisdiction: JurisdictionType) -> Vec<CanonicalVoteRecord> {
    vec![
        create_test_record("President", "Washington", "John Smith", 1000, jurisdiction),
        create_test_record("President", "Washington", "Jane Roe", 1212, jurisdiction),
        create_test_record("Governor", "State of Washington", "Bob Jones", 800, jurisdiction),
    ]
}
