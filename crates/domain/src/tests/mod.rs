// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]


use crate::{CanonicalVoteRecord, JurisdictionType};

pub fn create_test_record(
    ballot_title: &str,
    ballot_response: &str,
    jurisdiction: JurisdictionType,
) -> CanonicalVoteRecord {
    CanonicalVoteRecord {
        district: String::from("State of Washington"),
        ballot_title: ballot_title.to_string(),
        ballot_response: ballot_response.to_string(),
        votes: 100,
        vote_percentage: 50.0,
        party_preference: None,
        jurisdiction,
    }
}
