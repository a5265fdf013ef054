// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::macros::date;
use votewatch_domain::JurisdictionType;

use super::{
    create_test_election, create_test_election_date, create_test_fingerprint,
    create_test_persistence, create_test_snapshot, create_test_timestamp,
};
use crate::{DuplicatePolicy, Election, Persistence, PersistenceError};

#[test]
fn test_create_election_derives_key() {
    let mut persistence: Persistence = create_test_persistence();
    let election: Election = create_test_election(&mut persistence);

    assert_eq!(election.election_key, "2024_general_election");
    assert_eq!(election.name, "2024 General Election");
    assert_eq!(election.election_date, create_test_election_date());
}

#[test]
fn test_find_or_create_election_is_idempotent() {
    let mut persistence: Persistence = create_test_persistence();
    let first: Election = create_test_election(&mut persistence);
    let second: Election = create_test_election(&mut persistence);

    assert_eq!(first, second);
    assert_eq!(persistence.list_elections().unwrap().len(), 1);
}

#[test]
fn test_same_name_on_another_date_conflicts_on_key() {
    let mut persistence: Persistence = create_test_persistence();
    create_test_election(&mut persistence);

    let result = persistence.find_or_create_election("2024 General Election", date!(2024 - 11 - 12));
    assert_eq!(
        result,
        Err(PersistenceError::ElectionKeyConflict(String::from(
            "2024_general_election"
        )))
    );
}

#[test]
fn test_list_elections_newest_first() {
    let mut persistence: Persistence = create_test_persistence();
    persistence
        .find_or_create_election("2022 General Election", date!(2022 - 11 - 08))
        .unwrap();
    persistence
        .find_or_create_election("2024 Primary Election", date!(2024 - 08 - 06))
        .unwrap();
    create_test_election(&mut persistence);

    let keys: Vec<String> = persistence
        .list_elections()
        .unwrap()
        .into_iter()
        .map(|e| e.election_key)
        .collect();
    assert_eq!(
        keys,
        vec![
            "2024_general_election",
            "2024_primary_election",
            "2022_general_election"
        ]
    );
}

#[test]
fn test_find_election_by_unknown_key() {
    let mut persistence: Persistence = create_test_persistence();
    assert_eq!(persistence.find_election_by_key("nope").unwrap(), None);
}

#[test]
fn test_delete_election_removes_everything_it_owns() {
    let mut persistence: Persistence = create_test_persistence();
    let election: Election = create_test_election(&mut persistence);
    let other: Election = persistence
        .find_or_create_election("2024 Primary Election", date!(2024 - 08 - 06))
        .unwrap();

    for (target, seed) in [(&election, 1), (&other, 2)] {
        persistence
            .ingest(
                &create_test_snapshot(JurisdictionType::State),
                &create_test_fingerprint(seed),
                create_test_timestamp(0),
                target,
                DuplicatePolicy::Skip,
            )
            .unwrap();
    }

    persistence.delete_election(election.election_id).unwrap();

    assert_eq!(persistence.count_contests(election.election_id).unwrap(), 0);
    assert_eq!(persistence.count_ballot_responses(election.election_id).unwrap(), 0);
    assert_eq!(persistence.count_updates(election.election_id).unwrap(), 0);
    assert_eq!(persistence.count_vote_tallies(election.election_id).unwrap(), 0);
    assert_eq!(persistence.update_exists(&create_test_fingerprint(1)).unwrap(), None);

    // The other election is untouched.
    assert_eq!(persistence.count_contests(other.election_id).unwrap(), 2);
    assert_eq!(persistence.count_vote_tallies(other.election_id).unwrap(), 3);
}

#[test]
fn test_delete_missing_election() {
    let mut persistence: Persistence = create_test_persistence();
    assert!(matches!(
        persistence.delete_election(42),
        Err(PersistenceError::NotFound(_))
    ));
}
