// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Snapshot ingestion: idempotence, atomicity and entity reconciliation.

use votewatch_domain::{CanonicalVoteRecord, DomainError, JurisdictionType};

use super::{
    create_test_election, create_test_fingerprint, create_test_persistence, create_test_record,
    create_test_snapshot, create_test_timestamp,
};
use crate::{
    CommittedUpdate, Contest, DuplicatePolicy, Election, LoadSummary, Persistence,
    PersistenceError, TALLY_BATCH_SIZE, UpdateOutcome, VoteTally,
};

fn ingest(
    persistence: &mut Persistence,
    election: &Election,
    records: &[CanonicalVoteRecord],
    seed: u64,
) -> UpdateOutcome {
    persistence
        .ingest(
            records,
            &create_test_fingerprint(seed),
            create_test_timestamp(i64::try_from(seed).unwrap()),
            election,
            DuplicatePolicy::Skip,
        )
        .unwrap()
}

#[test]
fn test_ingest_commits_new_snapshot() {
    let mut persistence: Persistence = create_test_persistence();
    let election: Election = create_test_election(&mut persistence);

    let outcome: UpdateOutcome =
        ingest(&mut persistence, &election, &create_test_snapshot(JurisdictionType::State), 1);

    let committed: &CommittedUpdate = outcome.committed().unwrap();
    assert_eq!(committed.tallies_inserted, 3);
    assert_eq!(committed.contests_tagged, 2);
    assert_eq!(committed.update.jurisdiction, JurisdictionType::State);
    assert_eq!(committed.update.fingerprint, create_test_fingerprint(1));
    assert_eq!(persistence.count_contests(election.election_id).unwrap(), 2);
    assert_eq!(persistence.count_ballot_responses(election.election_id).unwrap(), 3);
}

#[test]
fn test_reingesting_identical_snapshot_creates_nothing() {
    let mut persistence: Persistence = create_test_persistence();
    let election: Election = create_test_election(&mut persistence);
    let records: Vec<CanonicalVoteRecord> = create_test_snapshot(JurisdictionType::State);

    ingest(&mut persistence, &election, &records, 1);
    let second: UpdateOutcome = ingest(&mut persistence, &election, &records, 1);

    assert_eq!(second, UpdateOutcome::Unchanged(create_test_fingerprint(1)));
    assert_eq!(persistence.count_updates(election.election_id).unwrap(), 1);
    assert_eq!(persistence.count_vote_tallies(election.election_id).unwrap(), 3);
    assert_eq!(persistence.count_contests(election.election_id).unwrap(), 2);
    assert_eq!(persistence.count_ballot_responses(election.election_id).unwrap(), 3);
}

#[test]
fn test_changed_snapshot_creates_new_update_and_keeps_old_tallies() {
    let mut persistence: Persistence = create_test_persistence();
    let election: Election = create_test_election(&mut persistence);
    let mut records: Vec<CanonicalVoteRecord> = create_test_snapshot(JurisdictionType::State);

    let first: UpdateOutcome = ingest(&mut persistence, &election, &records, 1);
    records[0].votes = 1050;
    let second: UpdateOutcome = ingest(&mut persistence, &election, &records, 2);

    let first_id: i64 = first.committed().unwrap().update.update_id;
    let second_id: i64 = second.committed().unwrap().update.update_id;
    assert_ne!(first_id, second_id);
    assert_eq!(persistence.count_updates(election.election_id).unwrap(), 2);

    let first_tallies: Vec<VoteTally> = persistence.list_vote_tallies_for_update(first_id).unwrap();
    let second_tallies: Vec<VoteTally> =
        persistence.list_vote_tallies_for_update(second_id).unwrap();
    assert_eq!(first_tallies[0].votes, 1000);
    assert_eq!(second_tallies[0].votes, 1050);
    assert_eq!(first_tallies[0].ballot_response_id, second_tallies[0].ballot_response_id);
}

#[test]
fn test_commit_duplicate_fingerprint_is_rejected() {
    let mut persistence: Persistence = create_test_persistence();
    let election: Election = create_test_election(&mut persistence);
    let records: Vec<CanonicalVoteRecord> = create_test_snapshot(JurisdictionType::State);
    persistence.load_entities(&records, &election).unwrap();

    persistence
        .commit_update(
            &records,
            &create_test_fingerprint(1),
            create_test_timestamp(0),
            &election,
        )
        .unwrap();
    let result: Result<CommittedUpdate, PersistenceError> = persistence.commit_update(
        &records,
        &create_test_fingerprint(1),
        create_test_timestamp(5),
        &election,
    );

    assert_eq!(
        result,
        Err(PersistenceError::DuplicateFingerprint(
            create_test_fingerprint(1).to_string()
        ))
    );
    assert_eq!(persistence.count_vote_tallies(election.election_id).unwrap(), 3);
}

#[test]
fn test_check_and_process_reports_existing_fingerprint_unchanged() {
    let mut persistence: Persistence = create_test_persistence();
    let election: Election = create_test_election(&mut persistence);
    let records: Vec<CanonicalVoteRecord> = create_test_snapshot(JurisdictionType::County);
    persistence.load_entities(&records, &election).unwrap();

    let fingerprint = create_test_fingerprint(9);

    let first: UpdateOutcome = persistence
        .check_and_process_update(&records, &fingerprint, create_test_timestamp(0), &election)
        .unwrap();
    let second: UpdateOutcome = persistence
        .check_and_process_update(&records, &fingerprint, create_test_timestamp(1), &election)
        .unwrap();

    assert!(matches!(first, UpdateOutcome::Committed(_)));
    assert_eq!(second, UpdateOutcome::Unchanged(fingerprint));
}

#[test]
fn test_unresolvable_candidate_leaves_no_trace() {
    let mut persistence: Persistence = create_test_persistence();
    let election: Election = create_test_election(&mut persistence);
    let mut records: Vec<CanonicalVoteRecord> = create_test_snapshot(JurisdictionType::State);
    persistence.load_entities(&records, &election).unwrap();

    records.push(create_test_record(
        "President",
        "Washington",
        "Unregistered Candidate",
        5,
        JurisdictionType::State,
    ));
    let result: Result<CommittedUpdate, PersistenceError> = persistence.commit_update(
        &records,
        &create_test_fingerprint(1),
        create_test_timestamp(0),
        &election,
    );

    assert!(matches!(
        result,
        Err(PersistenceError::CandidateNotFound { ref candidate_key })
            if candidate_key.ends_with("-Unregistered Candidate")
    ));
    assert_eq!(persistence.count_updates(election.election_id).unwrap(), 0);
    assert_eq!(persistence.count_vote_tallies(election.election_id).unwrap(), 0);
    assert_eq!(persistence.update_exists(&create_test_fingerprint(1)).unwrap(), None);
    // Tags are written in the same transaction and roll back too.
    let contests: Vec<Contest> = persistence.list_contests(election.election_id).unwrap();
    assert!(contests.iter().all(|c| c.jurisdictions.is_empty()));
}

#[test]
fn test_failed_ingest_rolls_back_new_entities() {
    let mut persistence: Persistence = create_test_persistence();
    let election: Election = create_test_election(&mut persistence);
    let mut records: Vec<CanonicalVoteRecord> = (0..TALLY_BATCH_SIZE + 50)
        .map(|i| {
            create_test_record(
                &format!("Measure {}", i % 3),
                "King County",
                &format!("Choice {i}"),
                10,
                JurisdictionType::County,
            )
        })
        .collect();
    // SQLite stores NaN as NULL, so the last tally batch fails its NOT NULL check.
    if let Some(last) = records.last_mut() {
        last.vote_percentage = f64::NAN;
    }

    let result: Result<UpdateOutcome, PersistenceError> = persistence.ingest(
        &records,
        &create_test_fingerprint(1),
        create_test_timestamp(0),
        &election,
        DuplicatePolicy::Skip,
    );

    assert!(result.is_err());
    assert_eq!(persistence.count_contests(election.election_id).unwrap(), 0);
    assert_eq!(persistence.count_ballot_responses(election.election_id).unwrap(), 0);
    assert_eq!(persistence.count_updates(election.election_id).unwrap(), 0);
    assert_eq!(persistence.count_vote_tallies(election.election_id).unwrap(), 0);
}

#[test]
fn test_unregistered_contest_is_rejected() {
    let mut persistence: Persistence = create_test_persistence();
    let election: Election = create_test_election(&mut persistence);
    let records: Vec<CanonicalVoteRecord> = create_test_snapshot(JurisdictionType::State);

    let result: Result<CommittedUpdate, PersistenceError> = persistence.commit_update(
        &records,
        &create_test_fingerprint(1),
        create_test_timestamp(0),
        &election,
    );

    assert_eq!(
        result,
        Err(PersistenceError::ContestNotFound {
            contest_key: String::from("President__Washington")
        })
    );
    assert_eq!(persistence.count_updates(election.election_id).unwrap(), 0);
}

#[test]
fn test_empty_snapshot_is_rejected() {
    let mut persistence: Persistence = create_test_persistence();
    let election: Election = create_test_election(&mut persistence);

    let result = persistence.ingest(
        &[],
        &create_test_fingerprint(1),
        create_test_timestamp(0),
        &election,
        DuplicatePolicy::Skip,
    );

    assert_eq!(result, Err(PersistenceError::Domain(DomainError::EmptySnapshot)));
}

#[test]
fn test_mixed_jurisdiction_snapshot_is_rejected_before_any_write() {
    let mut persistence: Persistence = create_test_persistence();
    let election: Election = create_test_election(&mut persistence);
    let mut records: Vec<CanonicalVoteRecord> = create_test_snapshot(JurisdictionType::State);
    records.push(create_test_record(
        "Mayor",
        "Seattle",
        "Ann Lee",
        10,
        JurisdictionType::County,
    ));

    let result = persistence.ingest(
        &records,
        &create_test_fingerprint(1),
        create_test_timestamp(0),
        &election,
        DuplicatePolicy::Skip,
    );

    assert_eq!(
        result,
        Err(PersistenceError::Domain(DomainError::InconsistentJurisdiction {
            expected: JurisdictionType::State,
            found: JurisdictionType::County,
        }))
    );
    assert_eq!(persistence.count_contests(election.election_id).unwrap(), 0);
}

#[test]
fn test_state_and_county_snapshots_share_entities() {
    let mut persistence: Persistence = create_test_persistence();
    let election: Election = create_test_election(&mut persistence);

    ingest(&mut persistence, &election, &create_test_snapshot(JurisdictionType::State), 1);
    ingest(&mut persistence, &election, &create_test_snapshot(JurisdictionType::County), 2);

    assert_eq!(persistence.count_contests(election.election_id).unwrap(), 2);
    assert_eq!(persistence.count_ballot_responses(election.election_id).unwrap(), 3);

    let president: Contest = persistence
        .find_contest_by_key(election.election_id, "President__Washington")
        .unwrap()
        .unwrap();
    assert_eq!(
        president.jurisdictions,
        vec![JurisdictionType::State, JurisdictionType::County]
    );
}

#[test]
fn test_jurisdiction_tag_added_once() {
    let mut persistence: Persistence = create_test_persistence();
    let election: Election = create_test_election(&mut persistence);
    let mut records: Vec<CanonicalVoteRecord> = create_test_snapshot(JurisdictionType::State);

    ingest(&mut persistence, &election, &records, 1);
    records[1].votes += 1;
    let second: UpdateOutcome = ingest(&mut persistence, &election, &records, 2);

    assert_eq!(second.committed().unwrap().contests_tagged, 0);
    let contests: Vec<Contest> = persistence.list_contests(election.election_id).unwrap();
    assert!(contests.iter().all(|c| c.jurisdictions == vec![JurisdictionType::State]));
}

#[test]
fn test_load_entities_is_idempotent_and_keeps_first_party() {
    let mut persistence: Persistence = create_test_persistence();
    let election: Election = create_test_election(&mut persistence);
    let mut records: Vec<CanonicalVoteRecord> = create_test_snapshot(JurisdictionType::State);
    records[0].party_preference = Some(String::from("Democratic"));

    let first: LoadSummary = persistence.load_entities(&records, &election).unwrap();
    records[0].party_preference = Some(String::from("Independent"));
    let second: LoadSummary = persistence.load_entities(&records, &election).unwrap();

    assert_eq!(first.contests_created, 2);
    assert_eq!(first.ballot_responses_created, 3);
    assert_eq!(second.records_seen, 3);
    assert_eq!(second.contests_created, 0);
    assert_eq!(second.ballot_responses_created, 0);

    let president: Contest = persistence
        .find_contest_by_key(election.election_id, "President__Washington")
        .unwrap()
        .unwrap();
    let smith = persistence
        .list_ballot_responses(president.contest_id)
        .unwrap()
        .into_iter()
        .find(|r| r.name == "John Smith")
        .unwrap();
    assert_eq!(smith.party.as_deref(), Some("Democratic"));
}

#[test]
fn test_same_candidate_name_in_two_contests_gets_two_responses() {
    let mut persistence: Persistence = create_test_persistence();
    let election: Election = create_test_election(&mut persistence);
    let records: Vec<CanonicalVoteRecord> = vec![
        create_test_record("Council", "District 1", "Pat Kim", 10, JurisdictionType::County),
        create_test_record("Council", "District 2", "Pat Kim", 20, JurisdictionType::County),
    ];

    ingest(&mut persistence, &election, &records, 1);

    assert_eq!(persistence.count_contests(election.election_id).unwrap(), 2);
    assert_eq!(persistence.count_ballot_responses(election.election_id).unwrap(), 2);
}

#[test]
fn test_large_snapshot_spans_several_batches() {
    let mut persistence: Persistence = create_test_persistence();
    let election: Election = create_test_election(&mut persistence);
    let record_count: usize = TALLY_BATCH_SIZE * 2 + 50;
    let records: Vec<CanonicalVoteRecord> = (0..record_count)
        .map(|i| {
            create_test_record(
                "Precinct Committee Officer",
                "King County",
                &format!("Candidate {i}"),
                i64::try_from(i).unwrap(),
                JurisdictionType::County,
            )
        })
        .collect();

    let outcome: UpdateOutcome = ingest(&mut persistence, &election, &records, 1);

    assert_eq!(outcome.committed().unwrap().tallies_inserted, record_count);
    assert_eq!(
        persistence.count_vote_tallies(election.election_id).unwrap(),
        i64::try_from(record_count).unwrap()
    );
}
