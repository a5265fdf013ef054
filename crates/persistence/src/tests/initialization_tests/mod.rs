// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Backend initialization tests.

use super::{create_test_election, create_test_persistence, create_test_election_date};
use crate::{Election, Persistence, PersistenceError};

#[test]
fn test_persistence_initialization() {
    let result: Result<Persistence, PersistenceError> = Persistence::new_in_memory();
    assert!(result.is_ok());
}

#[test]
fn test_foreign_key_enforcement_enabled() {
    let mut persistence: Persistence = create_test_persistence();
    assert!(persistence.verify_foreign_key_enforcement().is_ok());
}

#[test]
fn test_multiple_in_memory_instances_are_isolated() {
    let mut db1: Persistence = create_test_persistence();
    let mut db2: Persistence = create_test_persistence();

    create_test_election(&mut db1);

    assert_eq!(db1.list_elections().unwrap().len(), 1);
    assert_eq!(db2.list_elections().unwrap().len(), 0);
}

#[test]
fn test_file_database_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("votewatch.db");

    let created: Election = {
        let mut persistence: Persistence = Persistence::new_with_file(&path).unwrap();
        create_test_election(&mut persistence)
    };

    let mut reopened: Persistence = Persistence::new_with_file(&path).unwrap();
    let found: Option<Election> = reopened
        .find_election_by_key(&created.election_key)
        .unwrap();
    assert_eq!(found, Some(created));
    assert_eq!(
        reopened.list_elections().unwrap()[0].election_date,
        create_test_election_date()
    );
}
