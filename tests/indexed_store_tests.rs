//! Integration Tests for IndexedStore
//!
//! End-to-end indexed lookup scenarios and concurrent access.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;

use indexcache::{IndexError, IndexedStore};
use tokio_test::{assert_err, assert_ok};

#[derive(Debug, Clone, PartialEq)]
struct User {
    id: i64,
    role: String,
}

fn user(id: i64, role: &str) -> User {
    User {
        id,
        role: role.to_string(),
    }
}

fn ids(users: Vec<User>) -> HashSet<i64> {
    users.into_iter().map(|u| u.id).collect()
}

// == Helper Functions ==

/// Store populated with one admin and two users, indexed by role.
fn create_role_store() -> IndexedStore<i64, User> {
    let store = IndexedStore::new();
    assert_ok!(store.add_index("role", |u: &User| u.role.clone()));

    store.set(1, user(1, "Admin"));
    store.set(2, user(2, "User"));
    store.set(3, user(3, "User"));
    store
}

// == Indexed Lookup Scenarios ==

#[test]
fn test_basic_indexed_lookup() {
    let store = create_role_store();

    let admins = assert_ok!(store.find("role", "Admin"));
    assert_eq!(admins, vec![user(1, "Admin")]);

    let users = assert_ok!(store.find("role", "User"));
    assert_eq!(users.len(), 2);
    assert_eq!(ids(users), HashSet::from([2, 3]));
}

#[test]
fn test_index_update_under_mutation() {
    let store = create_role_store();

    store.set(1, user(1, "User"));

    assert!(assert_ok!(store.find("role", "Admin")).is_empty());
    let users = assert_ok!(store.find("role", "User"));
    assert_eq!(users.len(), 3);
    assert_eq!(ids(users), HashSet::from([1, 2, 3]));
}

#[test]
fn test_index_removal_on_delete() {
    let store = create_role_store();
    store.set(1, user(1, "User"));

    store.delete(&1);

    let users = assert_ok!(store.find("role", "User"));
    assert_eq!(ids(users), HashSet::from([2, 3]));
    assert_eq!(store.len(), 2);
}

#[test]
fn test_bulk_load_with_existing_index() {
    let store = IndexedStore::new();
    assert_ok!(store.add_index("role", |u: &User| u.role.clone()));

    store.load(
        vec![user(1, "Entry"), user(2, "Entry"), user(3, "Admin")],
        |u| u.id,
    );

    assert_eq!(store.len(), 3);
    assert_eq!(assert_ok!(store.find("role", "Entry")).len(), 2);
    assert_eq!(assert_ok!(store.find("role", "Admin")).len(), 1);
}

#[test]
fn test_missing_index() {
    let store: IndexedStore<i64, User> = IndexedStore::new();

    let err = assert_err!(store.find("nonexistent", "x"));
    assert_eq!(err, IndexError::IndexNotFound("nonexistent".to_string()));
}

#[test]
fn test_duplicate_index_rejected() {
    let store = create_role_store();

    let err = assert_err!(store.add_index("role", |u: &User| u.id));
    assert_eq!(err, IndexError::IndexAlreadyDefined("role".to_string()));
}

#[test]
fn test_late_index_covers_existing_entries() {
    let store = create_role_store();

    assert_ok!(store.add_index("even", |u: &User| u.id % 2 == 0));

    assert_eq!(ids(assert_ok!(store.find("even", true))), HashSet::from([2]));
    assert_eq!(
        ids(assert_ok!(store.find("even", false))),
        HashSet::from([1, 3])
    );
}

#[test]
fn test_clear_then_reuse() {
    let store = create_role_store();

    store.clear();
    assert!(store.is_empty());
    assert!(assert_ok!(store.find("role", "User")).is_empty());

    store.set(9, user(9, "Admin"));
    assert_eq!(assert_ok!(store.find("role", "Admin")), vec![user(9, "Admin")]);
}

// == Concurrency ==

#[test]
fn test_concurrent_writers_keep_indexes_consistent() {
    const ROLES: [&str; 3] = ["Admin", "User", "Guest"];
    let store = Arc::new(IndexedStore::new());
    assert_ok!(store.add_index("role", |u: &User| u.role.clone()));

    let writers: Vec<_> = (0..8i64)
        .map(|t| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..200i64 {
                    let id = t * 1000 + i;
                    store.set(id, user(id, ROLES[(i % 3) as usize]));
                    // Move every other entry to a different bucket
                    if i % 2 == 0 {
                        store.set(id, user(id, ROLES[((i + 1) % 3) as usize]));
                    }
                    if i % 5 == 0 {
                        store.delete(&id);
                    }
                }
            })
        })
        .collect();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for _ in 0..200 {
                    for role in ROLES {
                        let found = store.find("role", role).unwrap();
                        assert!(found.iter().all(|u| u.role == role));
                    }
                }
            })
        })
        .collect();

    for handle in writers.into_iter().chain(readers) {
        handle.join().unwrap();
    }

    // 40 of every 200 ids per writer were deleted
    assert_eq!(store.len(), 8 * 160);

    let mut indexed = 0;
    for role in ROLES {
        let found = ids(store.find("role", role).unwrap());
        let scanned = ids(store.filter(|u| u.role == role));
        assert_eq!(found, scanned);
        indexed += found.len();
    }
    assert_eq!(indexed, store.len());
}
