//! Unit tests for the key-value stores and the SQLite database layer.

use std::sync::Arc;

use rstest::rstest;
use tempfile::TempDir;

use bookwise::database::connection::Database;
use bookwise::database::migrations::{get_schema_version, CURRENT_SCHEMA_VERSION};
use bookwise::storage::{KeyValueStore, MemoryStore, SqliteStore, StorageScope};

fn open_db(tmp: &TempDir) -> Arc<Database> {
    Arc::new(Database::open(tmp.path().join("store.db")).unwrap())
}

// ─── Database ───

#[test]
fn test_migrations_reach_current_version() {
    let db = Database::open_in_memory().unwrap();
    let conn = db.connection().unwrap();
    assert_eq!(get_schema_version(&conn), CURRENT_SCHEMA_VERSION);
}

#[test]
fn test_migrations_are_idempotent_on_reopen() {
    let tmp = TempDir::new().unwrap();
    drop(Database::open(tmp.path().join("store.db")).unwrap());
    let db = Database::open(tmp.path().join("store.db")).unwrap();
    let conn = db.connection().unwrap();
    assert_eq!(get_schema_version(&conn), CURRENT_SCHEMA_VERSION);
}

// ─── Shared contract, both backends ───

fn memory() -> (Box<dyn KeyValueStore>, Option<TempDir>) {
    (Box::new(MemoryStore::new()), None)
}

fn sqlite_local() -> (Box<dyn KeyValueStore>, Option<TempDir>) {
    let tmp = TempDir::new().unwrap();
    let store = SqliteStore::local(open_db(&tmp));
    (Box::new(store), Some(tmp))
}

fn sqlite_session() -> (Box<dyn KeyValueStore>, Option<TempDir>) {
    let tmp = TempDir::new().unwrap();
    let store = SqliteStore::session(open_db(&tmp)).unwrap();
    (Box::new(store), Some(tmp))
}

#[rstest]
#[case::memory(memory())]
#[case::sqlite_local(sqlite_local())]
#[case::sqlite_session(sqlite_session())]
fn test_set_get_remove(#[case] backend: (Box<dyn KeyValueStore>, Option<TempDir>)) {
    let (store, _tmp) = backend;
    assert_eq!(store.get_item("k").unwrap(), None);

    store.set_item("k", "v1").unwrap();
    store.set_item("k", "v2").unwrap();
    assert_eq!(store.get_item("k").unwrap().as_deref(), Some("v2"));

    store.remove_item("k").unwrap();
    assert_eq!(store.get_item("k").unwrap(), None);
    store.remove_item("k").unwrap();
}

#[rstest]
#[case::memory(memory())]
#[case::sqlite_local(sqlite_local())]
fn test_keys_sorted_and_clear(#[case] backend: (Box<dyn KeyValueStore>, Option<TempDir>)) {
    let (store, _tmp) = backend;
    store.set_item("b", "2").unwrap();
    store.set_item("a", "1").unwrap();
    store.set_item("c", "3").unwrap();
    assert_eq!(store.keys().unwrap(), vec!["a", "b", "c"]);

    store.clear().unwrap();
    assert!(store.keys().unwrap().is_empty());
}

// ─── Scope semantics ───

#[test]
fn test_scopes_do_not_share_keys() {
    let tmp = TempDir::new().unwrap();
    let db = open_db(&tmp);
    let local = SqliteStore::local(db.clone());
    let session = SqliteStore::session(db).unwrap();
    assert_eq!(local.scope(), StorageScope::Local);
    assert_eq!(session.scope(), StorageScope::Session);

    local.set_item("shared", "local").unwrap();
    session.set_item("shared", "session").unwrap();
    assert_eq!(local.get_item("shared").unwrap().as_deref(), Some("local"));
    assert_eq!(session.get_item("shared").unwrap().as_deref(), Some("session"));

    session.clear().unwrap();
    assert_eq!(local.get_item("shared").unwrap().as_deref(), Some("local"));
}

#[test]
fn test_local_scope_survives_reopen_session_scope_does_not() {
    let tmp = TempDir::new().unwrap();
    {
        let db = open_db(&tmp);
        SqliteStore::local(db.clone()).set_item("user", "u1").unwrap();
        SqliteStore::session(db).unwrap().set_item("token", "t1").unwrap();
    }

    let db = open_db(&tmp);
    assert_eq!(SqliteStore::local(db.clone()).get_item("user").unwrap().as_deref(), Some("u1"));
    assert_eq!(SqliteStore::session(db).unwrap().get_item("token").unwrap(), None);
}

#[test]
fn test_memory_store_len() {
    let store = MemoryStore::new();
    assert!(store.is_empty());
    store.set_item("a", "1").unwrap();
    assert_eq!(store.len(), 1);
}
