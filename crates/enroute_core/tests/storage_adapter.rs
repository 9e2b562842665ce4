use enroute_core::{
    KeyValueStore, MemoryKeyValueStore, Persistence, SqliteKeyValueStore, StorageError,
};
use std::rc::Rc;

#[test]
fn read_returns_fallback_for_absent_blank_and_malformed_values() {
    let backend = Rc::new(MemoryKeyValueStore::new());
    let persistence = Persistence::from_shared(backend.clone());

    assert_eq!(persistence.read("missing", vec![7_u32]), vec![7]);

    backend.set_item("blank", "   ").unwrap();
    assert_eq!(persistence.read("blank", vec![1_u32]), vec![1]);

    backend.set_item("garbage", "{not json").unwrap();
    assert_eq!(persistence.read("garbage", Vec::<u32>::new()), Vec::<u32>::new());

    backend.set_item("object", r#"{"a":1}"#).unwrap();
    assert!(persistence.read_existing::<Vec<u32>>("object").is_none());
}

#[test]
fn write_then_read_uses_json_text() {
    let backend = Rc::new(MemoryKeyValueStore::new());
    let persistence = Persistence::from_shared(backend.clone());

    persistence.write("numbers", &vec![1, 2, 3]);

    assert_eq!(backend.get_item("numbers").unwrap().as_deref(), Some("[1,2,3]"));
    assert_eq!(persistence.read("numbers", Vec::<i32>::new()), vec![1, 2, 3]);
}

#[test]
fn quota_failures_are_swallowed_by_write_but_reported_by_try_write() {
    let backend = Rc::new(MemoryKeyValueStore::with_quota(16));
    let persistence = Persistence::from_shared(backend.clone());

    persistence.write("k", &"small");
    assert_eq!(persistence.read("k", String::new()), "small");

    persistence.write("k", &"this value is far too large");
    assert_eq!(persistence.read("k", String::new()), "small");

    let err = persistence
        .try_write("k", &"this value is far too large")
        .unwrap_err();
    assert!(matches!(err, StorageError::QuotaExceeded { .. }));
}

#[test]
fn remove_deletes_the_key() {
    let persistence = Persistence::in_memory();
    persistence.write("k", &1);
    persistence.remove("k");
    assert!(persistence.read_existing::<i32>("k").is_none());
}

#[test]
fn sqlite_backend_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kv.sqlite3");

    {
        let store = SqliteKeyValueStore::open(&path).unwrap();
        store.set_item("lap_payouts", "[]").unwrap();
        store.set_item("lap_payouts", "[1]").unwrap();
        store.set_item("lap_bookings", "[2]").unwrap();
    }

    let reopened = SqliteKeyValueStore::open(&path).unwrap();
    assert_eq!(
        reopened.get_item("lap_payouts").unwrap().as_deref(),
        Some("[1]")
    );
    assert_eq!(reopened.keys().unwrap(), vec!["lap_bookings", "lap_payouts"]);

    reopened.remove_item("lap_bookings").unwrap();
    assert!(reopened.get_item("lap_bookings").unwrap().is_none());
}
