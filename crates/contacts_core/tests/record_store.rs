use contacts_core::kv::{open_sqlite, open_sqlite_in_memory};
use contacts_core::{
    CorruptionPolicy, KeyValueStore, MemoryKeyValueStore, Record, RecordStore,
    SqliteKeyValueStore, StoreError,
};

fn ann() -> Record {
    Record::new("Ann", "a@x.com")
}

fn bob() -> Record {
    Record::new("Bob", "b@x.com")
}

#[test]
fn add_appends_exactly_one_record_and_survives_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contacts.db");

    {
        let conn = open_sqlite(&path).unwrap();
        let store = RecordStore::new(SqliteKeyValueStore::try_new(&conn).unwrap());
        store.add(bob()).unwrap();
        let before = store.list().unwrap();

        store.add(ann()).unwrap();
        let after = store.list().unwrap();
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(after.last(), Some(&ann()));
    }

    let conn = open_sqlite(&path).unwrap();
    let reloaded = RecordStore::new(SqliteKeyValueStore::try_new(&conn).unwrap());
    assert_eq!(reloaded.list().unwrap(), vec![bob(), ann()]);
}

#[test]
fn new_store_instance_over_same_memory_storage_sees_writes() {
    let kv = MemoryKeyValueStore::new();
    RecordStore::new(&kv).add(ann()).unwrap();

    let reloaded = RecordStore::new(&kv);
    assert_eq!(reloaded.list().unwrap(), vec![ann()]);
}

#[test]
fn remove_drops_every_matching_email() {
    let kv = MemoryKeyValueStore::new();
    let store = RecordStore::new(&kv);
    store.add(ann()).unwrap();
    store.add(Record::new("Ann twin", "a@x.com")).unwrap();
    store.add(bob()).unwrap();

    assert_eq!(store.remove("a@x.com").unwrap(), 2);
    assert_eq!(store.list().unwrap(), vec![bob()]);
}

#[test]
fn remove_unknown_email_leaves_list_unchanged() {
    let kv = MemoryKeyValueStore::new();
    let store = RecordStore::new(&kv);
    store.add(ann()).unwrap();
    let raw_before = kv.get_item("users").unwrap();

    assert_eq!(store.remove("nobody@x.com").unwrap(), 0);
    assert_eq!(store.list().unwrap(), vec![ann()]);
    assert_eq!(kv.get_item("users").unwrap(), raw_before);
}

#[test]
fn update_replaces_match_in_place_and_preserves_others() {
    let conn = open_sqlite_in_memory().unwrap();
    let store = RecordStore::new(SqliteKeyValueStore::try_new(&conn).unwrap());
    store.add(ann()).unwrap();
    store.add(bob()).unwrap();
    store.add(Record::new("Cy", "c@x.com")).unwrap();

    assert_eq!(store.update("b@x.com", "Robert", "rob@x.com").unwrap(), 1);
    assert_eq!(
        store.list().unwrap(),
        vec![
            ann(),
            Record::new("Robert", "rob@x.com"),
            Record::new("Cy", "c@x.com"),
        ]
    );
}

#[test]
fn update_unknown_email_is_a_noop() {
    let kv = MemoryKeyValueStore::new();
    let store = RecordStore::new(&kv);
    store.add(ann()).unwrap();

    assert_eq!(store.update("nobody@x.com", "X", "x@x.com").unwrap(), 0);
    assert_eq!(store.list().unwrap(), vec![ann()]);
}

#[test]
fn add_then_remove_round_trips_to_previous_list() {
    let kv = MemoryKeyValueStore::new();
    let store = RecordStore::new(&kv);
    store.add(bob()).unwrap();
    let before = store.list().unwrap();

    store.add(ann()).unwrap();
    store.remove(&ann().email).unwrap();
    assert_eq!(store.list().unwrap(), before);
}

#[test]
fn find_returns_first_match() {
    let kv = MemoryKeyValueStore::new();
    let store = RecordStore::new(&kv);
    store.add(ann()).unwrap();
    store.add(Record::new("Ann twin", "a@x.com")).unwrap();

    assert_eq!(store.find("a@x.com").unwrap(), Some(ann()));
    assert_eq!(store.find("z@x.com").unwrap(), None);
}

#[test]
fn clear_removes_storage_key() {
    let kv = MemoryKeyValueStore::new();
    let store = RecordStore::new(&kv);
    store.add(ann()).unwrap();

    store.clear().unwrap();
    assert!(kv.is_empty());
    assert!(store.list().unwrap().is_empty());
}

#[test]
fn custom_key_isolates_lists() {
    let kv = MemoryKeyValueStore::new();
    let users = RecordStore::new(&kv);
    let archive = RecordStore::with_key(&kv, "archive");
    users.add(ann()).unwrap();
    archive.add(bob()).unwrap();

    assert_eq!(users.list().unwrap(), vec![ann()]);
    assert_eq!(archive.list().unwrap(), vec![bob()]);
    assert_eq!(archive.key(), "archive");
}

#[test]
fn corrupted_value_is_surfaced_by_default_and_left_untouched() {
    let kv = MemoryKeyValueStore::new();
    kv.set_item("users", "{not json").unwrap();
    let store = RecordStore::new(&kv);

    let err = store.list().unwrap_err();
    assert!(matches!(err, StoreError::Corrupted { ref key, .. } if key == "users"));

    let add_err = store.add(ann()).unwrap_err();
    assert!(matches!(add_err, StoreError::Corrupted { .. }));
    assert_eq!(kv.get_item("users").unwrap().as_deref(), Some("{not json"));
}

#[test]
fn wrong_shape_counts_as_corruption() {
    let kv = MemoryKeyValueStore::new();
    kv.set_item("users", r#"[{"name":"Ann"}]"#).unwrap();
    let store = RecordStore::new(&kv);

    assert!(matches!(
        store.list().unwrap_err(),
        StoreError::Corrupted { .. }
    ));
}

#[test]
fn reset_policy_reads_corruption_as_empty_and_overwrites_on_write() {
    let kv = MemoryKeyValueStore::new();
    kv.set_item("users", "{not json").unwrap();
    let store = RecordStore::new(&kv).with_corruption_policy(CorruptionPolicy::ResetToEmpty);

    assert!(store.list().unwrap().is_empty());
    store.add(ann()).unwrap();
    assert_eq!(store.list().unwrap(), vec![ann()]);
    assert_eq!(
        kv.get_item("users").unwrap().as_deref(),
        Some(r#"[{"name":"Ann","email":"a@x.com"}]"#)
    );
}
