use chrono::{TimeZone, Utc};
use taskdeck_core::db::open_db_in_memory;
use taskdeck_core::storage::DEFAULT_STORAGE_KEY;
use taskdeck_core::{
    KeyValueStore, LoadError, MemoryKeyValueStore, Priority, SqliteKeyValueStore, StorageError,
    Task, TaskInput, TaskStatus, TaskStorage,
};

fn sample_tasks() -> Vec<Task> {
    let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
    vec![
        Task::create_with_id("a", TaskInput::new("A").with_priority(Priority::High), now).unwrap(),
        Task::create_with_id(
            "b",
            TaskInput::new("B")
                .with_status(TaskStatus::Completed)
                .with_due_date(chrono::NaiveDate::from_ymd_opt(2024, 3, 10).unwrap())
                .with_description("second")
                .with_category("home"),
            now,
        )
        .unwrap(),
    ]
}

#[test]
fn save_then_load_roundtrips_collection() {
    let mut storage = TaskStorage::new(MemoryKeyValueStore::new());
    let tasks = sample_tasks();

    storage.save(&tasks).unwrap();

    assert_eq!(storage.load(), tasks);
}

#[test]
fn save_then_load_roundtrips_through_sqlite() {
    let conn = open_db_in_memory().unwrap();
    let mut storage = TaskStorage::new(SqliteKeyValueStore::try_new(&conn).unwrap());
    let tasks = sample_tasks();

    storage.save(&tasks).unwrap();
    let reloaded = TaskStorage::new(SqliteKeyValueStore::try_new(&conn).unwrap()).load();

    assert_eq!(reloaded, tasks);
}

#[test]
fn save_writes_json_array_under_fixed_key() {
    let mut storage = TaskStorage::new(MemoryKeyValueStore::new());
    storage.save(&sample_tasks()).unwrap();

    let raw = storage.store().raw(DEFAULT_STORAGE_KEY).unwrap();
    let value: serde_json::Value = serde_json::from_str(raw).unwrap();
    let items = value.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1]["dueDate"], "2024-03-10");
    assert_eq!(items[1]["status"], "completed");
}

#[test]
fn custom_key_is_used_for_reads_and_writes() {
    let mut storage = TaskStorage::with_key(MemoryKeyValueStore::new(), "work-tasks");
    storage.save(&sample_tasks()).unwrap();

    assert!(storage.store().raw(DEFAULT_STORAGE_KEY).is_none());
    assert!(storage.store().raw("work-tasks").is_some());
    assert_eq!(storage.key(), "work-tasks");
}

#[test]
fn missing_key_loads_empty_collection() {
    let storage = TaskStorage::new(MemoryKeyValueStore::new());

    assert_eq!(storage.try_load(), Ok(Vec::new()));
    assert!(storage.load().is_empty());
}

#[test]
fn malformed_content_loads_empty_collection() {
    for raw in ["not json", "{\"id\":1}", "[{\"title\":\"no id\"}]", "null"] {
        let mut kv = MemoryKeyValueStore::new();
        kv.insert_raw(DEFAULT_STORAGE_KEY, raw);
        let storage = TaskStorage::new(kv);

        assert!(
            matches!(storage.try_load(), Err(LoadError::Malformed(_))),
            "expected malformed for {raw}"
        );
        assert!(storage.load().is_empty());
    }
}

#[test]
fn duplicate_ids_are_malformed() {
    let mut tasks = sample_tasks();
    tasks[1].id = "a".to_string();
    let mut kv = MemoryKeyValueStore::new();
    kv.insert_raw(DEFAULT_STORAGE_KEY, serde_json::to_string(&tasks).unwrap());
    let storage = TaskStorage::new(kv);

    match storage.try_load() {
        Err(LoadError::Malformed(details)) => assert!(details.contains("duplicate")),
        other => panic!("unexpected load result: {other:?}"),
    }
}

#[test]
fn unavailable_store_loads_empty_and_reports_storage_error() {
    let mut kv = MemoryKeyValueStore::new();
    kv.insert_raw(DEFAULT_STORAGE_KEY, "[]");
    kv.set_unavailable(true);
    let storage = TaskStorage::new(kv);

    assert!(matches!(
        storage.try_load(),
        Err(LoadError::Storage(StorageError::Unavailable(_)))
    ));
    assert!(storage.load().is_empty());
}

#[test]
fn quota_failure_is_reported_and_keeps_previous_content() {
    let mut storage = TaskStorage::new(MemoryKeyValueStore::with_quota(64));
    storage.save(&[]).unwrap();

    let err = storage.save(&sample_tasks()).unwrap_err();
    assert!(matches!(err, StorageError::QuotaExceeded { limit: Some(64), .. }));
    assert_eq!(storage.store().get(DEFAULT_STORAGE_KEY).unwrap().as_deref(), Some("[]"));
}
