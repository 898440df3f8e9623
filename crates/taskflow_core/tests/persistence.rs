use chrono::{NaiveDate, TimeZone, Utc};
use taskflow_core::db::{open_db, open_db_in_memory};
use taskflow_core::{
    Category, KeyValueStore, MemoryKvStore, Priority, SlotPersistence, SqliteKvStore, Task,
    TaskDraft, TaskId, TaskPersistence, TaskStore, DEFAULT_SLOT_KEY,
};

fn sample_tasks() -> Vec<Task> {
    vec![
        Task {
            id: TaskId::from("lq3k9x0abc"),
            text: "Renew passport".to_string(),
            category: Some(Category::Personal),
            priority: Priority::High,
            due_date: NaiveDate::from_ymd_opt(2024, 9, 30),
            completed: false,
            created_at: Utc.with_ymd_and_hms(2024, 5, 2, 9, 30, 0).unwrap(),
        },
        Task {
            id: TaskId::from("lq3k8aaxyz"),
            text: "Buy milk".to_string(),
            category: None,
            priority: Priority::Low,
            due_date: None,
            completed: true,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 18, 0, 0).unwrap(),
        },
    ]
}

#[test]
fn save_then_load_reproduces_collection() {
    let mut persistence = SlotPersistence::with_default_slot(MemoryKvStore::new());
    let tasks = sample_tasks();

    persistence.save(&tasks);

    assert_eq!(persistence.load(), tasks);
}

#[test]
fn round_trip_preserves_generated_ids_and_timestamps() {
    let mut store = TaskStore::open(SlotPersistence::with_default_slot(MemoryKvStore::new()));
    store
        .add(TaskDraft::new("write report").category(Category::Work))
        .unwrap();
    store.add(TaskDraft::new("stretch")).unwrap();

    assert_eq!(store.persistence().load(), store.all());
}

#[test]
fn absent_slot_loads_empty() {
    let persistence = SlotPersistence::with_default_slot(MemoryKvStore::new());
    assert!(persistence.load().is_empty());
}

#[test]
fn corrupt_slot_loads_empty() {
    for payload in [
        &b"not json"[..],
        &b"{\"id\":\"a\"}"[..],
        &b"[{\"id\":\"a\",\"text\":\"x\",\"priority\":\"urgent\",\"createdAt\":\"2024-05-01T00:00:00Z\"}]"[..],
        &b"[{\"id\":\"a\",\"text\":\"x\",\"dueDate\":\"31/12/2024\",\"createdAt\":\"2024-05-01T00:00:00Z\"}]"[..],
        &[0xff, 0xfe, 0x00][..],
    ] {
        let persistence = SlotPersistence::with_default_slot(MemoryKvStore::with_slot(
            DEFAULT_SLOT_KEY,
            payload.to_vec(),
        ));
        assert!(persistence.load().is_empty(), "payload should be rejected");
    }
}

#[test]
fn store_opened_over_corrupt_slot_starts_empty_and_recovers() {
    let kv = MemoryKvStore::with_slot(DEFAULT_SLOT_KEY, b"[{broken".to_vec());
    let mut store = TaskStore::open(SlotPersistence::with_default_slot(kv));
    assert!(store.is_empty());

    store.add(TaskDraft::new("fresh start")).unwrap();
    assert_eq!(store.persistence().load().len(), 1);
}

#[test]
fn wire_shape_matches_browser_client() {
    let mut persistence = SlotPersistence::with_default_slot(MemoryKvStore::new());
    persistence.save(&sample_tasks());

    let raw = persistence.store().slot(DEFAULT_SLOT_KEY).unwrap();
    let json: serde_json::Value = serde_json::from_slice(raw).unwrap();

    let first = &json[0];
    assert_eq!(first["id"], "lq3k9x0abc");
    assert_eq!(first["text"], "Renew passport");
    assert_eq!(first["category"], "personal");
    assert_eq!(first["priority"], "high");
    assert_eq!(first["dueDate"], "2024-09-30");
    assert_eq!(first["completed"], false);
    assert!(first["createdAt"]
        .as_str()
        .unwrap()
        .starts_with("2024-05-02T09:30:00"));

    let second = &json[1];
    assert_eq!(second["category"], "");
    assert_eq!(second["dueDate"], "");
}

#[test]
fn legacy_payload_with_blank_and_missing_fields_loads_with_defaults() {
    let payload = br#"[
        {"id":"m1","text":"Blank optionals","category":"","priority":"medium","dueDate":"","completed":false,"createdAt":"2024-04-30T12:00:00.000Z","color":"teal"},
        {"id":"m2","text":"Minimal","createdAt":"2024-04-29T12:00:00.000Z"},
        {"id":"m3","text":"Nulls","category":null,"dueDate":null,"createdAt":"2024-04-28T12:00:00.000Z"}
    ]"#;
    let persistence =
        SlotPersistence::with_default_slot(MemoryKvStore::with_slot(DEFAULT_SLOT_KEY, payload.to_vec()));

    let tasks = persistence.load();
    assert_eq!(tasks.len(), 3);
    assert_eq!(tasks[0].priority, Priority::Medium);
    for task in &tasks {
        assert_eq!(task.category, None);
        assert_eq!(task.due_date, None);
        assert!(!task.completed);
    }
    assert_eq!(tasks[1].priority, Priority::Low);
    assert_eq!(
        tasks[0].created_at,
        Utc.with_ymd_and_hms(2024, 4, 30, 12, 0, 0).unwrap()
    );
}

#[test]
fn padded_text_in_slot_loads_trimmed() {
    let payload = br#"[{"id":"p1","text":"  Call plumber  ","createdAt":"2024-04-30T12:00:00.000Z"}]"#;
    let persistence =
        SlotPersistence::with_default_slot(MemoryKvStore::with_slot(DEFAULT_SLOT_KEY, payload.to_vec()));

    let store = TaskStore::open(persistence);
    assert_eq!(store.all()[0].text, "Call plumber");
}

#[test]
fn custom_slot_key_is_isolated() {
    let mut work = SlotPersistence::new(MemoryKvStore::new(), "work-tasks");
    work.save(&sample_tasks());

    assert!(work.store().slot(DEFAULT_SLOT_KEY).is_none());
    assert_eq!(work.slot_key(), "work-tasks");
    assert_eq!(work.load().len(), 2);
}

#[test]
fn sqlite_slot_store_persists_across_connections() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("taskflow.db");
    let tasks = sample_tasks();

    {
        let conn = open_db(&path).unwrap();
        let mut persistence = SlotPersistence::with_default_slot(SqliteKvStore::try_new(&conn).unwrap());
        persistence.save(&tasks[..1]);
        persistence.save(&tasks);
    }

    let conn = open_db(&path).unwrap();
    let persistence = SlotPersistence::with_default_slot(SqliteKvStore::try_new(&conn).unwrap());
    assert_eq!(persistence.load(), tasks);
}

#[test]
fn sqlite_slot_store_overwrites_value() {
    let conn = open_db_in_memory().unwrap();
    let mut kv = SqliteKvStore::try_new(&conn).unwrap();

    assert!(kv.read("k").unwrap().is_none());
    kv.write("k", b"first").unwrap();
    kv.write("k", b"second").unwrap();
    assert_eq!(kv.read("k").unwrap().as_deref(), Some(&b"second"[..]));

    let rows: i64 = conn
        .query_row("SELECT COUNT(*) FROM kv_slots;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(rows, 1);
}
