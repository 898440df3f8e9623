use taskflow_core::{
    decode_tasks, Category, MemoryKvStore, Priority, SlotPersistence, TaskDraft, TaskId,
    TaskStore, TaskStoreError, DEFAULT_SLOT_KEY,
};

type MemoryStore = TaskStore<SlotPersistence<MemoryKvStore>>;

fn new_store() -> MemoryStore {
    TaskStore::open(SlotPersistence::with_default_slot(MemoryKvStore::new()))
}

fn write_count(store: &MemoryStore) -> usize {
    store.persistence().store().write_count()
}

fn persisted_ids(store: &MemoryStore) -> Vec<TaskId> {
    let bytes = store
        .persistence()
        .store()
        .slot(DEFAULT_SLOT_KEY)
        .expect("slot should be written");
    decode_tasks(bytes)
        .unwrap()
        .into_iter()
        .map(|task| task.id)
        .collect()
}

#[test]
fn add_rejects_empty_and_blank_text_without_persisting() {
    let mut store = new_store();

    assert_eq!(store.add(TaskDraft::new("")), Err(TaskStoreError::EmptyText));
    assert_eq!(store.add(TaskDraft::new("   ")), Err(TaskStoreError::EmptyText));

    assert!(store.all().is_empty());
    assert_eq!(write_count(&store), 0);
}

#[test]
fn add_places_new_task_first_with_defaults() {
    let mut store = new_store();
    store.add(TaskDraft::new("Buy milk")).unwrap();

    let first = &store.all()[0];
    assert_eq!(first.text, "Buy milk");
    assert!(!first.completed);
    assert_eq!(first.priority, Priority::Low);
    assert_eq!(first.category, None);
    assert_eq!(first.due_date, None);
    assert_eq!(write_count(&store), 1);
}

#[test]
fn collection_stays_newest_first() {
    let mut store = new_store();
    let a = store.add(TaskDraft::new("a")).unwrap();
    let b = store.add(TaskDraft::new("b")).unwrap();
    let c = store.add(TaskDraft::new("c")).unwrap();

    let ids: Vec<_> = store.all().iter().map(|task| task.id.clone()).collect();
    assert_eq!(ids, vec![c.id, b.id, a.id]);
    assert_eq!(persisted_ids(&store), ids);
}

#[test]
fn toggle_twice_restores_original_state() {
    let mut store = new_store();
    let task = store.add(TaskDraft::new("stretch")).unwrap();

    let once = store.toggle_completed(&task.id).unwrap();
    assert!(once.completed);
    assert!(store.has_completed());

    let twice = store.toggle_completed(&task.id).unwrap();
    assert_eq!(twice.completed, task.completed);
    assert_eq!(write_count(&store), 3);
}

#[test]
fn toggle_unknown_id_is_not_found() {
    let mut store = new_store();
    let id = TaskId::from("nope");
    assert_eq!(
        store.toggle_completed(&id),
        Err(TaskStoreError::NotFound(id))
    );
    assert_eq!(write_count(&store), 0);
}

#[test]
fn second_delete_fails_not_found() {
    let mut store = new_store();
    let task = store.add(TaskDraft::new("temporary")).unwrap();

    store.delete(&task.id).unwrap();
    assert_eq!(
        store.delete(&task.id),
        Err(TaskStoreError::NotFound(task.id.clone()))
    );
    assert!(store.get(&task.id).is_none());
    assert_eq!(write_count(&store), 2);
}

#[test]
fn clear_completed_removes_only_completed_tasks() {
    let mut store = new_store();
    let mut pending = Vec::new();
    for (index, text) in ["one", "two", "three", "four", "five"].iter().enumerate() {
        let task = store.add(TaskDraft::new(*text)).unwrap();
        if index % 2 == 0 {
            store.toggle_completed(&task.id).unwrap();
        } else {
            pending.push(task.id);
        }
    }
    let writes_before = write_count(&store);

    assert_eq!(store.clear_completed(), 3);

    let remaining: Vec<_> = store.all().iter().map(|task| task.id.clone()).collect();
    pending.reverse();
    assert_eq!(remaining, pending);
    assert_eq!(write_count(&store), writes_before + 1);
    assert!(!store.has_completed());
}

#[test]
fn update_persists_edited_fields() {
    let mut store = new_store();
    let task = store.add(TaskDraft::new("gym")).unwrap();

    store
        .update(
            &task.id,
            TaskDraft::new("gym session")
                .category(Category::Health)
                .priority(Priority::High),
        )
        .unwrap();

    let reopened = TaskStore::open(SlotPersistence::with_default_slot(MemoryKvStore::with_slot(
        DEFAULT_SLOT_KEY,
        store
            .persistence()
            .store()
            .slot(DEFAULT_SLOT_KEY)
            .unwrap()
            .to_vec(),
    )));
    let loaded = reopened.get(&task.id).unwrap();
    assert_eq!(loaded.text, "gym session");
    assert_eq!(loaded.category, Some(Category::Health));
    assert_eq!(loaded.priority, Priority::High);
}

#[test]
fn failing_storage_does_not_affect_in_memory_state() {
    let mut store = new_store();
    store.persistence_mut().store_mut().set_fail_writes(true);

    let task = store.add(TaskDraft::new("still here")).unwrap();
    store.toggle_completed(&task.id).unwrap();

    assert_eq!(store.len(), 1);
    assert!(store.all()[0].completed);
    assert_eq!(write_count(&store), 0);
}
