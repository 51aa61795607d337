use btl_core::{
    Clock, FixedClock, JsonTaskStore, NewTaskRequest, Priority, StoreError, TaskItem, TaskRepository,
    TaskService,
};
use chrono::{DateTime, Local, TimeZone};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::thread;

fn day_d() -> DateTime<Local> {
    Local.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap()
}

fn open_at(path: &Path, clock: &Arc<FixedClock>) -> JsonTaskStore {
    JsonTaskStore::open_with_clock(path, clock.clone()).unwrap()
}

fn task(title: &str) -> TaskItem {
    TaskItem::new(title, day_d()).unwrap()
}

fn persisted_ids(path: &Path) -> HashSet<u64> {
    let raw = std::fs::read_to_string(path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    value
        .as_array()
        .expect("tasks file must hold an array")
        .iter()
        .map(|item| item["id"].as_u64().unwrap())
        .collect()
}

#[test]
fn add_assigns_increasing_ids_that_are_never_reused() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    let clock = Arc::new(FixedClock::new(day_d()));
    let store = open_at(&path, &clock);

    let first = store.add(task("one")).unwrap();
    let second = store.add(task("two")).unwrap();
    store.delete(second.id).unwrap();
    let third = store.add(task("three")).unwrap();

    assert_eq!(first.id, 1);
    assert_eq!(second.id, 2);
    assert_eq!(third.id, 3);

    drop(store);
    let reopened = open_at(&path, &clock);
    let fourth = reopened.add(task("four")).unwrap();
    assert_eq!(fourth.id, 4);
}

#[test]
fn reopen_restores_saved_collection() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    let clock = Arc::new(FixedClock::new(day_d()));
    let store = open_at(&path, &clock);

    let mut saved = vec![
        store
            .add(task("write report").with_priority(Priority::High).keep())
            .unwrap(),
        store.add(task("water plants").with_notes("balcony")).unwrap(),
        store.add(task("call bank").with_priority(Priority::Low)).unwrap(),
    ];
    saved[1].completed = true;
    store.update(&saved[1]).unwrap();

    let reopened = open_at(&path, &clock);
    let mut loaded = reopened.list();
    loaded.sort_by_key(|task| task.id);
    saved.sort_by_key(|task| task.id);
    assert_eq!(loaded, saved);
}

#[test]
fn missing_file_opens_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonTaskStore::open(dir.path().join("absent.json")).unwrap();
    assert!(store.list().is_empty());
    assert_eq!(store.get(1), None);
}

#[test]
fn get_returns_stored_task_without_side_effects() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    let clock = Arc::new(FixedClock::new(day_d()));
    let store = open_at(&path, &clock);

    let added = store.add(task("read book")).unwrap();
    clock.advance_days(1);

    // Expired, but `get` never runs cleanup.
    assert_eq!(store.get(added.id), Some(added.clone()));
    assert!(persisted_ids(&path).contains(&added.id));
}

#[test]
fn update_and_delete_unknown_id_return_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let clock = Arc::new(FixedClock::new(day_d()));
    let store = open_at(&dir.path().join("tasks.json"), &clock);
    store.add(task("existing")).unwrap();

    let mut ghost = task("ghost");
    ghost.id = 42;
    let err = store.update(&ghost).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(42)));

    let err = store.delete(42).unwrap_err();
    assert!(matches!(err, StoreError::NotFound(42)));
    assert_eq!(err.to_string(), "task with ID 42 not found");
    assert_eq!(store.list().len(), 1);
}

#[test]
fn expired_task_disappears_from_list_and_file_on_next_day() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    let clock = Arc::new(FixedClock::new(day_d()));
    let service = TaskService::with_clock(open_at(&path, &clock), clock.clone());

    let milk = service
        .add_task(NewTaskRequest {
            title: "Buy milk".to_string(),
            priority: Priority::Medium,
            keep: false,
            ..NewTaskRequest::default()
        })
        .unwrap();
    assert_eq!(service.list_tasks(), vec![milk.clone()]);

    clock.advance_days(1);
    assert!(service.list_tasks().is_empty());
    assert!(!persisted_ids(&path).contains(&milk.id));
}

#[test]
fn cleanup_keeps_kept_and_same_day_tasks() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    let clock = Arc::new(FixedClock::new(day_d()));
    let store = open_at(&path, &clock);

    let kept = store.add(task("renew passport").keep()).unwrap();
    let stale = store.add(task("stale")).unwrap();
    assert_eq!(store.cleanup().unwrap(), 0);

    clock.advance_days(30);
    let fresh = store
        .add(TaskItem::new("fresh", clock.now()).unwrap())
        .unwrap();

    assert_eq!(store.cleanup().unwrap(), 1);
    let ids: HashSet<u64> = store.list().into_iter().map(|task| task.id).collect();
    assert_eq!(ids, HashSet::from([kept.id, fresh.id]));
    assert!(!persisted_ids(&path).contains(&stale.id));
}

#[test]
fn cleanup_is_idempotent_and_skips_writes_when_nothing_expired() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    let clock = Arc::new(FixedClock::new(day_d()));
    let store = open_at(&path, &clock);
    store.add(task("short lived")).unwrap();
    store.add(task("long lived").keep()).unwrap();

    clock.advance_days(1);
    assert_eq!(store.cleanup().unwrap(), 1);

    std::fs::remove_file(&path).unwrap();
    assert_eq!(store.cleanup().unwrap(), 0);
    assert!(!path.exists(), "no-op cleanup must not write the file");
}

#[test]
fn concurrent_adds_get_unique_ids_and_all_reach_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    let clock = Arc::new(FixedClock::new(day_d()));
    let store = Arc::new(open_at(&path, &clock));

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                (0..10)
                    .map(|n| store.add(task(&format!("w{worker}-{n}"))).unwrap().id)
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    let mut ids = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(ids.insert(id), "duplicate id {id}");
        }
    }
    assert_eq!(ids, (1..=80).collect::<HashSet<u64>>());
    assert_eq!(persisted_ids(&path), ids);
}

#[test]
fn failed_write_keeps_memory_change_until_next_successful_write() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tasks.json");
    let clock = Arc::new(FixedClock::new(day_d()));
    let store = open_at(&path, &clock);

    // A directory at the target path makes the rename fail.
    std::fs::create_dir(&path).unwrap();
    let err = store.add(task("unsaved")).unwrap_err();
    assert!(matches!(err, StoreError::Write { .. }), "unexpected error: {err}");
    let unsaved = store.get(1).expect("in-memory insert is kept after a failed write");
    assert_eq!(unsaved.title, "unsaved");

    std::fs::remove_dir(&path).unwrap();
    let saved = store.add(task("saved")).unwrap();
    assert_eq!(saved.id, 2);
    assert_eq!(persisted_ids(&path), HashSet::from([1, 2]));
}
