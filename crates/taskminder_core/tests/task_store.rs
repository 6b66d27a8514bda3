use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use taskminder_core::{
    FixedClock, KeyValueStore, KvTaskRepository, MemoryKeyValueStore, Priority, StorageError,
    StorageResult, Task, TaskStore, TaskView, TASKS_STORAGE_KEY,
};

fn local(offset_hours: i32, y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<FixedOffset> {
    FixedOffset::east_opt(offset_hours * 3600)
        .unwrap()
        .with_ymd_and_hms(y, mo, d, h, mi, 0)
        .unwrap()
}

fn noon() -> FixedClock {
    FixedClock::new(local(0, 2026, 10, 18, 12, 0))
}

fn task_due(id: &str, due: DateTime<FixedOffset>) -> Task {
    let created = Utc.with_ymd_and_hms(2026, 10, 1, 8, 0, 0).unwrap();
    Task::with_id(id, format!("task {id}"), Priority::Medium, due.with_timezone(&Utc), created)
}

fn ids(tasks: &[Task]) -> Vec<String> {
    tasks.iter().map(|task| task.id.clone()).collect()
}

#[test]
fn saved_task_round_trips_with_identical_fields() {
    let clock = noon();
    let store = TaskStore::new(KvTaskRepository::new(MemoryKeyValueStore::new()), &clock);
    let task = task_due("1", local(0, 2026, 10, 19, 9, 0)).with_description("2 litres");

    store.save_task(&task);

    assert_eq!(store.get_all_tasks(), vec![task]);
}

#[test]
fn empty_storage_reads_as_empty_collection() {
    let clock = noon();
    let store = TaskStore::new(KvTaskRepository::new(MemoryKeyValueStore::new()), &clock);
    assert!(store.get_all_tasks().is_empty());
    assert!(store.get_today_tasks().is_empty());
}

#[test]
fn save_keeps_insertion_order_and_does_not_deduplicate() {
    let clock = noon();
    let store = TaskStore::new(KvTaskRepository::new(MemoryKeyValueStore::new()), &clock);
    let late = task_due("late", local(0, 2026, 10, 20, 9, 0));
    let early = task_due("early", local(0, 2026, 10, 19, 9, 0));

    store.save_task(&late);
    store.save_task(&early);
    store.save_task(&late);

    assert_eq!(ids(&store.get_all_tasks()), vec!["late", "early", "late"]);
}

#[test]
fn buy_milk_due_tomorrow_is_upcoming_not_today() {
    let clock = noon();
    let store = TaskStore::new(KvTaskRepository::new(MemoryKeyValueStore::new()), &clock);
    let due = local(0, 2026, 10, 19, 9, 0).with_timezone(&Utc);
    let task = Task::with_id("1", "Buy milk", Priority::Low, due, clock_now_utc(&clock));

    store.save_task(&task);

    assert_eq!(ids(&store.get_upcoming_tasks()), vec!["1"]);
    assert!(store.get_today_tasks().is_empty());
}

#[test]
fn today_view_uses_local_calendar_day_and_sorts_ascending() {
    // 08:00 at UTC+9 is still the previous day in UTC.
    let clock = FixedClock::new(local(9, 2026, 10, 18, 8, 0));
    let store = TaskStore::new(KvTaskRepository::new(MemoryKeyValueStore::new()), &clock);
    store.save_task(&task_due("evening", local(9, 2026, 10, 18, 19, 0)));
    store.save_task(&task_due("early", local(9, 2026, 10, 18, 5, 0)));
    store.save_task(&task_due("utc-today-local-tomorrow", local(9, 2026, 10, 19, 1, 0)));
    store.save_task(&task_due("yesterday", local(9, 2026, 10, 17, 23, 0)));

    assert_eq!(ids(&store.get_today_tasks()), vec!["early", "evening"]);
}

#[test]
fn upcoming_excludes_due_now_and_past() {
    let clock = noon();
    let store = TaskStore::new(KvTaskRepository::new(MemoryKeyValueStore::new()), &clock);
    store.save_task(&task_due("past", local(0, 2026, 10, 18, 11, 0)));
    store.save_task(&task_due("now", local(0, 2026, 10, 18, 12, 0)));
    store.save_task(&task_due("next-week", local(0, 2026, 10, 25, 12, 0)));
    store.save_task(&task_due("soon", local(0, 2026, 10, 18, 12, 1)));

    assert_eq!(ids(&store.get_upcoming_tasks()), vec!["soon", "next-week"]);
}

#[test]
fn completed_task_leaves_today_and_upcoming_and_joins_completed() {
    let clock = noon();
    let store = TaskStore::new(KvTaskRepository::new(MemoryKeyValueStore::new()), &clock);
    store.save_task(&task_due("a", local(0, 2026, 10, 18, 15, 0)));
    store.save_task(&task_due("b", local(0, 2026, 10, 18, 16, 0)));

    store.complete_task("a");

    assert_eq!(ids(&store.get_completed_tasks()), vec!["a"]);
    assert_eq!(ids(&store.get_today_tasks()), vec!["b"]);
    assert_eq!(ids(&store.get_upcoming_tasks()), vec!["b"]);

    store.uncomplete_task("a");
    assert!(store.get_completed_tasks().is_empty());
    assert_eq!(ids(&store.get_today_tasks()), vec!["a", "b"]);
}

#[test]
fn completed_view_sorts_latest_due_first() {
    let clock = noon();
    let store = TaskStore::new(KvTaskRepository::new(MemoryKeyValueStore::new()), &clock);
    for (id, day) in [("mid", 15), ("first", 10), ("last", 20)] {
        store.save_task(&task_due(id, local(0, 2026, 10, day, 9, 0)));
        store.complete_task(id);
    }

    assert_eq!(ids(&store.get_completed_tasks()), vec!["last", "mid", "first"]);
}

#[test]
fn delete_removes_exactly_one_task_and_leaves_others_unchanged() {
    let clock = noon();
    let kv = MemoryKeyValueStore::new();
    let store = TaskStore::new(KvTaskRepository::new(&kv), &clock);
    store.save_task(&task_due("keep-1", local(0, 2026, 10, 19, 9, 0)).with_description("x"));
    store.save_task(&task_due("drop", local(0, 2026, 10, 19, 10, 0)));
    store.save_task(&task_due("keep-2", local(0, 2026, 10, 19, 11, 0)));
    store.complete_task("keep-2");

    let before = raw_records(&kv);
    store.delete_task("drop");
    let after = raw_records(&kv);

    assert_eq!(after, vec![before[0].clone(), before[2].clone()]);
}

#[test]
fn unknown_ids_are_no_ops_for_every_mutation() {
    let clock = noon();
    let kv = MemoryKeyValueStore::new();
    let store = TaskStore::new(KvTaskRepository::new(&kv), &clock);
    store.save_task(&task_due("1", local(0, 2026, 10, 19, 9, 0)));
    let before = kv.get(TASKS_STORAGE_KEY).unwrap();

    store.delete_task("missing");
    store.complete_task("missing");
    store.uncomplete_task("missing");
    store.update_task(&task_due("missing", local(0, 2026, 10, 20, 9, 0)));

    assert_eq!(kv.get(TASKS_STORAGE_KEY).unwrap(), before);
}

#[test]
fn update_replaces_matching_task_in_place() {
    let clock = noon();
    let store = TaskStore::new(KvTaskRepository::new(MemoryKeyValueStore::new()), &clock);
    store.save_task(&task_due("a", local(0, 2026, 10, 19, 9, 0)));
    store.save_task(&task_due("b", local(0, 2026, 10, 19, 10, 0)));

    let mut changed = task_due("a", local(0, 2026, 10, 21, 9, 0));
    changed.priority = Priority::High;
    store.update_task(&changed);

    let all = store.get_all_tasks();
    assert_eq!(ids(&all), vec!["a", "b"]);
    assert_eq!(all[0], changed);
}

#[test]
fn all_tasks_view_filters_priority_and_puts_open_first() {
    let clock = noon();
    let store = TaskStore::new(KvTaskRepository::new(MemoryKeyValueStore::new()), &clock);
    let mut high_done = task_due("high-done", local(0, 2026, 10, 17, 9, 0));
    high_done.priority = Priority::High;
    let mut high_open = task_due("high-open", local(0, 2026, 10, 22, 9, 0));
    high_open.priority = Priority::High;
    let low_open = task_due("low-open", local(0, 2026, 10, 19, 9, 0));
    store.save_task(&high_done);
    store.save_task(&high_open);
    store.save_task(&low_open);
    store.complete_task("high-done");

    assert_eq!(
        ids(&store.list_view(TaskView::All, None)),
        vec!["low-open", "high-open", "high-done"]
    );
    assert_eq!(
        ids(&store.list_view(TaskView::All, Some(Priority::High))),
        vec!["high-open", "high-done"]
    );
}

#[test]
fn views_follow_the_clock() {
    let clock = noon();
    let store = TaskStore::new(KvTaskRepository::new(MemoryKeyValueStore::new()), &clock);
    store.save_task(&task_due("1", local(0, 2026, 10, 18, 13, 0)));
    assert_eq!(ids(&store.get_upcoming_tasks()), vec!["1"]);

    clock.advance(Duration::hours(2));

    assert!(store.get_upcoming_tasks().is_empty());
    assert_eq!(ids(&store.get_today_tasks()), vec!["1"]);
}

#[test]
fn unreadable_payload_reads_as_empty_and_next_save_replaces_it() {
    let clock = noon();
    let kv = MemoryKeyValueStore::new().with_entry(TASKS_STORAGE_KEY, "[{\"id\": 1");
    let store = TaskStore::new(KvTaskRepository::new(&kv), &clock);

    assert!(store.get_all_tasks().is_empty());
    assert!(store.get_completed_tasks().is_empty());

    store.save_task(&task_due("fresh", local(0, 2026, 10, 19, 9, 0)));
    assert_eq!(ids(&store.get_all_tasks()), vec!["fresh"]);
}

#[test]
fn payload_from_earlier_builds_is_readable() {
    let clock = noon();
    let payload = r#"[{
        "id": "1760774400000",
        "title": "Buy milk",
        "description": "",
        "priority": "low",
        "dueDate": "2026-10-19T09:00:00.000Z",
        "completed": false,
        "createdAt": "2026-10-18T08:00:00.000Z"
    }]"#;
    let kv = MemoryKeyValueStore::new().with_entry(TASKS_STORAGE_KEY, payload);
    let store = TaskStore::new(KvTaskRepository::new(&kv), &clock);

    let tasks = store.get_all_tasks();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, "1760774400000");
    assert_eq!(tasks[0].priority, Priority::Low);
    assert_eq!(tasks[0].description(), None);
    assert_eq!(ids(&store.get_upcoming_tasks()), vec!["1760774400000"]);
}

struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn get(&self, _key: &str) -> StorageResult<Option<String>> {
        Ok(None)
    }

    fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
        Err(StorageError::Unavailable("disk full".to_string()))
    }
}

#[test]
fn write_failure_is_swallowed() {
    let clock = noon();
    let store = TaskStore::new(KvTaskRepository::new(ReadOnlyStore), &clock);

    store.save_task(&task_due("1", local(0, 2026, 10, 19, 9, 0)));
    store.complete_task("1");
    store.delete_task("1");

    assert!(store.get_all_tasks().is_empty());
}

fn clock_now_utc(clock: &FixedClock) -> DateTime<Utc> {
    use taskminder_core::Clock;
    clock.now_utc()
}

fn raw_records(kv: &MemoryKeyValueStore) -> Vec<serde_json::Value> {
    let raw = kv.get(TASKS_STORAGE_KEY).unwrap().unwrap();
    match serde_json::from_str::<serde_json::Value>(&raw).unwrap() {
        serde_json::Value::Array(items) => items,
        other => panic!("expected array payload, got {other}"),
    }
}
