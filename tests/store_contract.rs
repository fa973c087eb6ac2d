//! Behavior every `TaskStore` must share, checked against the in-memory
//! store and the JSON file store.

use chrono::{Duration, TimeZone, Utc};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

use wrok::clock::FixedClock;
use wrok::io::{ErrorKind, FileStore, MemoryStore, TaskStore};
use wrok::model::{Ordering, TaskDraft, TaskFilter, TaskStatus, Transition};

fn start() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 3, 9, 0, 0).unwrap()
}

fn seed(store: &mut impl TaskStore) {
    store.create(TaskDraft::titled("Write report")).unwrap();
    let mut draft = TaskDraft::titled("  Fix build  ");
    draft.project = "ci".into();
    draft.tags = vec!["infra".into(), " infra ".into(), "".into()];
    draft.ticket = "ops-42".into();
    store.create(draft).unwrap();
    store.create(TaskDraft::titled("Plan sprint")).unwrap();
}

fn check_create_and_fetch(store: &mut impl TaskStore) {
    seed(store);
    let task = store.get(2).unwrap();
    assert_eq!(task.title, "Fix build");
    assert_eq!(task.tags, vec!["infra"]);
    assert_eq!(task.ticket, "OPS-42");
    assert_eq!(task.status, TaskStatus::Todo);

    let all = store.fetch_all(&TaskFilter::default()).unwrap();
    let ids: Vec<u64> = all.iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let newest = TaskFilter {
        ordering: Ordering::newest_first(),
        ..Default::default()
    };
    let ids: Vec<u64> = store.fetch_all(&newest).unwrap().iter().map(|t| t.id).collect();
    assert_eq!(ids, vec![3, 2, 1]);

    let by_project = TaskFilter {
        project: Some("CI".into()),
        ..Default::default()
    };
    assert_eq!(store.fetch_all(&by_project).unwrap().len(), 1);

    let err = store.create(TaskDraft::titled("   ")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Validation);
    let err = store.get(99).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

fn check_transitions(store: &mut impl TaskStore, clock: &FixedClock) {
    seed(store);
    let done = store.set_done(1).unwrap();
    assert_eq!(done.status, TaskStatus::Done);
    assert_eq!(done.done_at, Some(clock_now(clock)));
    assert_eq!(store.set_done(1).unwrap_err().kind(), ErrorKind::Validation);

    let undone = store.set_undone(1).unwrap();
    assert_eq!(undone.status, TaskStatus::Todo);
    assert_eq!(undone.done_at, None);
    assert!(store.set_undone(1).is_err());

    clock.advance(Duration::minutes(5));
    let archived = store.transition(2, Transition::Archive).unwrap();
    assert_eq!(archived.status, TaskStatus::Archived);
    assert_eq!(archived.updated_at, clock_now(clock));
    assert!(store.set_unarchived(3).is_err());
    assert_eq!(store.set_unarchived(2).unwrap().status, TaskStatus::Todo);

    let todo = store
        .fetch_all(&TaskFilter::with_status(TaskStatus::Todo))
        .unwrap();
    assert_eq!(todo.len(), 3);
}

fn check_sessions(store: &mut impl TaskStore, clock: &FixedClock) {
    seed(store);
    assert_eq!(store.active_session().unwrap(), None);
    assert_eq!(store.stop_active_session().unwrap_err().kind(), ErrorKind::NotFound);
    assert_eq!(store.start_session(42).unwrap_err().kind(), ErrorKind::NotFound);

    let session = store.start_session(1).unwrap();
    assert_eq!(session.task_id, 1);
    assert!(session.is_active());
    clock.advance(Duration::seconds(10));
    let err = store.start_session(2).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Conflict);
    let still_active = store.active_session().unwrap().unwrap();
    assert_eq!(still_active, session);
    assert_eq!(still_active.task_id, 1);
    assert_eq!(still_active.started_at, start());

    clock.advance(Duration::seconds(85));
    let stopped = store.stop_active_session().unwrap();
    assert_eq!(stopped.duration_secs, 95);
    assert_eq!(store.active_session().unwrap(), None);

    // completing a task ends its running session
    store.start_session(3).unwrap();
    clock.advance(Duration::seconds(30));
    store.set_done(3).unwrap();
    assert_eq!(store.active_session().unwrap(), None);

    let sessions = store
        .sessions_between(start(), start() + Duration::days(1))
        .unwrap();
    let durations: Vec<u64> = sessions.iter().map(|s| s.duration_secs).collect();
    assert_eq!(durations, vec![95, 30]);
}

fn clock_now(clock: &FixedClock) -> chrono::DateTime<Utc> {
    use wrok::clock::Clock;
    clock.now()
}

#[test]
fn memory_store_create_and_fetch() {
    let clock = FixedClock::new(start());
    check_create_and_fetch(&mut MemoryStore::with_clock(&clock));
}

#[test]
fn file_store_create_and_fetch() {
    let dir = TempDir::new().unwrap();
    let clock = FixedClock::new(start());
    check_create_and_fetch(&mut FileStore::open_with_clock(dir.path(), &clock).unwrap());
}

#[test]
fn memory_store_transitions() {
    let clock = FixedClock::new(start());
    check_transitions(&mut MemoryStore::with_clock(&clock), &clock);
}

#[test]
fn file_store_transitions() {
    let dir = TempDir::new().unwrap();
    let clock = FixedClock::new(start());
    check_transitions(&mut FileStore::open_with_clock(dir.path(), &clock).unwrap(), &clock);
}

#[test]
fn memory_store_sessions() {
    let clock = FixedClock::new(start());
    check_sessions(&mut MemoryStore::with_clock(&clock), &clock);
}

#[test]
fn file_store_sessions() {
    let dir = TempDir::new().unwrap();
    let clock = FixedClock::new(start());
    check_sessions(&mut FileStore::open_with_clock(dir.path(), &clock).unwrap(), &clock);
}

#[test]
fn file_store_persists_across_opens() {
    let dir = TempDir::new().unwrap();
    let clock = FixedClock::new(start());
    {
        let mut store = FileStore::open_with_clock(dir.path(), &clock).unwrap();
        seed(&mut store);
        store.start_session(2).unwrap();
    }
    let store = FileStore::open(dir.path()).unwrap();
    assert_eq!(store.fetch_all(&TaskFilter::default()).unwrap().len(), 3);
    assert_eq!(store.active_session().unwrap().map(|s| s.task_id), Some(2));
}

#[test]
fn file_store_reports_corrupt_document() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("wrok.json"), "{ not json").unwrap();
    let store = FileStore::open(dir.path()).unwrap();
    let err = store.get(1).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(err.to_string().starts_with("could not parse"));
}
