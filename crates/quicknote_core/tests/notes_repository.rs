use quicknote_core::model::note::now_epoch_ms;
use quicknote_core::{
    MutationOutcome, NoteGateway, NotesEvent, NotesRepository, SqliteNoteGateway,
};
use rusqlite::Connection;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

fn empty_repository() -> NotesRepository<SqliteNoteGateway> {
    NotesRepository::new(SqliteNoteGateway::open_in_memory().unwrap())
}

#[test]
fn groceries_scenario() {
    let mut notes = empty_repository();
    notes.refresh();
    assert_eq!(notes.count(), 0);

    assert_eq!(notes.add("Groceries", "Milk, eggs"), MutationOutcome::Applied);
    notes.refresh();
    assert_eq!(notes.count(), 1);
    let created = notes.note_at(0).unwrap();
    assert_eq!(created.title, "Groceries");

    assert_eq!(
        notes.update(0, "Groceries", "Milk, eggs, bread"),
        MutationOutcome::Applied
    );
    let updated = notes.note_at(0).unwrap();
    assert_eq!(updated.content, "Milk, eggs, bread");
    assert_eq!(updated.timestamp, created.timestamp);
    assert_eq!(updated.id, created.id);

    assert_eq!(notes.delete(0), MutationOutcome::Applied);
    assert_eq!(notes.count(), 0);
}

#[test]
fn add_round_trips_and_stamps_creation_time() {
    let mut notes = empty_repository();
    let before = now_epoch_ms();

    notes.add("Title", "Body");
    notes.refresh();

    let note = notes.note_at(0).unwrap();
    assert_eq!(note.title, "Title");
    assert_eq!(note.content, "Body");
    assert!(note.timestamp >= before);
}

#[test]
fn refresh_twice_yields_identical_cache() {
    let mut notes = empty_repository();
    notes.add("a", "1");
    notes.add("b", "2");

    notes.refresh();
    let first = notes.records().to_vec();
    notes.refresh();
    assert_eq!(notes.records(), first.as_slice());
}

#[test]
fn out_of_bounds_update_and_delete_change_nothing() {
    let mut notes = empty_repository();
    notes.add("only", "note");
    let snapshot = notes.records().to_vec();

    assert_eq!(notes.update(1, "x", "y"), MutationOutcome::NoOp);
    assert_eq!(notes.delete(1), MutationOutcome::NoOp);
    assert_eq!(notes.delete(usize::MAX), MutationOutcome::NoOp);

    assert_eq!(notes.count(), 1);
    assert_eq!(notes.records(), snapshot.as_slice());
}

#[test]
fn delete_resolves_the_record_currently_shown_at_position() {
    let mut notes = empty_repository();
    notes.add("first", "1");
    notes.add("second", "2");
    notes.add("third", "3");
    let shown_second = notes.note_at(1).unwrap();

    // Another writer removes the first note behind the cache's back.
    let first = notes.gateway().fetch_all()[0].clone();
    notes.gateway_mut().delete(&first).unwrap();

    assert_eq!(notes.delete(1), MutationOutcome::Applied);

    let remaining: Vec<String> = notes.notes().into_iter().map(|note| note.title).collect();
    assert_eq!(remaining, vec!["third".to_string()]);
    assert_eq!(notes.position_of(shown_second.id), None);
}

#[test]
fn delete_of_record_already_gone_is_a_no_op_and_resyncs() {
    let mut notes = empty_repository();
    notes.add("doomed", "x");
    let record = notes.records()[0].clone();
    notes.gateway_mut().delete(&record).unwrap();

    assert_eq!(notes.delete(0), MutationOutcome::NoOp);
    assert!(notes.is_empty());
}

#[test]
fn update_by_id_follows_the_note_when_positions_shift() {
    let mut notes = empty_repository();
    notes.add("first", "1");
    notes.add("second", "2");
    let second_id = notes.note_at(1).unwrap().id;

    assert_eq!(notes.delete(0), MutationOutcome::Applied);
    assert_eq!(
        notes.update_by_id(second_id, "second", "edited"),
        MutationOutcome::Applied
    );

    assert_eq!(notes.position_of(second_id), Some(0));
    assert_eq!(notes.note_at(0).unwrap().content, "edited");
}

#[test]
fn delete_by_id_ignores_unknown_ids() {
    let mut notes = empty_repository();
    notes.add("keep", "k");
    assert_eq!(notes.delete_by_id(uuid::Uuid::new_v4()), MutationOutcome::NoOp);
    assert_eq!(notes.count(), 1);

    let id = notes.note_at(0).unwrap().id;
    assert_eq!(notes.delete_by_id(id), MutationOutcome::Applied);
    assert!(notes.is_empty());
}

#[test]
fn invalid_input_fails_without_persisting() {
    let mut notes = empty_repository();
    assert_eq!(notes.add("", "body"), MutationOutcome::Failed);
    assert_eq!(notes.count(), 0);

    notes.add("title", "body");
    assert_eq!(notes.update(0, "title", ""), MutationOutcome::Failed);
    assert_eq!(notes.note_at(0).unwrap().content, "body");
}

#[test]
fn every_refresh_notifies_list_listeners() {
    let mut notes = empty_repository();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    let subscription = notes.subscribe(move |event| sink.borrow_mut().push(*event));

    notes.add("a", "1");
    notes.add("b", "2");
    notes.delete(0);
    notes.update(5, "x", "y");

    assert_eq!(
        *events.borrow(),
        vec![
            NotesEvent::ListChanged { count: 1 },
            NotesEvent::ListChanged { count: 2 },
            NotesEvent::ListChanged { count: 1 },
        ]
    );

    assert!(notes.unsubscribe(subscription));
    notes.refresh();
    assert_eq!(events.borrow().len(), 3);
}

#[test]
fn repository_loads_existing_notes_at_startup() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quicknote.sqlite3");
    {
        let mut notes = NotesRepository::new(SqliteNoteGateway::open(&path).unwrap());
        notes.add("persisted", "across restarts");
    }

    let notes = NotesRepository::new(SqliteNoteGateway::open(&path).unwrap());
    assert_eq!(notes.count(), 1);
    assert_eq!(notes.note_at(0).unwrap().title, "persisted");
}

#[test]
fn missing_creation_time_defaults_to_now() {
    let gateway = SqliteNoteGateway::open_in_memory().unwrap();
    gateway
        .connection()
        .execute(
            "INSERT INTO notes (uuid, title, content, created_at, updated_at)
             VALUES ('11111111-2222-4333-8444-555555555555', 'legacy', 'row', NULL, 1);",
            [],
        )
        .unwrap();
    let before = now_epoch_ms();

    let notes = NotesRepository::new(gateway);
    let note = notes.note_at(0).unwrap();
    assert!(note.timestamp >= before);
    assert_eq!(notes.note_at(1), None);
}

#[test]
fn failed_commit_reports_failure_and_resyncs_cache() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("quicknote.sqlite3");
    let mut notes = NotesRepository::new(SqliteNoteGateway::open(&path).unwrap());
    notes.add("Groceries", "Milk, eggs");
    notes
        .gateway()
        .connection()
        .busy_timeout(Duration::from_millis(50))
        .unwrap();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    notes.subscribe(move |event| sink.borrow_mut().push(*event));

    let reader = Connection::open(&path).unwrap();
    reader.execute_batch("BEGIN;").unwrap();
    let _: i64 = reader
        .query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))
        .unwrap();

    assert_eq!(notes.add("Chores", "Laundry"), MutationOutcome::Failed);
    assert_eq!(
        notes.update(0, "Groceries", "Milk, eggs, bread"),
        MutationOutcome::Failed
    );
    assert_eq!(notes.count(), 1);
    assert_eq!(notes.note_at(0).unwrap().content, "Milk, eggs");
    assert_eq!(
        *events.borrow(),
        vec![
            NotesEvent::ListChanged { count: 1 },
            NotesEvent::ListChanged { count: 1 },
        ]
    );
    assert!(!notes.gateway().has_pending_changes());

    reader.execute_batch("COMMIT;").unwrap();
    assert_eq!(notes.add("Chores", "Laundry"), MutationOutcome::Applied);
    assert_eq!(notes.count(), 2);
}
