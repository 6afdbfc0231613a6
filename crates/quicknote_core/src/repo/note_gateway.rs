//! Note gateway contract and SQLite implementation.
//!
//! # Responsibility
//! - Sole owner of the note store connection.
//! - Fetch-all / insert / update / delete primitives with synchronous commit.
//! - Notify "mutation committed" listeners after inserts and updates.
//!
//! # Invariants
//! - Fetch order is store-native insertion order (`seq ASC`).
//! - Updates never touch `created_at`.
//! - `update_at` resolves its position against a freshly fetched list.
//! - Deletes do not notify; callers refresh on their own.
//! - A failed commit rolls back to the last committed state.

use crate::db::{open_db, open_db_in_memory, DbError, DbResult};
use crate::events::{EventHub, Listener, SubscriptionId};
use crate::model::note::{now_epoch_ms, validate_fields, Note, NoteId, NoteValidationError};
use log::{debug, error, info};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use uuid::Uuid;

const NOTE_SELECT_SQL: &str = "SELECT
    uuid,
    title,
    content,
    created_at,
    updated_at
FROM notes";

pub type RepoResult<T> = Result<T, RepoError>;

/// Error raised by note persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(NoteValidationError),
    Db(DbError),
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid persisted note data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData(_) => None,
        }
    }
}

impl From<NoteValidationError> for RepoError {
    fn from(value: NoteValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Store-resident note row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRecord {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    /// Creation time in epoch milliseconds; absent on rows imported without one.
    pub created_at: Option<i64>,
    /// Last title/content change in epoch milliseconds.
    pub updated_at: i64,
}

impl NoteRecord {
    /// Projects the row into the value type, stamping a missing creation time
    /// with the current time.
    pub fn to_note(&self) -> Note {
        Note {
            id: self.id,
            title: self.title.clone(),
            content: self.content.clone(),
            timestamp: self.created_at.unwrap_or_else(now_epoch_ms),
        }
    }
}

/// Kind of committed mutation carried by `StoreEvent`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Insert,
    Update,
}

/// Notification emitted by the gateway once a mutation is durable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreEvent {
    Committed { id: NoteId, kind: MutationKind },
}

/// Storage operations the notes repository relies on.
pub trait NoteGateway {
    /// Returns every stored note in store order.
    fn try_fetch_all(&self) -> RepoResult<Vec<NoteRecord>>;

    /// Like `try_fetch_all`, but degrades to an empty list on failure.
    fn fetch_all(&self) -> Vec<NoteRecord> {
        match self.try_fetch_all() {
            Ok(records) => records,
            Err(err) => {
                error!("event=notes_fetch module=repo status=error error={err}");
                Vec::new()
            }
        }
    }

    /// Creates a note stamped with the current time and commits it.
    fn insert(&mut self, title: &str, content: &str) -> RepoResult<NoteId>;

    /// Replaces title/content of the note at `position` in a fresh fetch.
    ///
    /// Returns `Ok(false)` when `position` is out of bounds.
    fn update_at(&mut self, position: usize, title: &str, content: &str) -> RepoResult<bool>;

    /// Replaces title/content of the note with `id`.
    ///
    /// Returns `Ok(false)` when no such note exists.
    fn update(&mut self, id: NoteId, title: &str, content: &str) -> RepoResult<bool>;

    /// Removes the given record. Returns `Ok(false)` when it is already gone.
    fn delete(&mut self, record: &NoteRecord) -> RepoResult<bool>;

    /// Flushes pending changes, if any.
    fn commit(&mut self) -> RepoResult<()>;

    /// Registers a "mutation committed" listener.
    fn subscribe(&mut self, listener: Listener<StoreEvent>) -> SubscriptionId;

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;
}

/// SQLite-backed note gateway.
pub struct SqliteNoteGateway {
    conn: Connection,
    listeners: EventHub<StoreEvent>,
}

impl SqliteNoteGateway {
    /// Opens the note store at `path`. Failure here is fatal for callers.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps an already migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn,
            listeners: EventHub::new(),
        }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Returns whether an uncommitted transaction is open.
    pub fn has_pending_changes(&self) -> bool {
        !self.conn.is_autocommit()
    }

    fn run_pending<T>(
        &self,
        statement: impl FnOnce(&Connection) -> rusqlite::Result<T>,
    ) -> RepoResult<T> {
        if self.conn.is_autocommit() {
            self.conn.execute_batch("BEGIN IMMEDIATE;")?;
        }
        match statement(&self.conn) {
            Ok(value) => Ok(value),
            Err(err) => {
                self.discard_pending();
                Err(err.into())
            }
        }
    }

    fn discard_pending(&self) {
        if self.conn.is_autocommit() {
            return;
        }
        if let Err(err) = self.conn.execute_batch("ROLLBACK;") {
            error!("event=store_rollback module=repo status=error error={err}");
        }
    }

    fn update_row(&mut self, id: NoteId, title: &str, content: &str) -> RepoResult<bool> {
        validate_fields(id, title, content)?;

        let changed = self.run_pending(|conn| {
            conn.execute(
                "UPDATE notes
                 SET
                    title = ?2,
                    content = ?3,
                    updated_at = ?4
                 WHERE uuid = ?1;",
                params![id.to_string(), title, content, now_epoch_ms()],
            )
        })?;

        if changed == 0 {
            self.discard_pending();
            debug!("event=note_update module=repo status=skipped reason=not_found note_id={id}");
            return Ok(false);
        }

        self.commit()?;
        info!("event=note_update module=repo status=ok note_id={id}");
        self.listeners.emit(&StoreEvent::Committed {
            id,
            kind: MutationKind::Update,
        });
        Ok(true)
    }
}

impl NoteGateway for SqliteNoteGateway {
    fn try_fetch_all(&self) -> RepoResult<Vec<NoteRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} ORDER BY seq ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_note_row(row)?);
        }
        Ok(records)
    }

    fn insert(&mut self, title: &str, content: &str) -> RepoResult<NoteId> {
        let id = Uuid::new_v4();
        validate_fields(id, title, content)?;

        let now = now_epoch_ms();
        self.run_pending(|conn| {
            conn.execute(
                "INSERT INTO notes (
                    uuid,
                    title,
                    content,
                    created_at,
                    updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5);",
                params![id.to_string(), title, content, now, now],
            )
        })?;
        self.commit()?;

        info!("event=note_insert module=repo status=ok note_id={id}");
        self.listeners.emit(&StoreEvent::Committed {
            id,
            kind: MutationKind::Insert,
        });
        Ok(id)
    }

    fn update_at(&mut self, position: usize, title: &str, content: &str) -> RepoResult<bool> {
        let records = self.try_fetch_all()?;
        let Some(record) = records.get(position) else {
            debug!(
                "event=note_update module=repo status=skipped reason=out_of_bounds position={position} count={}",
                records.len()
            );
            return Ok(false);
        };
        self.update_row(record.id, title, content)
    }

    fn update(&mut self, id: NoteId, title: &str, content: &str) -> RepoResult<bool> {
        self.update_row(id, title, content)
    }

    fn delete(&mut self, record: &NoteRecord) -> RepoResult<bool> {
        let id = record.id;
        let changed = self.run_pending(|conn| {
            conn.execute("DELETE FROM notes WHERE uuid = ?1;", [id.to_string()])
        })?;

        if changed == 0 {
            self.discard_pending();
            debug!("event=note_delete module=repo status=skipped reason=not_found note_id={id}");
            return Ok(false);
        }

        self.commit()?;
        info!("event=note_delete module=repo status=ok note_id={id}");
        Ok(true)
    }

    fn commit(&mut self) -> RepoResult<()> {
        if !self.has_pending_changes() {
            return Ok(());
        }

        match self.conn.execute_batch("COMMIT;") {
            Ok(()) => {
                debug!("event=store_commit module=repo status=ok");
                Ok(())
            }
            Err(err) => {
                error!("event=store_commit module=repo status=error error={err}");
                self.discard_pending();
                Err(err.into())
            }
        }
    }

    fn subscribe(&mut self, listener: Listener<StoreEvent>) -> SubscriptionId {
        self.listeners.subscribe_boxed(listener)
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.listeners.unsubscribe(id)
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<NoteRecord> {
    let uuid_text: String = row.get("uuid")?;
    let id = Uuid::parse_str(&uuid_text).map_err(|_| {
        RepoError::InvalidData(format!("invalid uuid value `{uuid_text}` in notes.uuid"))
    })?;

    let record = NoteRecord {
        id,
        title: row.get("title")?,
        content: row.get("content")?,
        created_at: row.get("created_at")?,
        updated_at: row.get("updated_at")?,
    };
    validate_fields(record.id, &record.title, &record.content)?;
    Ok(record)
}
