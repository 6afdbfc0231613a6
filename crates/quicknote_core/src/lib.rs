//! Core note store for QuickNote.
//! This crate owns note persistence and keeps the UI-facing list in sync.

pub mod config;
pub mod db;
pub mod events;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::CoreConfig;
pub use events::{EventHub, SubscriptionId};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::draft::{DraftField, CONTENT_PLACEHOLDER, TITLE_PLACEHOLDER};
pub use model::note::{Note, NoteId, NoteValidationError};
pub use repo::note_gateway::{
    MutationKind, NoteGateway, NoteRecord, RepoError, RepoResult, SqliteNoteGateway, StoreEvent,
};
pub use service::editor::{DraftError, EditorCommit, EditorMode, EditorState};
pub use service::notes_repository::{MutationOutcome, NotesEvent, NotesRepository};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
