//! Note value type.
//!
//! # Invariants
//! - `id` is a non-nil uuid assigned once at creation.
//! - `timestamp` is set at creation and carried unchanged across edits.
//! - `title` and `content` are non-empty for a valid note.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier of a note, shared by the value type and its stored row.
pub type NoteId = Uuid;

/// Validation failure for note invariants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteValidationError {
    NilId,
    EmptyTitle,
    EmptyContent,
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "note id must not be nil"),
            Self::EmptyTitle => write!(f, "note title must not be empty"),
            Self::EmptyContent => write!(f, "note content must not be empty"),
        }
    }
}

impl Error for NoteValidationError {}

/// One user-visible note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NoteWire")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: String,
    /// Creation time, Unix epoch milliseconds.
    pub timestamp: i64,
}

impl Note {
    /// Creates a note with a fresh id, stamped with the current time.
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            content: content.into(),
            timestamp: now_epoch_ms(),
        }
    }

    /// Rebuilds a note whose identity and timestamp already exist.
    pub fn with_id(
        id: NoteId,
        title: impl Into<String>,
        content: impl Into<String>,
        timestamp: i64,
    ) -> Result<Self, NoteValidationError> {
        let note = Self {
            id,
            title: title.into(),
            content: content.into(),
            timestamp,
        };
        note.validate()?;
        Ok(note)
    }

    /// Checks identity and non-empty text.
    pub fn validate(&self) -> Result<(), NoteValidationError> {
        validate_fields(self.id, &self.title, &self.content)
    }
}

pub(crate) fn validate_fields(
    id: NoteId,
    title: &str,
    content: &str,
) -> Result<(), NoteValidationError> {
    if id.is_nil() {
        return Err(NoteValidationError::NilId);
    }
    if title.is_empty() {
        return Err(NoteValidationError::EmptyTitle);
    }
    if content.is_empty() {
        return Err(NoteValidationError::EmptyContent);
    }
    Ok(())
}

/// Current wall-clock time in Unix epoch milliseconds.
///
/// Clocks set before 1970 collapse to `0`.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}

#[derive(Deserialize)]
struct NoteWire {
    id: NoteId,
    title: String,
    content: String,
    timestamp: i64,
}

impl TryFrom<NoteWire> for Note {
    type Error = NoteValidationError;

    fn try_from(wire: NoteWire) -> Result<Self, Self::Error> {
        Note::with_id(wire.id, wire.title, wire.content, wire.timestamp)
    }
}
