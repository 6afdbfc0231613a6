//! Editor session state.
//!
//! # Responsibility
//! - Decide create vs. edit mode from constructor input.
//! - Reject empty or placeholder drafts before they reach persistence.
//!
//! # Invariants
//! - Editing keeps the original note id and timestamp.
//! - A target position is reported only in edit mode.
//! - Invalid input emits nothing; the session stays open.

use crate::model::draft::DraftField;
use crate::model::note::Note;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Draft rejected by the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftError {
    EmptyTitle,
    EmptyContent,
}

impl Display for DraftError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title is empty"),
            Self::EmptyContent => write!(f, "content is empty"),
        }
    }
}

impl Error for DraftError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorMode {
    Creating,
    Editing { position: Option<usize> },
}

/// Result of a successful save, ready for the notes repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorCommit {
    pub note: Note,
    /// Mode of the session that produced this commit.
    pub mode: EditorMode,
    /// Target row, reported only in edit mode.
    pub position: Option<usize>,
}

impl EditorCommit {
    pub fn is_edit(&self) -> bool {
        matches!(self.mode, EditorMode::Editing { .. })
    }
}

/// Per-session editor state.
#[derive(Debug, Clone)]
pub struct EditorState {
    existing: Option<Note>,
    position: Option<usize>,
}

impl EditorState {
    /// Presence of `note` selects edit mode.
    pub fn new(note: Option<Note>, position: Option<usize>) -> Self {
        Self {
            existing: note,
            position,
        }
    }

    pub fn creating() -> Self {
        Self::new(None, None)
    }

    pub fn editing(note: Note, position: usize) -> Self {
        Self::new(Some(note), Some(position))
    }

    pub fn mode(&self) -> EditorMode {
        match self.existing {
            Some(_) => EditorMode::Editing {
                position: self.position,
            },
            None => EditorMode::Creating,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.existing.is_some()
    }

    /// Prefill text for the title field.
    pub fn title(&self) -> &str {
        self.existing.as_ref().map_or("", |note| note.title.as_str())
    }

    /// Prefill text for the content field.
    pub fn content(&self) -> &str {
        self.existing.as_ref().map_or("", |note| note.content.as_str())
    }

    pub fn should_show_placeholder(text: &str, placeholder: &str) -> bool {
        !DraftField::from_input(text, placeholder).is_populated()
    }

    pub fn is_valid(title: &str, content: &str) -> bool {
        Self::classify(title, content).is_ok()
    }

    /// Builds the note to persist.
    ///
    /// # Errors
    /// - `DraftError::EmptyTitle` / `DraftError::EmptyContent` when a field is
    ///   empty or still shows its placeholder.
    pub fn commit(&self, title: &str, content: &str) -> Result<EditorCommit, DraftError> {
        let (title, content) = Self::classify(title, content)?;

        let note = match &self.existing {
            Some(existing) => Note {
                id: existing.id,
                title,
                content,
                timestamp: existing.timestamp,
            },
            None => Note::new(title, content),
        };

        let mode = self.mode();
        let position = match mode {
            EditorMode::Editing { position } => position,
            EditorMode::Creating => None,
        };
        Ok(EditorCommit {
            note,
            mode,
            position,
        })
    }

    fn classify(title: &str, content: &str) -> Result<(String, String), DraftError> {
        let title = DraftField::title(title)
            .into_text()
            .ok_or(DraftError::EmptyTitle)?;
        let content = DraftField::content(content)
            .into_text()
            .ok_or(DraftError::EmptyContent)?;
        Ok((title, content))
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::creating()
    }
}
