//! Note domain model.
//!
//! # Responsibility
//! - Define the value type handed to list and editor collaborators.
//! - Tag draft text as empty or populated independently of UI strings.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`, never by list position.

pub mod draft;
pub mod note;
