//! Use-case layer between UI collaborators and the note gateway.
//!
//! # Responsibility
//! - Keep an observer-facing note list in sync with the store.
//! - Decide create vs. edit and validate drafts before persistence.

pub mod editor;
pub mod notes_repository;
