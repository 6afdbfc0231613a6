//! Persistence boundary for notes.
//!
//! # Responsibility
//! - Own the store connection and every SQL statement touching `notes`.
//! - Commit each mutation before returning to the caller.
//!
//! # Invariants
//! - Write paths validate note fields before any SQL mutation.
//! - Rows that fail to parse are reported, never silently repaired.

pub mod note_gateway;
