//! Note domain model.
//!
//! # Responsibility
//! - Define the read-only note shape returned by the note graph.
//! - Keep the id space aligned with document filename stems.
//!
//! # Invariants
//! - `linked_notes` preserves graph-defined order; it is never sorted here.
//! - A `NoteLink` title falls back to the target id when the target note
//!   has not been ingested yet.

use serde::{Deserialize, Serialize};

/// Stable identifier for notes and documents.
///
/// Derived from the filename stem; kept as a type alias to make semantic
/// intent explicit in signatures.
pub type NoteId = String;

/// One resolved outbound wikilink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteLink {
    /// Target note id.
    pub id: NoteId,
    /// Resolved target title.
    pub title: String,
}

impl NoteLink {
    /// Creates a link pair from id and title.
    pub fn new(id: impl Into<NoteId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

/// A note as resolved by the note graph.
///
/// This subsystem never constructs or mutates notes beyond triggering
/// (re)ingestion; the graph owns identity, title and link resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Stable note id, shared with the document id space.
    pub id: NoteId,
    /// Display title, usually the first heading of the note body.
    pub title: String,
    /// Resolved outbound links in graph-defined order.
    pub linked_notes: Vec<NoteLink>,
}
