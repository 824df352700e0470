//! In-memory note graph.
//!
//! # Responsibility
//! - Provide a self-contained `NoteGraph` implementation for hosts without
//!   a full workspace index, and for tests.
//! - Resolve `[[wikilink]]` targets and heading-derived titles.
//!
//! # Invariants
//! - Re-ingesting a note replaces its outbound links wholesale; ingestion
//!   of identical text is idempotent.
//! - Outbound links keep first-appearance order; duplicate targets collapse
//!   to the first occurrence.

use crate::block::strip_markdown_extension;
use crate::graph::{GraphError, GraphResult, NoteGraph};
use crate::model::note::{Note, NoteId, NoteLink};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

static WIKILINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\[([^\[\]]+)\]\]").expect("valid wikilink regex"));
static TITLE_HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^#\s+(\S.*)$").expect("valid heading regex"));

#[derive(Debug, Clone)]
struct StoredNote {
    title: String,
    targets: Vec<NoteId>,
}

/// Hash-map backed note graph.
#[derive(Debug, Default)]
pub struct InMemoryGraph {
    notes: Mutex<HashMap<NoteId, StoredNote>>,
}

impl InMemoryGraph {
    pub fn new() -> Self {
        Self::default()
    }
}

impl NoteGraph for InMemoryGraph {
    fn add_note_from_markdown(&self, id: &str, markdown: &str) -> GraphResult<()> {
        let title = extract_title(markdown)
            .unwrap_or_else(|| id.to_string());
        let targets = extract_link_targets(markdown);
        debug!(
            "event=note_ingested module=graph id={} links={}",
            id,
            targets.len()
        );
        let mut notes = self.notes.lock().unwrap_or_else(PoisonError::into_inner);
        notes.insert(id.to_string(), StoredNote { title, targets });
        Ok(())
    }

    fn note_with_links(&self, id: &str) -> GraphResult<Note> {
        let notes = self.notes.lock().unwrap_or_else(PoisonError::into_inner);
        let stored = notes
            .get(id)
            .ok_or_else(|| GraphError::NotFound(id.to_string()))?;
        let linked_notes = stored
            .targets
            .iter()
            .map(|target| {
                // Unresolved targets keep the raw id as their title.
                let title = notes
                    .get(target)
                    .map(|note| note.title.clone())
                    .unwrap_or_else(|| target.clone());
                NoteLink::new(target.clone(), title)
            })
            .collect();
        Ok(Note {
            id: id.to_string(),
            title: stored.title.clone(),
            linked_notes,
        })
    }
}

fn extract_title(markdown: &str) -> Option<String> {
    TITLE_HEADING_RE
        .captures(markdown)
        .map(|captures| captures[1].trim().to_string())
}

fn extract_link_targets(markdown: &str) -> Vec<NoteId> {
    let mut targets = Vec::new();
    for captures in WIKILINK_RE.captures_iter(markdown) {
        // `[[target|alias]]` links by the target part only.
        let raw = captures[1].split('|').next().unwrap_or("").trim();
        if raw.is_empty() {
            continue;
        }
        let target = strip_markdown_extension(raw).to_string();
        if !targets.contains(&target) {
            targets.push(target);
        }
    }
    targets
}
