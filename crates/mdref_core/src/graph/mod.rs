//! Note graph boundary.
//!
//! # Responsibility
//! - Define the narrow contract this subsystem consumes from the note
//!   graph: ingestion and outbound-link resolution.
//! - Provide the explicit readiness handle operations wait on before
//!   first graph use.
//!
//! # Invariants
//! - The graph owns note identity, titles and link resolution; callers
//!   only trigger (re)ingestion and query.
//! - `GraphGate::wait_ready` blocks with no timeout; a graph that never
//!   becomes ready stalls its callers rather than producing partial output.

pub mod memory;

use crate::model::note::{Note, NoteId};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Condvar, Mutex, PoisonError};

pub type GraphResult<T> = Result<T, GraphError>;

/// Failure surfaced by a note graph implementation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    /// The queried note has not been ingested.
    NotFound(NoteId),
    /// Implementation-specific ingestion or query failure.
    Backend(String),
}

impl Display for GraphError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(id) => write!(f, "note not found in graph: {id}"),
            Self::Backend(message) => write!(f, "note graph failure: {message}"),
        }
    }
}

impl Error for GraphError {}

/// Contract consumed from the external note graph.
pub trait NoteGraph {
    /// Ingests or updates one note from its raw markdown.
    ///
    /// Repeated ingestion of identical text must yield identical graph
    /// state for that note's outbound links.
    fn add_note_from_markdown(&self, id: &str, markdown: &str) -> GraphResult<()>;

    /// Resolves a note's outbound links, in graph-defined order.
    fn note_with_links(&self, id: &str) -> GraphResult<Note>;
}

/// Explicit graph-readiness handle.
///
/// Created once at startup next to the graph; the graph owner calls
/// `mark_ready` after initial indexing, and every operation that touches
/// the graph waits on the gate first.
#[derive(Debug, Default)]
pub struct GraphGate {
    ready: Mutex<bool>,
    signal: Condvar,
}

impl GraphGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks the graph ready and wakes all waiters. Idempotent.
    pub fn mark_ready(&self) {
        let mut ready = self.ready.lock().unwrap_or_else(PoisonError::into_inner);
        *ready = true;
        self.signal.notify_all();
    }

    /// Blocks until the graph is ready. No timeout.
    pub fn wait_ready(&self) {
        let mut ready = self.ready.lock().unwrap_or_else(PoisonError::into_inner);
        while !*ready {
            ready = self
                .signal
                .wait(ready)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }

    /// Non-blocking readiness probe.
    pub fn is_ready(&self) -> bool {
        *self.ready.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
