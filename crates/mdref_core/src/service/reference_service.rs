//! Reference-block synchronization and status service.
//!
//! # Responsibility
//! - Decide insert / replace / remove for the generated block and propose
//!   the matching edit.
//! - Evaluate block staleness for passive display.
//! - Gate the thin manual/save entry points to markdown documents.
//!
//! # Invariants
//! - At most one block exists after a successful synchronize, given intact
//!   markers beforehand; ambiguous markers abort instead of duplicating.
//! - Synchronize is idempotent: a second call with unchanged graph and
//!   document proposes no further edit.
//! - Synchronization is serialized per document id.
//! - When outbound links drop to zero while a block exists, the block is
//!   removed outright.

use crate::block::{self, BlockIntegrityError};
use crate::format::FormattingContext;
use crate::graph::{GraphError, GraphGate, NoteGraph};
use crate::model::document::{
    line_span, DocumentSnapshot, EditOp, LineRange, ReferenceEdit,
};
use crate::model::note::NoteId;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex, PoisonError};

pub type ServiceResult<T> = Result<T, ReferenceServiceError>;

/// Failure surfaced by reference-block operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceServiceError {
    /// Note graph ingestion or query failed; no block was produced.
    Graph(GraphError),
    /// Existing block markers are ambiguous; writing would corrupt.
    Block(BlockIntegrityError),
}

impl Display for ReferenceServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Graph(err) => write!(f, "{err}"),
            Self::Block(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ReferenceServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Graph(err) => Some(err),
            Self::Block(err) => Some(err),
        }
    }
}

impl From<GraphError> for ReferenceServiceError {
    fn from(value: GraphError) -> Self {
        Self::Graph(value)
    }
}

impl From<BlockIntegrityError> for ReferenceServiceError {
    fn from(value: BlockIntegrityError) -> Self {
        Self::Block(value)
    }
}

/// Staleness verdict for an existing block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockStatus {
    UpToDate,
    OutOfDate,
}

impl BlockStatus {
    /// Display label used inside the annotation text.
    pub fn label(self) -> &'static str {
        match self {
            Self::UpToDate => "up to date",
            Self::OutOfDate => "out of date",
        }
    }
}

/// Passive annotation rendered over an existing block's range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockAnnotation {
    /// Line range the annotation covers.
    pub range: LineRange,
    pub status: BlockStatus,
}

impl BlockAnnotation {
    /// Literal annotation text; carries no command action.
    pub fn text(&self) -> String {
        format!("Link references ({})", self.status.label())
    }
}

/// Reference-block service over a note graph implementation.
pub struct ReferenceService<G: NoteGraph> {
    graph: Arc<G>,
    gate: Arc<GraphGate>,
    doc_locks: Mutex<HashMap<NoteId, Arc<Mutex<()>>>>,
}

impl<G: NoteGraph> ReferenceService<G> {
    /// Creates a service over the shared graph and its readiness gate.
    pub fn new(graph: Arc<G>, gate: Arc<GraphGate>) -> Self {
        Self {
            graph,
            gate,
            doc_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Computes the edit that brings `doc`'s reference block in line with
    /// its current outbound links.
    ///
    /// Returns `Ok(None)` when the document already matches canonical
    /// state, or when there is no block and no links to list. The returned
    /// edit is a proposal; the host applies it against the same revision.
    ///
    /// # Errors
    /// - `ReferenceServiceError::Block` when existing markers are
    ///   duplicated, lone, or out of order; nothing is proposed then.
    /// - `ReferenceServiceError::Graph` when ingestion or link resolution
    ///   fails; no partial block is ever proposed.
    pub fn synchronize(&self, doc: &DocumentSnapshot) -> ServiceResult<Option<ReferenceEdit>> {
        let lock = self.doc_lock(&doc.id);
        let _serialized = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let context = FormattingContext::for_document(doc);
        let existing = block::locate(&doc.text)?;
        let lines = self.canonical_lines(doc)?;
        let eol = context.eol.as_str();

        let op = match existing {
            None => {
                if lines.is_empty() {
                    debug!(
                        "event=reference_sync module=service id={} action=noop reason=no_links",
                        doc.id
                    );
                    return Ok(None);
                }
                EditOp::Append(format!("{eol}{}{eol}", lines.join(eol)))
            }
            Some(range) => {
                if lines.is_empty() {
                    EditOp::RemoveLines(range)
                } else {
                    let replacement = format!("{}{eol}", lines.join(eol));
                    if doc.text[line_span(&doc.text, range)] == replacement {
                        debug!(
                            "event=reference_sync module=service id={} action=noop reason=current",
                            doc.id
                        );
                        return Ok(None);
                    }
                    EditOp::ReplaceLines(range, replacement)
                }
            }
        };

        info!(
            "event=reference_sync module=service id={} action={} status=ok",
            doc.id,
            edit_action(&op)
        );
        Ok(Some(ReferenceEdit {
            base_version: doc.version,
            op,
        }))
    }

    /// Evaluates the existing block's staleness without proposing edits.
    ///
    /// Returns `Ok(None)` when the document has no block. Comparison is
    /// line-ending-normalized, so a CRLF document with current content
    /// reads as up to date.
    pub fn evaluate(&self, doc: &DocumentSnapshot) -> ServiceResult<Option<BlockAnnotation>> {
        let Some(range) = block::locate(&doc.text)? else {
            return Ok(None);
        };
        let lines = self.canonical_lines(doc)?;

        let existing = block::normalize_eol(&doc.text[line_span(&doc.text, range)]);
        let existing = existing.strip_suffix('\n').unwrap_or(&existing);
        let status = if existing == lines.join("\n") {
            BlockStatus::UpToDate
        } else {
            BlockStatus::OutOfDate
        };
        Ok(Some(BlockAnnotation { range, status }))
    }

    /// Manual "update wikilinks" entry point.
    ///
    /// Silent no-op when there is no active document or it is not
    /// markdown; failures degrade to a logged no-op.
    pub fn update_command(&self, active: Option<&DocumentSnapshot>) -> Option<ReferenceEdit> {
        let Some(doc) = active else {
            debug!("event=reference_sync module=service action=noop reason=no_active_document");
            return None;
        };
        self.guarded_synchronize(doc, "command")
    }

    /// Pre-save entry point; the host must apply the returned edit before
    /// letting the save proceed.
    pub fn on_will_save(&self, doc: &DocumentSnapshot) -> Option<ReferenceEdit> {
        self.guarded_synchronize(doc, "will_save")
    }

    fn guarded_synchronize(
        &self,
        doc: &DocumentSnapshot,
        trigger: &str,
    ) -> Option<ReferenceEdit> {
        if !doc.language.is_markdown() {
            debug!(
                "event=reference_sync module=service id={} trigger={} action=noop reason=not_markdown",
                doc.id, trigger
            );
            return None;
        }
        match self.synchronize(doc) {
            Ok(edit) => edit,
            Err(err) => {
                warn!(
                    "event=reference_sync module=service id={} trigger={} status=error error={}",
                    doc.id, trigger, err
                );
                None
            }
        }
    }

    fn canonical_lines(&self, doc: &DocumentSnapshot) -> ServiceResult<Vec<String>> {
        self.gate.wait_ready();
        self.graph.add_note_from_markdown(&doc.id, &doc.text)?;
        let note = self.graph.note_with_links(&doc.id)?;
        Ok(block::canonical_reference_lines(&note))
    }

    fn doc_lock(&self, id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.doc_locks.lock().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(locks.entry(id.to_string()).or_default())
    }
}

fn edit_action(op: &EditOp) -> &'static str {
    match op {
        EditOp::Append(_) => "insert",
        EditOp::ReplaceLines(..) => "replace",
        EditOp::RemoveLines(_) => "remove",
    }
}
