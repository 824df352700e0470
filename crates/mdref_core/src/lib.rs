//! Core logic for keeping markdown link-reference blocks in sync.
//!
//! A generated, marker-delimited block of link-reference definitions
//! mirrors a note's outbound wikilinks. This crate locates that block,
//! computes its canonical content from the note graph, proposes
//! insert/replace/remove edits, and evaluates staleness for display.
//! Host wiring (editor events, command registration) stays outside.

pub mod block;
pub mod format;
pub mod graph;
pub mod logging;
pub mod model;
pub mod service;

pub use block::{
    canonical_reference_lines, locate, BlockIntegrityError, BLOCK_FOOTER, BLOCK_HEADER,
};
pub use format::FormattingContext;
pub use graph::memory::InMemoryGraph;
pub use graph::{GraphError, GraphGate, GraphResult, NoteGraph};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::document::{
    DocumentSnapshot, EditOp, EndOfLine, IndentUnit, LanguageId, LineRange, ReferenceEdit,
};
pub use model::note::{Note, NoteId, NoteLink};
pub use service::reference_service::{
    BlockAnnotation, BlockStatus, ReferenceService, ReferenceServiceError, ServiceResult,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
