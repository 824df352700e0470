//! Per-call formatting context.
//!
//! # Responsibility
//! - Resolve the line-ending and indentation settings used when producing
//!   new text for a specific document.
//!
//! # Invariants
//! - The context is a plain value computed fresh per operation from the
//!   target document; no ambient shared state is read or updated.

use crate::model::document::{DocumentSnapshot, EndOfLine, IndentUnit};

/// Formatting settings for newly produced text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormattingContext {
    /// Line-break string to join produced lines with.
    pub eol: EndOfLine,
    /// Indentation unit; reference blocks never indent, carried for
    /// completeness of the shared context.
    pub indent: IndentUnit,
}

impl FormattingContext {
    /// Resolves the context from the target document's own settings.
    pub fn for_document(doc: &DocumentSnapshot) -> Self {
        Self {
            eol: doc.eol,
            indent: doc.indent,
        }
    }
}

impl Default for FormattingContext {
    /// Fallback used when no document is available: LF, two spaces.
    fn default() -> Self {
        Self {
            eol: EndOfLine::Lf,
            indent: IndentUnit::Spaces(2),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FormattingContext;
    use crate::model::document::{DocumentSnapshot, EndOfLine};

    #[test]
    fn context_follows_document_settings() {
        let doc = DocumentSnapshot::markdown("note", "a\r\nb\r\n");
        let context = FormattingContext::for_document(&doc);
        assert_eq!(context.eol, EndOfLine::CrLf);
    }

    #[test]
    fn default_context_uses_lf() {
        assert_eq!(FormattingContext::default().eol, EndOfLine::Lf);
    }
}
