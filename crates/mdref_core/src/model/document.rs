//! Host-editor document view and proposed-edit types.
//!
//! # Responsibility
//! - Define the read-only snapshot this subsystem takes of a host document.
//! - Define line-granular edit proposals the host applies back.
//!
//! # Invariants
//! - The subsystem never mutates a document directly; every change is a
//!   `ReferenceEdit` value the host chooses to apply.
//! - `ReferenceEdit::apply_to` refuses to apply against a snapshot whose
//!   version moved since the edit was computed.

use crate::model::note::NoteId;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Line-ending convention of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EndOfLine {
    /// Unix `\n`.
    Lf,
    /// Windows `\r\n`.
    CrLf,
}

impl EndOfLine {
    /// Returns the literal line-break string.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lf => "\n",
            Self::CrLf => "\r\n",
        }
    }

    /// Detects the convention used by `text`.
    ///
    /// A single `\r\n` anywhere classifies the document as CRLF; empty or
    /// break-free text defaults to LF.
    pub fn detect(text: &str) -> Self {
        if text.contains("\r\n") {
            Self::CrLf
        } else {
            Self::Lf
        }
    }
}

/// Indentation unit of a document.
///
/// Carried in the formatting context for completeness; reference-block
/// output is never indented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndentUnit {
    Spaces(u8),
    Tabs,
}

/// Content type recognized by the host editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LanguageId {
    Markdown,
    Other(String),
}

impl LanguageId {
    /// Returns whether reference-block operations apply to this document.
    pub fn is_markdown(&self) -> bool {
        matches!(self, Self::Markdown)
    }

    /// Classifies a file path by extension.
    pub fn from_path(path: &str) -> Self {
        let extension = path.rsplit('.').next().unwrap_or("");
        match extension.to_ascii_lowercase().as_str() {
            "md" | "markdown" => Self::Markdown,
            other => Self::Other(other.to_string()),
        }
    }
}

/// Read-only copy of a host document at one point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    /// Document id, shared with the note id space (filename stem).
    pub id: NoteId,
    /// Content type as recognized by the host.
    pub language: LanguageId,
    /// Host-side revision counter, bumped on every document change.
    pub version: u64,
    /// Full text content.
    pub text: String,
    /// Line-ending convention of `text`.
    pub eol: EndOfLine,
    /// Configured indentation unit.
    pub indent: IndentUnit,
}

impl DocumentSnapshot {
    /// Builds a markdown snapshot at version 0 with detected line endings.
    ///
    /// Convenience for hosts and tests that do not track revisions.
    pub fn markdown(id: impl Into<NoteId>, text: impl Into<String>) -> Self {
        let text = text.into();
        let eol = EndOfLine::detect(&text);
        Self {
            id: id.into(),
            language: LanguageId::Markdown,
            version: 0,
            text,
            eol,
            indent: IndentUnit::Spaces(2),
        }
    }
}

/// Half-open, line-granular range with column 0 at both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineRange {
    /// First line of the range.
    pub start: usize,
    /// One past the last line of the range.
    pub end: usize,
}

impl LineRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

/// Byte span covered by a line range, from the start of line `range.start`
/// to the start of line `range.end` (or end of text).
pub fn line_span(text: &str, range: LineRange) -> Range<usize> {
    line_start_offset(text, range.start)..line_start_offset(text, range.end)
}

fn line_start_offset(text: &str, line: usize) -> usize {
    if line == 0 {
        return 0;
    }
    let mut seen = 0;
    for (index, byte) in text.bytes().enumerate() {
        if byte == b'\n' {
            seen += 1;
            if seen == line {
                return index + 1;
            }
        }
    }
    text.len()
}

/// One proposed document mutation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditOp {
    /// Append text at the very end of the document.
    Append(String),
    /// Replace a line range with new text.
    ReplaceLines(LineRange, String),
    /// Delete a line range.
    RemoveLines(LineRange),
}

/// A proposed edit bound to the document revision it was computed against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceEdit {
    /// Snapshot version this edit is valid for.
    pub base_version: u64,
    pub op: EditOp,
}

impl ReferenceEdit {
    /// Applies the edit, returning the new document text.
    ///
    /// Returns `None` when `doc` is no longer at `base_version`; a stale
    /// target must never be written to.
    pub fn apply_to(&self, doc: &DocumentSnapshot) -> Option<String> {
        if doc.version != self.base_version {
            return None;
        }
        Some(match &self.op {
            EditOp::Append(text) => {
                let mut updated = doc.text.clone();
                updated.push_str(text);
                updated
            }
            EditOp::ReplaceLines(range, text) => splice(&doc.text, *range, text),
            EditOp::RemoveLines(range) => splice(&doc.text, *range, ""),
        })
    }
}

fn splice(text: &str, range: LineRange, replacement: &str) -> String {
    let span = line_span(text, range);
    let mut updated = String::with_capacity(text.len() + replacement.len());
    updated.push_str(&text[..span.start]);
    updated.push_str(replacement);
    updated.push_str(&text[span.end..]);
    updated
}

#[cfg(test)]
mod tests {
    use super::{
        line_span, DocumentSnapshot, EditOp, EndOfLine, LanguageId, LineRange, ReferenceEdit,
    };

    #[test]
    fn detect_classifies_line_endings() {
        assert_eq!(EndOfLine::detect("a\nb\n"), EndOfLine::Lf);
        assert_eq!(EndOfLine::detect("a\r\nb\r\n"), EndOfLine::CrLf);
        assert_eq!(EndOfLine::detect(""), EndOfLine::Lf);
    }

    #[test]
    fn language_from_path_recognizes_markdown() {
        assert!(LanguageId::from_path("notes/daily.md").is_markdown());
        assert!(LanguageId::from_path("readme.MARKDOWN").is_markdown());
        assert!(!LanguageId::from_path("main.rs").is_markdown());
    }

    #[test]
    fn line_span_covers_requested_lines() {
        let text = "one\ntwo\nthree\n";
        let span = line_span(text, LineRange::new(1, 3));
        assert_eq!(&text[span], "two\nthree\n");
    }

    #[test]
    fn line_span_clamps_past_end_of_text() {
        let text = "one\ntwo";
        let span = line_span(text, LineRange::new(1, 5));
        assert_eq!(&text[span], "two");
    }

    #[test]
    fn replace_lines_edits_exact_range() {
        let doc = DocumentSnapshot::markdown("note", "keep\nold-1\nold-2\ntail\n");
        let edit = ReferenceEdit {
            base_version: 0,
            op: EditOp::ReplaceLines(LineRange::new(1, 3), "new\n".to_string()),
        };
        assert_eq!(
            edit.apply_to(&doc).expect("version matches"),
            "keep\nnew\ntail\n"
        );
    }

    #[test]
    fn stale_version_is_not_applied() {
        let mut doc = DocumentSnapshot::markdown("note", "body\n");
        let edit = ReferenceEdit {
            base_version: 0,
            op: EditOp::Append("tail\n".to_string()),
        };
        doc.version = 1;
        assert_eq!(edit.apply_to(&doc), None);
    }
}
