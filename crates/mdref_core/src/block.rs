//! Reference-block markers, locator and canonical content.
//!
//! # Responsibility
//! - Locate an existing generated block by its exact delimiter markers.
//! - Build the canonical ordered line sequence for a note's outbound links.
//!
//! # Invariants
//! - Marker literals must match byte-for-byte; no trimming or casefolding.
//! - A well-formed document contains each marker at most once. Duplicated
//!   or out-of-order markers are rejected instead of silently picking the
//!   first occurrence.
//! - An empty link list yields an empty canonical sequence, never a bare
//!   header/footer pair.

use crate::model::document::LineRange;
use crate::model::note::Note;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Exact first line of a generated block.
pub const BLOCK_HEADER: &str =
    "[//begin]: # \"Autogenerated link references for markdown compatibility\"";

/// Exact last line of a generated block.
pub const BLOCK_FOOTER: &str = "[//end]: # \"Autogenerated link references\"";

/// Marker-integrity failure detected while locating a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockIntegrityError {
    /// The header marker occurs more than once.
    DuplicateHeader,
    /// The footer marker occurs more than once.
    DuplicateFooter,
    /// A header marker exists with no matching footer.
    MissingFooter,
    /// A footer marker exists with no matching header.
    MissingHeader,
    /// The footer marker occurs before the header marker.
    FooterBeforeHeader,
}

impl Display for BlockIntegrityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateHeader => write!(f, "duplicate reference block header marker"),
            Self::DuplicateFooter => write!(f, "duplicate reference block footer marker"),
            Self::MissingFooter => write!(f, "reference block header without footer marker"),
            Self::MissingHeader => write!(f, "reference block footer without header marker"),
            Self::FooterBeforeHeader => {
                write!(f, "reference block footer marker precedes header marker")
            }
        }
    }
}

impl Error for BlockIntegrityError {}

/// Finds the line range of the generated block in `text`.
///
/// Returns `Ok(None)` when no block is present. The returned range is
/// half-open and line-granular: it starts at the header line and ends one
/// line past the footer line, so replacing it with `lines.join(eol) + eol`
/// swaps the whole block in place.
///
/// # Errors
/// - Any duplicated marker, a lone marker, or a footer placed before the
///   header is a `BlockIntegrityError`; callers must not write in that
///   state.
pub fn locate(text: &str) -> Result<Option<LineRange>, BlockIntegrityError> {
    let header =
        find_single(text, BLOCK_HEADER).map_err(|_| BlockIntegrityError::DuplicateHeader)?;
    let footer =
        find_single(text, BLOCK_FOOTER).map_err(|_| BlockIntegrityError::DuplicateFooter)?;

    match (header, footer) {
        (None, None) => Ok(None),
        (Some(_), None) => Err(BlockIntegrityError::MissingFooter),
        (None, Some(_)) => Err(BlockIntegrityError::MissingHeader),
        (Some(header_offset), Some(footer_offset)) => {
            if footer_offset < header_offset {
                return Err(BlockIntegrityError::FooterBeforeHeader);
            }
            let header_line = line_index(text, header_offset);
            let footer_line = line_index(text, footer_offset);
            // Markers on one line leave no room for a block body.
            if header_line == footer_line {
                return Ok(None);
            }
            Ok(Some(LineRange::new(header_line, footer_line + 1)))
        }
    }
}

fn find_single(text: &str, marker: &str) -> Result<Option<usize>, ()> {
    let mut occurrences = text.match_indices(marker).map(|(offset, _)| offset);
    let first = occurrences.next();
    if occurrences.next().is_some() {
        return Err(());
    }
    Ok(first)
}

fn line_index(text: &str, offset: usize) -> usize {
    text.as_bytes()[..offset]
        .iter()
        .filter(|byte| **byte == b'\n')
        .count()
}

/// Builds the canonical block lines for a note's current outbound links.
///
/// Empty when the note has no outbound links (no block should exist).
/// Otherwise `[header, one definition per link, footer]` with links kept in
/// graph-defined order.
pub fn canonical_reference_lines(note: &Note) -> Vec<String> {
    if note.linked_notes.is_empty() {
        return Vec::new();
    }
    let mut lines = Vec::with_capacity(note.linked_notes.len() + 2);
    lines.push(BLOCK_HEADER.to_string());
    for link in &note.linked_notes {
        lines.push(format!(
            "[{}]: {} \"{}\"",
            link.id,
            strip_markdown_extension(&link.id),
            link.title
        ));
    }
    lines.push(BLOCK_FOOTER.to_string());
    lines
}

/// Drops a trailing markdown extension from a link target.
pub fn strip_markdown_extension(id: &str) -> &str {
    id.strip_suffix(".md")
        .or_else(|| id.strip_suffix(".markdown"))
        .unwrap_or(id)
}

/// Rewrites CRLF line breaks to LF for convention-independent comparison.
pub fn normalize_eol(text: &str) -> String {
    text.replace("\r\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::{
        canonical_reference_lines, locate, normalize_eol, strip_markdown_extension,
        BlockIntegrityError, BLOCK_FOOTER, BLOCK_HEADER,
    };
    use crate::model::document::LineRange;
    use crate::model::note::{Note, NoteLink};

    fn note_with_links(links: Vec<NoteLink>) -> Note {
        Note {
            id: "note-a".to_string(),
            title: "Note A".to_string(),
            linked_notes: links,
        }
    }

    #[test]
    fn locate_returns_none_without_markers() {
        assert_eq!(locate("# Heading\n\nBody text.\n"), Ok(None));
    }

    #[test]
    fn locate_finds_block_line_range() {
        let text = format!("intro\n{BLOCK_HEADER}\n[b]: b \"B\"\n{BLOCK_FOOTER}\ntail\n");
        assert_eq!(locate(&text), Ok(Some(LineRange::new(1, 4))));
    }

    #[test]
    fn locate_finds_block_at_end_without_trailing_newline() {
        let text = format!("intro\n{BLOCK_HEADER}\n[b]: b \"B\"\n{BLOCK_FOOTER}");
        assert_eq!(locate(&text), Ok(Some(LineRange::new(1, 4))));
    }

    #[test]
    fn locate_rejects_duplicate_markers() {
        let text = format!("{BLOCK_HEADER}\n{BLOCK_FOOTER}\n{BLOCK_HEADER}\n{BLOCK_FOOTER}\n");
        assert_eq!(locate(&text), Err(BlockIntegrityError::DuplicateHeader));
    }

    #[test]
    fn locate_rejects_lone_marker() {
        let text = format!("intro\n{BLOCK_HEADER}\n");
        assert_eq!(locate(&text), Err(BlockIntegrityError::MissingFooter));
        let text = format!("intro\n{BLOCK_FOOTER}\n");
        assert_eq!(locate(&text), Err(BlockIntegrityError::MissingHeader));
    }

    #[test]
    fn locate_rejects_footer_before_header() {
        let text = format!("{BLOCK_FOOTER}\n{BLOCK_HEADER}\n");
        assert_eq!(locate(&text), Err(BlockIntegrityError::FooterBeforeHeader));
    }

    #[test]
    fn locate_ignores_markers_sharing_one_line() {
        let text = format!("{BLOCK_HEADER} {BLOCK_FOOTER}\n");
        assert_eq!(locate(&text), Ok(None));
    }

    #[test]
    fn canonical_lines_empty_without_links() {
        assert!(canonical_reference_lines(&note_with_links(Vec::new())).is_empty());
    }

    #[test]
    fn canonical_lines_match_expected_shape() {
        let note = note_with_links(vec![NoteLink::new("note-b", "Note B")]);
        assert_eq!(
            canonical_reference_lines(&note),
            vec![
                BLOCK_HEADER.to_string(),
                "[note-b]: note-b \"Note B\"".to_string(),
                BLOCK_FOOTER.to_string(),
            ]
        );
    }

    #[test]
    fn definition_target_drops_markdown_extension() {
        let note = note_with_links(vec![NoteLink::new("note-b.md", "Note B")]);
        assert_eq!(
            canonical_reference_lines(&note)[1],
            "[note-b.md]: note-b \"Note B\""
        );
        assert_eq!(strip_markdown_extension("plain"), "plain");
        assert_eq!(strip_markdown_extension("a.markdown"), "a");
    }

    #[test]
    fn normalize_eol_rewrites_crlf_only() {
        assert_eq!(normalize_eol("a\r\nb\nc"), "a\nb\nc");
    }
}
