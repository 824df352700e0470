use mdref_core::{
    BlockStatus, DocumentSnapshot, GraphGate, InMemoryGraph, LineRange, NoteGraph,
    ReferenceService, BLOCK_FOOTER, BLOCK_HEADER,
};
use std::sync::Arc;

fn service_with_note(id: &str, markdown: &str) -> ReferenceService<InMemoryGraph> {
    let graph = Arc::new(InMemoryGraph::new());
    graph.add_note_from_markdown(id, markdown).unwrap();
    let gate = Arc::new(GraphGate::new());
    gate.mark_ready();
    ReferenceService::new(graph, gate)
}

#[test]
fn no_block_yields_no_annotation() {
    let service = service_with_note("note-b", "# Note B\n");
    let doc = DocumentSnapshot::markdown("note-a", "See [[note-b]]\n");
    assert_eq!(service.evaluate(&doc).unwrap(), None);
}

#[test]
fn current_block_reads_up_to_date() {
    let service = service_with_note("note-b", "# Note B\n");
    let text = format!(
        "See [[note-b]]\n\n{BLOCK_HEADER}\n[note-b]: note-b \"Note B\"\n{BLOCK_FOOTER}\n"
    );
    let doc = DocumentSnapshot::markdown("note-a", text);

    let annotation = service.evaluate(&doc).unwrap().expect("block annotated");
    assert_eq!(annotation.status, BlockStatus::UpToDate);
    assert_eq!(annotation.range, LineRange::new(2, 5));
    assert_eq!(annotation.text(), "Link references (up to date)");
}

#[test]
fn stale_block_reads_out_of_date() {
    let service = service_with_note("note-b", "# Note B\n");
    let text = format!(
        "See [[note-b]]\n\n{BLOCK_HEADER}\n[old]: old \"Old Title\"\n{BLOCK_FOOTER}\n"
    );
    let doc = DocumentSnapshot::markdown("note-a", text);

    let annotation = service.evaluate(&doc).unwrap().expect("block annotated");
    assert_eq!(annotation.status, BlockStatus::OutOfDate);
    assert_eq!(annotation.text(), "Link references (out of date)");
}

#[test]
fn comparison_is_line_ending_normalized() {
    let service = service_with_note("note-b", "# Note B\n");
    let text = format!(
        "See [[note-b]]\r\n\r\n{BLOCK_HEADER}\r\n[note-b]: note-b \"Note B\"\r\n{BLOCK_FOOTER}\r\n"
    );
    let doc = DocumentSnapshot::markdown("note-a", text);

    let annotation = service.evaluate(&doc).unwrap().expect("block annotated");
    assert_eq!(annotation.status, BlockStatus::UpToDate);
}

#[test]
fn block_with_zero_remaining_links_reads_out_of_date() {
    let service = service_with_note("note-b", "# Note B\n");
    let text = format!("no links\n\n{BLOCK_HEADER}\n[note-b]: note-b \"Note B\"\n{BLOCK_FOOTER}\n");
    let doc = DocumentSnapshot::markdown("note-a", text);

    let annotation = service.evaluate(&doc).unwrap().expect("block annotated");
    assert_eq!(annotation.status, BlockStatus::OutOfDate);
}

#[test]
fn evaluate_does_not_modify_document_state() {
    let service = service_with_note("note-b", "# Note B\n");
    let text = format!("See [[note-b]]\n\n{BLOCK_HEADER}\n[x]: x \"X\"\n{BLOCK_FOOTER}\n");
    let doc = DocumentSnapshot::markdown("note-a", text.clone());

    service.evaluate(&doc).unwrap();
    assert_eq!(doc.text, text);
}
