//! Minimal file-based host for the reference-block service.
//!
//! # Responsibility
//! - Ingest the given markdown files into an in-memory note graph.
//! - Rewrite each file's generated link-reference block in place, or
//!   report its staleness with `--check`.

use mdref_core::{
    DocumentSnapshot, GraphGate, InMemoryGraph, LanguageId, NoteGraph, ReferenceService,
};
use std::path::Path;
use std::sync::Arc;

fn main() {
    std::process::exit(run(std::env::args().skip(1).collect()));
}

fn run(args: Vec<String>) -> i32 {
    let check_only = args.iter().any(|arg| arg == "--check");
    let files: Vec<&String> = args.iter().filter(|arg| *arg != "--check").collect();
    if files.is_empty() {
        eprintln!("usage: mdref [--check] <file.md>...");
        return 2;
    }

    let graph = Arc::new(InMemoryGraph::new());
    let gate = Arc::new(GraphGate::new());

    // Seed every file first so cross-note titles resolve.
    for path in &files {
        let Some(id) = note_id(path) else {
            continue;
        };
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(err) => {
                eprintln!("mdref: cannot read {path}: {err}");
                return 1;
            }
        };
        if let Err(err) = graph.add_note_from_markdown(&id, &text) {
            eprintln!("mdref: cannot ingest {path}: {err}");
            return 1;
        }
    }
    gate.mark_ready();

    let service = ReferenceService::new(graph, gate);
    let mut failed = false;
    for path in files {
        if let Err(message) = process_file(&service, path, check_only) {
            eprintln!("mdref: {message}");
            failed = true;
        }
    }
    if failed {
        1
    } else {
        0
    }
}

fn process_file(
    service: &ReferenceService<InMemoryGraph>,
    path: &str,
    check_only: bool,
) -> Result<(), String> {
    let language = LanguageId::from_path(path);
    if !language.is_markdown() {
        return Ok(());
    }
    let Some(id) = note_id(path) else {
        return Ok(());
    };
    let text =
        std::fs::read_to_string(path).map_err(|err| format!("cannot read {path}: {err}"))?;
    let doc = DocumentSnapshot::markdown(id, text);

    if check_only {
        match service
            .evaluate(&doc)
            .map_err(|err| format!("{path}: {err}"))?
        {
            Some(annotation) => println!("{path}: {}", annotation.text()),
            None => println!("{path}: no reference block"),
        }
        return Ok(());
    }

    if let Some(edit) = service.on_will_save(&doc) {
        if let Some(updated) = edit.apply_to(&doc) {
            std::fs::write(path, updated).map_err(|err| format!("cannot write {path}: {err}"))?;
            println!("{path}: reference block updated");
        }
    }
    Ok(())
}

fn note_id(path: &str) -> Option<String> {
    Path::new(path)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .map(|stem| stem.to_string())
}
