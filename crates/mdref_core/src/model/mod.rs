//! Domain model shared by the reference-block subsystem.
//!
//! # Responsibility
//! - Define the note shapes consumed from the note graph.
//! - Define the document snapshot/edit types exchanged with the host.
//!
//! # Invariants
//! - Documents and notes share one id space: the filename stem.
//! - Model types are plain values; no I/O or host calls live here.

pub mod document;
pub mod note;
