//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate block location, canonical generation and edit proposal
//!   into host-facing APIs.
//! - Keep host wiring decoupled from block/graph details.

pub mod reference_service;
