//! Domain model for the annotation engine.
//!
//! # Responsibility
//! - Define canonical data structures used by sync, render and mutation
//!   logic.
//! - Keep one annotation-centric shape for both uncertainty and decision
//!   projections.
//!
//! # Invariants
//! - Every annotation is identified by a stable short id.
//! - The knowledge base holds an entry iff a live marker exists in the
//!   document.

pub mod annotation;
