//! Derived-view rendering.
//!
//! # Responsibility
//! - Produce read-only projections of the document for downstream markup
//!   rendering: annotation syntax stripped, or anchor spans wrapped in
//!   styled markers first.
//!
//! # Invariants
//! - Rendering never mutates the source document.
//! - A failed consistency check skips one annotation, never corrupts the
//!   output.

pub mod view;
