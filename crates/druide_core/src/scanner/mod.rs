//! Document scanning.
//!
//! # Responsibility
//! - Find live reference markers and resolve their anchor spans.
//! - Locate caller-supplied selection text inside the raw document.
//!
//! # Invariants
//! - Definition lines are never reported as live markers.
//! - Every returned span lies on `char` boundaries of the scanned document.

pub mod locate;
pub mod markers;
