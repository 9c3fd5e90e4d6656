//! Engine use-case services.
//!
//! # Responsibility
//! - Orchestrate codec, scanner, sync and render into caller-facing
//!   operations.
//! - Keep host layers decoupled from the inline grammar.

pub mod annotation_ops;
pub mod engine_service;
