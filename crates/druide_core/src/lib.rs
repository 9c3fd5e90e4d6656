//! Core engine for DRUIDE annotation synchronization.
//! This crate is the single source of truth for the inline annotation
//! grammar and its sync/render invariants.

pub mod codec;
pub mod logging;
pub mod model;
pub mod render;
pub mod scanner;
pub mod service;
pub mod sync;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::annotation::{
    generate_annotation_id, AnchorRange, Annotation, AnnotationId, AnnotationKind, KnowledgeBase,
};
pub use render::view::{render_clean, render_highlighted, render_view, ViewMode};
pub use scanner::locate::{locate_text, LocatedSpan};
pub use service::annotation_ops::{
    create_annotation, delete_annotation, edit_annotation_description, AnchorTarget,
    AnnotationOpError, CreatedAnnotation,
};
pub use service::engine_service::{AnnotationEngine, EngineState};
pub use sync::sync_knowledge_base;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
