//! Engine state facade.
//!
//! # Responsibility
//! - Hold the document/knowledge-base pair as one explicit state value.
//! - Re-sync after every mutation so callers can always trust the
//!   knowledge base they read.
//!
//! # Invariants
//! - The knowledge base always reflects the held document text.
//! - Mutations replace the document wholesale; no component keeps a stale
//!   copy past its operation boundary.

use crate::model::annotation::{AnnotationId, AnnotationKind, KnowledgeBase};
use crate::render::view::{render_view, ViewMode};
use crate::service::annotation_ops::{
    create_annotation, delete_annotation, edit_annotation_description, AnchorTarget,
    AnnotationOpError,
};
use crate::sync::sync_knowledge_base;

/// Document text paired with the knowledge base derived from it.
///
/// Kept as a plain value so sync, render and mutation stay pure functions
/// over it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineState {
    pub document: String,
    pub knowledge_base: KnowledgeBase,
}

impl EngineState {
    /// Builds state from a document, with a freshly synced knowledge base.
    pub fn from_document(document: impl Into<String>) -> Self {
        let document = document.into();
        let knowledge_base = sync_knowledge_base(&document, &KnowledgeBase::new());
        Self {
            document,
            knowledge_base,
        }
    }
}

/// Use-case facade over one document's annotation state.
pub struct AnnotationEngine {
    state: EngineState,
}

impl AnnotationEngine {
    /// Creates an engine over `document` and runs the initial sync.
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            state: EngineState::from_document(document),
        }
    }

    /// Current document text.
    pub fn document(&self) -> &str {
        &self.state.document
    }

    /// Current knowledge base.
    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.state.knowledge_base
    }

    /// Replaces the document after an external free-form edit and re-syncs.
    pub fn replace_document(&mut self, document: impl Into<String>) {
        self.state.document = document.into();
        self.resync();
    }

    /// Rebuilds the knowledge base from the held document.
    pub fn resync(&mut self) {
        self.state.knowledge_base =
            sync_knowledge_base(&self.state.document, &self.state.knowledge_base);
    }

    /// Creates an annotation and returns its new id.
    pub fn create_annotation(
        &mut self,
        target: &AnchorTarget,
        kind: AnnotationKind,
        description: &str,
    ) -> Result<AnnotationId, AnnotationOpError> {
        let created = create_annotation(&self.state.document, target, kind, description)?;
        self.state.document = created.document;
        self.resync();
        Ok(created.id)
    }

    /// Rewrites an annotation's description.
    ///
    /// Returns whether the document changed; an unknown id leaves it
    /// untouched.
    pub fn edit_description(
        &mut self,
        id: &str,
        new_description: &str,
    ) -> Result<bool, AnnotationOpError> {
        let edited = edit_annotation_description(&self.state.document, id, new_description)?;
        let changed = edited != self.state.document;
        if changed {
            self.state.document = edited;
            self.resync();
        }
        Ok(changed)
    }

    /// Strips an annotation's marker and definition from the document.
    pub fn delete_annotation(&mut self, id: &str) {
        self.state.document = delete_annotation(&self.state.document, id);
        self.resync();
    }

    /// Flags workflow resolution state on one annotation.
    ///
    /// Returns false when the id is not live. The flag survives re-syncs
    /// but is never written into the document.
    pub fn set_resolved(&mut self, id: &str, resolved: bool) -> bool {
        match self.state.knowledge_base.get_mut(id) {
            Some(annotation) => {
                annotation.resolved = resolved;
                true
            }
            None => false,
        }
    }

    /// Renders the held document in the requested view mode.
    pub fn render(&self, mode: ViewMode) -> String {
        render_view(&self.state.document, &self.state.knowledge_base, mode)
    }

    /// Consumes the engine, yielding the state pair.
    pub fn into_state(self) -> EngineState {
        self.state
    }
}
