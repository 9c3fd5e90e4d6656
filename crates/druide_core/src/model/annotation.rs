//! Annotation domain model.
//!
//! # Responsibility
//! - Define the canonical annotation record shared by sync, render and
//!   mutation paths.
//! - Keep the knowledge-base export shape stable for external tooling.
//!
//! # Invariants
//! - `id` is stable and never reused while the annotation is live.
//! - `range.end >= range.start`; a zero-length range means "unresolved".
//! - Wire field names (`id`, `kind`, `description`, `anchorText`, `range`,
//!   `resolved`) never change without a tooling migration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Short opaque identifier for an annotation.
///
/// Matches the inline grammar `[a-zA-Z0-9-]+`. Kept as a type alias to make
/// semantic intent explicit in signatures.
pub type AnnotationId = String;

/// Authoritative in-memory mapping from annotation id to its resolved state.
///
/// Ordered map so iteration and JSON export are deterministic.
pub type KnowledgeBase = BTreeMap<AnnotationId, Annotation>;

/// Description applied when a definition block carries no description field.
pub const DEFAULT_DESCRIPTION: &str = "Unknown";

/// Anchor text applied when no anchor can be inferred at all.
pub const PLACEHOLDER_ANCHOR: &str = "anchor";

/// Category of a user-attached annotation.
///
/// Kinds differ only in rendering style and question semantics; the record
/// shape is identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnnotationKind {
    /// An open question the author is unsure about.
    Uncertainty,
    /// A decision point; its description doubles as the question.
    Decision,
}

impl AnnotationKind {
    /// Returns the kind token used inside definition blocks.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Uncertainty => "uncertainty",
            Self::Decision => "decision",
        }
    }

    /// Parses a kind token from a definition block.
    pub fn parse(token: &str) -> Option<Self> {
        match token {
            "uncertainty" => Some(Self::Uncertainty),
            "decision" => Some(Self::Decision),
            _ => None,
        }
    }

    /// Returns the CSS class carried by highlighted-view spans.
    pub fn highlight_class(self) -> &'static str {
        match self {
            Self::Uncertainty => "highlight-uncertainty",
            Self::Decision => "highlight-decision",
        }
    }
}

/// Byte-offset span into the current document.
///
/// Offsets are only valid against the exact document text they were
/// resolved from; consumers must re-validate before slicing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnchorRange {
    pub start: usize,
    pub end: usize,
}

impl AnchorRange {
    /// Creates a span covering `start..end`.
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Creates a zero-length span at `position`, the "unresolved" shape.
    pub fn collapsed_at(position: usize) -> Self {
        Self {
            start: position,
            end: position,
        }
    }

    /// Returns whether this range carries no anchor text.
    pub fn is_collapsed(self) -> bool {
        self.start == self.end
    }
}

/// Canonical record for one live annotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Stable id, also embedded in the document's marker and definition.
    pub id: AnnotationId,
    pub kind: AnnotationKind,
    /// User-supplied note; for `Decision` this is the question itself.
    pub description: String,
    /// Exact document substring this annotation is attached to, as last
    /// resolved. Serialized as `anchorText` to match external tooling.
    #[serde(rename = "anchorText")]
    pub anchor_text: String,
    /// Recomputed on every sync, never persisted.
    pub range: AnchorRange,
    /// Workflow flag owned by the host; the core only initializes it.
    pub resolved: bool,
}

impl Annotation {
    /// Creates a fresh record with default description and an unresolved
    /// anchor. Sync refreshes the anchor fields immediately after.
    pub fn new(id: impl Into<AnnotationId>, kind: AnnotationKind) -> Self {
        Self {
            id: id.into(),
            kind,
            description: DEFAULT_DESCRIPTION.to_string(),
            anchor_text: PLACEHOLDER_ANCHOR.to_string(),
            range: AnchorRange::collapsed_at(0),
            resolved: false,
        }
    }
}

/// Allocates a new short opaque annotation id.
///
/// First six hex characters of a v4 UUID: short enough for inline markers,
/// random enough to never collide within one document.
pub fn generate_annotation_id() -> AnnotationId {
    let hex = Uuid::new_v4().simple().to_string();
    hex[..6].to_string()
}
