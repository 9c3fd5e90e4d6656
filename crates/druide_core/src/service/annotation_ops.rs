//! Document-rewriting annotation operations.
//!
//! # Responsibility
//! - Create, edit and delete annotations by producing a replacement
//!   document text.
//! - Reject invalid input before any text is rewritten.
//!
//! # Invariants
//! - Every operation builds the complete new document before returning it;
//!   a failed operation leaves no partial marker or definition behind.
//! - The document is the source of truth: edits re-read kind and anchor
//!   from the live block, never from a cached annotation.

use crate::codec::block::{decode_definitions, encode_definition, encode_marker};
use crate::model::annotation::{generate_annotation_id, AnnotationId, AnnotationKind};
use crate::scanner::locate::locate_text;
use log::info;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Mutation-level error for annotation operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnotationOpError {
    /// Description was empty after trimming.
    EmptyDescription,
    /// No document span could be resolved for the requested target.
    TargetNotFound,
}

impl Display for AnnotationOpError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyDescription => write!(f, "description must not be empty"),
            Self::TargetNotFound => write!(f, "target text not found in document"),
        }
    }
}

impl Error for AnnotationOpError {}

/// Target span for a new annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnchorTarget {
    /// Direct byte offsets into the raw document.
    Range { start: usize, end: usize },
    /// Free-floating selected text, resolved via the locate chain.
    Text(String),
}

/// Result of a successful create operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedAnnotation {
    /// The rewritten document text.
    pub document: String,
    /// The freshly allocated annotation id.
    pub id: AnnotationId,
}

/// Creates an annotation over `target`, returning the rewritten document
/// and the new id.
///
/// The reference marker lands immediately after the target span; the
/// definition block is appended at the end of the document on its own
/// line. The stored anchor is the actually-matched source substring, not
/// the caller's query.
pub fn create_annotation(
    document: &str,
    target: &AnchorTarget,
    kind: AnnotationKind,
    description: &str,
) -> Result<CreatedAnnotation, AnnotationOpError> {
    let description = description.trim();
    if description.is_empty() {
        return Err(AnnotationOpError::EmptyDescription);
    }

    let (anchor_end, anchor_text) = match target {
        AnchorTarget::Range { start, end } => {
            let text = document
                .get(*start..*end)
                .ok_or(AnnotationOpError::TargetNotFound)?;
            (*end, text.to_string())
        }
        AnchorTarget::Text(query) => {
            let span = locate_text(document, query).ok_or(AnnotationOpError::TargetNotFound)?;
            (span.end, span.text)
        }
    };

    let id = generate_annotation_id();
    let marker = encode_marker(&id);
    let definition = encode_definition(&id, kind, description, &anchor_text);

    let mut next =
        String::with_capacity(document.len() + marker.len() + definition.len() + 1);
    next.push_str(&document[..anchor_end]);
    next.push_str(&marker);
    next.push_str(&document[anchor_end..]);
    next.push('\n');
    next.push_str(&definition);

    info!(
        "event=annotation_created module=ops status=ok id={id} kind={} anchor_len={}",
        kind.as_str(),
        anchor_text.len()
    );

    Ok(CreatedAnnotation { document: next, id })
}

/// Rewrites the description field of `id`'s definition block.
///
/// Kind and anchor are re-read from the current block and preserved
/// verbatim. An unknown id is a silent no-op; callers detect it by
/// comparing the returned text with the input.
pub fn edit_annotation_description(
    document: &str,
    id: &str,
    new_description: &str,
) -> Result<String, AnnotationOpError> {
    let new_description = new_description.trim();
    if new_description.is_empty() {
        return Err(AnnotationOpError::EmptyDescription);
    }

    let blocks = decode_definitions(document);
    let Some(block) = blocks.iter().find(|block| block.id == id) else {
        return Ok(document.to_string());
    };

    let rebuilt = encode_definition(
        &block.id,
        block.kind,
        new_description,
        block.anchor.as_deref().unwrap_or(""),
    );

    let mut next = document.to_string();
    next.replace_range(block.span.clone(), &rebuilt);

    info!("event=annotation_edited module=ops status=ok id={id}");

    Ok(next)
}

/// Removes every live marker and the definition block for `id`.
///
/// Pattern-based, not offset-based, so it is robust to prior renders. The
/// definition goes first; stripping markers first would break the
/// definition's own leading reference and orphan the block.
pub fn delete_annotation(document: &str, id: &str) -> String {
    let escaped = regex::escape(id);

    let definition_re = Regex::new(&format!(
        r"(?s)\s*\[\^unc-{escaped}\]:\s*<!--.*?-->",
    ))
    .expect("valid definition removal regex");
    let marker_re =
        Regex::new(&format!(r"\[\^unc-{escaped}\]")).expect("valid marker removal regex");

    let without_definition = definition_re.replace_all(document, "");
    let next = marker_re.replace_all(&without_definition, "").into_owned();

    info!("event=annotation_deleted module=ops status=ok id={id}");

    next
}
