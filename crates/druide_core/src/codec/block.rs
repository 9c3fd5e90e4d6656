//! Definition-block encoding and decoding.
//!
//! # Responsibility
//! - Produce the `[^unc-<id>]: <!-- druide:... -->` metadata block for one
//!   annotation.
//! - Extract every well-formed block from a document, with byte spans.
//!
//! # Invariants
//! - `decode_definitions` recovers exactly what `encode_definition` wrote,
//!   for field values free of the block delimiter sequence.
//! - Blocks whose qualified kind or id fields disagree with the leading
//!   marker id are ignored, never surfaced as errors.

use crate::model::annotation::{AnnotationId, AnnotationKind};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

// Structural match only; id/kind cross-field consistency is checked in
// code because the `regex` crate has no backreferences.
static DEFINITION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"\[\^unc-([a-zA-Z0-9-]+)\]:\s*<!--\s*druide:([a-z]+):id=([a-zA-Z0-9-]+)(?:\s+druide:([a-z]+):description="([^"]*)")?(?:\s+druide:([a-z]+):anchor="([^"]*)")?\s*-->"#,
    )
    .expect("valid definition block regex")
});

/// One decoded metadata block.
///
/// `description` and `anchor` are `None` when the block omits the field;
/// both are stored unescaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataBlock {
    pub id: AnnotationId,
    pub kind: AnnotationKind,
    pub description: Option<String>,
    pub anchor: Option<String>,
    /// Byte span of the whole block within the decoded document.
    pub span: Range<usize>,
}

/// Renders the live reference marker for `id`.
pub fn encode_marker(id: &str) -> String {
    format!("[^unc-{id}]")
}

/// Renders a complete definition block for one annotation.
///
/// Always writes both optional fields; quote characters in field values are
/// escaped so the block stays a single matchable unit.
pub fn encode_definition(
    id: &str,
    kind: AnnotationKind,
    description: &str,
    anchor: &str,
) -> String {
    let kind = kind.as_str();
    format!(
        "[^unc-{id}]: <!-- druide:{kind}:id={id} druide:{kind}:description=\"{}\" druide:{kind}:anchor=\"{}\" -->",
        escape_field(description),
        escape_field(anchor),
    )
}

/// Extracts all well-formed definition blocks in document order.
///
/// Malformed or partially written blocks (inconsistent ids, unknown kind,
/// broken structure) are skipped as if absent.
pub fn decode_definitions(document: &str) -> Vec<MetadataBlock> {
    let mut blocks = Vec::new();

    for caps in DEFINITION_RE.captures_iter(document) {
        let Some(whole) = caps.get(0) else { continue };
        let marker_id = &caps[1];
        let kind_token = &caps[2];

        if &caps[3] != marker_id {
            debug!(
                "event=definition_skipped module=codec status=id_mismatch offset={}",
                whole.start()
            );
            continue;
        }
        let Some(kind) = AnnotationKind::parse(kind_token) else {
            debug!(
                "event=definition_skipped module=codec status=unknown_kind offset={}",
                whole.start()
            );
            continue;
        };
        let kinds_consistent = caps.get(4).map_or(true, |m| m.as_str() == kind_token)
            && caps.get(6).map_or(true, |m| m.as_str() == kind_token);
        if !kinds_consistent {
            debug!(
                "event=definition_skipped module=codec status=kind_mismatch offset={}",
                whole.start()
            );
            continue;
        }

        blocks.push(MetadataBlock {
            id: marker_id.to_string(),
            kind,
            description: caps.get(5).map(|m| unescape_field(m.as_str())),
            anchor: caps.get(7).map(|m| unescape_field(m.as_str())),
            span: whole.range(),
        });
    }

    blocks
}

fn escape_field(value: &str) -> String {
    value.replace('"', "&quot;")
}

fn unescape_field(value: &str) -> String {
    value.replace("&quot;", "\"")
}
