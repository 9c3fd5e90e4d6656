//! Live-marker scan and anchor resolution.
//!
//! # Responsibility
//! - Enumerate every live `[^unc-<id>]` reference in a document.
//! - Resolve each marker's anchor span from stored metadata, falling back
//!   to a positional heuristic when the metadata anchor has drifted.
//!
//! # Invariants
//! - A marker immediately followed by `:` is a definition, not a live
//!   reference, and is excluded from the scan.
//! - Resolution never fails: at worst the span collapses to zero length at
//!   the marker position.

use crate::codec::block::MetadataBlock;
use crate::model::annotation::{AnchorRange, AnnotationId, PLACEHOLDER_ANCHOR};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

/// Lookback distance, in characters, for the heuristic anchor guess.
const HEURISTIC_WINDOW_CHARS: usize = 50;

static MARKER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\^unc-([a-zA-Z0-9-]+)\]").expect("valid marker regex"));

static EMBEDDED_COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").expect("valid comment regex"));

/// One live marker with its resolved anchor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedMarker {
    pub id: AnnotationId,
    pub range: AnchorRange,
    pub text: String,
}

/// Scans `document` for live markers and resolves each anchor span.
///
/// Resolution policy per marker:
/// 1. Metadata carries a non-empty anchor: rightmost occurrence of that
///    exact text before the marker. A miss is anchor drift; it is logged
///    and resolution falls through to the heuristic.
/// 2. Heuristic: last whitespace-separated token of the (comment-stripped)
///    window preceding the marker, located by the same rightmost-prior
///    search. No token at all yields a placeholder anchor collapsed at the
///    marker position.
pub fn scan_markers(
    document: &str,
    metadata: &BTreeMap<AnnotationId, MetadataBlock>,
) -> Vec<ResolvedMarker> {
    let mut markers = Vec::new();

    for caps in MARKER_RE.captures_iter(document) {
        let Some(whole) = caps.get(0) else { continue };
        // Lookahead exclusion: `[^unc-x]:` introduces a definition line.
        if document[whole.end()..].starts_with(':') {
            continue;
        }

        let id = caps[1].to_string();
        let stored_anchor = metadata
            .get(&id)
            .and_then(|block| block.anchor.as_deref())
            .filter(|anchor| !anchor.is_empty());

        let (text, range) = resolve_anchor(document, whole.start(), &id, stored_anchor);
        markers.push(ResolvedMarker { id, range, text });
    }

    markers
}

fn resolve_anchor(
    document: &str,
    marker_start: usize,
    id: &str,
    stored_anchor: Option<&str>,
) -> (String, AnchorRange) {
    let prefix = &document[..marker_start];

    if let Some(anchor) = stored_anchor {
        if let Some(start) = prefix.rfind(anchor) {
            return (
                anchor.to_string(),
                AnchorRange::new(start, start + anchor.len()),
            );
        }
        warn!(
            "event=anchor_drift module=scanner status=fallback id={id} anchor_len={} marker_offset={marker_start}",
            anchor.len()
        );
    }

    heuristic_anchor(document, marker_start)
}

/// Guesses an anchor from the text immediately preceding the marker.
fn heuristic_anchor(document: &str, marker_start: usize) -> (String, AnchorRange) {
    let prefix = &document[..marker_start];
    let window_start = prefix
        .char_indices()
        .rev()
        .take(HEURISTIC_WINDOW_CHARS)
        .last()
        .map(|(index, _)| index)
        .unwrap_or(0);
    let window = EMBEDDED_COMMENT_RE.replace_all(&prefix[window_start..], "");

    match window.trim_end().split_whitespace().last() {
        Some(token) => match prefix.rfind(token) {
            Some(start) => (
                token.to_string(),
                AnchorRange::new(start, start + token.len()),
            ),
            // Comment stripping can synthesize a token absent from the raw
            // text; keep the guess but leave the span unresolved.
            None => (token.to_string(), AnchorRange::collapsed_at(marker_start)),
        },
        None => (
            PLACEHOLDER_ANCHOR.to_string(),
            AnchorRange::collapsed_at(marker_start),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::scan_markers;
    use crate::codec::block::decode_definitions;
    use crate::model::annotation::AnchorRange;
    use std::collections::BTreeMap;

    fn metadata_table(document: &str) -> BTreeMap<String, super::MetadataBlock> {
        let mut table = BTreeMap::new();
        for block in decode_definitions(document) {
            table.entry(block.id.clone()).or_insert(block);
        }
        table
    }

    #[test]
    fn definition_marker_is_not_a_live_reference() {
        let doc = "[^unc-a1]: <!-- druide:uncertainty:id=a1 -->";
        let markers = scan_markers(doc, &metadata_table(doc));
        assert!(markers.is_empty());
    }

    #[test]
    fn stored_anchor_resolves_to_rightmost_prior_occurrence() {
        let doc = concat!(
            "speed or speed[^unc-a1] matters\n\n",
            r#"[^unc-a1]: <!-- druide:uncertainty:id=a1 druide:uncertainty:anchor="speed" -->"#,
        );
        let markers = scan_markers(doc, &metadata_table(doc));

        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].text, "speed");
        assert_eq!(markers[0].range, AnchorRange::new(9, 14));
    }

    #[test]
    fn heuristic_takes_last_word_before_marker() {
        let doc = "prioritize performance[^unc-demo1] or features";
        let markers = scan_markers(doc, &BTreeMap::new());

        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].text, "performance");
        assert_eq!(markers[0].range, AnchorRange::new(11, 22));
    }

    #[test]
    fn drifted_anchor_falls_back_to_heuristic() {
        let doc = concat!(
            "we rewrote this sentence[^unc-a1] entirely\n\n",
            r#"[^unc-a1]: <!-- druide:uncertainty:id=a1 druide:uncertainty:anchor="old wording" -->"#,
        );
        let markers = scan_markers(doc, &metadata_table(doc));

        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].text, "sentence");
        assert_eq!(markers[0].range, AnchorRange::new(16, 24));
    }

    #[test]
    fn marker_at_document_start_collapses_to_placeholder() {
        let doc = "[^unc-a1] rest of text";
        let markers = scan_markers(doc, &BTreeMap::new());

        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].text, "anchor");
        assert_eq!(markers[0].range, AnchorRange::collapsed_at(0));
    }

    #[test]
    fn heuristic_window_is_char_boundary_safe() {
        // 60 two-byte chars put the 50-char window start inside multibyte
        // territory; the scan must not panic and still finds the last word.
        let padding = "é".repeat(60);
        let doc = format!("{padding} mot[^unc-a1]");
        let markers = scan_markers(&doc, &BTreeMap::new());

        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].text, "mot");
    }

    #[test]
    fn heuristic_strips_comment_text_from_lookback_window() {
        let doc = "alpha <!-- druide:decision:id=b2 --> [^unc-a1]";
        let markers = scan_markers(doc, &BTreeMap::new());

        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].text, "alpha");
        assert_eq!(markers[0].range, AnchorRange::new(0, 5));
    }
}
