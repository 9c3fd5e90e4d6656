//! Clean and highlighted view derivation.
//!
//! # Responsibility
//! - Strip definition blocks and live markers for the clean view.
//! - Splice highlight spans around anchor ranges for the highlighted view,
//!   right-to-left so pending offsets stay valid.
//!
//! # Invariants
//! - Splices are only applied where the stored anchor text still matches
//!   the live document at the stored range.
//! - Definition removal happens before marker removal; the reverse would
//!   break definition syntax mid-strip.

use crate::model::annotation::{Annotation, KnowledgeBase};
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

static DEFINITION_STRIP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\s*\[\^unc-[a-zA-Z0-9-]+\]:\s*<!--.*?-->\s*")
        .expect("valid definition strip regex")
});

static MARKER_STRIP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[\^unc-[a-zA-Z0-9-]+\]").expect("valid marker strip regex"));

static LIST_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*(?:[-*+]|\d+\.))\s+(.*)$").expect("valid list line regex"));

static LIST_START_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*(?:[-*+]|\d+\.)\s").expect("valid list start regex"));

/// Target projection of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Annotation syntax removed entirely.
    Clean,
    /// Anchor spans wrapped in styled markers, then syntax removed.
    Highlighted,
}

/// Renders `document` in the requested mode.
pub fn render_view(document: &str, knowledge_base: &KnowledgeBase, mode: ViewMode) -> String {
    match mode {
        ViewMode::Clean => render_clean(document),
        ViewMode::Highlighted => render_highlighted(document, knowledge_base),
    }
}

/// Strips every definition block (with its surrounding incidental
/// whitespace) and every remaining live marker.
pub fn render_clean(document: &str) -> String {
    let without_definitions = DEFINITION_STRIP_RE.replace_all(document, "");
    MARKER_STRIP_RE
        .replace_all(&without_definitions, "")
        .into_owned()
}

/// Wraps each annotation's anchor span in a styled, id-tagged marker, then
/// strips annotation syntax like [`render_clean`].
///
/// Annotations are spliced in descending `range.end` order against the
/// original offsets, so earlier splices never invalidate later ones. A span
/// whose stored text no longer matches the document is skipped.
pub fn render_highlighted(document: &str, knowledge_base: &KnowledgeBase) -> String {
    let mut annotations: Vec<&Annotation> = knowledge_base.values().collect();
    annotations.sort_by(|a, b| b.range.end.cmp(&a.range.end));

    let mut markdown = document.to_string();
    for annotation in annotations {
        let range = annotation.range.start..annotation.range.end;
        let matches_document = markdown
            .get(range.clone())
            .map_or(false, |target| target == annotation.anchor_text);
        if !matches_document {
            warn!(
                "event=highlight_skipped module=render status=stale_range id={} start={} end={}",
                annotation.id, annotation.range.start, annotation.range.end
            );
            continue;
        }

        let wrapped = wrap_anchor(&markdown[range.clone()], annotation);
        markdown.replace_range(range, &wrapped);
    }

    render_clean(&markdown)
}

/// Wraps anchor content in the annotation's highlight span.
///
/// Multi-line content and list fragments are wrapped per line, keeping the
/// list marker outside the span and whitespace-only lines untouched.
fn wrap_anchor(content: &str, annotation: &Annotation) -> String {
    let open = format!(
        "<span class=\"{}\" data-id=\"{}\">",
        annotation.kind.highlight_class(),
        annotation.id
    );
    const CLOSE: &str = "</span>";

    if !content.contains('\n') && !LIST_START_RE.is_match(content) {
        return format!("{open}{content}{CLOSE}");
    }

    content
        .split('\n')
        .map(|line| {
            if let Some(caps) = LIST_LINE_RE.captures(line) {
                format!("{} {open}{}{CLOSE}", &caps[1], &caps[2])
            } else if line.trim().is_empty() {
                line.to_string()
            } else {
                format!("{open}{line}{CLOSE}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::{render_clean, render_highlighted};
    use crate::model::annotation::KnowledgeBase;
    use crate::sync::sync_knowledge_base;

    #[test]
    fn clean_strips_multiline_indented_definition() {
        let doc = concat!(
            "- point one[^unc-a1]\n",
            "  [^unc-a1]: <!-- druide:uncertainty:id=a1\n",
            "      druide:uncertainty:description=\"why?\" -->\n",
            "- point two\n",
        );
        let clean = render_clean(doc);

        assert!(!clean.contains("[^unc-"));
        assert!(!clean.contains("druide:"));
        assert!(clean.contains("- point one"));
        assert!(clean.contains("- point two"));
    }

    #[test]
    fn highlight_wraps_single_word_anchor() {
        let doc = concat!(
            "choose performance[^unc-a1] today\n\n",
            r#"[^unc-a1]: <!-- druide:uncertainty:id=a1 druide:uncertainty:anchor="performance" -->"#,
        );
        let kb = sync_knowledge_base(doc, &KnowledgeBase::new());
        let highlighted = render_highlighted(doc, &kb);

        assert!(highlighted.contains(
            "<span class=\"highlight-uncertainty\" data-id=\"a1\">performance</span>"
        ));
        assert!(!highlighted.contains("[^unc-"));
        assert!(!highlighted.contains("druide:"));
    }

    #[test]
    fn highlight_wraps_list_lines_individually() {
        let doc = concat!(
            "- Item 1\n- Item 2[^unc-a1]\n\n",
            r#"[^unc-a1]: <!-- druide:decision:id=a1 druide:decision:anchor="- Item 1"#,
            "\n",
            r#"- Item 2" -->"#,
        );
        let kb = sync_knowledge_base(doc, &KnowledgeBase::new());
        let highlighted = render_highlighted(doc, &kb);

        assert!(highlighted
            .contains("- <span class=\"highlight-decision\" data-id=\"a1\">Item 1</span>"));
        assert!(highlighted
            .contains("- <span class=\"highlight-decision\" data-id=\"a1\">Item 2</span>"));
        // Bullets stay outside the spans.
        assert!(!highlighted.contains(">- Item"));
    }

    #[test]
    fn stale_range_is_left_unhighlighted() {
        let doc = "choose performance[^unc-a1] today";
        let mut kb = sync_knowledge_base(doc, &KnowledgeBase::new());
        kb.get_mut("a1").expect("entry exists").anchor_text = "something else".to_string();

        let highlighted = render_highlighted(doc, &kb);
        assert!(!highlighted.contains("<span"));
        assert!(highlighted.contains("choose performance today"));
    }

    #[test]
    fn render_does_not_mutate_input_or_later_sync() {
        let doc = concat!(
            "word[^unc-a1]\n\n",
            r#"[^unc-a1]: <!-- druide:uncertainty:id=a1 druide:uncertainty:anchor="word" -->"#,
        );
        let kb = sync_knowledge_base(doc, &KnowledgeBase::new());

        let _ = render_clean(doc);
        let _ = render_highlighted(doc, &kb);

        assert_eq!(sync_knowledge_base(doc, &kb), kb);
    }
}
