//! Selection-text location.
//!
//! # Responsibility
//! - Map free-floating selected text (typically lifted from a rendered
//!   view, where list bullets and indentation are gone) back to a span of
//!   the raw document.
//!
//! # Invariants
//! - Strategies are tried in order and each is a pure function; the first
//!   hit wins.
//! - The returned text is the literal document substring, never the query.

use regex::Regex;

/// Flexible separator between selection lines: tolerates a newline, leading
/// indentation and one interposed list marker.
const LINE_SEPARATOR_PATTERN: &str = r"\s*(?:\r?\n\s*(?:[-*+]|\d+\.)?\s*)?";

/// A located span of the raw document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedSpan {
    pub start: usize,
    pub end: usize,
    /// The literal matched source text, bullets and all.
    pub text: String,
}

type LocateStrategy = fn(&str, &str) -> Option<LocatedSpan>;

/// Ordered resolver chain: exact substring, trimmed substring, line-wise
/// fuzzy pattern for multi-line selections.
const STRATEGIES: &[LocateStrategy] = &[locate_exact, locate_trimmed, locate_fuzzy_lines];

/// Finds the best matching span for `query` inside `document`.
///
/// Returns `None` when every strategy is exhausted; callers must treat that
/// as "not found" and abort rather than guess an offset.
pub fn locate_text(document: &str, query: &str) -> Option<LocatedSpan> {
    STRATEGIES
        .iter()
        .find_map(|strategy| strategy(document, query))
}

fn locate_exact(document: &str, query: &str) -> Option<LocatedSpan> {
    if query.is_empty() {
        return None;
    }
    document.find(query).map(|start| LocatedSpan {
        start,
        end: start + query.len(),
        text: query.to_string(),
    })
}

fn locate_trimmed(document: &str, query: &str) -> Option<LocatedSpan> {
    locate_exact(document, query.trim())
}

fn locate_fuzzy_lines(document: &str, query: &str) -> Option<LocatedSpan> {
    let lines: Vec<&str> = query
        .split('\n')
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    if lines.len() < 2 {
        return None;
    }

    let pattern = lines
        .iter()
        .map(|line| regex::escape(line))
        .collect::<Vec<_>>()
        .join(LINE_SEPARATOR_PATTERN);
    let regex = Regex::new(&pattern).ok()?;

    regex.find(document).map(|found| LocatedSpan {
        start: found.start(),
        end: found.end(),
        text: found.as_str().to_string(),
    })
}
