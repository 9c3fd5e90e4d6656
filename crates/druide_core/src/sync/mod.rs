//! Knowledge-base synchronization.
//!
//! # Responsibility
//! - Rebuild the id-to-annotation mapping from the current document text.
//! - Carry host-owned workflow state (`resolved`, metadata-less kind and
//!   description) across rebuilds.
//!
//! # Invariants
//! - An id is present after sync iff a live marker for it is in the
//!   document.
//! - Sync is idempotent: unchanged text plus its own output as `previous`
//!   yields an identical map.
//! - The first definition block per id is authoritative; duplicates are
//!   undefined document state and not defended against.

use crate::codec::block::{decode_definitions, MetadataBlock};
use crate::model::annotation::{
    Annotation, AnnotationId, AnnotationKind, KnowledgeBase, DEFAULT_DESCRIPTION,
};
use crate::scanner::markers::scan_markers;
use log::debug;
use std::collections::BTreeMap;

/// Rebuilds the knowledge base from `document`.
///
/// `previous` is only consulted for state the document does not carry:
/// the `resolved` flag, and kind/description of annotations whose
/// definition block has no metadata. Range and anchor text are always
/// refreshed from the scan.
pub fn sync_knowledge_base(document: &str, previous: &KnowledgeBase) -> KnowledgeBase {
    let metadata = metadata_table(document);
    let markers = scan_markers(document, &metadata);

    let mut refreshed = KnowledgeBase::new();
    for marker in markers {
        let entry = refreshed.entry(marker.id.clone()).or_insert_with(|| {
            previous
                .get(&marker.id)
                .cloned()
                .unwrap_or_else(|| Annotation::new(marker.id.clone(), AnnotationKind::Uncertainty))
        });

        entry.anchor_text = marker.text;
        entry.range = marker.range;

        if let Some(block) = metadata.get(&marker.id) {
            entry.kind = block.kind;
            entry.description = block
                .description
                .clone()
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string());
        }
    }

    debug!(
        "event=kb_sync module=sync status=ok live={} definitions={} document_len={}",
        refreshed.len(),
        metadata.len(),
        document.len()
    );

    refreshed
}

/// Folds decoded blocks into a first-wins table keyed by id.
pub(crate) fn metadata_table(document: &str) -> BTreeMap<AnnotationId, MetadataBlock> {
    let mut table = BTreeMap::new();
    for block in decode_definitions(document) {
        table.entry(block.id.clone()).or_insert(block);
    }
    table
}
