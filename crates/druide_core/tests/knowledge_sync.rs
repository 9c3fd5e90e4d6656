use druide_core::{sync_knowledge_base, AnchorRange, AnnotationKind, KnowledgeBase};

const DEMO_DOC: &str = "I wonder if we should prioritize performance[^unc-demo1] or features.\n\n[^unc-demo1]: <!-- druide:uncertainty:id=demo1 -->";

#[test]
fn demo_document_resolves_heuristic_anchor() {
    let kb = sync_knowledge_base(DEMO_DOC, &KnowledgeBase::new());

    assert_eq!(kb.len(), 1);
    let item = &kb["demo1"];
    assert_eq!(item.kind, AnnotationKind::Uncertainty);
    assert_eq!(item.description, "Unknown");
    assert_eq!(item.anchor_text, "performance");
    assert_eq!(
        &DEMO_DOC[item.range.start..item.range.end],
        "performance"
    );
}

#[test]
fn sync_is_idempotent_on_unchanged_text() {
    let first = sync_knowledge_base(DEMO_DOC, &KnowledgeBase::new());
    let second = sync_knowledge_base(DEMO_DOC, &first);
    assert_eq!(first, second);
}

#[test]
fn rebuild_contains_exactly_the_live_marker_ids() {
    let doc = concat!(
        "alpha[^unc-a1] beta[^unc-b2] gamma\n\n",
        "[^unc-a1]: <!-- druide:uncertainty:id=a1 -->\n",
        "[^unc-b2]: <!-- druide:decision:id=b2 -->\n",
        // Definition without any live marker: must not surface.
        "[^unc-c3]: <!-- druide:uncertainty:id=c3 -->",
    );
    let kb = sync_knowledge_base(doc, &KnowledgeBase::new());

    let ids: Vec<&str> = kb.keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["a1", "b2"]);
}

#[test]
fn metadata_refreshes_description_and_kind() {
    let before = concat!(
        "some word[^unc-a1]\n\n",
        r#"[^unc-a1]: <!-- druide:uncertainty:id=a1 druide:uncertainty:description="old" -->"#,
    );
    let after = concat!(
        "some word[^unc-a1]\n\n",
        r#"[^unc-a1]: <!-- druide:decision:id=a1 druide:decision:description="new" -->"#,
    );

    let kb = sync_knowledge_base(before, &KnowledgeBase::new());
    assert_eq!(kb["a1"].description, "old");

    let kb = sync_knowledge_base(after, &kb);
    assert_eq!(kb["a1"].description, "new");
    assert_eq!(kb["a1"].kind, AnnotationKind::Decision);
}

#[test]
fn stored_anchor_beats_heuristic_resolution() {
    let doc = concat!(
        "we should measure twice and cut once[^unc-a1]\n\n",
        r#"[^unc-a1]: <!-- druide:uncertainty:id=a1 druide:uncertainty:anchor="measure twice" -->"#,
    );
    let kb = sync_knowledge_base(doc, &KnowledgeBase::new());

    let item = &kb["a1"];
    assert_eq!(item.anchor_text, "measure twice");
    assert_eq!(&doc[item.range.start..item.range.end], "measure twice");
}

#[test]
fn drifted_anchor_is_replaced_by_heuristic_guess() {
    let doc = concat!(
        "the wording changed completely[^unc-a1]\n\n",
        r#"[^unc-a1]: <!-- druide:uncertainty:id=a1 druide:uncertainty:anchor="original phrasing" -->"#,
    );
    let kb = sync_knowledge_base(doc, &KnowledgeBase::new());

    let item = &kb["a1"];
    assert_eq!(item.anchor_text, "completely");
    assert_eq!(&doc[item.range.start..item.range.end], "completely");
}

#[test]
fn marker_with_nothing_before_it_collapses_at_marker() {
    let doc = "[^unc-a1] leading marker";
    let kb = sync_knowledge_base(doc, &KnowledgeBase::new());

    let item = &kb["a1"];
    assert_eq!(item.anchor_text, "anchor");
    assert_eq!(item.range, AnchorRange::collapsed_at(0));
}

#[test]
fn kb_export_is_a_stable_json_mapping() {
    let kb = sync_knowledge_base(DEMO_DOC, &KnowledgeBase::new());
    let json = serde_json::to_value(&kb).unwrap();

    let entry = &json["demo1"];
    assert_eq!(entry["id"], "demo1");
    assert_eq!(entry["kind"], "uncertainty");
    assert_eq!(entry["anchorText"], "performance");
    assert!(entry["range"]["start"].is_u64());
    assert!(entry["range"]["end"].is_u64());
    assert_eq!(entry["resolved"], false);

    let round_tripped: KnowledgeBase = serde_json::from_value(json).unwrap();
    assert_eq!(round_tripped, kb);
}
