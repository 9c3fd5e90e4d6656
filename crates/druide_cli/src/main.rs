//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `druide_core` linkage.
//! - Keep output deterministic for quick local sanity checks.

use druide_core::{AnnotationEngine, ViewMode};

const DEMO_DOC: &str = "This project has huge potential.\nI wonder if we should prioritize performance[^unc-demo1] or features.\n\n- Item 1\n- Item 2\n\n[^unc-demo1]: <!-- druide:uncertainty:id=demo1 -->";

fn main() {
    let engine = AnnotationEngine::new(DEMO_DOC);

    println!("druide_core version={}", druide_core::core_version());
    println!("annotations={}", engine.knowledge_base().len());
    match serde_json::to_string_pretty(engine.knowledge_base()) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("knowledge base export failed: {err}"),
    }
    println!("--- clean view ---");
    println!("{}", engine.render(ViewMode::Clean));
}
