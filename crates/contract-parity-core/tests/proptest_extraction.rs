// crates/contract-parity-core/tests/proptest_extraction.rs
// ============================================================================
// Module: Extraction Property Tests
// Description: Generated inputs for normalization and matching invariants.
// Purpose: Ensure placeholders replace every parameter segment.
// Dependencies: contract-parity-core, proptest
// ============================================================================
//! ## Overview
//! Generates route paths with literal and parameter segments, renders them in
//! both source syntaxes, and checks that both sides normalize identically.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use contract_parity_core::BackendExtractor;
use contract_parity_core::FrontendExtractor;
use contract_parity_core::FrontendSyntax;
use contract_parity_core::PATH_PARAM_PLACEHOLDER;
use contract_parity_core::compare;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Param(String),
}

fn segment() -> impl Strategy<Value = Segment> {
    prop_oneof![
        "[a-z][a-z0-9_]{0,8}".prop_map(Segment::Literal),
        "[a-z][a-zA-Z0-9_]{0,8}".prop_map(Segment::Param),
    ]
}

fn render(segments: &[Segment], open: &str, close: &str) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            Segment::Literal(text) => format!("/{text}"),
            Segment::Param(name) => format!("/{open}{name}{close}"),
        })
        .collect()
}

fn template(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|segment| match segment {
            Segment::Literal(text) => format!("/{text}"),
            Segment::Param(_) => format!("/{PATH_PARAM_PLACEHOLDER}"),
        })
        .collect()
}

proptest! {
    #[test]
    fn backend_normalization_replaces_every_bracket(segments in prop::collection::vec(segment(), 1..6)) {
        let extractor = BackendExtractor::new().expect("backend extractor");
        let normalized = extractor.normalize_path(&render(&segments, "<", ">"));
        prop_assert!(!normalized.contains('<'));
        prop_assert_eq!(normalized.clone(), template(&segments));
        prop_assert_eq!(extractor.normalize_path(&normalized), normalized);
    }

    #[test]
    fn both_sides_agree_on_rendered_routes(segments in prop::collection::vec(segment(), 1..6)) {
        let backend_text = format!("#* @get {}\n", render(&segments, "<", ">"));
        let frontend_text = format!("fetch(`${{API_BASE}}{}`)\n", render(&segments, "${", "}"));
        let backend = BackendExtractor::new().expect("backend extractor").extract(&backend_text);
        let frontend = FrontendExtractor::new(&FrontendSyntax::default())
            .expect("frontend extractor")
            .extract(&frontend_text);
        let result = compare(&backend, &frontend);
        prop_assert!(result.is_consistent());
        prop_assert_eq!(result.matched.len(), 1);
    }

    #[test]
    fn extraction_never_panics_on_arbitrary_text(text in ".{0,256}") {
        let backend = BackendExtractor::new().expect("backend extractor");
        let frontend = FrontendExtractor::new(&FrontendSyntax::default()).expect("frontend extractor");
        let _ = compare(&backend.extract(&text), &frontend.extract(&text));
    }
}
