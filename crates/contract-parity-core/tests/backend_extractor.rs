// crates/contract-parity-core/tests/backend_extractor.rs
// ============================================================================
// Module: Backend Extractor Tests
// Description: Capture contract of the route annotation pattern.
// Purpose: Ensure annotations normalize into stable endpoint keys.
// Dependencies: contract-parity-core
// ============================================================================
//! ## Overview
//! Exercises method normalization, bracketed segment collapsing, skipped
//! malformed annotations, and duplicate handling.

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
use contract_parity_core::EndpointKey;
use contract_parity_core::HttpMethod;

fn extract(text: &str) -> contract_parity_core::BackendCatalog {
    BackendExtractor::new().expect("backend extractor").extract(text)
}

fn keys(text: &str) -> Vec<String> {
    extract(text).keys().map(ToString::to_string).collect()
}

#[test]
fn extracts_status_and_demo_scenario() {
    let text = "#* @get /jobs/<id>/status\nfunction(id) {}\n\n#* @post /jobs/demo\nfunction() {}\n";
    assert_eq!(keys(text), vec!["GET /jobs/{param}/status", "POST /jobs/demo"]);
}

#[test]
fn keeps_raw_path_next_to_template() {
    let catalog = extract("#* @get /jobs/<job_id>/results\n");
    let record = catalog
        .get(&EndpointKey::new(&HttpMethod::Get, "/jobs/{param}/results"))
        .expect("record present");
    assert_eq!(record.method, HttpMethod::Get);
    assert_eq!(record.path, "/jobs/<job_id>/results");
    assert_eq!(record.path_template, "/jobs/{param}/results");
}

#[test]
fn collapses_each_bracketed_segment_independently() {
    assert_eq!(keys("#* @get /jobs/<id>/files/<name:string>\n"), vec!["GET /jobs/{param}/files/{param}"]);
    assert_eq!(keys("#* @get /jobs/<id>/log\n"), vec!["GET /jobs/{param}/log"]);
}

#[test]
fn method_is_case_insensitive_and_upper_cased() {
    assert_eq!(keys("#* @POST /jobs\n#* @Delete /jobs/<id>\n"), vec!["DELETE /jobs/{param}", "POST /jobs"]);
}

#[test]
fn tolerates_spacing_and_carriage_returns() {
    assert_eq!(keys("#*@get   /health  \r\n"), vec!["GET /health"]);
}

#[test]
fn skips_annotations_without_a_path() {
    let text = "#* @get\n#* @get health\n#* @serializer json\n#* @param id the job\n";
    assert!(extract(text).is_empty());
}

#[test]
fn ignores_unsupported_verbs() {
    assert!(extract("#* @patch /jobs/<id>\n").is_empty());
}

#[test]
fn duplicate_annotations_collapse_to_one_key() {
    let catalog = extract("#* @get /jobs/<id>\n#* @get /jobs/<job_id>\n");
    assert_eq!(catalog.len(), 1);
    let record = catalog
        .get(&EndpointKey::new(&HttpMethod::Get, "/jobs/{param}"))
        .expect("record present");
    assert_eq!(record.path, "/jobs/<job_id>", "last occurrence wins");
}

#[test]
fn empty_text_yields_empty_catalog() {
    assert!(extract("").is_empty());
}

#[test]
fn extraction_is_idempotent() {
    let text = "#* @get /jobs\n#* @post /jobs\n#* @get /jobs/<id>/status\n";
    assert_eq!(extract(text), extract(text));
}
