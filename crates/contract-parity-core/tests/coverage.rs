// crates/contract-parity-core/tests/coverage.rs
// ============================================================================
// Module: Coverage Matcher Tests
// Description: Partition and severity behavior of endpoint comparison.
// Purpose: Ensure frontend-only calls fail and backend-only routes warn.
// Dependencies: contract-parity-core
// ============================================================================
//! ## Overview
//! Builds catalogs from records directly so the matcher is tested without
//! any extraction pattern in the loop.

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

use std::collections::BTreeSet;

use contract_parity_core::EndpointCatalog;
use contract_parity_core::EndpointKey;
use contract_parity_core::EndpointRecord;
use contract_parity_core::HttpMethod;
use contract_parity_core::Severity;
use contract_parity_core::compare;

fn catalog(entries: &[(HttpMethod, &str)]) -> EndpointCatalog {
    EndpointCatalog::from_records(
        entries.iter().map(|(method, template)| EndpointRecord::new(method.clone(), *template, *template)),
    )
}

fn key_set(keys: &BTreeSet<EndpointKey>) -> Vec<&str> {
    keys.iter().map(EndpointKey::as_str).collect()
}

#[test]
fn partitions_mismatches_on_both_sides() {
    let backend = catalog(&[
        (HttpMethod::Get, "/jobs/{param}/status"),
        (HttpMethod::Post, "/jobs/demo"),
    ]);
    let frontend = catalog(&[(HttpMethod::Post, "/jobs/demo"), (HttpMethod::Get, "/jobs")]);
    let result = compare(&backend, &frontend);

    assert_eq!(key_set(&result.missing_in_frontend), vec!["GET /jobs/{param}/status"]);
    assert_eq!(key_set(&result.missing_in_backend), vec!["GET /jobs"]);
    assert_eq!(key_set(&result.matched), vec!["POST /jobs/demo"]);
    assert!(!result.is_consistent());

    let report = result.report();
    assert!(report.has_code("coverage.backend_only"));
    assert!(report.has_code("coverage.frontend_only"));
    assert!(report.has_code("coverage.matched"));
    assert_eq!(report.failed(), 1);
    assert_eq!(report.warnings(), 1);
    assert_eq!(report.passed(), 1);
    assert!(!report.succeeded());
}

#[test]
fn mismatch_details_list_every_key() {
    let backend = catalog(&[(HttpMethod::Get, "/a"), (HttpMethod::Get, "/b")]);
    let frontend = catalog(&[(HttpMethod::Delete, "/c")]);
    let report = compare(&backend, &frontend).report();
    let backend_only = report
        .findings()
        .iter()
        .find(|finding| finding.code == "coverage.backend_only")
        .expect("backend-only finding");
    assert_eq!(backend_only.severity, Severity::Warn);
    assert_eq!(backend_only.details, vec!["GET /a", "GET /b"]);
    assert!(!report.has_code("coverage.matched"), "nothing matched");
}

#[test]
fn method_is_part_of_the_contract() {
    let backend = catalog(&[(HttpMethod::Post, "/jobs")]);
    let frontend = catalog(&[(HttpMethod::Get, "/jobs")]);
    let result = compare(&backend, &frontend);
    assert!(result.matched.is_empty());
    assert_eq!(result.missing_in_backend.len(), 1);
    assert_eq!(result.missing_in_frontend.len(), 1);
}

#[test]
fn identical_catalogs_are_consistent() {
    let backend = catalog(&[(HttpMethod::Get, "/health"), (HttpMethod::Get, "/jobs")]);
    let result = compare(&backend, &backend.clone());
    assert!(result.is_consistent());
    let report = result.report();
    assert!(report.succeeded());
    assert_eq!(report.warnings(), 0);
    assert!(report.has_code("coverage.backend_covered"));
    assert!(report.has_code("coverage.frontend_covered"));
    let matched = report
        .findings()
        .iter()
        .find(|finding| finding.code == "coverage.matched")
        .expect("matched finding");
    assert_eq!(matched.message, "2 endpoints correctly matched between frontend and backend");
}

#[test]
fn backend_only_routes_never_fail_the_report() {
    let backend = catalog(&[(HttpMethod::Get, "/health"), (HttpMethod::Get, "/admin")]);
    let frontend = catalog(&[(HttpMethod::Get, "/health")]);
    let report = compare(&backend, &frontend).report();
    assert!(report.succeeded());
    assert_eq!(report.warnings(), 1);
}

#[test]
fn partition_is_disjoint_and_complete() {
    let backend = catalog(&[(HttpMethod::Get, "/a"), (HttpMethod::Post, "/b"), (HttpMethod::Get, "/c")]);
    let frontend = catalog(&[(HttpMethod::Get, "/a"), (HttpMethod::Get, "/d")]);
    let result = compare(&backend, &frontend);

    assert!(result.matched.is_disjoint(&result.missing_in_frontend));
    assert!(result.matched.is_disjoint(&result.missing_in_backend));
    let backend_union: BTreeSet<_> = result.matched.union(&result.missing_in_frontend).cloned().collect();
    let frontend_union: BTreeSet<_> = result.matched.union(&result.missing_in_backend).cloned().collect();
    assert_eq!(backend_union, backend.key_set());
    assert_eq!(frontend_union, frontend.key_set());
}

#[test]
fn comparison_serializes_as_sorted_key_lists() {
    let backend = catalog(&[(HttpMethod::Get, "/b"), (HttpMethod::Get, "/a")]);
    let result = compare(&backend, &EndpointCatalog::default());
    let value = serde_json::to_value(&result).expect("serialize");
    assert_eq!(value["missing_in_frontend"], serde_json::json!(["GET /a", "GET /b"]));
    assert_eq!(value["matched"], serde_json::json!([]));
}
