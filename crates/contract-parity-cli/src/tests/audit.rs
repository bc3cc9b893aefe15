// crates/contract-parity-cli/src/tests/audit.rs
// ============================================================================
// Module: Report Audit Tests
// Description: Unit tests for JSON-lines audit sinks.
// Purpose: Ensure every finding and the summary are recorded once, in order.
// Dependencies: contract-parity-cli audit module, tempfile
// ============================================================================

//! ## Overview
//! Replays reports into file and in-memory sinks and inspects the records.

use std::fs;
use std::sync::Mutex;

use contract_parity_core::RunReport;
use serde_json::Value;

use crate::audit::FileAuditSink;
use crate::audit::FindingAuditEvent;
use crate::audit::NoopAuditSink;
use crate::audit::ReportAuditSink;
use crate::audit::SummaryAuditEvent;
use crate::audit::record_report;

#[derive(Default)]
struct MemorySink {
    findings: Mutex<Vec<FindingAuditEvent>>,
    summaries: Mutex<Vec<SummaryAuditEvent>>,
}

impl ReportAuditSink for MemorySink {
    fn record(&self, event: &FindingAuditEvent) {
        self.findings.lock().unwrap().push(event.clone());
    }

    fn record_summary(&self, event: &SummaryAuditEvent) {
        self.summaries.lock().unwrap().push(event.clone());
    }
}

fn failing_report() -> RunReport {
    let mut report = RunReport::new();
    report.pass("source.backend.found", "Found 3 backend endpoints");
    report
        .fail("coverage.frontend_only", "Frontend calls endpoints not in backend:")
        .with_details(["GET /missing"]);
    report
}

#[test]
fn record_report_emits_each_finding_then_summary() {
    let sink = MemorySink::default();
    record_report(&sink, "integration", &failing_report());

    let findings = sink.findings.lock().unwrap();
    assert_eq!(findings.len(), 2);
    assert_eq!(findings[0].event, "report_finding");
    assert_eq!(findings[0].code, "source.backend.found");
    assert_eq!(findings[1].code, "coverage.frontend_only");
    assert_eq!(findings[1].details, vec!["GET /missing".to_string()]);

    let summaries = sink.summaries.lock().unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].event, "report_summary");
    assert_eq!(summaries[0].passed, 1);
    assert_eq!(summaries[0].failed, 1);
    assert!(!summaries[0].succeeded);
}

#[test]
fn file_sink_appends_json_lines() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("audit.jsonl");
    let sink = FileAuditSink::new(&path).expect("open sink");
    record_report(&sink, "backend", &failing_report());
    record_report(&sink, "backend", &RunReport::new());

    let text = fs::read_to_string(&path).expect("read audit log");
    let lines: Vec<Value> =
        text.lines().map(|line| serde_json::from_str(line).expect("json line")).collect();
    assert_eq!(lines.len(), 4);
    assert_eq!(lines[0]["event"], "report_finding");
    assert_eq!(lines[0]["command"], "backend");
    assert_eq!(lines[0]["severity"], "pass");
    assert_eq!(lines[1]["severity"], "fail");
    assert_eq!(lines[2]["event"], "report_summary");
    assert_eq!(lines[2]["succeeded"], false);
    assert_eq!(lines[3]["event"], "report_summary");
    assert_eq!(lines[3]["succeeded"], true);
    assert!(lines[0]["timestamp_ms"].as_u64().is_some());
}

#[test]
fn noop_sink_accepts_events() {
    record_report(&NoopAuditSink, "database", &failing_report());
}
