// crates/contract-parity-cli/src/audit.rs
// ============================================================================
// Module: Report Audit Logging
// Description: Structured audit events for report findings.
// Purpose: Emit JSON-lines records of every finding a run produced.
// Dependencies: contract-parity-core, serde, serde_json
// ============================================================================

//! ## Overview
//! A finished [`RunReport`] is replayed into a [`ReportAuditSink`] as one
//! [`FindingAuditEvent`] per finding followed by one [`SummaryAuditEvent`].
//! Sinks write JSON lines so CI systems can ingest results without parsing
//! the terminal output. Write failures are dropped; the audit log never
//! changes a run's verdict.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use contract_parity_core::Finding;
use contract_parity_core::RunReport;
use contract_parity_core::Severity;
use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Audit record for one finding.
#[derive(Debug, Clone, Serialize)]
pub struct FindingAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Command that produced the finding.
    pub command: &'static str,
    /// Outcome class.
    pub severity: Severity,
    /// Stable finding code.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Bullet details.
    pub details: Vec<String>,
}

/// Audit record closing a run.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Event timestamp (milliseconds since epoch).
    pub timestamp_ms: u128,
    /// Command that produced the report.
    pub command: &'static str,
    /// Pass count.
    pub passed: u32,
    /// Failure count.
    pub failed: u32,
    /// Warning count.
    pub warnings: u32,
    /// Overall verdict.
    pub succeeded: bool,
}

impl FindingAuditEvent {
    /// Creates an event for `finding` with the current timestamp.
    #[must_use]
    pub fn new(command: &'static str, finding: &Finding) -> Self {
        Self {
            event: "report_finding",
            timestamp_ms: now_ms(),
            command,
            severity: finding.severity,
            code: finding.code.clone(),
            message: finding.message.clone(),
            details: finding.details.clone(),
        }
    }
}

impl SummaryAuditEvent {
    /// Creates a summary event for `report` with the current timestamp.
    #[must_use]
    pub fn new(command: &'static str, report: &RunReport) -> Self {
        Self {
            event: "report_summary",
            timestamp_ms: now_ms(),
            command,
            passed: report.passed(),
            failed: report.failed(),
            warnings: report.warnings(),
            succeeded: report.succeeded(),
        }
    }
}

/// Milliseconds since the Unix epoch.
fn now_ms() -> u128 {
    SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_millis()
}

// ============================================================================
// SECTION: Trait
// ============================================================================

/// Audit sink for report events.
pub trait ReportAuditSink: Send + Sync {
    /// Record a finding event.
    fn record(&self, event: &FindingAuditEvent);

    /// Record a summary event.
    fn record_summary(&self, _event: &SummaryAuditEvent) {}
}

/// Replays every finding of `report` into `sink`, then the summary.
pub fn record_report(sink: &dyn ReportAuditSink, command: &'static str, report: &RunReport) {
    for finding in report.findings() {
        sink.record(&FindingAuditEvent::new(command, finding));
    }
    sink.record_summary(&SummaryAuditEvent::new(command, report));
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl ReportAuditSink for StderrAuditSink {
    fn record(&self, event: &FindingAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }

    fn record_summary(&self, event: &SummaryAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Serializes `event` and appends it as one line.
    fn append<T: Serialize>(&self, event: &T) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl ReportAuditSink for FileAuditSink {
    fn record(&self, event: &FindingAuditEvent) {
        self.append(event);
    }

    fn record_summary(&self, event: &SummaryAuditEvent) {
        self.append(event);
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl ReportAuditSink for NoopAuditSink {
    fn record(&self, _event: &FindingAuditEvent) {}
}
