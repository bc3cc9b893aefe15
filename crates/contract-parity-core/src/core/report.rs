// crates/contract-parity-core/src/core/report.rs
// ============================================================================
// Module: Run Report Accumulator
// Description: Ordered findings with pass/fail/warning counters.
// Purpose: Let every check return a value instead of logging side effects.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Each check builds and returns its own [`RunReport`]; orchestrators combine
//! them with [`RunReport::merge`] and read [`RunReport::succeeded`] once at the
//! end. Rendering is left to callers.
//!
//! ## Invariants
//! - Counters only increase; there is no way to remove a finding.
//! - `passed + failed + warnings` equals the number of non-info findings.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Outcome class of a single finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Check passed.
    Pass,
    /// Contract violation or structural failure.
    Fail,
    /// Advisory mismatch.
    Warn,
    /// Informational progress line; not counted.
    Info,
}

impl Severity {
    /// Returns a stable label for the severity.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pass => "pass",
            Self::Fail => "fail",
            Self::Warn => "warn",
            Self::Info => "info",
        }
    }
}

/// A single reported line with optional bullet details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    /// Outcome class.
    pub severity: Severity,
    /// Stable dotted identifier, e.g. `coverage.frontend_only`.
    pub code: String,
    /// Human-readable message.
    pub message: String,
    /// Bullet items listed under the message.
    pub details: Vec<String>,
}

/// Accumulated findings and counters for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    /// Findings in emission order.
    findings: Vec<Finding>,
    /// Number of passing findings.
    passed: u32,
    /// Number of failing findings.
    failed: u32,
    /// Number of warning findings.
    warnings: u32,
}

// ============================================================================
// SECTION: Accumulator
// ============================================================================

impl RunReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a passing check.
    pub fn pass(&mut self, code: &str, message: impl Into<String>) -> &mut Finding {
        self.push(Severity::Pass, code, message.into())
    }

    /// Records a failing check.
    pub fn fail(&mut self, code: &str, message: impl Into<String>) -> &mut Finding {
        self.push(Severity::Fail, code, message.into())
    }

    /// Records a warning.
    pub fn warn(&mut self, code: &str, message: impl Into<String>) -> &mut Finding {
        self.push(Severity::Warn, code, message.into())
    }

    /// Records an informational line.
    pub fn info(&mut self, code: &str, message: impl Into<String>) -> &mut Finding {
        self.push(Severity::Info, code, message.into())
    }

    /// Appends every finding of `other`, preserving order.
    pub fn merge(&mut self, other: Self) {
        self.passed = self.passed.saturating_add(other.passed);
        self.failed = self.failed.saturating_add(other.failed);
        self.warnings = self.warnings.saturating_add(other.warnings);
        self.findings.extend(other.findings);
    }

    /// Returns the findings in emission order.
    #[must_use]
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    /// Returns the pass count.
    #[must_use]
    pub const fn passed(&self) -> u32 {
        self.passed
    }

    /// Returns the failure count.
    #[must_use]
    pub const fn failed(&self) -> u32 {
        self.failed
    }

    /// Returns the warning count.
    #[must_use]
    pub const fn warnings(&self) -> u32 {
        self.warnings
    }

    /// Returns true when no failure was recorded.
    #[must_use]
    pub const fn succeeded(&self) -> bool {
        self.failed == 0
    }

    /// Returns true when a finding with `code` exists.
    #[must_use]
    pub fn has_code(&self, code: &str) -> bool {
        self.findings.iter().any(|finding| finding.code == code)
    }

    /// Pushes a finding and bumps the matching counter.
    fn push(&mut self, severity: Severity, code: &str, message: String) -> &mut Finding {
        match severity {
            Severity::Pass => self.passed = self.passed.saturating_add(1),
            Severity::Fail => self.failed = self.failed.saturating_add(1),
            Severity::Warn => self.warnings = self.warnings.saturating_add(1),
            Severity::Info => {}
        }
        self.findings.push(Finding {
            severity,
            code: code.to_string(),
            message,
            details: Vec::new(),
        });
        let index = self.findings.len() - 1;
        &mut self.findings[index]
    }
}

impl Finding {
    /// Attaches bullet details to the finding.
    pub fn with_details<I, S>(&mut self, details: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.details.extend(details.into_iter().map(Into::into));
        self
    }
}
