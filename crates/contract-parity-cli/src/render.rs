// crates/contract-parity-cli/src/render.rs
// ============================================================================
// Module: Report Rendering
// Description: Text and JSON renderings of a run report.
// Purpose: Turn findings into terminal output after a run completes.
// Dependencies: contract-parity-core, owo-colors, serde_json
// ============================================================================

//! ## Overview
//! Rendering is a pure function of the finished [`RunReport`]; nothing is
//! printed while checks run. The text form uses one status glyph per finding
//! and closes with a summary block. Info findings that carry details render
//! as a titled bullet list. Colour is optional so output stays readable
//! when piped.

// ============================================================================
// SECTION: Imports
// ============================================================================

use contract_parity_core::Finding;
use contract_parity_core::RunReport;
use contract_parity_core::Severity;
use owo_colors::AnsiColors;
use owo_colors::OwoColorize;
use serde::Serialize;

use crate::t;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Width of the `=` banner lines.
pub const BANNER_WIDTH: usize = 60;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Which command produced the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportSubject {
    /// Static contract check.
    Integration,
    /// Live backend validation.
    Backend,
    /// Database connection test.
    Database,
}

impl ReportSubject {
    /// Returns a stable label for JSON output and audit events.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Integration => "integration",
            Self::Backend => "backend",
            Self::Database => "database",
        }
    }

    /// Returns the heading printed above the findings.
    fn title(self) -> String {
        match self {
            Self::Integration => t!("report.title.integration"),
            Self::Backend => t!("report.title.backend"),
            Self::Database => t!("report.title.database"),
        }
    }

    /// Returns the heading printed above the counters.
    fn summary(self) -> String {
        match self {
            Self::Integration => t!("report.summary.integration"),
            Self::Backend => t!("report.summary.backend"),
            Self::Database => t!("report.summary.database"),
        }
    }

    /// Returns the noun used in the verdict line.
    fn label(self) -> String {
        match self {
            Self::Integration => t!("report.subject.integration"),
            Self::Backend => t!("report.subject.backend"),
            Self::Database => t!("report.subject.database"),
        }
    }
}

/// Text rendering options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Emit ANSI colour codes.
    pub color: bool,
}

/// JSON envelope for a finished report.
#[derive(Debug, Serialize)]
struct JsonReport<'a> {
    /// Subject label.
    subject: &'static str,
    /// Overall verdict.
    succeeded: bool,
    /// Pass count.
    passed: u32,
    /// Failure count.
    failed: u32,
    /// Warning count.
    warnings: u32,
    /// Findings in emission order.
    findings: &'a [Finding],
}

// ============================================================================
// SECTION: Rendering
// ============================================================================

/// Renders `report` as human-readable text ending in a newline.
#[must_use]
pub fn render_text(report: &RunReport, subject: ReportSubject, options: RenderOptions) -> String {
    let palette = Palette {
        enabled: options.color,
    };
    let mut out = String::new();
    push_banner(&mut out, &palette, &subject.title());
    for finding in report.findings() {
        push_finding(&mut out, &palette, finding);
    }

    out.push('\n');
    push_banner(&mut out, &palette, &subject.summary());
    let passed = t!("report.count.passed");
    push_count(&mut out, &palette, AnsiColors::BrightGreen, &passed, report.passed());
    let failed = t!("report.count.failed");
    push_count(&mut out, &palette, AnsiColors::BrightRed, &failed, report.failed());
    let warnings = t!("report.count.warnings");
    push_count(&mut out, &palette, AnsiColors::BrightYellow, &warnings, report.warnings());

    out.push('\n');
    if report.succeeded() {
        let verdict = t!("report.verdict.passed", subject = subject.label());
        push_line(&mut out, &palette.paint(&verdict, AnsiColors::BrightGreen));
        if report.warnings() > 0 {
            let note = t!("report.verdict.with_warnings", count = report.warnings());
            push_line(&mut out, &palette.paint(&note, AnsiColors::BrightYellow));
        }
    } else {
        let verdict = t!("report.verdict.failed", subject = subject.label());
        push_line(&mut out, &palette.paint(&verdict, AnsiColors::BrightRed));
    }
    out
}

/// Renders `report` as pretty-printed JSON.
///
/// # Errors
///
/// Returns [`serde_json::Error`] when serialization fails.
pub fn render_json(report: &RunReport, subject: ReportSubject) -> Result<String, serde_json::Error> {
    let envelope = JsonReport {
        subject: subject.as_str(),
        succeeded: report.succeeded(),
        passed: report.passed(),
        failed: report.failed(),
        warnings: report.warnings(),
        findings: report.findings(),
    };
    let mut text = serde_json::to_string_pretty(&envelope)?;
    text.push('\n');
    Ok(text)
}

/// Returns the status glyph for `severity`.
#[must_use]
pub const fn glyph(severity: Severity) -> &'static str {
    match severity {
        Severity::Pass => "✓",
        Severity::Fail => "✗",
        Severity::Warn => "⚠",
        Severity::Info => "ℹ",
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Optional ANSI colouring.
struct Palette {
    /// Whether colour codes are emitted.
    enabled: bool,
}

impl Palette {
    /// Colours `text` when enabled.
    fn paint(&self, text: &str, color: AnsiColors) -> String {
        if self.enabled { text.color(color).to_string() } else { text.to_string() }
    }
}

/// Colour used for a severity glyph.
const fn severity_color(severity: Severity) -> AnsiColors {
    match severity {
        Severity::Pass => AnsiColors::BrightGreen,
        Severity::Fail => AnsiColors::BrightRed,
        Severity::Warn => AnsiColors::BrightYellow,
        Severity::Info => AnsiColors::BrightBlue,
    }
}

/// Appends `line` and a newline.
fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

/// Appends a titled banner.
fn push_banner(out: &mut String, palette: &Palette, title: &str) {
    let rule = "=".repeat(BANNER_WIDTH);
    push_line(out, &palette.paint(&rule, AnsiColors::BrightBlue));
    push_line(out, &palette.paint(title, AnsiColors::BrightBlue));
    push_line(out, &palette.paint(&rule, AnsiColors::BrightBlue));
}

/// Appends one finding and its details.
fn push_finding(out: &mut String, palette: &Palette, finding: &Finding) {
    if finding.severity == Severity::Info && !finding.details.is_empty() {
        out.push('\n');
        push_line(out, &palette.paint(&finding.message, AnsiColors::BrightBlue));
        for detail in &finding.details {
            push_line(out, &format!("  {} {detail}", palette.paint("•", AnsiColors::BrightGreen)));
        }
        return;
    }
    let glyph = palette.paint(glyph(finding.severity), severity_color(finding.severity));
    push_line(out, &format!("{glyph} {}", finding.message));
    for detail in &finding.details {
        push_line(out, &format!("    - {detail}"));
    }
}

/// Appends one counter line.
fn push_count(out: &mut String, palette: &Palette, color: AnsiColors, label: &str, count: u32) {
    push_line(out, &format!("{} {count}", palette.paint(label, color)));
}
