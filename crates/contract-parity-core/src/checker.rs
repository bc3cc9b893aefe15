// crates/contract-parity-core/src/checker.rs
// ============================================================================
// Module: Integration Checker
// Description: Orchestrates extraction, coverage, and parameter checks.
// Purpose: Produce one merged report from two source snapshots.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`IntegrationChecker::run`] consumes the backend and frontend sources as
//! text and returns an [`IntegrationOutcome`]. Structural failures come first:
//! a missing source and a source yielding zero entries are distinct failures,
//! and either stops the run before the matcher is invoked.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;

use crate::analysis::BaseUrlPolicy;
use crate::analysis::ComparisonResult;
use crate::analysis::ParameterContract;
use crate::analysis::ParameterReconciler;
use crate::analysis::compare;
use crate::core::BackendCatalog;
use crate::core::EndpointCatalog;
use crate::core::FrontendCatalog;
use crate::core::RunReport;
use crate::extract::BackendExtractor;
use crate::extract::ExtractError;
use crate::extract::FrontendExtractor;
use crate::extract::FrontendSyntax;

// ============================================================================
// SECTION: Inputs
// ============================================================================

/// A source snapshot handed to the checker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceText {
    /// The file does not exist.
    Missing {
        /// Display path of the expected file.
        path: String,
    },
    /// The file was read.
    Loaded {
        /// Display path of the file.
        path: String,
        /// Full file contents.
        text: String,
    },
}

impl SourceText {
    /// Returns the display path.
    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::Missing {
                path,
            }
            | Self::Loaded {
                path, ..
            } => path,
        }
    }

    /// Returns the contents when loaded.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Missing {
                ..
            } => None,
            Self::Loaded {
                text, ..
            } => Some(text),
        }
    }
}

/// Injected rules for one checker instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckerSettings {
    /// Frontend call syntax.
    pub frontend: FrontendSyntax,
    /// Submission parameter ground truth.
    pub parameters: ParameterContract,
    /// Base URL expectation.
    pub base_url: BaseUrlPolicy,
}

/// Result of one checker run.
#[derive(Debug, Clone, Serialize)]
pub struct IntegrationOutcome {
    /// Merged findings.
    pub report: RunReport,
    /// Backend catalog (empty when the source was missing).
    pub backend: BackendCatalog,
    /// Frontend catalog (empty when the source was missing).
    pub frontend: FrontendCatalog,
    /// Coverage partition; `None` when a structural failure stopped the run.
    pub comparison: Option<ComparisonResult>,
}

// ============================================================================
// SECTION: Checker
// ============================================================================

/// Contract consistency checker over two source snapshots.
#[derive(Debug, Clone)]
pub struct IntegrationChecker {
    /// Backend route extractor.
    backend: BackendExtractor,
    /// Frontend call extractor.
    frontend: FrontendExtractor,
    /// Submission parameter reconciler.
    parameters: ParameterReconciler,
    /// Base URL expectation.
    base_url: BaseUrlPolicy,
}

impl IntegrationChecker {
    /// Builds a checker from injected settings.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError`] when the settings do not produce valid
    /// patterns.
    pub fn new(settings: &CheckerSettings) -> Result<Self, ExtractError> {
        Ok(Self {
            backend: BackendExtractor::new()?,
            frontend: FrontendExtractor::new(&settings.frontend)?,
            parameters: ParameterReconciler::new(&settings.parameters)?,
            base_url: settings.base_url.clone(),
        })
    }

    /// Runs every check and returns the merged outcome.
    #[must_use]
    pub fn run(&self, backend: &SourceText, frontend: &SourceText) -> IntegrationOutcome {
        let mut report = RunReport::new();
        let backend_catalog =
            extract_side(&mut report, backend, &BACKEND_SIDE, |text| self.backend.extract(text));
        let frontend_catalog =
            extract_side(&mut report, frontend, &FRONTEND_SIDE, |text| self.frontend.extract(text));

        let parsed = !backend_catalog.is_empty() && !frontend_catalog.is_empty();
        let Some(frontend_text) = frontend.text().filter(|_| parsed) else {
            report.fail("source.unparsed", "Could not parse endpoints from source files");
            return IntegrationOutcome {
                report,
                backend: backend_catalog,
                frontend: frontend_catalog,
                comparison: None,
            };
        };

        report
            .info("catalog.backend", "Backend Endpoints:")
            .with_details(backend_catalog.keys().map(ToString::to_string));
        report
            .info("catalog.frontend", "Frontend API Calls:")
            .with_details(frontend_catalog.keys().map(ToString::to_string));

        let comparison = compare(&backend_catalog, &frontend_catalog);
        report.merge(comparison.report());
        report.info("parameters.section", "Checking parameter consistency...");
        report.merge(self.parameters.report(frontend_text));
        report.merge(self.base_url.evaluate(self.frontend.base_url(frontend_text).as_deref()));

        IntegrationOutcome {
            report,
            backend: backend_catalog,
            frontend: frontend_catalog,
            comparison: Some(comparison),
        }
    }
}

/// Labels used when reporting on one side of the contract.
struct Side {
    /// Stable code segment.
    code: &'static str,
    /// Capitalized display name.
    title: &'static str,
    /// Plural noun for extracted entries.
    entries: &'static str,
}

/// Backend side labels.
const BACKEND_SIDE: Side = Side {
    code: "backend",
    title: "Backend",
    entries: "backend endpoints",
};

/// Frontend side labels.
const FRONTEND_SIDE: Side = Side {
    code: "frontend",
    title: "Frontend",
    entries: "frontend API calls",
};

/// Extracts one side, recording the structural findings for it.
fn extract_side(
    report: &mut RunReport,
    source: &SourceText,
    side: &Side,
    extract: impl Fn(&str) -> EndpointCatalog,
) -> EndpointCatalog {
    report.info(
        &format!("source.{}.parse", side.code),
        format!("Parsing {} from {}", side.entries, source.path()),
    );
    let Some(text) = source.text() else {
        report.fail("source.missing", format!("{} file not found: {}", side.title, source.path()));
        return EndpointCatalog::default();
    };
    let catalog = extract(text);
    if !catalog.is_empty() {
        report.pass(
            &format!("source.{}.found", side.code),
            format!("Found {} {}", catalog.len(), side.entries),
        );
    }
    catalog
}
