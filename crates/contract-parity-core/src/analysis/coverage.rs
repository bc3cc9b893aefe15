// crates/contract-parity-core/src/analysis/coverage.rs
// ============================================================================
// Module: Coverage Matcher
// Description: Key-based set algebra over backend and frontend catalogs.
// Purpose: Classify endpoints as matched, backend-only, or frontend-only.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`compare`] partitions the union of both key sets into three disjoint
//! sets. The classification is asymmetric: an unused backend endpoint is
//! benign (it may be internal or optional) and is reported as a warning,
//! while a frontend call without a backend counterpart is a guaranteed
//! runtime failure and is reported as a failure.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Serialize;

use crate::core::BackendCatalog;
use crate::core::EndpointKey;
use crate::core::FrontendCatalog;
use crate::core::RunReport;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Three-way partition of backend and frontend keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    /// Backend keys with no frontend call.
    pub missing_in_frontend: BTreeSet<EndpointKey>,
    /// Frontend keys with no backend endpoint.
    pub missing_in_backend: BTreeSet<EndpointKey>,
    /// Keys present on both sides.
    pub matched: BTreeSet<EndpointKey>,
}

// ============================================================================
// SECTION: Matching
// ============================================================================

/// Compares the two catalogs by key.
#[must_use]
pub fn compare(backend: &BackendCatalog, frontend: &FrontendCatalog) -> ComparisonResult {
    let backend_keys = backend.key_set();
    let frontend_keys = frontend.key_set();
    ComparisonResult {
        missing_in_frontend: backend_keys.difference(&frontend_keys).cloned().collect(),
        missing_in_backend: frontend_keys.difference(&backend_keys).cloned().collect(),
        matched: backend_keys.intersection(&frontend_keys).cloned().collect(),
    }
}

impl ComparisonResult {
    /// Returns true when neither side has unmatched keys.
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        self.missing_in_frontend.is_empty() && self.missing_in_backend.is_empty()
    }

    /// Renders the comparison as findings.
    #[must_use]
    pub fn report(&self) -> RunReport {
        let mut report = RunReport::new();
        report.info("coverage.start", "Checking endpoint coverage...");

        if self.missing_in_frontend.is_empty() {
            report.pass(
                "coverage.backend_covered",
                "All backend endpoints have corresponding frontend calls",
            );
        } else {
            report
                .warn("coverage.backend_only", "Backend endpoints not used in frontend:")
                .with_details(self.missing_in_frontend.iter().map(ToString::to_string));
        }

        if self.missing_in_backend.is_empty() {
            report.pass("coverage.frontend_covered", "All frontend API calls match backend endpoints");
        } else {
            report
                .fail("coverage.frontend_only", "Frontend calls endpoints that don't exist in backend:")
                .with_details(self.missing_in_backend.iter().map(ToString::to_string));
        }

        if !self.matched.is_empty() {
            report.pass(
                "coverage.matched",
                format!(
                    "{} endpoints correctly matched between frontend and backend",
                    self.matched.len()
                ),
            );
        }
        report
    }
}
