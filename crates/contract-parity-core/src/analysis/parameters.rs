// crates/contract-parity-core/src/analysis/parameters.rs
// ============================================================================
// Module: Parameter Reconciler
// Description: Checks a frontend submission signature against backend names.
// Purpose: Spot-check request parameters across the camelCase/snake_case seam.
// Dependencies: regex, serde
// ============================================================================

//! ## Overview
//! The backend parameter set is declared ground truth, not derived from the
//! backend source. The reconciler locates one exported submission function in
//! the frontend text, reads its destructured parameter list, translates each
//! name through the rename table (identity when absent), and checks that
//! every required backend name is covered.
//!
//! Results are always advisory: a pass when only optional names are missing,
//! otherwise a warning. Extraction is heuristic, so false positives are
//! expected and never fail a run.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use regex::Regex;
use serde::Deserialize;
use serde::Serialize;

use crate::core::RunReport;
use crate::extract::ExtractError;
use crate::extract::compile;
use crate::extract::frontend::ensure_identifier;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default submission function whose signature is inspected.
pub const DEFAULT_SUBMIT_FUNCTION: &str = "submitJob";
/// Default backend-required parameter names.
pub const DEFAULT_REQUIRED_PARAMS: &[&str] =
    &["job_type", "algorithm", "age_group", "country", "calib_model_type", "ensemble", "file"];
/// Default parameters whose absence is tolerated.
pub const DEFAULT_OPTIONAL_PARAMS: &[&str] = &["file"];
/// Default frontend-to-backend rename table.
pub const DEFAULT_RENAMES: &[(&str, &str)] = &[
    ("file", "file"),
    ("jobType", "job_type"),
    ("algorithms", "algorithm"),
    ("ageGroup", "age_group"),
    ("country", "country"),
    ("calibModelType", "calib_model_type"),
    ("ensemble", "ensemble"),
];
/// Default port literal the API base URL must contain.
pub const DEFAULT_EXPECTED_PORT: &str = "8000";

// ============================================================================
// SECTION: Contract
// ============================================================================

/// One frontend-to-backend parameter rename.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterRename {
    /// Frontend spelling.
    pub frontend: String,
    /// Backend spelling.
    pub backend: String,
}

/// Injected ground truth for one submission endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterContract {
    /// Exported frontend function whose signature is inspected.
    #[serde(default = "default_function")]
    pub function: String,
    /// Backend parameter names that must be covered.
    #[serde(default = "default_required")]
    pub required: BTreeSet<String>,
    /// Required names whose absence is tolerated.
    #[serde(default = "default_optional")]
    pub optional: BTreeSet<String>,
    /// Ordered rename table; names not listed map to themselves.
    #[serde(default = "default_renames")]
    pub renames: Vec<ParameterRename>,
}

impl Default for ParameterContract {
    fn default() -> Self {
        Self {
            function: default_function(),
            required: default_required(),
            optional: default_optional(),
            renames: default_renames(),
        }
    }
}

impl ParameterContract {
    /// Validates the contract shape.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::InvalidIdentifier`] when the function name is
    /// not an identifier or any parameter name is blank.
    pub fn validate(&self) -> Result<(), ExtractError> {
        ensure_identifier("parameters.function", &self.function)?;
        let names = self
            .required
            .iter()
            .chain(&self.optional)
            .chain(self.renames.iter().flat_map(|rename| [&rename.frontend, &rename.backend]));
        for name in names {
            if name.trim().is_empty() {
                return Err(ExtractError::InvalidIdentifier {
                    field: "parameters",
                    value: name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Translates a frontend name to its backend spelling.
    #[must_use]
    pub fn backend_name<'a>(&'a self, frontend: &'a str) -> &'a str {
        self.renames
            .iter()
            .find(|rename| rename.frontend == frontend)
            .map_or(frontend, |rename| rename.backend.as_str())
    }
}

/// Serde default for [`ParameterContract::function`].
fn default_function() -> String {
    DEFAULT_SUBMIT_FUNCTION.to_string()
}

/// Serde default for [`ParameterContract::required`].
fn default_required() -> BTreeSet<String> {
    DEFAULT_REQUIRED_PARAMS.iter().map(ToString::to_string).collect()
}

/// Serde default for [`ParameterContract::optional`].
fn default_optional() -> BTreeSet<String> {
    DEFAULT_OPTIONAL_PARAMS.iter().map(ToString::to_string).collect()
}

/// Serde default for [`ParameterContract::renames`].
fn default_renames() -> Vec<ParameterRename> {
    DEFAULT_RENAMES
        .iter()
        .map(|(frontend, backend)| ParameterRename {
            frontend: (*frontend).to_string(),
            backend: (*backend).to_string(),
        })
        .collect()
}

// ============================================================================
// SECTION: Reconciler
// ============================================================================

/// Outcome of reading and translating one submission signature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterReconciliation {
    /// Names as written in the frontend signature.
    pub frontend_params: BTreeSet<String>,
    /// Names after translation to backend spelling.
    pub backend_facing: BTreeSet<String>,
    /// Required backend names not covered.
    pub missing: BTreeSet<String>,
}

/// Reconciles a frontend submission signature against a [`ParameterContract`].
#[derive(Debug, Clone)]
pub struct ParameterReconciler {
    /// Injected contract.
    contract: ParameterContract,
    /// Signature pattern capturing the destructured parameter list.
    signature: Regex,
}

impl ParameterReconciler {
    /// Compiles the signature pattern for `contract`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError`] when the contract is invalid.
    pub fn new(contract: &ParameterContract) -> Result<Self, ExtractError> {
        contract.validate()?;
        let function = regex::escape(&contract.function);
        let signature =
            compile(&format!(r"export\s+async\s+function\s+{function}\s*\([^)]*\{{([^}}]+)\}}"))?;
        Ok(Self {
            contract: contract.clone(),
            signature,
        })
    }

    /// Returns the injected contract.
    #[must_use]
    pub const fn contract(&self) -> &ParameterContract {
        &self.contract
    }

    /// Reads the signature from `text`; `None` when it cannot be located.
    #[must_use]
    pub fn reconcile(&self, text: &str) -> Option<ParameterReconciliation> {
        let list = self.signature.captures(text)?.get(1)?.as_str();
        let frontend_params: BTreeSet<String> = list
            .split(',')
            .filter_map(|token| {
                let name = token.split('=').next().unwrap_or_default().trim();
                (!name.is_empty()).then(|| name.to_string())
            })
            .collect();
        let backend_facing: BTreeSet<String> = frontend_params
            .iter()
            .map(|name| self.contract.backend_name(name).to_string())
            .collect();
        let missing = self.contract.required.difference(&backend_facing).cloned().collect();
        Some(ParameterReconciliation {
            frontend_params,
            backend_facing,
            missing,
        })
    }

    /// Reconciles `text` and renders the advisory findings.
    #[must_use]
    pub fn report(&self, text: &str) -> RunReport {
        let function = &self.contract.function;
        let mut report = RunReport::new();
        report.info("parameters.start", format!("Checking {function}() parameters..."));
        let Some(outcome) = self.reconcile(text) else {
            report.warn(
                "parameters.signature_missing",
                format!("Could not locate exported {function}() signature"),
            );
            return report;
        };
        if outcome.missing.is_subset(&self.contract.optional) {
            report.pass("parameters.match", format!("{function} parameters match backend expectations"));
        } else {
            let listed = outcome.missing.iter().map(String::as_str).collect::<Vec<_>>().join(", ");
            report
                .warn(
                    "parameters.missing",
                    format!("{function} may be missing parameters: {listed}"),
                )
                .with_details(outcome.missing.iter().cloned());
        }
        report
    }
}

// ============================================================================
// SECTION: Base URL Policy
// ============================================================================

/// Expectation on the declared API base URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BaseUrlPolicy {
    /// Port literal the base URL must contain.
    #[serde(default = "default_expected_port")]
    pub expected_port: String,
}

impl Default for BaseUrlPolicy {
    fn default() -> Self {
        Self {
            expected_port: default_expected_port(),
        }
    }
}

impl BaseUrlPolicy {
    /// Checks the declared base URL; every mismatch is a warning.
    #[must_use]
    pub fn evaluate(&self, base_url: Option<&str>) -> RunReport {
        let mut report = RunReport::new();
        report.info("base_url.start", "Checking API base URL...");
        match base_url {
            Some(url) if url.contains(self.expected_port.as_str()) => {
                report.pass("base_url.ok", format!("API base configured correctly: {url}"));
            }
            Some(url) => {
                report.warn("base_url.port", format!("API base may need adjustment: {url}"));
            }
            None => {
                report.warn("base_url.missing", "API base URL declaration not found");
            }
        }
        report
    }
}

/// Serde default for [`BaseUrlPolicy::expected_port`].
fn default_expected_port() -> String {
    DEFAULT_EXPECTED_PORT.to_string()
}
