// crates/contract-parity-core/src/extract/frontend.rs
// ============================================================================
// Module: Frontend Call Extractor
// Description: Reads fetch-style calls built on an API base constant.
// Purpose: Build the frontend call catalog, inferring GET for bare calls.
// Dependencies: regex, serde
// ============================================================================

//! ## Overview
//! Frontend calls look like ``fetch(`${API_BASE}/jobs/${id}/status`)``,
//! optionally followed by an options object carrying `method: 'POST'`.
//! Extraction runs in priority order:
//!
//! 1. Calls with an explicit `method` are recorded under that method and
//!    mark their path template as explicitly claimed.
//! 2. Bare calls are recorded as GET unless their template was claimed by an
//!    explicit call or the GET key already exists.
//!
//! A path invoked both explicitly and bare therefore appears once, under the
//! explicit method. Verbs are not second-guessed: a helper that defaults to a
//! non-GET verb internally is misclassified as GET.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use regex::Regex;
use serde::Deserialize;
use serde::Serialize;

use crate::core::EndpointKey;
use crate::core::EndpointRecord;
use crate::core::FrontendCatalog;
use crate::core::HttpMethod;
use crate::extract::ExtractError;
use crate::extract::compile;
use crate::extract::normalize_segments;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default name of the API base URL constant.
pub const DEFAULT_BASE_CONSTANT: &str = "API_BASE";
/// Default call helpers recognized as HTTP calls.
pub const DEFAULT_CALL_FUNCTIONS: &[&str] = &["fetch", "fetchJson"];
/// Template interpolation segment such as `${jobId}`.
const INTERPOLATION_PATTERN: &str = r"\$\{[^}]+\}";

// ============================================================================
// SECTION: Syntax Configuration
// ============================================================================

/// Identifiers that shape the frontend call patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrontendSyntax {
    /// Name of the constant holding the API base URL.
    #[serde(default = "default_base_constant")]
    pub base_constant: String,
    /// Call helpers that issue HTTP requests.
    #[serde(default = "default_call_functions")]
    pub call_functions: Vec<String>,
}

impl Default for FrontendSyntax {
    fn default() -> Self {
        Self {
            base_constant: default_base_constant(),
            call_functions: default_call_functions(),
        }
    }
}

impl FrontendSyntax {
    /// Validates every identifier.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::InvalidIdentifier`] for empty lists or
    /// identifiers that are not plain source identifiers.
    pub fn validate(&self) -> Result<(), ExtractError> {
        ensure_identifier("base_constant", &self.base_constant)?;
        if self.call_functions.is_empty() {
            return Err(ExtractError::InvalidIdentifier {
                field: "call_functions",
                value: String::new(),
            });
        }
        for name in &self.call_functions {
            ensure_identifier("call_functions", name)?;
        }
        Ok(())
    }
}

/// Serde default for [`FrontendSyntax::base_constant`].
fn default_base_constant() -> String {
    DEFAULT_BASE_CONSTANT.to_string()
}

/// Serde default for [`FrontendSyntax::call_functions`].
fn default_call_functions() -> Vec<String> {
    DEFAULT_CALL_FUNCTIONS.iter().map(ToString::to_string).collect()
}

/// Rejects anything that is not `[A-Za-z_$][A-Za-z0-9_$]*`.
pub(crate) fn ensure_identifier(field: &'static str, value: &str) -> Result<(), ExtractError> {
    let mut chars = value.chars();
    let valid_head = chars.next().is_some_and(|ch| ch.is_ascii_alphabetic() || ch == '_' || ch == '$');
    let valid_tail = chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '$');
    if valid_head && valid_tail {
        Ok(())
    } else {
        Err(ExtractError::InvalidIdentifier {
            field,
            value: value.to_string(),
        })
    }
}

// ============================================================================
// SECTION: Extractor
// ============================================================================

/// Extracts the frontend call catalog.
#[derive(Debug, Clone)]
pub struct FrontendExtractor {
    /// Call followed by an options object that names a method.
    method_in_options: Regex,
    /// Call with a method anywhere before the closing parenthesis.
    method_before_close: Regex,
    /// Any call against the base constant.
    bare_call: Regex,
    /// `const <base> = "..."` declaration.
    base_declaration: Regex,
    /// Template interpolation segment.
    interpolation: Regex,
}

impl FrontendExtractor {
    /// Compiles the call patterns for `syntax`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError`] when identifiers are invalid or a pattern
    /// fails to compile.
    pub fn new(syntax: &FrontendSyntax) -> Result<Self, ExtractError> {
        syntax.validate()?;
        let functions = syntax
            .call_functions
            .iter()
            .map(|name| regex::escape(name))
            .collect::<Vec<_>>()
            .join("|");
        let base = regex::escape(&syntax.base_constant);
        let call =
            format!(r"(?:^|[^A-Za-z0-9_$])(?:{functions})\(`\$\{{{base}\}}(/[^`]+)`");
        Ok(Self {
            method_in_options: compile(&format!(
                r#"{call}[^)]*\{{[^}}]*method:\s*['"](\w+)['"]"#
            ))?,
            method_before_close: compile(&format!(r#"{call}[^)]*method:\s*['"](\w+)['"]"#))?,
            bare_call: compile(&call)?,
            base_declaration: compile(&format!(r#"const\s+{base}\s*=\s*['"]([^'"]+)['"]"#))?,
            interpolation: compile(INTERPOLATION_PATTERN)?,
        })
    }

    /// Scans `text` and returns the calls it issues.
    #[must_use]
    pub fn extract(&self, text: &str) -> FrontendCatalog {
        let mut records = Vec::new();
        let mut claimed = BTreeSet::new();
        for pattern in [&self.method_in_options, &self.method_before_close] {
            for captures in pattern.captures_iter(text) {
                let (Some(path), Some(method)) = (captures.get(1), captures.get(2)) else {
                    continue;
                };
                let template = self.normalize_path(path.as_str());
                claimed.insert(template.clone());
                records.push(EndpointRecord::new(
                    HttpMethod::parse(method.as_str()),
                    path.as_str(),
                    template,
                ));
            }
        }

        let mut inferred = BTreeSet::new();
        for captures in self.bare_call.captures_iter(text) {
            let Some(path) = captures.get(1) else {
                continue;
            };
            let template = self.normalize_path(path.as_str());
            if claimed.contains(&template) {
                continue;
            }
            let key = EndpointKey::new(&HttpMethod::Get, &template);
            if !inferred.insert(key) {
                continue;
            }
            records.push(EndpointRecord::new(HttpMethod::Get, path.as_str(), template));
        }
        FrontendCatalog::from_records(records)
    }

    /// Returns the declared API base URL literal, if any.
    #[must_use]
    pub fn base_url(&self, text: &str) -> Option<String> {
        self.base_declaration
            .captures(text)
            .and_then(|captures| captures.get(1))
            .map(|value| value.as_str().to_string())
    }

    /// Collapses every `${...}` segment of `path` into the placeholder.
    #[must_use]
    pub fn normalize_path(&self, path: &str) -> String {
        normalize_segments(&self.interpolation, path)
    }
}
