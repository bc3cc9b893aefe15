// crates/contract-parity-cli/src/i18n.rs
// ============================================================================
// Module: CLI Internationalization Helpers
// Description: Message catalog and translation utilities for the CLI.
// Purpose: Keep every user-facing string in one table.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Every line the CLI prints goes through the [`t!`](crate::t) macro, which
//! looks the key up in a static catalog and substitutes `{name}`
//! placeholders.
//!
//! ## Invariants
//! - The catalog is initialized once and read-only thereafter.
//! - Missing keys fall back to the key itself.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// SECTION: Types
// ============================================================================

/// A formatted message argument captured by the [`macro@crate::t`] macro.
#[derive(Clone)]
pub struct MessageArg {
    /// The placeholder name used in message templates (e.g., `"path"`).
    pub key: &'static str,
    /// The formatted string value to substitute for this placeholder.
    pub value: String,
}

impl MessageArg {
    /// Constructs a new [`MessageArg`] from a key and displayable value.
    pub fn new(key: &'static str, value: impl Into<String>) -> Self {
        Self {
            key,
            value: value.into(),
        }
    }
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// Static catalog entries.
const CATALOG_ITEMS: &[(&str, &str)] = &[
    ("main.version", "contract-parity {version}"),
    ("main.usage_failed", "{error}"),
    ("output.write_failed", "Failed to write to {stream}: {error}"),
    ("output.stream.stdout", "stdout"),
    ("output.stream.stderr", "stderr"),
    ("output.stream.unknown", "output stream"),
    ("config.load_failed", "Failed to load config: {error}"),
    ("audit.open_failed", "Failed to open audit log {path}: {error}"),
    ("render.json_failed", "Failed to serialize report: {error}"),
    ("source.read_failed", "Failed to read {path}: {error}"),
    ("source.too_large", "{path} exceeds size limit ({size} > {limit} bytes)"),
    ("source.not_utf8", "{path} is not valid UTF-8"),
    ("check.init_failed", "Failed to build integration checker: {error}"),
    ("validate.url_invalid", "Invalid --url value: {error}"),
    ("validate.init_failed", "Failed to build live validator: {error}"),
    ("db.env_failed", "Failed to load database settings: {error}"),
    ("db.target", "Connecting to {target}"),
    ("db.tunnel.direct", "Remote host {host}; no tunnel needed"),
    ("db.tunnel.open", "Tunnel port {port} already open"),
    ("db.tunnel.started", "Started SSH tunnel on port {port}"),
    ("db.tunnel.output", "Tunnel script output: {output}"),
    ("db.tunnel.failed", "Tunnel unavailable: {error}"),
    ("db.connected", "Connected to: {version}"),
    ("db.identity", "Database: {database}, User: {user}"),
    ("db.connect_failed", "Connection failed: {error}"),
    ("report.title.integration", "Frontend-Backend Integration Check"),
    ("report.title.backend", "Backend API Validation"),
    ("report.title.database", "Database Connection Test"),
    ("report.summary.integration", "Integration Check Summary"),
    ("report.summary.backend", "Backend Validation Summary"),
    ("report.summary.database", "Database Connection Summary"),
    ("report.subject.integration", "Integration check"),
    ("report.subject.backend", "Backend validation"),
    ("report.subject.database", "Database check"),
    ("report.count.passed", "Passed:"),
    ("report.count.failed", "Failed:"),
    ("report.count.warnings", "Warnings:"),
    ("report.verdict.passed", "{subject} PASSED"),
    ("report.verdict.failed", "{subject} FAILED"),
    ("report.verdict.with_warnings", "(with {count} warnings)"),
];

// ============================================================================
// SECTION: Translation
// ============================================================================

/// Translates `key`, substituting `{name}` placeholders from `args`.
///
/// Unknown keys are returned unchanged.
#[must_use]
pub fn translate(key: &str, args: Vec<MessageArg>) -> String {
    let template = catalog().get(key).copied().unwrap_or(key);
    if args.is_empty() {
        return template.to_string();
    }

    let mut result = template.to_string();
    for arg in args {
        let placeholder = format!("{{{}}}", arg.key);
        result = result.replace(&placeholder, &arg.value);
    }
    result
}

/// Returns true when `key` is present in the catalog.
#[must_use]
pub fn has_key(key: &str) -> bool {
    catalog().contains_key(key)
}

/// Returns the lazily built catalog.
fn catalog() -> &'static HashMap<&'static str, &'static str> {
    static CATALOG: OnceLock<HashMap<&'static str, &'static str>> = OnceLock::new();

    CATALOG.get_or_init(|| CATALOG_ITEMS.iter().copied().collect())
}

// ============================================================================
// SECTION: Macro
// ============================================================================

/// Translates a catalog key with optional `name = value` arguments.
#[macro_export]
macro_rules! t {
    ($key:literal $(, $name:ident = $value:expr )* $(,)?) => {{
        let args = ::std::vec![
            $($crate::i18n::MessageArg::new(stringify!($name), $value.to_string()),)*
        ];
        $crate::i18n::translate($key, args)
    }};
}
