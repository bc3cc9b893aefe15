// crates/contract-parity-core/src/extract/mod.rs
// ============================================================================
// Module: Endpoint Extraction
// Description: Pattern-based extractors for backend routes and frontend calls.
// Purpose: Turn loosely structured source text into endpoint catalogs.
// Dependencies: regex, serde, thiserror
// ============================================================================

//! ## Overview
//! Extraction is line/regex based and deliberately best-effort: calls split
//! across lines in unusual ways or nested template literals may be missed.
//! False negatives are accepted over false positives. Both extractors are
//! deterministic, so running one twice over the same text yields equal
//! catalogs.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod backend;
pub mod frontend;

// ============================================================================
// SECTION: Imports
// ============================================================================

use regex::NoExpand;
use regex::Regex;
use thiserror::Error;

use crate::core::PATH_PARAM_PLACEHOLDER;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use backend::BackendExtractor;
pub use frontend::FrontendExtractor;
pub use frontend::FrontendSyntax;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while preparing an extractor.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    /// A pattern failed to compile.
    #[error("invalid extraction pattern: {0}")]
    InvalidPattern(String),
    /// A configured identifier is not a valid source identifier.
    #[error("invalid identifier for {field}: {value:?}")]
    InvalidIdentifier {
        /// Configuration field holding the identifier.
        field: &'static str,
        /// Offending value.
        value: String,
    },
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Compiles `pattern`, mapping failures into [`ExtractError`].
pub(crate) fn compile(pattern: &str) -> Result<Regex, ExtractError> {
    Regex::new(pattern).map_err(|err| ExtractError::InvalidPattern(err.to_string()))
}

/// Replaces every match of `segment` in `path` with the placeholder.
pub(crate) fn normalize_segments(segment: &Regex, path: &str) -> String {
    segment.replace_all(path, NoExpand(PATH_PARAM_PLACEHOLDER)).into_owned()
}
