// crates/contract-parity-core/src/extract/backend.rs
// ============================================================================
// Module: Backend Route Extractor
// Description: Reads `#* @<method> <path>` route annotations.
// Purpose: Build the backend endpoint catalog from annotated source text.
// Dependencies: regex
// ============================================================================

//! ## Overview
//! Backend routes are declared with annotation comments such as
//! `#* @get /jobs/<id>/status`. The method is case-insensitive and limited to
//! GET/POST/PUT/DELETE; the path must start with `/`. Every `<...>` segment
//! collapses to the placeholder independently, so `/jobs/<id>/log` becomes
//! `/jobs/{param}/log`. Annotations without a path do not match and are
//! skipped silently.

// ============================================================================
// SECTION: Imports
// ============================================================================

use regex::Regex;

use crate::core::BackendCatalog;
use crate::core::EndpointRecord;
use crate::core::HttpMethod;
use crate::extract::ExtractError;
use crate::extract::compile;
use crate::extract::normalize_segments;

// ============================================================================
// SECTION: Patterns
// ============================================================================

/// Route annotation: captures the method and the rest of the line as path.
const ANNOTATION_PATTERN: &str = r"(?i)#\*\s*@(get|post|put|delete)\s+(/[^\n]+)";
/// Angle-bracket path parameter such as `<job_id>` or `<id:int>`.
const PARAM_SEGMENT_PATTERN: &str = r"<[^>]+>";

// ============================================================================
// SECTION: Extractor
// ============================================================================

/// Extracts the backend endpoint catalog from route annotations.
#[derive(Debug, Clone)]
pub struct BackendExtractor {
    /// Compiled annotation pattern.
    annotation: Regex,
    /// Compiled parameter-segment pattern.
    segment: Regex,
}

impl BackendExtractor {
    /// Compiles the annotation patterns.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::InvalidPattern`] if a pattern fails to compile.
    pub fn new() -> Result<Self, ExtractError> {
        Ok(Self {
            annotation: compile(ANNOTATION_PATTERN)?,
            segment: compile(PARAM_SEGMENT_PATTERN)?,
        })
    }

    /// Scans `text` and returns every annotated endpoint.
    ///
    /// Duplicate keys keep the last occurrence.
    #[must_use]
    pub fn extract(&self, text: &str) -> BackendCatalog {
        let records = self.annotation.captures_iter(text).filter_map(|captures| {
            let method = HttpMethod::parse(captures.get(1)?.as_str());
            let path = captures.get(2)?.as_str().trim();
            let template = self.normalize_path(path);
            Some(EndpointRecord::new(method, path, template))
        });
        BackendCatalog::from_records(records)
    }

    /// Collapses every bracketed segment of `path` into the placeholder.
    #[must_use]
    pub fn normalize_path(&self, path: &str) -> String {
        normalize_segments(&self.segment, path)
    }
}
