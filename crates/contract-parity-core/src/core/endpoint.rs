// crates/contract-parity-core/src/core/endpoint.rs
// ============================================================================
// Module: Endpoint Catalog Types
// Description: Normalized endpoint keys, records, and immutable catalogs.
// Purpose: Give backend routes and frontend calls one comparable shape.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Backend route annotations and frontend call expressions use unrelated
//! syntaxes for path parameters. Both collapse every parameter segment into
//! [`PATH_PARAM_PLACEHOLDER`], and the resulting `"<METHOD> <PATH_TEMPLATE>"`
//! string is the [`EndpointKey`]. Two endpoints are the same contract point
//! exactly when their keys are equal.
//!
//! ## Invariants
//! - Keys are only built from an [`HttpMethod`] and a normalized template.
//! - Catalogs have no public mutators; they are frozen once built.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::collections::btree_map;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Placeholder substituted for every path-parameter segment.
pub const PATH_PARAM_PLACEHOLDER: &str = "{param}";

// ============================================================================
// SECTION: HTTP Method
// ============================================================================

/// HTTP method of an endpoint or call, normalized to upper case.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum HttpMethod {
    /// `GET`.
    Get,
    /// `POST`.
    Post,
    /// `PUT`.
    Put,
    /// `PATCH`.
    Patch,
    /// `DELETE`.
    Delete,
    /// `HEAD`.
    Head,
    /// `OPTIONS`.
    Options,
    /// Any other verb, stored upper-cased.
    Other(String),
}

impl HttpMethod {
    /// Parses a method token case-insensitively.
    ///
    /// Unknown verbs are preserved as [`HttpMethod::Other`] so a misspelled
    /// client verb still surfaces as a mismatch instead of vanishing.
    #[must_use]
    pub fn parse(token: &str) -> Self {
        let upper = token.trim().to_ascii_uppercase();
        match upper.as_str() {
            "GET" => Self::Get,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "PATCH" => Self::Patch,
            "DELETE" => Self::Delete,
            "HEAD" => Self::Head,
            "OPTIONS" => Self::Options,
            _ => Self::Other(upper),
        }
    }

    /// Returns the upper-case method token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Head => "HEAD",
            Self::Options => "OPTIONS",
            Self::Other(value) => value,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for HttpMethod {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<HttpMethod> for String {
    fn from(value: HttpMethod) -> Self {
        value.as_str().to_string()
    }
}

// ============================================================================
// SECTION: Endpoint Key
// ============================================================================

/// Normalized `"<METHOD> <PATH_TEMPLATE>"` comparison key.
///
/// Ordering follows the string form so sorted output is lexical.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointKey(String);

impl EndpointKey {
    /// Builds a key from a method and an already-normalized path template.
    #[must_use]
    pub fn new(method: &HttpMethod, path_template: &str) -> Self {
        Self(format!("{} {}", method.as_str(), path_template))
    }

    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EndpointKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ============================================================================
// SECTION: Endpoint Record
// ============================================================================

/// A single extracted endpoint or call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EndpointRecord {
    /// Normalized HTTP method.
    pub method: HttpMethod,
    /// Path exactly as written in the source text.
    pub path: String,
    /// Path with parameter segments replaced by [`PATH_PARAM_PLACEHOLDER`].
    pub path_template: String,
}

impl EndpointRecord {
    /// Creates a record from its parts.
    #[must_use]
    pub fn new(method: HttpMethod, path: impl Into<String>, path_template: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            path_template: path_template.into(),
        }
    }

    /// Returns the comparison key for this record.
    #[must_use]
    pub fn key(&self) -> EndpointKey {
        EndpointKey::new(&self.method, &self.path_template)
    }
}

// ============================================================================
// SECTION: Endpoint Catalog
// ============================================================================

/// Immutable mapping from [`EndpointKey`] to [`EndpointRecord`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EndpointCatalog {
    /// Records keyed by their comparison key.
    entries: BTreeMap<EndpointKey, EndpointRecord>,
}

/// Catalog of endpoints declared by the backend.
pub type BackendCatalog = EndpointCatalog;
/// Catalog of calls issued by the frontend.
pub type FrontendCatalog = EndpointCatalog;

impl EndpointCatalog {
    /// Builds a catalog from records; later records win on duplicate keys.
    #[must_use]
    pub fn from_records(records: impl IntoIterator<Item = EndpointRecord>) -> Self {
        let mut catalog = Self::default();
        for record in records {
            catalog.insert(record);
        }
        catalog
    }

    /// Inserts or overwrites the record under its key.
    pub(crate) fn insert(&mut self, record: EndpointRecord) {
        self.entries.insert(record.key(), record);
    }

    /// Returns the number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no endpoint was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the record stored under `key`.
    #[must_use]
    pub fn get(&self, key: &EndpointKey) -> Option<&EndpointRecord> {
        self.entries.get(key)
    }

    /// Returns true when `key` is present.
    #[must_use]
    pub fn contains(&self, key: &EndpointKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterates keys in lexical order.
    pub fn keys(&self) -> impl Iterator<Item = &EndpointKey> {
        self.entries.keys()
    }

    /// Iterates entries in lexical key order.
    pub fn iter(&self) -> btree_map::Iter<'_, EndpointKey, EndpointRecord> {
        self.entries.iter()
    }

    /// Returns an owned set of all keys.
    #[must_use]
    pub fn key_set(&self) -> BTreeSet<EndpointKey> {
        self.entries.keys().cloned().collect()
    }
}

impl<'a> IntoIterator for &'a EndpointCatalog {
    type IntoIter = btree_map::Iter<'a, EndpointKey, EndpointRecord>;
    type Item = (&'a EndpointKey, &'a EndpointRecord);

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
