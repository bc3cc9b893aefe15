// crates/contract-parity-live/src/client.rs
// ============================================================================
// Module: Live JSON Client
// Description: Size-limited blocking HTTP client for JSON endpoints.
// Purpose: Turn backend responses into status codes and parsed JSON bodies.
// Dependencies: reqwest, serde_json, url
// ============================================================================

//! ## Overview
//! [`JsonClient`] issues one request per call with a fixed timeout and no
//! redirects. Bodies are read through a byte limit before JSON parsing, so a
//! misbehaving backend cannot exhaust memory.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::blocking::Response;
use reqwest::redirect::Policy;
use serde_json::Value;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum response body size in bytes.
pub const MAX_RESPONSE_BYTES: usize = 1024 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while building the validator.
#[derive(Debug, Error)]
pub enum LiveError {
    /// The live settings failed validation.
    #[error("invalid live settings: {0}")]
    Settings(String),
    /// The base URL is unusable.
    #[error("invalid base url: {0}")]
    InvalidUrl(String),
    /// The HTTP client could not be constructed.
    #[error("http client error: {0}")]
    Client(String),
}

/// Errors raised by a single request; local to the check that issued it.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Connection, timeout, or protocol failure.
    #[error("{0}")]
    Transport(String),
    /// Body exceeded [`MAX_RESPONSE_BYTES`].
    #[error("response exceeds {max_bytes} bytes")]
    TooLarge {
        /// Configured limit.
        max_bytes: usize,
    },
    /// Body was not valid JSON.
    #[error("response is not valid JSON: {0}")]
    NotJson(String),
}

// ============================================================================
// SECTION: Client
// ============================================================================

/// A fully read response.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Body bytes, at most [`MAX_RESPONSE_BYTES`].
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError::NotJson`] when the body does not parse.
    pub fn json(&self) -> Result<Value, RequestError> {
        serde_json::from_slice(&self.body).map_err(|err| RequestError::NotJson(err.to_string()))
    }
}

/// Blocking JSON client rooted at a base URL.
#[derive(Debug, Clone)]
pub struct JsonClient {
    /// Underlying HTTP client.
    client: Client,
    /// Base URL every path is appended to.
    base: Url,
}

impl JsonClient {
    /// Builds a client for `base_url` with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`LiveError`] when the URL cannot carry paths or the client
    /// cannot be constructed.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, LiveError> {
        let base = Url::parse(base_url).map_err(|err| LiveError::InvalidUrl(err.to_string()))?;
        match base.scheme() {
            "http" | "https" => {}
            scheme => return Err(LiveError::InvalidUrl(format!("unsupported scheme {scheme}"))),
        }
        if base.cannot_be_a_base() {
            return Err(LiveError::InvalidUrl(base_url.to_string()));
        }
        let client = Client::builder()
            .redirect(Policy::none())
            .timeout(timeout)
            .build()
            .map_err(|err| LiveError::Client(err.to_string()))?;
        Ok(Self {
            client,
            base,
        })
    }

    /// Returns the base URL.
    #[must_use]
    pub const fn base(&self) -> &Url {
        &self.base
    }

    /// Builds the URL for `segments` under the base path.
    ///
    /// Segments are percent-encoded individually, so identifiers containing
    /// `/` stay within one segment.
    #[must_use]
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Issues `GET` for `segments`.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] on transport failure or an oversized body.
    pub fn get(&self, segments: &[&str]) -> Result<RawResponse, RequestError> {
        let response = self
            .client
            .get(self.endpoint(segments))
            .send()
            .map_err(|err| RequestError::Transport(err.to_string()))?;
        read_limited(response)
    }

    /// Issues `POST` for `segments` with query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`RequestError`] on transport failure or an oversized body.
    pub fn post_query<'a, I>(&self, segments: &[&str], query: I) -> Result<RawResponse, RequestError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut url = self.endpoint(segments);
        url.query_pairs_mut().extend_pairs(query);
        let response = self
            .client
            .post(url)
            .send()
            .map_err(|err| RequestError::Transport(err.to_string()))?;
        read_limited(response)
    }
}

/// Reads a response body through the size limit.
fn read_limited(response: Response) -> Result<RawResponse, RequestError> {
    let status = response.status().as_u16();
    let limit = u64::try_from(MAX_RESPONSE_BYTES).unwrap_or(u64::MAX);
    if response.content_length().is_some_and(|length| length > limit) {
        return Err(RequestError::TooLarge {
            max_bytes: MAX_RESPONSE_BYTES,
        });
    }
    let mut limited = response.take(limit.saturating_add(1));
    let mut body = Vec::new();
    limited.read_to_end(&mut body).map_err(|err| RequestError::Transport(err.to_string()))?;
    if body.len() > MAX_RESPONSE_BYTES {
        return Err(RequestError::TooLarge {
            max_bytes: MAX_RESPONSE_BYTES,
        });
    }
    Ok(RawResponse {
        status,
        body,
    })
}
