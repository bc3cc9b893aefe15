// crates/contract-parity-config/src/config.rs
// ============================================================================
// Module: Contract Parity Configuration
// Description: Configuration loading and validation for contract parity runs.
// Purpose: Provide strict config parsing with hard limits and full defaults.
// Dependencies: contract-parity-core, serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with strict size and path limits.
//! Resolution order is an explicit path, then the `CONTRACT_PARITY_CONFIG`
//! environment variable, then `contract-parity.toml` under the project root.
//! When none of those exist the built-in defaults apply. Any file that is
//! found must parse and validate; there is no silent fallback.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use contract_parity_core::BaseUrlPolicy;
use contract_parity_core::CheckerSettings;
use contract_parity_core::FrontendSyntax;
use contract_parity_core::ParameterContract;
use contract_parity_core::analysis::parameters::DEFAULT_EXPECTED_PORT;
use contract_parity_core::extract::frontend::DEFAULT_BASE_CONSTANT;
use contract_parity_core::extract::frontend::DEFAULT_CALL_FUNCTIONS;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename searched under the project root.
pub const DEFAULT_CONFIG_NAME: &str = "contract-parity.toml";
/// Environment variable used to override the config path.
pub const CONFIG_ENV_VAR: &str = "CONTRACT_PARITY_CONFIG";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum length of a single path component.
pub(crate) const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub(crate) const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Default backend route source, relative to the project root.
pub const DEFAULT_BACKEND_SOURCE: &str = "backend/plumber.R";
/// Default frontend client source, relative to the project root.
pub const DEFAULT_FRONTEND_SOURCE: &str = "frontend/src/api/client.js";
/// Default live backend base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
/// Default per-request timeout in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;
/// Default delay between job status polls in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 2_000;
/// Default ceiling for job status polling in milliseconds.
pub const DEFAULT_POLL_TIMEOUT_MS: u64 = 60_000;
/// Identifier that no backend should recognize.
pub const DEFAULT_UNKNOWN_JOB_ID: &str = "00000000-0000-0000-0000-000000000000";
/// Default `.env` file, relative to the project root.
pub const DEFAULT_ENV_FILE: &str = ".env";
/// Default database connect timeout in milliseconds.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;
/// Minimum request or connect timeout in milliseconds.
pub(crate) const MIN_TIMEOUT_MS: u64 = 100;
/// Maximum request or connect timeout in milliseconds.
pub(crate) const MAX_TIMEOUT_MS: u64 = 120_000;
/// Maximum job poll ceiling in milliseconds.
pub(crate) const MAX_POLL_TIMEOUT_MS: u64 = 3_600_000;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration loading or validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O failure while reading configuration.
    #[error("config io error: {0}")]
    Io(String),
    /// TOML parsing error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid configuration data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Root Config
// ============================================================================

/// Root configuration for every contract parity command.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParityConfig {
    /// Source file locations.
    #[serde(default)]
    pub sources: SourcesConfig,
    /// Frontend call syntax and base URL expectation.
    #[serde(default)]
    pub frontend: FrontendConfig,
    /// Submission parameter ground truth.
    #[serde(default)]
    pub parameters: ParameterContract,
    /// Live backend validation settings.
    #[serde(default)]
    pub live: LiveSettings,
    /// Database helper settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// File the configuration was read from (not serialized).
    #[serde(skip)]
    pub source_path: Option<PathBuf>,
}

impl ParityConfig {
    /// Loads configuration using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a config file is found but cannot be read,
    /// parsed, or validated.
    pub fn load(explicit: Option<&Path>, search_root: &Path) -> Result<Self, ConfigError> {
        let resolved = resolve_config_path(explicit, env::var(CONFIG_ENV_VAR).ok(), search_root)?;
        let Some(path) = resolved else {
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        };
        Self::load_file(&path)
    }

    /// Loads and validates one config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when reading, parsing, or validation fails.
    pub fn load_file(path: &Path) -> Result<Self, ConfigError> {
        validate_path(path)?;
        let bytes = fs::read(path)
            .map_err(|err| ConfigError::Io(format!("{}: {err}", path.display())))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        let mut config = Self::parse(content)?;
        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parses and validates configuration text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates the configuration for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when configuration is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sources.validate()?;
        self.frontend.validate()?;
        self.parameters
            .validate()
            .map_err(|err| ConfigError::Invalid(err.to_string()))?;
        self.live.validate()?;
        self.database.validate()?;
        Ok(())
    }

    /// Returns the injected rules for the integration checker.
    #[must_use]
    pub fn checker_settings(&self) -> CheckerSettings {
        CheckerSettings {
            frontend: self.frontend.syntax(),
            parameters: self.parameters.clone(),
            base_url: self.frontend.base_url_policy(),
        }
    }
}

// ============================================================================
// SECTION: Sources
// ============================================================================

/// Locations of the two contract sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourcesConfig {
    /// Backend route file, relative to the project root.
    #[serde(default = "default_backend_source")]
    pub backend: String,
    /// Frontend client file, relative to the project root.
    #[serde(default = "default_frontend_source")]
    pub frontend: String,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            backend: default_backend_source(),
            frontend: default_frontend_source(),
        }
    }
}

impl SourcesConfig {
    /// Validates source paths.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("sources.backend", &self.backend)?;
        validate_path_string("sources.frontend", &self.frontend)
    }

    /// Resolves the backend source under `root`.
    #[must_use]
    pub fn backend_path(&self, root: &Path) -> PathBuf {
        root.join(&self.backend)
    }

    /// Resolves the frontend source under `root`.
    #[must_use]
    pub fn frontend_path(&self, root: &Path) -> PathBuf {
        root.join(&self.frontend)
    }
}

/// Serde default for [`SourcesConfig::backend`].
fn default_backend_source() -> String {
    DEFAULT_BACKEND_SOURCE.to_string()
}

/// Serde default for [`SourcesConfig::frontend`].
fn default_frontend_source() -> String {
    DEFAULT_FRONTEND_SOURCE.to_string()
}

// ============================================================================
// SECTION: Frontend
// ============================================================================

/// Frontend call syntax plus the base URL expectation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrontendConfig {
    /// Constant holding the API base URL.
    #[serde(default = "default_base_constant")]
    pub base_constant: String,
    /// Call helpers that issue HTTP requests.
    #[serde(default = "default_call_functions")]
    pub call_functions: Vec<String>,
    /// Port literal the base URL must contain.
    #[serde(default = "default_expected_port")]
    pub expected_port: String,
}

impl Default for FrontendConfig {
    fn default() -> Self {
        Self {
            base_constant: default_base_constant(),
            call_functions: default_call_functions(),
            expected_port: default_expected_port(),
        }
    }
}

impl FrontendConfig {
    /// Returns the extractor syntax.
    #[must_use]
    pub fn syntax(&self) -> FrontendSyntax {
        FrontendSyntax {
            base_constant: self.base_constant.clone(),
            call_functions: self.call_functions.clone(),
        }
    }

    /// Returns the base URL policy.
    #[must_use]
    pub fn base_url_policy(&self) -> BaseUrlPolicy {
        BaseUrlPolicy {
            expected_port: self.expected_port.clone(),
        }
    }

    /// Validates identifiers and the expected port.
    fn validate(&self) -> Result<(), ConfigError> {
        self.syntax().validate().map_err(|err| ConfigError::Invalid(err.to_string()))?;
        if self.expected_port.is_empty() || !self.expected_port.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ConfigError::Invalid("frontend.expected_port must be numeric".to_string()));
        }
        Ok(())
    }
}

/// Serde default for [`FrontendConfig::base_constant`].
fn default_base_constant() -> String {
    DEFAULT_BASE_CONSTANT.to_string()
}

/// Serde default for [`FrontendConfig::call_functions`].
fn default_call_functions() -> Vec<String> {
    DEFAULT_CALL_FUNCTIONS.iter().map(ToString::to_string).collect()
}

/// Serde default for [`FrontendConfig::expected_port`].
fn default_expected_port() -> String {
    DEFAULT_EXPECTED_PORT.to_string()
}

// ============================================================================
// SECTION: Live Validation
// ============================================================================

/// A query parameter value: a single string or a repeated list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    /// `name=value`.
    One(String),
    /// `name=a&name=b`.
    Many(Vec<String>),
}

impl QueryValue {
    /// Returns every value in order.
    #[must_use]
    pub fn values(&self) -> &[String] {
        match self {
            Self::One(value) => std::slice::from_ref(value),
            Self::Many(values) => values,
        }
    }
}

/// Settings for the live backend validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LiveSettings {
    /// Base URL of the running backend.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
    /// Delay between job status polls in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Ceiling for job status polling in milliseconds.
    #[serde(default = "default_poll_timeout_ms")]
    pub poll_timeout_ms: u64,
    /// Identifier used for the nonexistent-job check.
    #[serde(default = "default_unknown_job_id")]
    pub unknown_job_id: String,
    /// Query parameters sent with the demo job submission.
    #[serde(default = "default_demo_job")]
    pub demo_job: BTreeMap<String, QueryValue>,
}

impl Default for LiveSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            poll_timeout_ms: DEFAULT_POLL_TIMEOUT_MS,
            unknown_job_id: default_unknown_job_id(),
            demo_job: default_demo_job(),
        }
    }
}

impl LiveSettings {
    /// Validates URL, timeouts, and identifiers.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a field is out of range.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = Url::parse(&self.base_url)
            .map_err(|err| ConfigError::Invalid(format!("live.base_url is invalid: {err}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid("live.base_url must use http or https".to_string()));
        }
        if url.host_str().is_none() {
            return Err(ConfigError::Invalid("live.base_url must include a host".to_string()));
        }
        validate_timeout("live.request_timeout_ms", self.request_timeout_ms)?;
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::Invalid(
                "live.poll_interval_ms must be greater than zero".to_string(),
            ));
        }
        if self.poll_timeout_ms > MAX_POLL_TIMEOUT_MS {
            return Err(ConfigError::Invalid("live.poll_timeout_ms too large".to_string()));
        }
        if self.poll_interval_ms > self.poll_timeout_ms {
            return Err(ConfigError::Invalid(
                "live.poll_interval_ms must not exceed live.poll_timeout_ms".to_string(),
            ));
        }
        if self.unknown_job_id.trim().is_empty() {
            return Err(ConfigError::Invalid("live.unknown_job_id must be non-empty".to_string()));
        }
        for (name, value) in &self.demo_job {
            if name.trim().is_empty() {
                return Err(ConfigError::Invalid("live.demo_job keys must be non-empty".to_string()));
            }
            if value.values().is_empty() {
                return Err(ConfigError::Invalid(format!("live.demo_job.{name} has no values")));
            }
        }
        Ok(())
    }

    /// Returns a copy with a different base URL, revalidated.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the URL is rejected.
    pub fn with_base_url(&self, base_url: &str) -> Result<Self, ConfigError> {
        let settings = Self {
            base_url: base_url.to_string(),
            ..self.clone()
        };
        settings.validate()?;
        Ok(settings)
    }
}

/// Serde default for [`LiveSettings::base_url`].
fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Serde default for [`LiveSettings::request_timeout_ms`].
const fn default_request_timeout_ms() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_MS
}

/// Serde default for [`LiveSettings::poll_interval_ms`].
const fn default_poll_interval_ms() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

/// Serde default for [`LiveSettings::poll_timeout_ms`].
const fn default_poll_timeout_ms() -> u64 {
    DEFAULT_POLL_TIMEOUT_MS
}

/// Serde default for [`LiveSettings::unknown_job_id`].
fn default_unknown_job_id() -> String {
    DEFAULT_UNKNOWN_JOB_ID.to_string()
}

/// Serde default for [`LiveSettings::demo_job`].
fn default_demo_job() -> BTreeMap<String, QueryValue> {
    let one = |value: &str| QueryValue::One(value.to_string());
    BTreeMap::from([
        ("job_type".to_string(), one("pipeline")),
        ("algorithm".to_string(), one(r#"["InterVA"]"#)),
        ("age_group".to_string(), one("neonate")),
        ("calib_model_type".to_string(), one("Mmatprior")),
        ("ensemble".to_string(), one("FALSE")),
    ])
}

// ============================================================================
// SECTION: Database
// ============================================================================

/// Settings for the database helper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// `.env` file, relative to the project root.
    #[serde(default = "default_env_file")]
    pub env_file: String,
    /// Script that opens the local SSH tunnel.
    #[serde(default)]
    pub tunnel_script: Option<String>,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            env_file: default_env_file(),
            tunnel_script: None,
            connect_timeout_ms: DEFAULT_CONNECT_TIMEOUT_MS,
        }
    }
}

impl DatabaseConfig {
    /// Validates paths and timeouts.
    fn validate(&self) -> Result<(), ConfigError> {
        validate_path_string("database.env_file", &self.env_file)?;
        if let Some(script) = &self.tunnel_script {
            validate_path_string("database.tunnel_script", script)?;
        }
        validate_timeout("database.connect_timeout_ms", self.connect_timeout_ms)
    }
}

/// Serde default for [`DatabaseConfig::env_file`].
fn default_env_file() -> String {
    DEFAULT_ENV_FILE.to_string()
}

/// Serde default for [`DatabaseConfig::connect_timeout_ms`].
const fn default_connect_timeout_ms() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_MS
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Resolves which config file to read, if any.
///
/// An explicit path or environment override must exist; the default file is
/// only used when present.
///
/// # Errors
///
/// Returns [`ConfigError`] when an override exceeds path limits or does not
/// exist.
pub fn resolve_config_path(
    explicit: Option<&Path>,
    env_override: Option<String>,
    search_root: &Path,
) -> Result<Option<PathBuf>, ConfigError> {
    if let Some(path) = explicit {
        return require_file(path.to_path_buf());
    }
    if let Some(env_path) = env_override.filter(|value| !value.trim().is_empty()) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return require_file(PathBuf::from(env_path));
    }
    let default_path = search_root.join(DEFAULT_CONFIG_NAME);
    Ok(default_path.is_file().then_some(default_path))
}

/// Returns `path` when it names an existing file.
fn require_file(path: PathBuf) -> Result<Option<PathBuf>, ConfigError> {
    if path.is_file() {
        Ok(Some(path))
    } else {
        Err(ConfigError::Io(format!("config file not found: {}", path.display())))
    }
}

/// Validates the resolved path against length limits.
fn validate_path(path: &Path) -> Result<(), ConfigError> {
    let text = path.to_string_lossy();
    if text.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
    }
    for component in path.components() {
        let value = component.as_os_str().to_string_lossy();
        if value.len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid("config path component too long".to_string()));
        }
    }
    Ok(())
}

/// Validates a path string against length constraints.
fn validate_path_string(field: &str, value: &str) -> Result<(), ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Invalid(format!("{field} must be non-empty")));
    }
    if trimmed.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(ConfigError::Invalid(format!("{field} exceeds max length")));
    }
    for component in Path::new(trimmed).components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(ConfigError::Invalid(format!("{field} component too long")));
        }
    }
    Ok(())
}

/// Validates a timeout against the shared bounds.
fn validate_timeout(field: &str, value: u64) -> Result<(), ConfigError> {
    if (MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!(
            "{field} must be between {MIN_TIMEOUT_MS} and {MAX_TIMEOUT_MS}"
        )))
    }
}
