// crates/contract-parity-config/src/env.rs
// ============================================================================
// Module: Environment Settings
// Description: `.env` parsing and database connection settings.
// Purpose: Resolve PG* settings without mutating the process environment.
// Dependencies: std
// ============================================================================

//! ## Overview
//! A `.env` file holds `KEY=VALUE` lines; blank lines and `#` comments are
//! skipped and each trimmed line splits on its first `=`. The value is kept
//! exactly as written after the `=`. Values are layered over a
//! caller-supplied lookup (normally the process environment) with the file
//! taking precedence, which matches exporting the file before reading the
//! variables.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use crate::config::ConfigError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default database host.
pub const DEFAULT_PGHOST: &str = "localhost";
/// Default database port (the local tunnel endpoint).
pub const DEFAULT_PGPORT: u16 = 5433;
/// Default database user.
pub const DEFAULT_PGUSER: &str = "eric";
/// Default database name.
pub const DEFAULT_PGDATABASE: &str = "comsa_dashboard";

// ============================================================================
// SECTION: DotEnv
// ============================================================================

/// Parsed `.env` key/value pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DotEnv {
    /// Values keyed by variable name; later lines win.
    values: BTreeMap<String, String>,
}

impl DotEnv {
    /// Parses `.env` text.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let values = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| line.split_once('='))
            .map(|(key, value)| (key.trim().to_string(), value.to_string()))
            .filter(|(key, _)| !key.is_empty())
            .collect();
        Self {
            values,
        }
    }

    /// Loads a `.env` file; a missing file yields an empty set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file exists but cannot be read.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Self::parse(&text)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(format!("{}: {err}", path.display()))),
        }
    }

    /// Returns the value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Returns the number of parsed entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when no entry was parsed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ============================================================================
// SECTION: Database Settings
// ============================================================================

/// Connection settings resolved from `PG*` variables.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseSettings {
    /// `PGHOST`.
    pub host: String,
    /// `PGPORT`.
    pub port: u16,
    /// `PGUSER`.
    pub user: String,
    /// `PGPASSWORD`, when set.
    pub password: Option<String>,
    /// `PGDATABASE`.
    pub database: String,
}

impl DatabaseSettings {
    /// Resolves settings from `dotenv` layered over `lookup`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `PGPORT` is not a port number.
    pub fn resolve<F>(dotenv: &DotEnv, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| dotenv.get(key).map(ToString::to_string).or_else(|| lookup(key));
        let port = match read("PGPORT") {
            Some(value) => value.trim().parse::<u16>().map_err(|_| {
                ConfigError::Invalid(format!("PGPORT must be a port number, got {value:?}"))
            })?,
            None => DEFAULT_PGPORT,
        };
        Ok(Self {
            host: read("PGHOST").unwrap_or_else(|| DEFAULT_PGHOST.to_string()),
            port,
            user: read("PGUSER").unwrap_or_else(|| DEFAULT_PGUSER.to_string()),
            password: read("PGPASSWORD"),
            database: read("PGDATABASE").unwrap_or_else(|| DEFAULT_PGDATABASE.to_string()),
        })
    }

    /// Resolves settings from `dotenv` layered over the process environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when `PGPORT` is not a port number.
    pub fn from_env(dotenv: &DotEnv) -> Result<Self, ConfigError> {
        Self::resolve(dotenv, |key| std::env::var(key).ok())
    }

    /// Returns true when the host is the local tunnel endpoint.
    #[must_use]
    pub fn is_local(&self) -> bool {
        self.host == DEFAULT_PGHOST
    }
}

impl fmt::Debug for DatabaseSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("database", &self.database)
            .finish()
    }
}
