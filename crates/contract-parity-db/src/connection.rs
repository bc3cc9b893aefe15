// crates/contract-parity-db/src/connection.rs
// ============================================================================
// Module: Database Connection
// Description: Opens a Postgres session and reads server identity.
// Purpose: Prove the configured credentials reach the expected database.
// Dependencies: contract-parity-config, postgres
// ============================================================================

//! ## Overview
//! Connections use `NoTls`; the tunnel or private network carries transport
//! security. The password never appears in error messages.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use contract_parity_config::DatabaseSettings;
use postgres::Client;
use postgres::Config;
use postgres::NoTls;

use crate::DbError;

// ============================================================================
// SECTION: Types
// ============================================================================

/// What the server reports about the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerIdentity {
    /// `SELECT version()`.
    pub version: String,
    /// `current_database()`.
    pub database: String,
    /// `current_user`.
    pub user: String,
}

// ============================================================================
// SECTION: Connection
// ============================================================================

/// Opens a session using `settings`.
///
/// # Errors
///
/// Returns [`DbError::Connect`] with the target (without password) when the
/// driver cannot connect.
pub fn connect(settings: &DatabaseSettings, connect_timeout: Duration) -> Result<Client, DbError> {
    let mut config = Config::new();
    config
        .host(&settings.host)
        .port(settings.port)
        .user(&settings.user)
        .dbname(&settings.database)
        .connect_timeout(connect_timeout);
    if let Some(password) = &settings.password {
        config.password(password);
    }
    config.connect(NoTls).map_err(|err| DbError::Connect {
        target: describe_target(settings),
        message: err.to_string(),
    })
}

/// Reads the server version, database, and user of an open session.
///
/// # Errors
///
/// Returns [`DbError::Query`] when either identity query fails.
pub fn identify(client: &mut Client) -> Result<ServerIdentity, DbError> {
    let row = client
        .query_one("SELECT version()", &[])
        .map_err(|err| DbError::Query(err.to_string()))?;
    let version: String = row.try_get(0).map_err(|err| DbError::Query(err.to_string()))?;
    let row = client
        .query_one("SELECT current_database(), current_user", &[])
        .map_err(|err| DbError::Query(err.to_string()))?;
    let database: String = row.try_get(0).map_err(|err| DbError::Query(err.to_string()))?;
    let user: String = row.try_get(1).map_err(|err| DbError::Query(err.to_string()))?;
    Ok(ServerIdentity {
        version,
        database,
        user,
    })
}

/// Renders `user@host:port/database` for error context.
#[must_use]
pub fn describe_target(settings: &DatabaseSettings) -> String {
    format!("{}@{}:{}/{}", settings.user, settings.host, settings.port, settings.database)
}
