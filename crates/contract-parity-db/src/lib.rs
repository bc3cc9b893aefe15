// crates/contract-parity-db/src/lib.rs
// ============================================================================
// Module: Contract Parity DB Library
// Description: Postgres connectivity check behind an optional SSH tunnel.
// Purpose: Confirm the dashboard database is reachable from this machine.
// Dependencies: contract-parity-config, postgres, thiserror
// ============================================================================

//! ## Overview
//! Local development reaches the database through an SSH tunnel bound to
//! `localhost`. [`ensure_tunnel`] probes the tunnel port and, when it is
//! closed, runs the configured tunnel script exactly once. [`connect`] then
//! opens a plain-text session and [`identify`] reports what the server says
//! about itself.
//!
//! Failures are split three ways: the tunnel could not be brought up, the
//! connection was refused or rejected, or a query failed after connecting.
//! There is no retry loop.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod connection;
pub mod tunnel;

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use connection::ServerIdentity;
pub use connection::connect;
pub use connection::describe_target;
pub use connection::identify;
pub use tunnel::TunnelState;
pub use tunnel::ensure_tunnel;
pub use tunnel::probe_port;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Database helper errors.
#[derive(Debug, Error)]
pub enum DbError {
    /// The local tunnel is closed and could not be started.
    #[error("tunnel unavailable: {0}")]
    TunnelUnavailable(String),
    /// Connecting to the server failed.
    #[error("failed to connect to {target}: {message}")]
    Connect {
        /// `user@host:port/database` of the attempted connection.
        target: String,
        /// Driver error text.
        message: String,
    },
    /// A query failed after connecting.
    #[error("query failed: {0}")]
    Query(String),
}
