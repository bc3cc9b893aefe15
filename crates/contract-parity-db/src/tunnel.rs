// crates/contract-parity-db/src/tunnel.rs
// ============================================================================
// Module: Tunnel Detection
// Description: TCP port probing and one-shot tunnel startup.
// Purpose: Make the local tunnel endpoint reachable before connecting.
// Dependencies: contract-parity-config
// ============================================================================

//! ## Overview
//! Only a `localhost` host implies a tunnel. Any other host is treated as
//! directly reachable and is not probed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::TcpStream;
use std::net::ToSocketAddrs;
use std::path::Path;
use std::process::Command;
use std::time::Duration;

use contract_parity_config::DatabaseSettings;

use crate::DbError;

// ============================================================================
// SECTION: Types
// ============================================================================

/// How the database endpoint became reachable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TunnelState {
    /// Remote host; no tunnel involved.
    Direct,
    /// The local tunnel port was already open.
    AlreadyOpen,
    /// The tunnel script ran successfully.
    Started {
        /// Trimmed standard output of the script.
        output: String,
    },
}

// ============================================================================
// SECTION: Probing
// ============================================================================

/// Returns true when a TCP connection to `host:port` succeeds within
/// `timeout` for any resolved address.
#[must_use]
pub fn probe_port(host: &str, port: u16, timeout: Duration) -> bool {
    let Ok(addrs) = (host, port).to_socket_addrs() else {
        return false;
    };
    addrs.into_iter().any(|addr| TcpStream::connect_timeout(&addr, timeout).is_ok())
}

/// Makes the database endpoint reachable, starting the tunnel if needed.
///
/// # Errors
///
/// Returns [`DbError::TunnelUnavailable`] when the local port is closed and
/// the tunnel script is missing, fails to launch, or exits non-zero.
pub fn ensure_tunnel(
    settings: &DatabaseSettings,
    tunnel_script: Option<&Path>,
    probe_timeout: Duration,
) -> Result<TunnelState, DbError> {
    if !settings.is_local() {
        return Ok(TunnelState::Direct);
    }
    if probe_port(&settings.host, settings.port, probe_timeout) {
        return Ok(TunnelState::AlreadyOpen);
    }
    let Some(script) = tunnel_script else {
        return Err(DbError::TunnelUnavailable(format!(
            "port {} is closed and no tunnel script is configured",
            settings.port
        )));
    };
    if !script.is_file() {
        return Err(DbError::TunnelUnavailable(format!(
            "tunnel script not found: {}",
            script.display()
        )));
    }
    let output = Command::new(script)
        .output()
        .map_err(|err| DbError::TunnelUnavailable(format!("{}: {err}", script.display())))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DbError::TunnelUnavailable(format!(
            "{} exited with {}: {}",
            script.display(),
            output.status,
            stderr.trim()
        )));
    }
    Ok(TunnelState::Started {
        output: String::from_utf8_lossy(&output.stdout).trim().to_string(),
    })
}
