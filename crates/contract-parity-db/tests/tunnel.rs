// crates/contract-parity-db/tests/tunnel.rs
// ============================================================================
// Module: Tunnel Detection Tests
// Description: Port probing and tunnel startup decisions.
// Purpose: Ensure the tunnel script runs at most once and only for localhost.
// Dependencies: contract-parity-db, contract-parity-config, tempfile
// ============================================================================
//! ## Overview
//! Uses ephemeral listeners for open ports and released ports for closed
//! ones. Script execution uses the system `true` and `false` binaries.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use std::net::TcpListener;
use std::path::Path;
use std::time::Duration;

use contract_parity_config::DatabaseSettings;
use contract_parity_db::DbError;
use contract_parity_db::TunnelState;
use contract_parity_db::ensure_tunnel;
use contract_parity_db::probe_port;
use tempfile::TempDir;

const PROBE: Duration = Duration::from_millis(500);

fn settings(host: &str, port: u16) -> DatabaseSettings {
    DatabaseSettings {
        host: host.to_string(),
        port,
        user: "eric".to_string(),
        password: None,
        database: "comsa_dashboard".to_string(),
    }
}

fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    listener.local_addr().expect("addr").port()
}

#[test]
fn probe_detects_open_and_closed_ports() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    assert!(probe_port("127.0.0.1", port, PROBE));
    drop(listener);
    assert!(!probe_port("127.0.0.1", closed_port(), PROBE));
}

#[test]
fn probe_of_unresolvable_host_is_closed() {
    assert!(!probe_port("no-such-host.invalid", 5433, PROBE));
}

#[test]
fn remote_host_is_direct_without_probing() {
    let state = ensure_tunnel(&settings("db.example.org", closed_port()), None, PROBE).expect("direct");
    assert_eq!(state, TunnelState::Direct);
}

#[test]
fn open_local_port_needs_no_tunnel() {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    let state = ensure_tunnel(&settings("localhost", port), None, PROBE).expect("open");
    assert_eq!(state, TunnelState::AlreadyOpen);
}

#[test]
fn closed_port_without_script_is_unavailable() {
    let err = ensure_tunnel(&settings("localhost", closed_port()), None, PROBE).expect_err("closed");
    assert!(matches!(err, DbError::TunnelUnavailable(_)));
}

#[test]
fn missing_script_is_unavailable() {
    let dir = TempDir::new().expect("tempdir");
    let script = dir.path().join("check_tunnel.sh");
    let err = ensure_tunnel(&settings("localhost", closed_port()), Some(&script), PROBE)
        .expect_err("missing script");
    assert!(err.to_string().contains("tunnel script not found"), "{err}");
}

#[cfg(unix)]
#[test]
fn successful_script_reports_started() {
    let script = Path::new("/bin/true");
    if !script.is_file() {
        return;
    }
    let state = ensure_tunnel(&settings("localhost", closed_port()), Some(script), PROBE)
        .expect("started");
    assert_eq!(
        state,
        TunnelState::Started {
            output: String::new(),
        }
    );
}

#[cfg(unix)]
#[test]
fn failing_script_is_unavailable() {
    let script = Path::new("/bin/false");
    if !script.is_file() {
        return;
    }
    let err = ensure_tunnel(&settings("localhost", closed_port()), Some(script), PROBE)
        .expect_err("script failed");
    assert!(matches!(err, DbError::TunnelUnavailable(_)));
}
