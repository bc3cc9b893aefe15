// crates/contract-parity-db/tests/connection.rs
// ============================================================================
// Module: Database Connection Tests
// Description: Connection failure reporting without a live server.
// Purpose: Ensure failures carry context and never leak the password.
// Dependencies: contract-parity-db, contract-parity-config
// ============================================================================
//! ## Overview
//! Points the driver at a released local port so the connection is refused.

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
use std::time::Duration;

use contract_parity_config::DatabaseSettings;
use contract_parity_db::DbError;
use contract_parity_db::connect;
use contract_parity_db::describe_target;

fn refused_settings() -> DatabaseSettings {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let port = listener.local_addr().expect("addr").port();
    drop(listener);
    DatabaseSettings {
        host: "127.0.0.1".to_string(),
        port,
        user: "analyst".to_string(),
        password: Some("s3cret-value".to_string()),
        database: "comsa_dashboard".to_string(),
    }
}

#[test]
fn refused_connection_is_wrapped_with_target() {
    let settings = refused_settings();
    let Err(err) = connect(&settings, Duration::from_secs(2)) else {
        panic!("connection to a released port succeeded");
    };
    match &err {
        DbError::Connect {
            target, ..
        } => assert_eq!(target, &describe_target(&settings)),
        other => panic!("unexpected error: {other}"),
    }
    let rendered = err.to_string();
    assert!(rendered.contains("analyst@127.0.0.1"), "{rendered}");
    assert!(!rendered.contains("s3cret-value"), "{rendered}");
}

#[test]
fn target_omits_password() {
    let settings = refused_settings();
    let target = describe_target(&settings);
    assert_eq!(target, format!("analyst@127.0.0.1:{}/comsa_dashboard", settings.port));
}
