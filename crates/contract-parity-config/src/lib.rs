// crates/contract-parity-config/src/lib.rs
// ============================================================================
// Module: Contract Parity Config Library
// Description: Canonical config model, validation, and `.env` loading.
// Purpose: Single source of truth for contract-parity.toml semantics.
// Dependencies: contract-parity-core, serde, toml, url
// ============================================================================

//! ## Overview
//! `contract-parity-config` defines the configuration shared by the checker,
//! the live validator, and the database helper. Every knob has a built-in
//! default, so a missing config file is not an error; a present file is
//! parsed strictly and validated fail-closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
pub mod env;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::*;
pub use env::DatabaseSettings;
pub use env::DotEnv;
