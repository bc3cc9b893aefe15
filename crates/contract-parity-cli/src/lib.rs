// crates/contract-parity-cli/src/lib.rs
// ============================================================================
// Module: Contract Parity CLI Library
// Description: Shared helpers for the contract-parity command-line interface.
// Purpose: Provide the message catalog, report rendering, and audit sinks.
// Dependencies: contract-parity-core, owo-colors, serde_json
// ============================================================================

//! ## Overview
//! This library houses the pieces of the CLI that are worth testing without
//! spawning the binary: the message catalog, the text and JSON report
//! renderers, and the JSON-lines audit sinks. The binary entry point
//! (`src/main.rs`) wires them to the checker, the live validator, and the
//! database helper.

// ============================================================================
// SECTION: Modules
// ============================================================================

/// Structured audit events for report findings.
pub mod audit;
/// Internationalization helpers and message catalog.
pub mod i18n;
/// Text and JSON report rendering.
pub mod render;
