// crates/contract-parity-live/src/lib.rs
// ============================================================================
// Module: Contract Parity Live Library
// Description: Runtime validation of a running backend over HTTP.
// Purpose: Complement the static contract check with live responses.
// Dependencies: contract-parity-config, contract-parity-core, reqwest
// ============================================================================

//! ## Overview
//! The live validator exercises the job API of a running backend in a fixed
//! order: health, job listing, demo submission, status, log, completion
//! polling, results, and the nonexistent-job error path. Every check appends
//! findings to a shared [`contract_parity_core::RunReport`]; a failing health
//! check aborts the run because nothing else can succeed against a down
//! server.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;
pub mod validator;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::JsonClient;
pub use client::LiveError;
pub use client::MAX_RESPONSE_BYTES;
pub use client::RawResponse;
pub use client::RequestError;
pub use validator::JobPollOutcome;
pub use validator::LiveValidator;
