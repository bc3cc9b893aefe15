// crates/contract-parity-core/src/analysis/mod.rs
// ============================================================================
// Module: Contract Analysis
// Description: Coverage matching and parameter reconciliation.
// Purpose: Derive pass/fail/warning findings from extracted catalogs.
// Dependencies: regex, serde
// ============================================================================

//! ## Overview
//! Analysis functions are pure: they consume catalogs or source text plus
//! injected rules and return a [`crate::RunReport`] fragment. Frontend-only
//! endpoints are failures; every other mismatch is advisory.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod coverage;
pub mod parameters;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use coverage::ComparisonResult;
pub use coverage::compare;
pub use parameters::BaseUrlPolicy;
pub use parameters::ParameterContract;
pub use parameters::ParameterReconciler;
pub use parameters::ParameterReconciliation;
pub use parameters::ParameterRename;
