// crates/contract-parity-core/src/lib.rs
// ============================================================================
// Module: Contract Parity Core Library
// Description: Public API surface for the contract parity engine.
// Purpose: Expose endpoint extraction, coverage matching, and reporting.
// Dependencies: crate::{core, extract, analysis, checker}
// ============================================================================

//! ## Overview
//! Contract parity core recovers the HTTP endpoints a backend declares and the
//! HTTP calls a frontend issues from plain source text, then compares the two
//! sets. Extraction is pattern based and best-effort; every pattern has an
//! explicit capture contract that is tested independently of the matcher.
//!
//! The crate performs no I/O. Callers hand it file contents and receive a
//! [`RunReport`] describing passes, failures, and warnings.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod analysis;
pub mod checker;
pub mod core;
pub mod extract;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use analysis::BaseUrlPolicy;
pub use analysis::ComparisonResult;
pub use analysis::ParameterContract;
pub use analysis::ParameterReconciler;
pub use analysis::ParameterReconciliation;
pub use analysis::ParameterRename;
pub use analysis::compare;
pub use checker::CheckerSettings;
pub use checker::IntegrationChecker;
pub use checker::IntegrationOutcome;
pub use checker::SourceText;
pub use extract::BackendExtractor;
pub use extract::ExtractError;
pub use extract::FrontendExtractor;
pub use extract::FrontendSyntax;
