// crates/contract-parity-core/src/core/mod.rs
// ============================================================================
// Module: Contract Parity Core Types
// Description: Endpoint catalog and report data model.
// Purpose: Provide stable, serializable types shared by extractors and checks.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Core types describe the normalized endpoint representation used as the unit
//! of comparison between backend and frontend, and the report accumulator every
//! check returns.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod endpoint;
pub mod report;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use endpoint::BackendCatalog;
pub use endpoint::EndpointCatalog;
pub use endpoint::EndpointKey;
pub use endpoint::EndpointRecord;
pub use endpoint::FrontendCatalog;
pub use endpoint::HttpMethod;
pub use endpoint::PATH_PARAM_PLACEHOLDER;
pub use report::Finding;
pub use report::RunReport;
pub use report::Severity;
