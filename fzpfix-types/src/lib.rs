//! Shared DTOs for the fzpfix workspace.
//!
//! # Design constraints
//! - These types are serialized to disk as `report.json`.
//! - Prefer adding optional fields over changing semantics.

pub mod mode;
pub mod report;

pub use mode::PatchMode;

/// Schema identifiers.
pub mod schema {
    pub const FZPFIX_REPORT_V1: &str = "fzpfix.report.v1";
}
