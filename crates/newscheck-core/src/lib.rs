//! NewsCheck Core
//!
//! Core types and error handling shared across NewsCheck components.
//!
//! This crate provides:
//! - Classification types: raw model output, user-facing decisions,
//!   confidence bands
//! - The model lifecycle readiness state machine
//! - Error types and result handling

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{ClassificationRaw, ConfidenceBand, Decision, RawLabel, Readiness, Verdict};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::types::{
        ClassificationRaw, ConfidenceBand, Decision, RawLabel, Readiness, Verdict,
    };
}
