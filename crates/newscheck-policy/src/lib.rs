//! NewsCheck Policy
//!
//! The confidence-aware decision layer: threshold constants, zone
//! selection for headline-shaped input, and the two-outcome decision
//! function that downgrades weak predictions to `Uncertain`.

pub mod decision;

pub use decision::{
    confidence_band, decide, round_confidence, ConfidencePolicy, CONFIDENCE_HIGH,
    CONFIDENCE_HIGH_HEADLINE, CONFIDENCE_MEDIUM,
};
