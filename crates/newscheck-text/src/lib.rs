//! NewsCheck Text
//!
//! Pure text-shape logic for the classification pipeline: input
//! normalization and the headline-only heuristic. No I/O, no async; every
//! function here is deterministic.

pub mod headline;
pub mod normalize;

pub use headline::is_headline_only;
pub use normalize::TextNormalizer;
