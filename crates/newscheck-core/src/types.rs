//! Core types for NewsCheck

use serde::{Deserialize, Serialize};

/// Raw label emitted by the binary classifier.
///
/// The model's output head has exactly two classes; class index 0 maps to
/// `Fake` and index 1 to `Real`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RawLabel {
    Fake,
    Real,
}

impl RawLabel {
    /// Map a model output class index to its label.
    pub fn from_class_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Fake),
            1 => Some(Self::Real),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fake => "Fake",
            Self::Real => "Real",
        }
    }
}

impl std::fmt::Display for RawLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw classification output: the predicted label and the probability mass
/// the model assigned to that label (always the predicted class, never a
/// fixed one).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationRaw {
    pub label: RawLabel,

    /// Probability of the predicted label, in `[0, 1]`
    pub probability: f32,
}

impl ClassificationRaw {
    pub fn new(label: RawLabel, probability: f32) -> Self {
        Self { label, probability }
    }
}

/// User-facing verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Real,
    Fake,
    Uncertain,
}

impl Verdict {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Real => "Real",
            Self::Fake => "Fake",
            Self::Uncertain => "Uncertain",
        }
    }
}

impl From<RawLabel> for Verdict {
    fn from(label: RawLabel) -> Self {
        match label {
            RawLabel::Real => Self::Real,
            RawLabel::Fake => Self::Fake,
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Final decision handed to callers.
///
/// Derived deterministically from a [`ClassificationRaw`] and the input
/// shape; whatever layer persists history receives this value, and
/// persistence failures never affect it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub verdict: Verdict,

    /// Confidence in `[0, 1]`, rounded to 4 decimal places for display
    pub confidence: f32,
}

/// Confidence band for reporting and metadata.
///
/// Bands never change the decision itself; they exist so callers can
/// distinguish a weak signal from no signal at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
}

impl ConfidenceBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }
}

/// Model lifecycle readiness state.
///
/// Transitions: `Unloaded → Loading → Ready` on the happy path, or
/// `Unloaded → Loading → Failed` when artifacts cannot be fetched or
/// loaded. `Failed` keeps health checks red; it is never silently retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Readiness {
    Unloaded,
    Loading,
    Ready,
    Failed,
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }
}

impl std::fmt::Display for Readiness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Unloaded => "unloaded",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}
