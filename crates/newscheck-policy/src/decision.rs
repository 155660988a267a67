//! Confidence-aware decision engine.
//!
//! Translates a raw (label, probability) pair into a decision that never
//! overstates certainty. The engine is asymmetric: it only ever downgrades
//! a weak raw prediction to `Uncertain`; it never upgrades one and never
//! flips the label. The output space is exactly
//! {raw-label-if-confident, Uncertain}.

use newscheck_core::{ClassificationRaw, ConfidenceBand, Decision, Result, Verdict};

/// Probability at or above which a non-headline prediction is trusted as-is.
pub const CONFIDENCE_HIGH: f32 = 0.90;

/// Stricter acceptance threshold for headline-shaped input.
pub const CONFIDENCE_HIGH_HEADLINE: f32 = 0.95;

/// Lower bound of the medium band. Does not change the two-outcome
/// decision; it drives the reported [`ConfidenceBand`] only.
pub const CONFIDENCE_MEDIUM: f32 = 0.60;

/// Ordered thresholds defining the decision zones.
///
/// Invariant: `high_threshold > medium_threshold >= 0.5`. A medium bound
/// below 0.5 would let below-chance guesses count as a signal band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConfidencePolicy {
    pub high_threshold: f32,
    pub medium_threshold: f32,
}

impl ConfidencePolicy {
    /// Select the policy for the given input shape.
    pub fn for_input(is_headline: bool) -> Self {
        Self {
            high_threshold: if is_headline {
                CONFIDENCE_HIGH_HEADLINE
            } else {
                CONFIDENCE_HIGH
            },
            medium_threshold: CONFIDENCE_MEDIUM,
        }
    }

    /// Check the threshold ordering invariant.
    pub fn validate(&self) -> Result<()> {
        if self.high_threshold <= self.medium_threshold || self.medium_threshold < 0.5 {
            return Err(newscheck_core::Error::config(format!(
                "invalid confidence policy: high {} must exceed medium {} and medium must be >= 0.5",
                self.high_threshold, self.medium_threshold
            )));
        }
        Ok(())
    }
}

/// Apply the confidence policy to a raw classification.
///
/// At or above the high threshold (inclusive) the raw label is accepted
/// as-is; everything below collapses to `Uncertain`. The returned
/// confidence is always the raw probability, rounded for display at this
/// boundary only.
pub fn decide(raw: ClassificationRaw, is_headline: bool) -> Decision {
    let policy = ConfidencePolicy::for_input(is_headline);

    let verdict = if raw.probability >= policy.high_threshold {
        Verdict::from(raw.label)
    } else {
        Verdict::Uncertain
    };

    Decision {
        verdict,
        confidence: round_confidence(raw.probability),
    }
}

/// Categorize a probability for reporting. Metadata only: the band never
/// alters the verdict.
pub fn confidence_band(probability: f32) -> ConfidenceBand {
    if probability >= CONFIDENCE_HIGH {
        ConfidenceBand::High
    } else if probability >= CONFIDENCE_MEDIUM {
        ConfidenceBand::Medium
    } else {
        ConfidenceBand::Low
    }
}

/// Round to 4 decimal places for display. Applied once at the decision
/// boundary, never internally, so thresholds are always compared against
/// the unrounded probability.
pub fn round_confidence(probability: f32) -> f32 {
    (probability * 10_000.0).round() / 10_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use newscheck_core::RawLabel;
    use proptest::prelude::*;

    fn raw(label: RawLabel, probability: f32) -> ClassificationRaw {
        ClassificationRaw::new(label, probability)
    }

    #[test]
    fn test_high_confidence_accepts_raw_label() {
        let decision = decide(raw(RawLabel::Real, 0.93), false);
        assert_eq!(decision.verdict, Verdict::Real);
        assert_eq!(decision.confidence, 0.93);

        let decision = decide(raw(RawLabel::Fake, 0.99), false);
        assert_eq!(decision.verdict, Verdict::Fake);
        assert_eq!(decision.confidence, 0.99);
    }

    #[test]
    fn test_below_threshold_is_uncertain_regardless_of_label() {
        for label in [RawLabel::Real, RawLabel::Fake] {
            let decision = decide(raw(label, 0.89), false);
            assert_eq!(decision.verdict, Verdict::Uncertain);
            assert_eq!(decision.confidence, 0.89);
        }
    }

    #[test]
    fn test_threshold_boundary_is_inclusive() {
        let decision = decide(raw(RawLabel::Real, CONFIDENCE_HIGH), false);
        assert_eq!(decision.verdict, Verdict::Real);

        let decision = decide(raw(RawLabel::Fake, CONFIDENCE_HIGH_HEADLINE), true);
        assert_eq!(decision.verdict, Verdict::Fake);
    }

    #[test]
    fn test_headline_input_uses_stricter_threshold() {
        // 0.93 clears the article threshold but not the headline one
        let decision = decide(raw(RawLabel::Real, 0.93), true);
        assert_eq!(decision.verdict, Verdict::Uncertain);

        let decision = decide(raw(RawLabel::Real, 0.93), false);
        assert_eq!(decision.verdict, Verdict::Real);
    }

    #[test]
    fn test_medium_and_low_zones_collapse_to_uncertain() {
        let medium = decide(raw(RawLabel::Fake, 0.75), false);
        let low = decide(raw(RawLabel::Fake, 0.55), false);
        assert_eq!(medium.verdict, Verdict::Uncertain);
        assert_eq!(low.verdict, Verdict::Uncertain);
    }

    #[test]
    fn test_decide_is_deterministic() {
        let input = raw(RawLabel::Real, 0.8123);
        assert_eq!(decide(input, true), decide(input, true));
        assert_eq!(decide(input, false), decide(input, false));
    }

    #[test]
    fn test_confidence_band() {
        assert_eq!(confidence_band(0.95), ConfidenceBand::High);
        assert_eq!(confidence_band(CONFIDENCE_HIGH), ConfidenceBand::High);
        assert_eq!(confidence_band(0.75), ConfidenceBand::Medium);
        assert_eq!(confidence_band(CONFIDENCE_MEDIUM), ConfidenceBand::Medium);
        assert_eq!(confidence_band(0.4), ConfidenceBand::Low);
    }

    #[test]
    fn test_round_confidence_to_four_places() {
        assert_eq!(round_confidence(0.123_456), 0.1235);
        assert_eq!(round_confidence(0.9), 0.9);
        assert_eq!(round_confidence(1.0), 1.0);
        assert_eq!(round_confidence(0.0), 0.0);
    }

    #[test]
    fn test_builtin_policies_satisfy_invariant() {
        ConfidencePolicy::for_input(true).validate().unwrap();
        ConfidencePolicy::for_input(false).validate().unwrap();
    }

    #[test]
    fn test_inverted_policy_rejected() {
        let policy = ConfidencePolicy {
            high_threshold: 0.5,
            medium_threshold: 0.6,
        };
        assert!(policy.validate().is_err());
    }

    proptest! {
        // The engine never invents a third outcome and never flips labels:
        // the verdict is either the raw label's verdict or Uncertain,
        // selected solely by the threshold comparison.
        #[test]
        fn prop_output_space_is_accept_or_uncertain(
            p in 0.0f32..=1.0,
            is_headline in any::<bool>(),
            label_is_real in any::<bool>(),
        ) {
            let label = if label_is_real { RawLabel::Real } else { RawLabel::Fake };
            let decision = decide(raw(label, p), is_headline);
            let threshold = ConfidencePolicy::for_input(is_headline).high_threshold;

            if p >= threshold {
                prop_assert_eq!(decision.verdict, Verdict::from(label));
            } else {
                prop_assert_eq!(decision.verdict, Verdict::Uncertain);
            }
        }
    }
}
