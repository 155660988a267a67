//! Request-path composition: normalize, hint, classify, decide.

use crate::lifecycle::ModelLifecycleManager;
use newscheck_core::{ConfidenceBand, Decision, Result};
use newscheck_policy::{confidence_band, decide};
use newscheck_text::{is_headline_only, TextNormalizer};
use std::sync::Arc;
use tracing::info;

/// Per-request classification flow over a shared lifecycle manager.
///
/// The transport layer hands in raw text (already length-validated) and
/// gets back a [`Decision`]; everything in between — cleaning, the
/// headline hint, inference, and the confidence policy — happens here.
pub struct Analyzer {
    lifecycle: Arc<ModelLifecycleManager>,
    normalizer: TextNormalizer,
}

/// Classification plus explainability metadata, for monitoring and
/// debugging endpoints.
#[derive(Debug, Clone)]
pub struct AnalysisReport {
    pub decision: Decision,
    pub is_headline: bool,
    pub text_length: usize,
    pub word_count: usize,
    pub band: ConfidenceBand,
}

impl Analyzer {
    pub fn new(lifecycle: Arc<ModelLifecycleManager>) -> Result<Self> {
        Ok(Self {
            lifecycle,
            normalizer: TextNormalizer::new()?,
        })
    }

    /// Classify submitted text into a user-facing decision.
    ///
    /// Rejected with `NotReady` before a successful load — never answered
    /// with a guessed result.
    pub async fn analyze(&self, text: &str) -> Result<Decision> {
        let engine = self.lifecycle.engine()?;

        let cleaned = self.normalizer.clean(text);
        let is_headline = is_headline_only(&cleaned);
        let raw = engine.classify(&cleaned).await?;
        let decision = decide(raw, is_headline);

        metrics::counter!("newscheck_requests_total").increment(1);
        info!(
            verdict = %decision.verdict,
            confidence = decision.confidence,
            raw_label = %raw.label,
            is_headline,
            "classification complete"
        );
        Ok(decision)
    }

    /// Classify and report metadata alongside the decision.
    pub async fn analyze_with_metadata(&self, text: &str) -> Result<AnalysisReport> {
        let engine = self.lifecycle.engine()?;

        let cleaned = self.normalizer.clean(text);
        let is_headline = is_headline_only(&cleaned);
        let raw = engine.classify(&cleaned).await?;
        let decision = decide(raw, is_headline);

        Ok(AnalysisReport {
            decision,
            is_headline,
            text_length: cleaned.chars().count(),
            word_count: cleaned.split_whitespace().count(),
            band: confidence_band(raw.probability),
        })
    }
}
