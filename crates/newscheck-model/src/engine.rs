//! Inference engine: bounded execution over the loaded model.

use crate::loader::ClassifierBackend;
use newscheck_core::{ClassificationRaw, Error, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::debug;

/// Wraps the loaded classifier backend for concurrent request handlers.
///
/// The handle is immutable once constructed and shared read-only; only the
/// lifecycle manager creates or replaces it.
pub struct InferenceEngine {
    backend: Arc<dyn ClassifierBackend>,
    timeout: Duration,
}

impl InferenceEngine {
    pub fn new(backend: Arc<dyn ClassifierBackend>, timeout: Duration) -> Self {
        Self { backend, timeout }
    }

    /// Classify normalized text.
    ///
    /// The CPU-bound forward pass runs on the blocking pool so concurrent
    /// requests on the async runtime are not starved, and is bounded by a
    /// per-request timeout distinct from the model-load timeout.
    pub async fn classify(&self, text: &str) -> Result<ClassificationRaw> {
        let start = Instant::now();
        let backend = Arc::clone(&self.backend);
        let text = text.to_owned();
        let task = tokio::task::spawn_blocking(move || backend.predict(&text));

        let raw = match tokio::time::timeout(self.timeout, task).await {
            Ok(Ok(result)) => result?,
            Ok(Err(join_err)) => {
                return Err(Error::classifier(format!(
                    "inference task failed: {join_err}"
                )))
            }
            Err(_) => return Err(Error::Timeout),
        };

        let latency_us = start.elapsed().as_micros() as u64;
        metrics::histogram!("newscheck_inference_latency_us").record(latency_us as f64);
        debug!(
            label = %raw.label,
            probability = raw.probability,
            latency_us,
            "inference complete"
        );
        Ok(raw)
    }
}
