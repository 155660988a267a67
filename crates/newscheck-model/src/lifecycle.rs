//! Model lifecycle management: cache-then-fetch recovery, a single
//! coalesced load, and readiness reporting.

use crate::artifact::{ArtifactDescriptor, ArtifactStore};
use crate::cache::LocalArtifactCache;
use crate::config::ModelSettings;
use crate::engine::InferenceEngine;
use crate::loader::ModelLoader;
use newscheck_core::{Error, Readiness, Result};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

/// Guarantees an [`InferenceEngine`] is ready before any classification
/// request is served, recovering transparently from artifact absence.
///
/// An instance is injected into request handlers by reference; readiness
/// is a typed state, not a flag, and the engine handle is published
/// atomically so readers see either "not ready" or a fully loaded model.
pub struct ModelLifecycleManager {
    descriptor: ArtifactDescriptor,
    cache: LocalArtifactCache,
    store: Arc<dyn ArtifactStore>,
    loader: Arc<dyn ModelLoader>,
    load_timeout: Duration,
    inference_timeout: Duration,

    state: RwLock<Readiness>,
    engine: RwLock<Option<Arc<InferenceEngine>>>,
    last_load: RwLock<Option<Duration>>,

    // Serializes loads: concurrent ensure_loaded() callers block here and
    // re-check state after acquisition, so at most one fetch sequence runs.
    load_gate: tokio::sync::Mutex<()>,
}

impl ModelLifecycleManager {
    pub fn new(
        descriptor: ArtifactDescriptor,
        cache: LocalArtifactCache,
        store: Arc<dyn ArtifactStore>,
        loader: Arc<dyn ModelLoader>,
        load_timeout: Duration,
        inference_timeout: Duration,
    ) -> Self {
        Self {
            descriptor,
            cache,
            store,
            loader,
            load_timeout,
            inference_timeout,
            state: RwLock::new(Readiness::Unloaded),
            engine: RwLock::new(None),
            last_load: RwLock::new(None),
            load_gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Build a manager with the default HTTP store and Candle loader.
    pub fn from_settings(settings: &ModelSettings) -> Self {
        let store = Arc::new(
            crate::artifact::HttpArtifactStore::new(&settings.artifacts.base_url)
                .with_retry(settings.retry.to_policy()),
        );
        let loader = Arc::new(crate::loader::CandleModelLoader::new(
            settings.device.to_device_type(),
        ));
        Self::new(
            settings.descriptor(),
            LocalArtifactCache::new(&settings.cache_dir),
            store,
            loader,
            settings.load_timeout(),
            settings.inference_timeout(),
        )
    }

    /// Current lifecycle state, for health checks.
    pub fn readiness(&self) -> Readiness {
        *self.state.read()
    }

    pub fn is_ready(&self) -> bool {
        self.readiness().is_ready()
    }

    /// Wall time of the last successful load, for metrics exporters.
    pub fn last_load_duration(&self) -> Option<Duration> {
        *self.last_load.read()
    }

    /// The shared inference engine, or `NotReady` before a successful load.
    pub fn engine(&self) -> Result<Arc<InferenceEngine>> {
        self.engine.read().clone().ok_or(Error::NotReady)
    }

    /// Ensure a classifier is loaded and ready.
    ///
    /// Idempotent once `Ready`. Concurrent callers coalesce onto the
    /// single in-flight load. A failed load leaves the state `Failed` and
    /// health checks red; only an explicit later call re-attempts the
    /// fetch — there is no internal retry loop here.
    pub async fn ensure_loaded(&self) -> Result<()> {
        if self.is_ready() {
            return Ok(());
        }

        let _gate = self.load_gate.lock().await;
        if self.is_ready() {
            // another caller finished the load while we waited
            return Ok(());
        }

        *self.state.write() = Readiness::Loading;
        let start = Instant::now();

        match tokio::time::timeout(self.load_timeout, self.load_inner()).await {
            Ok(Ok(engine)) => {
                *self.engine.write() = Some(engine);
                *self.state.write() = Readiness::Ready;
                let took = start.elapsed();
                *self.last_load.write() = Some(took);
                metrics::histogram!("newscheck_model_load_seconds").record(took.as_secs_f64());
                info!(load_ms = took.as_millis() as u64, "model loaded and ready");
                Ok(())
            }
            Ok(Err(e)) => {
                *self.state.write() = Readiness::Failed;
                metrics::counter!("newscheck_model_load_failures_total").increment(1);
                error!("model load failed: {e}");
                Err(e)
            }
            Err(_) => {
                *self.state.write() = Readiness::Failed;
                metrics::counter!("newscheck_model_load_failures_total").increment(1);
                error!(
                    "model load exceeded timeout of {:?}",
                    self.load_timeout
                );
                Err(Error::Timeout)
            }
        }
    }

    async fn load_inner(&self) -> Result<Arc<InferenceEngine>> {
        if self.descriptor.files.is_empty() {
            return Err(Error::config(
                "artifact descriptor names no required files",
            ));
        }

        if self.cache.is_complete(&self.descriptor) {
            info!(
                cache_dir = %self.cache.dir().display(),
                "complete artifact set found locally"
            );
        } else {
            warn!(
                cache_dir = %self.cache.dir().display(),
                prefix = %self.descriptor.prefix,
                "artifact set incomplete locally; fetching from store"
            );
            self.fetch_artifacts().await?;
        }

        let backend = self.loader.load(self.cache.dir()).await?;
        let engine = Arc::new(InferenceEngine::new(backend, self.inference_timeout));
        self.warmup(&engine).await;
        Ok(engine)
    }

    /// Fetch every required file into the cache. Listing first means a
    /// half-populated remote version fails fast instead of leaving a
    /// partial local set; any single-file failure aborts the whole load.
    async fn fetch_artifacts(&self) -> Result<()> {
        self.cache.ensure_dir()?;

        let available = self.store.list(&self.descriptor.prefix).await?;
        for file in &self.descriptor.files {
            let key = self.descriptor.key_for(file);
            if !available.contains(&key) {
                return Err(Error::artifact(format!(
                    "required file {key} not present in store"
                )));
            }
        }

        for file in &self.descriptor.files {
            let key = self.descriptor.key_for(file);
            let dest = self.cache.path_for(file);
            info!("fetching {key}");
            self.store.fetch(&key, &dest).await?;
        }
        Ok(())
    }

    /// One throwaway classification to initialize lazy state. Failure is
    /// non-critical.
    async fn warmup(&self, engine: &InferenceEngine) {
        if let Err(e) = engine
            .classify("This is a warmup sentence to initialize the model.")
            .await
        {
            warn!("warmup classification failed (non-critical): {e}");
        }
    }
}
