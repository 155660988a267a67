//! Remote artifact store abstraction and clients.
//!
//! The lifecycle manager only needs two operations from object storage:
//! list keys under a prefix, and fetch one object to a local path. Retry
//! tuning is a property of the store client, not of lifecycle policy, so
//! it is injected here as a strategy value.

use async_trait::async_trait;
use newscheck_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::warn;

/// Identifies one immutable version of model artifact files.
///
/// Once a version has been fetched and validated its files never change;
/// the lifecycle manager re-fetches only on cache-miss or an explicit
/// version (prefix) change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactDescriptor {
    /// Store endpoint, e.g. `https://artifacts.example.com/models`
    pub base_url: String,

    /// Version prefix under the store, e.g. `news-bert/v1`
    pub prefix: String,

    /// File names required for a complete artifact set
    pub files: Vec<String>,
}

impl ArtifactDescriptor {
    /// Object key for one required file.
    pub fn key_for(&self, file: &str) -> String {
        format!("{}/{}", self.prefix.trim_end_matches('/'), file)
    }
}

/// Remote object storage holding versioned model artifacts.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    /// List object keys available under a prefix.
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;

    /// Fetch one object into a local path.
    async fn fetch(&self, key: &str, dest: &Path) -> Result<()>;
}

/// Retry strategy for store clients.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff: Duration::from_millis(500),
        }
    }
}

/// Artifact store over plain HTTP(S).
///
/// Expects the store to serve each object at `{base_url}/{key}` and a JSON
/// array of keys at `{base_url}/{prefix}/`.
pub struct HttpArtifactStore {
    client: reqwest::Client,
    base_url: String,
    retry: RetryPolicy,
}

impl HttpArtifactStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            retry: RetryPolicy::default(),
        }
    }

    /// Set the retry strategy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    fn url_for(&self, key: &str) -> String {
        format!("{}/{}", self.base_url, key.trim_start_matches('/'))
    }

    async fn get_with_retry(&self, url: &str) -> Result<reqwest::Response> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self
                .client
                .get(url)
                .send()
                .await
                .and_then(|resp| resp.error_for_status())
            {
                Ok(resp) => return Ok(resp),
                Err(e) if attempt < self.retry.max_attempts => {
                    warn!("fetch attempt {attempt} for {url} failed: {e}; retrying");
                    tokio::time::sleep(self.retry.backoff * attempt).await;
                }
                Err(e) => {
                    return Err(Error::artifact(format!(
                        "GET {url} failed after {attempt} attempts: {e}"
                    )))
                }
            }
        }
    }
}

#[async_trait]
impl ArtifactStore for HttpArtifactStore {
    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let url = format!("{}/{}/", self.base_url, prefix.trim_matches('/'));
        let resp = self.get_with_retry(&url).await?;
        resp.json::<Vec<String>>()
            .await
            .map_err(|e| Error::artifact(format!("invalid listing from {url}: {e}")))
    }

    async fn fetch(&self, key: &str, dest: &Path) -> Result<()> {
        let url = self.url_for(key);
        let resp = self.get_with_retry(&url).await?;
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| Error::artifact(format!("failed to read body of {url}: {e}")))?;

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        // Write to a sidecar and rename, so an aborted transfer never
        // leaves a non-empty file that passes the completeness check.
        let file_name = dest
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::config(format!("invalid artifact path: {}", dest.display())))?;
        let partial = dest.with_file_name(format!("{file_name}.part"));
        tokio::fs::write(&partial, &bytes).await?;
        tokio::fs::rename(&partial, dest).await?;
        Ok(())
    }
}

/// Artifact store backed by the Hugging Face Hub.
///
/// The repository id plays the role of the version prefix: `list` reports
/// keys as `{repo_id}/{filename}`, and `fetch` resolves files through the
/// hub cache before copying them into the destination path.
pub struct HfHubArtifactStore {
    repo_id: String,
    revision: String,
}

impl HfHubArtifactStore {
    pub fn new(repo_id: impl Into<String>) -> Self {
        Self {
            repo_id: repo_id.into(),
            revision: "main".to_string(),
        }
    }

    /// Pin a hub revision
    pub fn with_revision(mut self, revision: impl Into<String>) -> Self {
        self.revision = revision.into();
        self
    }

    fn repo(&self) -> hf_hub::Repo {
        hf_hub::Repo::with_revision(
            self.repo_id.clone(),
            hf_hub::RepoType::Model,
            self.revision.clone(),
        )
    }
}

#[async_trait]
impl ArtifactStore for HfHubArtifactStore {
    async fn list(&self, _prefix: &str) -> Result<Vec<String>> {
        let repo = self.repo();
        let repo_id = self.repo_id.clone();
        tokio::task::spawn_blocking(move || -> Result<Vec<String>> {
            let api = hf_hub::api::sync::Api::new()
                .map_err(|e| Error::artifact(format!("failed to initialize hub API: {e}")))?;
            let info = api
                .repo(repo)
                .info()
                .map_err(|e| Error::artifact(format!("failed to query hub repo {repo_id}: {e}")))?;
            Ok(info
                .siblings
                .into_iter()
                .map(|s| format!("{repo_id}/{}", s.rfilename))
                .collect())
        })
        .await
        .map_err(|e| Error::classifier(format!("hub listing task failed: {e}")))?
    }

    async fn fetch(&self, key: &str, dest: &Path) -> Result<()> {
        let filename = key
            .strip_prefix(&format!("{}/", self.repo_id))
            .unwrap_or(key)
            .to_string();
        let repo = self.repo();
        let dest = dest.to_path_buf();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let api = hf_hub::api::sync::Api::new()
                .map_err(|e| Error::artifact(format!("failed to initialize hub API: {e}")))?;
            let cached = api
                .repo(repo)
                .get(&filename)
                .map_err(|e| Error::artifact(format!("failed to download {filename}: {e}")))?;
            if let Some(parent) = dest.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(&cached, &dest)?;
            Ok(())
        })
        .await
        .map_err(|e| Error::classifier(format!("hub fetch task failed: {e}")))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptor_key_for() {
        let descriptor = ArtifactDescriptor {
            base_url: "https://artifacts.example.com".to_string(),
            prefix: "news-bert/v1".to_string(),
            files: vec!["config.json".to_string()],
        };
        assert_eq!(descriptor.key_for("config.json"), "news-bert/v1/config.json");

        // trailing slash on the prefix must not double up
        let descriptor = ArtifactDescriptor {
            prefix: "news-bert/v1/".to_string(),
            ..descriptor
        };
        assert_eq!(descriptor.key_for("config.json"), "news-bert/v1/config.json");
    }

    #[test]
    fn test_retry_policy_default() {
        let retry = RetryPolicy::default();
        assert_eq!(retry.max_attempts, 3);
        assert_eq!(retry.backoff, Duration::from_millis(500));
    }

    #[test]
    fn test_http_store_url_building() {
        let store = HttpArtifactStore::new("https://artifacts.example.com/");
        assert_eq!(
            store.url_for("news-bert/v1/model.safetensors"),
            "https://artifacts.example.com/news-bert/v1/model.safetensors"
        );
    }
}
