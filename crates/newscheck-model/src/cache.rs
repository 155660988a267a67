//! Local artifact cache on durable storage.

use crate::artifact::ArtifactDescriptor;
use newscheck_core::Result;
use std::path::{Path, PathBuf};

/// Directory holding the last-fetched artifact set.
///
/// The cache is checked for completeness before any remote fetch; a file
/// that exists but is empty counts as missing, since a truncated artifact
/// must never be loaded.
pub struct LocalArtifactCache {
    dir: PathBuf,
}

impl LocalArtifactCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Default cache location under the user's home directory.
    pub fn default_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".cache/newscheck/models")
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Local path for one artifact file.
    pub fn path_for(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    /// True when every file the descriptor requires is present and
    /// non-empty.
    pub fn is_complete(&self, descriptor: &ArtifactDescriptor) -> bool {
        !descriptor.files.is_empty()
            && descriptor.files.iter().all(|file| {
                std::fs::metadata(self.path_for(file))
                    .map(|m| m.is_file() && m.len() > 0)
                    .unwrap_or(false)
            })
    }

    /// Create the cache directory if it does not exist.
    pub fn ensure_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;
        Ok(())
    }

    /// Drop all cached files, e.g. ahead of an explicit version change.
    pub fn purge(&self) -> Result<()> {
        if self.dir.exists() {
            std::fs::remove_dir_all(&self.dir)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(files: &[&str]) -> ArtifactDescriptor {
        ArtifactDescriptor {
            base_url: "https://artifacts.example.com".to_string(),
            prefix: "news-bert/v1".to_string(),
            files: files.iter().map(|f| f.to_string()).collect(),
        }
    }

    #[test]
    fn test_complete_when_all_files_present() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalArtifactCache::new(dir.path());
        std::fs::write(cache.path_for("config.json"), b"{}").unwrap();
        std::fs::write(cache.path_for("model.safetensors"), b"weights").unwrap();

        assert!(cache.is_complete(&descriptor(&["config.json", "model.safetensors"])));
    }

    #[test]
    fn test_incomplete_when_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalArtifactCache::new(dir.path());
        std::fs::write(cache.path_for("config.json"), b"{}").unwrap();

        assert!(!cache.is_complete(&descriptor(&["config.json", "model.safetensors"])));
    }

    #[test]
    fn test_empty_file_counts_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalArtifactCache::new(dir.path());
        std::fs::write(cache.path_for("model.safetensors"), b"").unwrap();

        assert!(!cache.is_complete(&descriptor(&["model.safetensors"])));
    }

    #[test]
    fn test_empty_descriptor_is_never_complete() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalArtifactCache::new(dir.path());
        assert!(!cache.is_complete(&descriptor(&[])));
    }

    #[test]
    fn test_purge_removes_cached_files() {
        let dir = tempfile::tempdir().unwrap();
        let cache = LocalArtifactCache::new(dir.path().join("models"));
        cache.ensure_dir().unwrap();
        std::fs::write(cache.path_for("config.json"), b"{}").unwrap();

        cache.purge().unwrap();
        assert!(!cache.is_complete(&descriptor(&["config.json"])));
        // purging an already-absent directory is fine
        cache.purge().unwrap();
    }
}
