//! Configuration for the model lifecycle and inference.

use crate::artifact::{ArtifactDescriptor, RetryPolicy};
use crate::cache::LocalArtifactCache;
use crate::loader::DeviceType;
use newscheck_core::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Startup parameters for the model subsystem.
///
/// Supplied by whatever configuration layer hosts the engine; the core
/// treats these as opaque startup values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelSettings {
    /// Remote artifact location
    pub artifacts: ArtifactSpec,

    /// Local artifact cache directory
    #[serde(default = "default_cache_dir")]
    pub cache_dir: PathBuf,

    /// Device to run inference on
    #[serde(default)]
    pub device: DeviceSpec,

    /// Bound on the whole load: cache check, fetch, graph build, warmup
    #[serde(default = "default_load_timeout_secs")]
    pub load_timeout_secs: u64,

    /// Bound on a single classification request
    #[serde(default = "default_inference_timeout_ms")]
    pub inference_timeout_ms: u64,

    /// Retry strategy for the artifact store client
    #[serde(default)]
    pub retry: RetrySpec,
}

/// Remote artifact location specification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactSpec {
    /// Store endpoint, e.g. `https://artifacts.example.com`
    pub base_url: String,

    /// Version prefix under the store, e.g. `news-bert/v1`
    pub prefix: String,

    /// File names required for a complete artifact set
    #[serde(default = "default_artifact_files")]
    pub files: Vec<String>,
}

/// Device specification (for config files)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceSpec {
    Cpu,
    Cuda { index: Option<usize> },
    Metal { index: Option<usize> },
}

impl Default for DeviceSpec {
    fn default() -> Self {
        Self::Cpu
    }
}

impl DeviceSpec {
    pub fn to_device_type(&self) -> DeviceType {
        match self {
            DeviceSpec::Cpu => DeviceType::Cpu,
            DeviceSpec::Cuda { index } => DeviceType::Cuda(index.unwrap_or(0)),
            DeviceSpec::Metal { index } => DeviceType::Metal(index.unwrap_or(0)),
        }
    }
}

/// Retry specification for the store client
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrySpec {
    #[serde(default = "default_retry_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_retry_backoff_ms")]
    pub backoff_ms: u64,
}

impl Default for RetrySpec {
    fn default() -> Self {
        Self {
            max_attempts: default_retry_attempts(),
            backoff_ms: default_retry_backoff_ms(),
        }
    }
}

impl RetrySpec {
    pub fn to_policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            backoff: Duration::from_millis(self.backoff_ms),
        }
    }
}

impl ModelSettings {
    /// Load from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| newscheck_core::Error::config(format!("invalid model settings: {e}")))
    }

    /// Load from a file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// The immutable artifact version these settings point at.
    pub fn descriptor(&self) -> ArtifactDescriptor {
        ArtifactDescriptor {
            base_url: self.artifacts.base_url.clone(),
            prefix: self.artifacts.prefix.clone(),
            files: self.artifacts.files.clone(),
        }
    }

    pub fn load_timeout(&self) -> Duration {
        Duration::from_secs(self.load_timeout_secs)
    }

    pub fn inference_timeout(&self) -> Duration {
        Duration::from_millis(self.inference_timeout_ms)
    }
}

fn default_cache_dir() -> PathBuf {
    LocalArtifactCache::default_dir()
}

fn default_artifact_files() -> Vec<String> {
    ["config.json", "tokenizer.json", "model.safetensors"]
        .map(String::from)
        .to_vec()
}

fn default_load_timeout_secs() -> u64 {
    300
}

fn default_inference_timeout_ms() -> u64 {
    5_000
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    500
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_from_yaml() {
        let yaml = r#"
artifacts:
  base_url: https://artifacts.example.com
  prefix: news-bert/v2
  files:
    - config.json
    - tokenizer.json
    - model.safetensors
cache_dir: /var/cache/newscheck
device: cpu
load_timeout_secs: 120
retry:
  max_attempts: 5
  backoff_ms: 250
"#;

        let settings = ModelSettings::from_yaml(yaml).unwrap();
        assert_eq!(settings.artifacts.prefix, "news-bert/v2");
        assert_eq!(settings.cache_dir, PathBuf::from("/var/cache/newscheck"));
        assert_eq!(settings.load_timeout(), Duration::from_secs(120));
        assert_eq!(settings.retry.max_attempts, 5);
        assert_eq!(
            settings.retry.to_policy().backoff,
            Duration::from_millis(250)
        );

        let descriptor = settings.descriptor();
        assert_eq!(descriptor.files.len(), 3);
    }

    #[test]
    fn test_settings_defaults() {
        let yaml = r#"
artifacts:
  base_url: https://artifacts.example.com
  prefix: news-bert/v1
"#;

        let settings = ModelSettings::from_yaml(yaml).unwrap();
        assert!(matches!(settings.device, DeviceSpec::Cpu));
        assert_eq!(settings.load_timeout(), Duration::from_secs(300));
        assert_eq!(settings.inference_timeout(), Duration::from_millis(5_000));
        assert_eq!(
            settings.artifacts.files,
            vec!["config.json", "tokenizer.json", "model.safetensors"]
        );
    }

    #[test]
    fn test_device_spec_conversion() {
        assert!(matches!(DeviceSpec::Cpu.to_device_type(), DeviceType::Cpu));
        assert!(matches!(
            DeviceSpec::Cuda { index: Some(1) }.to_device_type(),
            DeviceType::Cuda(1)
        ));
        assert!(matches!(
            DeviceSpec::Metal { index: None }.to_device_type(),
            DeviceType::Metal(0)
        ));
    }

    #[test]
    fn test_invalid_yaml_is_config_error() {
        let err = ModelSettings::from_yaml("artifacts: [nonsense").unwrap_err();
        assert!(matches!(err, newscheck_core::Error::Config(_)));
    }
}
