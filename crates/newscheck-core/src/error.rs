//! Error types for NewsCheck

/// Result type alias using NewsCheck's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for NewsCheck operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Model artifacts could not be fetched or loaded; fatal to readiness
    #[error("artifact unavailable: {0}")]
    ArtifactUnavailable(String),

    /// Classification requested before a successful model load
    #[error("model is not ready")]
    NotReady,

    /// Classifier execution errors
    #[error("classifier error: {0}")]
    Classifier(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Timeout errors
    #[error("operation timed out")]
    Timeout,
}

impl Error {
    /// Create a new artifact-unavailable error
    pub fn artifact(msg: impl Into<String>) -> Self {
        Self::ArtifactUnavailable(msg.into())
    }

    /// Create a new classifier error
    pub fn classifier(msg: impl Into<String>) -> Self {
        Self::Classifier(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
