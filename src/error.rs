//! Error types for VibeOS
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

use crate::llm::LlmError;

/// All error types that can occur outside of a reconciliation run
#[derive(Debug, Error)]
pub enum VibeError {
    /// Manifest failed structural validation
    #[error("Invalid manifest: {0}")]
    InvalidManifest(String),

    /// Manifest not present in the store
    #[error("Manifest not found: {0}")]
    ManifestNotFound(String),

    /// Storage error
    #[error("Storage error: {0}")]
    Storage(String),

    /// LLM API error
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Result type alias for VibeOS operations
pub type Result<T> = std::result::Result<T, VibeError>;
