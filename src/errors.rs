//! Error types for healthdiag
//!
//! Startup-phase failures are `PipelineError` and halt the process before it
//! serves predictions. `PlatformError` classifies what the model-serving
//! platform reported, so "not found" is never confused with "unreachable".
//! `PredictionError` stays internal to the dispatcher and is downgraded to
//! the sentinel result at the boundary.

use thiserror::Error;

/// Failures raised while bringing the pipeline up
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Source file unreadable/malformed, or the store could not be written
    #[error("Failed to load '{path}': {reason}")]
    Load { path: String, reason: String },

    /// Relation absent after load
    #[error("Relation '{0}' not found in the store")]
    MissingRelation(String),

    /// Relation present but holds no rows
    #[error("Relation '{0}' is empty")]
    EmptyRelation(String),

    /// Data source listing or registration failed
    #[error("Failed to register data source '{name}': {source}")]
    Registration {
        name: String,
        #[source]
        source: PlatformError,
    },

    /// Lookup failed for a reason other than absence
    #[error("Failed to look up {kind} '{name}': {source}")]
    Lookup {
        kind: &'static str,
        name: String,
        #[source]
        source: PlatformError,
    },

    /// Platform rejected project or model creation
    #[error("Failed to create {kind} '{name}': {source}")]
    Creation {
        kind: &'static str,
        name: String,
        #[source]
        source: PlatformError,
    },

    /// Training ran and failed
    #[error("Training of model '{name}' failed: {source}")]
    Training {
        name: String,
        #[source]
        source: PlatformError,
    },

    /// Training did not finish within the configured limit
    #[error("Training of model '{name}' timed out after {duration_secs}s")]
    TrainingTimeout { name: String, duration_secs: u64 },

    /// Model handle was already published for this process
    #[error("Model handle already published")]
    AlreadyPublished,

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Failures reported by the model-serving platform collaborator
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Requested resource does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// Platform could not be reached (connect failure, timeout)
    #[error("Platform unreachable: {0}")]
    Unreachable(String),

    /// Platform answered with an error status
    #[error("Platform API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// Response body did not have the expected shape
    #[error("Failed to decode platform response: {0}")]
    Decode(String),

    /// Training finished in an error state
    #[error("Training failed: {0}")]
    TrainingFailed(String),
}

impl From<reqwest::Error> for PlatformError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_connect() || err.is_timeout() {
            PlatformError::Unreachable(err.to_string())
        } else if err.is_decode() {
            PlatformError::Decode(err.to_string())
        } else {
            match err.status() {
                Some(status) => PlatformError::Api {
                    status: status.as_u16(),
                    message: err.to_string(),
                },
                None => PlatformError::Unreachable(err.to_string()),
            }
        }
    }
}

impl From<serde_json::Error> for PlatformError {
    fn from(err: serde_json::Error) -> Self {
        PlatformError::Decode(err.to_string())
    }
}

/// Per-request prediction failures
#[derive(Error, Debug)]
pub enum PredictionError {
    /// The platform call failed
    #[error("Prediction call failed: {0}")]
    Platform(#[from] PlatformError),

    /// The platform answered without the label column
    #[error("Prediction response has no '{0}' field")]
    MissingLabel(String),

    /// No model handle has been published yet
    #[error("No trained model is available")]
    ModelUnavailable,
}

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;
