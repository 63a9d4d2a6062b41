use thiserror::Error;

/// Error types for the RBCM reputation simulator.
#[derive(Debug, Error)]
pub enum RbcmError {
    /// Numeric input outside the domain of the score formula
    /// (e.g. `distance <= -1`, NaN, infinite values).
    #[error("Domain error: {0}")]
    Domain(String),

    /// Malformed or out-of-range request or configuration value.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid lifecycle transition.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Node not present in either partition.
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<serde_json::Error> for RbcmError {
    fn from(e: serde_json::Error) -> Self {
        RbcmError::Serialization(e.to_string())
    }
}
