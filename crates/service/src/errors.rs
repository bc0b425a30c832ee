use thiserror::Error;

/// Failures surfaced by the core. Shape anomalies in stored or returned data
/// never appear here: they are logged and replaced by a default.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Object store transport or auth fault.
    #[error("object store error: {0}")]
    Store(String),
    /// Stored blob exists but is not valid JSON.
    #[error("invalid JSON in stored object: {0}")]
    Decode(String),
    #[error("encode error: {0}")]
    Encode(String),
    /// Geocoding service unreachable, timed out, or answered with an error status.
    #[error("geocoding service unavailable: {0}")]
    Validation(String),
    #[error("model error: {0}")]
    Model(#[from] models::errors::ModelError),
}

impl ServiceError {
    pub fn store(key: &str, err: impl std::fmt::Display) -> Self {
        Self::Store(format!("{key}: {err}"))
    }

    pub fn decode(key: &str, err: impl std::fmt::Display) -> Self {
        Self::Decode(format!("{key}: {err}"))
    }

    /// Whether the failure came from caller input rather than infrastructure.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Model(_))
    }
}
