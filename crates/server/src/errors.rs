use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// Handler failure rendered as `{"detail": "<context>: <message>"}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self { status, detail: detail.into() }
    }

    /// Input problems are 422; everything else is a generic 500.
    pub fn from_service(context: &str, err: ServiceError) -> Self {
        let status = if err.is_client_error() {
            StatusCode::UNPROCESSABLE_ENTITY
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        };
        error!(%status, error = %err, "{}", context);
        Self::new(status, format!("{context}: {err}"))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({"detail": self.detail}))).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::errors::ModelError;

    #[test]
    fn store_failures_are_internal_errors() {
        let e = ApiError::from_service("Failed to submit information", ServiceError::Store("subscribers.json: timeout".into()));
        assert_eq!(e.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(e.detail, "Failed to submit information: object store error: subscribers.json: timeout");
    }

    #[test]
    fn model_failures_are_unprocessable() {
        let e = ApiError::from_service("Address validation failed", ModelError::Validation("bad state".into()).into());
        assert_eq!(e.status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}
