use axum::{extract::State, Json};
use models::{ConfirmationData, SubmissionResponse};
use tracing::info;

use crate::errors::ApiError;
use crate::state::AppState;

#[utoipa::path(
    post, path = "/api/submit-subscriber", tag = "submission",
    request_body = crate::openapi::ConfirmationDataDoc,
    responses(
        (status = 200, description = "Submission recorded", body = crate::openapi::SubmissionResponseDoc),
        (status = 422, description = "Invalid submission"),
        (status = 500, description = "Submission could not be stored")
    )
)]
pub async fn submit_subscriber(
    State(state): State<AppState>,
    Json(data): Json<ConfirmationData>,
) -> Result<Json<SubmissionResponse>, ApiError> {
    let resp = state
        .submissions
        .submit(data)
        .await
        .map_err(|e| ApiError::from_service("Failed to submit information", e))?;
    info!("subscriber information submitted");
    Ok(Json(resp))
}
