use axum::{extract::State, Json};
use models::{AddressQuery, ValidatedAddress};
use tracing::info;

use crate::errors::ApiError;
use crate::state::AppState;

#[utoipa::path(
    post, path = "/api/validate-address", tag = "address",
    request_body = crate::openapi::AddressQueryDoc,
    responses(
        (status = 200, description = "Validated (isValid=false when unmatched)", body = crate::openapi::ValidatedAddressDoc),
        (status = 422, description = "Invalid address fields"),
        (status = 500, description = "Geocoding service unavailable")
    )
)]
pub async fn validate_address(
    State(state): State<AppState>,
    Json(query): Json<AddressQuery>,
) -> Result<Json<ValidatedAddress>, ApiError> {
    info!(address = %query.address, city = %query.city, state = %query.state, zip = %query.zip_code, "validating address");
    let result = state
        .validator
        .validate_address(&query.address, &query.city, &query.state, &query.zip_code)
        .await
        .map_err(|e| ApiError::from_service("Address validation failed", e))?;
    info!(matched = %result.matched_address, valid = result.is_valid, "address validation complete");
    Ok(Json(result))
}
