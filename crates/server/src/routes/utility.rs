use axum::{extract::{Path, State}, Json};
use models::UtilityCompany;
use tracing::info;

use crate::errors::ApiError;
use crate::state::AppState;

/// Unknown zips answer 200 with the "Unknown Utility Company" record.
#[utoipa::path(
    get, path = "/api/utility-company/{zip_code}", tag = "utility",
    params(("zip_code" = String, Path, description = "5 or 9 digit zip code")),
    responses(
        (status = 200, description = "Utility for the zip", body = crate::openapi::UtilityCompanyDoc),
        (status = 500, description = "Utility table could not be loaded")
    )
)]
pub async fn get_utility_company(
    State(state): State<AppState>,
    Path(zip_code): Path<String>,
) -> Result<Json<UtilityCompany>, ApiError> {
    info!(%zip_code, "retrieving utility company");
    let lookup = state
        .utilities
        .lookup(&zip_code)
        .await
        .map_err(|e| ApiError::from_service("Failed to retrieve utility company", e))?;
    let zip = lookup.zip().to_string();
    let company = UtilityCompany::from_record(&zip, lookup.into_record());
    info!(utility = %company.name, %zip, "found utility company");
    Ok(Json(company))
}
