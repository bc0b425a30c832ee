use axum::{extract::State, Json};

use crate::state::AppState;

/// Drop the cached utility table; the next lookup reloads it from storage.
#[utoipa::path(post, path = "/api/admin/clear-utility-cache", tag = "admin", responses((status = 200, description = "Cache cleared")))]
pub async fn clear_utility_cache(State(state): State<AppState>) -> Json<serde_json::Value> {
    state.utilities.clear();
    Json(serde_json::json!({"status": "success", "message": "Utility cache cleared"}))
}
