pub mod address;
pub mod utility;
pub mod submission;
pub mod admin;

use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{TraceLayer, DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, DefaultOnFailure},
};
use tracing::Level;
use utoipa::OpenApi;

use common::types::{Health, RootStatus};

use crate::openapi::ApiDoc;
use crate::state::AppState;

#[utoipa::path(get, path = "/", tag = "health", responses((status = 200, description = "Service is running")))]
pub async fn root() -> Json<RootStatus> {
    Json(RootStatus::running())
}

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse)))]
pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

async fn metrics() -> impl IntoResponse {
    match service::metrics::encode_metrics() {
        Ok(text) => (StatusCode::OK, text),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, format!("metrics encode error: {e}")),
    }
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the full application router: public probes, the API, and admin routes
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let public = Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/openapi.json", get(openapi_json));

    let api = Router::new()
        .route("/api/validate-address", post(address::validate_address))
        .route("/api/utility-company/:zip_code", get(utility::get_utility_company))
        .route("/api/submit-subscriber", post(submission::submit_subscriber));

    let admin_routes = Router::new()
        .route("/api/admin/clear-utility-cache", post(admin::clear_utility_cache));

    // Compose
    public
        .merge(api)
        .merge(admin_routes)
        .with_state(state)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                // 每次请求创建 span，包含方法和路径等，日志级别为 INFO
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(
                    DefaultOnRequest::new()
                        .level(Level::INFO),
                )
                // 响应返回时打点，包含状态码与耗时
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 失败（5xx 等）时以 ERROR 记录
                .on_failure(
                    DefaultOnFailure::new()
                        .level(Level::ERROR),
                )
        )
}
