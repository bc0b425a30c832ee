use std::net::SocketAddr;

use axum::http::HeaderValue;
use axum::Router;
use common::utils::logging::{init_logging_default, init_logging_json};
use configs::AppConfig;
use dotenvy::dotenv;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes;
use crate::state::AppState;

/// Initialize logging via shared common utils
fn init_logging(cfg: &AppConfig) {
    if cfg.logging.is_json() {
        init_logging_json();
    } else {
        init_logging_default();
    }
}

/// Frontend origins with credentials; methods and headers mirror the request
/// since wildcards are not allowed together with credentials.
pub fn build_cors(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .max_age(std::time::Duration::from_secs(600))
}

fn bind_addr(cfg: &AppConfig) -> Result<SocketAddr, StartupError> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("server address: {e}")))
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();

    let cfg = AppConfig::load_and_validate().map_err(|e| StartupError::InvalidConfig(e.to_string()))?;
    init_logging(&cfg);

    let services = service::runtime::build_services(&cfg)
        .await
        .map_err(|e| StartupError::Runtime(e.to_string()))?;
    let state = AppState::from(services);

    let cors = build_cors(&cfg.allowed_origins());
    let app: Router = routes::build_router(state, cors);

    let addr = bind_addr(&cfg)?;
    info!(
        %addr,
        backend = ?cfg.storage.backend,
        utilities_key = %cfg.storage.utilities_file_key,
        submissions_key = %cfg.storage.submissions_file_key,
        "starting enrollment api"
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
