use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use service::errors::ServiceError;
use service::geocoding::Geocoder;
use service::runtime::Services;
use service::storage::{MemoryObjectStore, ObjectStore, StoredObject};
use tower::Service;

use server::routes;
use server::state::AppState;

const UTILITIES_KEY: &str = "utilities.json";
const SUBMISSIONS_KEY: &str = "subscribers.json";

fn cors() -> tower_http::cors::CorsLayer { tower_http::cors::CorsLayer::very_permissive() }

/// Geocoder that matches "123 Main St" and nothing else; "Nowhere" is unreachable.
struct StubGeocoder;

#[async_trait::async_trait]
impl Geocoder for StubGeocoder {
    async fn geocode(&self, one_line_address: &str, _benchmark: &str) -> Result<Value, ServiceError> {
        if one_line_address.contains("Nowhere") {
            return Err(ServiceError::Validation("connection refused".into()));
        }
        if one_line_address.starts_with("123 Main St") {
            return Ok(json!({"result": {"addressMatches": [
                {"matchedAddress": "123 MAIN ST, SPRINGFIELD, IL, 62704", "coordinates": {"x": -89.65, "y": 39.78}}
            ]}}));
        }
        Ok(json!({"result": {"addressMatches": []}}))
    }
}

/// Store whose reads and writes fail, for the 500 paths.
struct BrokenStore;

#[async_trait::async_trait]
impl ObjectStore for BrokenStore {
    async fn get(&self, key: &str) -> Result<StoredObject, ServiceError> {
        Err(ServiceError::store(key, "AccessDenied"))
    }
    async fn put(&self, key: &str, _value: &Value) -> Result<(), ServiceError> {
        Err(ServiceError::store(key, "AccessDenied"))
    }
}

fn build_app(store: Arc<dyn ObjectStore>) -> Router {
    let mut storage = configs::StorageConfig::default();
    storage.utilities_file_key = UTILITIES_KEY.into();
    storage.submissions_file_key = SUBMISSIONS_KEY.into();
    let services = Services::new(store, Arc::new(StubGeocoder), &storage, "Public_AR_Current");
    routes::build_router(AppState::from(services), cors())
}

async fn seeded_store() -> Arc<MemoryObjectStore> {
    let store = Arc::new(MemoryObjectStore::new());
    store
        .seed(
            UTILITIES_KEY,
            &json!({"90210": {"name": "SoCal Power", "service_area": "LA Basin", "contact_info": "555-1234"}}),
        )
        .await;
    store
}

async fn send(app: &mut Router, req: Request<Body>) -> anyhow::Result<(StatusCode, Value)> {
    let resp = app.call(req).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap_or(Value::Null) };
    Ok((status, body))
}

fn get(uri: &str) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder().method("GET").uri(uri).body(Body::empty())?)
}

fn post_json(uri: &str, body: &Value) -> anyhow::Result<Request<Body>> {
    Ok(Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_vec(body)?))?)
}

fn confirmation() -> Value {
    json!({
        "userInfo": {"firstName": "Ada", "lastName": "Lovelace", "address": "123 Main St", "city": "Springfield", "state": "IL", "zipCode": "62704"},
        "recommendedAddress": "123 MAIN ST, SPRINGFIELD, IL, 62704",
        "utilityCompany": {"name": "Ameren Illinois", "zipCode": "62704"},
        "assistanceProgram": "SNAP"
    })
}

#[tokio::test]
async fn root_and_health_respond() -> anyhow::Result<()> {
    let mut app = build_app(seeded_store().await);
    let (status, body) = send(&mut app, get("/")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "healthy", "message": "Customer Registration API is running"}));

    let (status, body) = send(&mut app, get("/health")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn validate_address_matched_and_unmatched() -> anyhow::Result<()> {
    let mut app = build_app(seeded_store().await);

    let (status, body) = send(
        &mut app,
        post_json("/api/validate-address", &json!({"address": "123 Main St", "city": "Springfield", "state": "il", "zipCode": "62704"}))?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isValid"], true);
    assert_eq!(body["matchedAddress"], "123 MAIN ST, SPRINGFIELD, IL, 62704");
    assert_eq!(body["coordinates"], json!({"latitude": 39.78, "longitude": -89.65}));

    let (status, body) = send(
        &mut app,
        post_json("/api/validate-address", &json!({"address": "9 Elm St", "city": "Springfield", "state": "IL", "zipCode": "62704"}))?,
    )
    .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isValid"], false);
    assert_eq!(body["matchedAddress"], "9 Elm St, Springfield, IL 62704");
    assert_eq!(body["coordinates"], json!({"latitude": 0.0, "longitude": 0.0}));
    Ok(())
}

#[tokio::test]
async fn validate_address_geocoder_down_is_500() -> anyhow::Result<()> {
    let mut app = build_app(seeded_store().await);
    let (status, body) = send(
        &mut app,
        post_json("/api/validate-address", &json!({"address": "1 Road", "city": "Nowhere", "state": "KS", "zipCode": "67000"}))?,
    )
    .await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().starts_with("Address validation failed:"));
    Ok(())
}

#[tokio::test]
async fn validate_address_bad_state_is_422() -> anyhow::Result<()> {
    let mut app = build_app(seeded_store().await);
    let (status, _) = send(
        &mut app,
        post_json("/api/validate-address", &json!({"address": "1 Road", "city": "X", "state": "Kansas", "zipCode": "67000"}))?,
    )
    .await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    Ok(())
}

#[tokio::test]
async fn utility_lookup_known_and_unknown() -> anyhow::Result<()> {
    let mut app = build_app(seeded_store().await);

    let (status, body) = send(&mut app, get("/api/utility-company/90210-1234")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "SoCal Power");
    assert_eq!(body["zipCode"], "90210");
    assert_eq!(body["service_area"], "LA Basin");

    let (status, body) = send(&mut app, get("/api/utility-company/00000")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Unknown Utility Company");
    assert_eq!(body["service_area"], "00000");
    Ok(())
}

#[tokio::test]
async fn clear_cache_forces_reload() -> anyhow::Result<()> {
    let store = seeded_store().await;
    let mut app = build_app(store.clone());

    send(&mut app, get("/api/utility-company/90210")?).await?;
    send(&mut app, get("/api/utility-company/90210")?).await?;
    assert_eq!(store.get_count(), 1);

    store.seed(UTILITIES_KEY, &json!({"90210": {"name": "Pacific Grid"}})).await;
    let (status, body) = send(&mut app, post_json("/api/admin/clear-utility-cache", &json!({}))?).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "success", "message": "Utility cache cleared"}));

    let (_, body) = send(&mut app, get("/api/utility-company/90210")?).await?;
    assert_eq!(body["name"], "Pacific Grid");
    assert_eq!(store.get_count(), 2);
    Ok(())
}

#[tokio::test]
async fn submit_twice_appends_two_entries() -> anyhow::Result<()> {
    let store = seeded_store().await;
    let mut app = build_app(store.clone());

    for _ in 0..2 {
        let (status, body) = send(&mut app, post_json("/api/submit-subscriber", &confirmation())?).await?;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true, "message": "Your information has been successfully submitted"}));
    }

    let log: Value = serde_json::from_slice(&store.raw(SUBMISSIONS_KEY).await.expect("log written"))?;
    let entries = log.as_array().expect("array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["user_info"]["last_name"], "Lovelace");
    assert_eq!(entries[1]["assistance_program"], "SNAP");
    Ok(())
}

#[tokio::test]
async fn submit_rejects_unknown_assistance_program() -> anyhow::Result<()> {
    let store = seeded_store().await;
    let mut app = build_app(store.clone());
    let mut body = confirmation();
    body["assistanceProgram"] = json!("WIC");
    let (status, _) = send(&mut app, post_json("/api/submit-subscriber", &body)?).await?;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(store.raw(SUBMISSIONS_KEY).await.is_none());
    Ok(())
}

#[tokio::test]
async fn store_failures_surface_as_500_with_detail() -> anyhow::Result<()> {
    let mut app = build_app(Arc::new(BrokenStore));

    let (status, body) = send(&mut app, get("/api/utility-company/90210")?).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Failed to retrieve utility company:"), "{detail}");
    assert!(detail.contains("AccessDenied"));

    let (status, body) = send(&mut app, post_json("/api/submit-subscriber", &confirmation())?).await?;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().starts_with("Failed to submit information:"));

    // clearing never touches the store
    let (status, _) = send(&mut app, post_json("/api/admin/clear-utility-cache", &json!({}))?).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn openapi_and_metrics_are_served() -> anyhow::Result<()> {
    let mut app = build_app(seeded_store().await);
    send(&mut app, get("/api/utility-company/90210")?).await?;

    let (status, doc) = send(&mut app, get("/openapi.json")?).await?;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"].get("/api/utility-company/{zip_code}").is_some());

    let resp = app.call(get("/metrics")?).await?;
    assert_eq!(resp.status(), StatusCode::OK);
    let text = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    assert!(String::from_utf8_lossy(&text).contains("enrollment_utility_lookups_total"));
    Ok(())
}
