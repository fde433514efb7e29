//! Router-level tests driven through `tower::ServiceExt::oneshot`.

use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use tower::ServiceExt;

use career_api::{app, AppState, RateLimitConfig, ServerOptions};
use career_core::config::TrainingConfig;
use career_core::core::transforms::SOURCE_FIELDS;
use career_core::{CareerConfig, TrainingPipeline};

const ROLES: [&str; 2] = ["Network Engineer", "Web Developer"];

fn train_into(dir: &Path) {
    let dataset = dir.join("dataset.csv");
    let mut csv = String::new();
    for field in SOURCE_FIELDS {
        write!(csv, "{field},").unwrap();
    }
    csv.push_str("self-learning capability?,certifications,Suggested Job Role\n");
    for i in 0..40usize {
        let class = i % 2;
        let base = 50.0 + 35.0 * class as f64 + (i % 5) as f64;
        for j in 0..SOURCE_FIELDS.len() {
            write!(csv, "{},", base + j as f64).unwrap();
        }
        let cert = if class == 0 { "shell programming" } else { "full stack" };
        writeln!(csv, "{},{cert},{}", if i % 3 == 0 { "yes" } else { "no" }, ROLES[class]).unwrap();
    }
    std::fs::write(&dataset, csv).unwrap();

    let config = TrainingConfig {
        dataset,
        n_estimators: 5,
        ..TrainingConfig::default()
    };
    TrainingPipeline::new(config)
        .run_and_save(&dir.join("artifacts"))
        .unwrap();
}

fn state_for(artifacts: &Path) -> Arc<AppState> {
    Arc::new(AppState::new(CareerConfig::default(), Some(artifacts.to_path_buf())).unwrap())
}

fn unlimited() -> ServerOptions {
    ServerOptions {
        rate_limit: RateLimitConfig {
            enabled: false,
            ..RateLimitConfig::default()
        },
        ..ServerOptions::default()
    }
}

fn form_fields(base: &str, cert: &'static str) -> Vec<(&'static str, String)> {
    let mut fields: Vec<(&'static str, String)> =
        SOURCE_FIELDS.iter().map(|f| (*f, base.to_string())).collect();
    fields.push(("self-learning capability?", "Yes".to_string()));
    fields.push(("certifications", cert.to_string()));
    fields
}

fn form_request(fields: &[(&str, String)]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(serde_urlencoded::to_string(fields).unwrap()))
        .unwrap()
}

fn json_request(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(router: &Router, request: Request<Body>) -> Response {
    router.clone().oneshot(request).await.unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX).await.unwrap().to_vec()
}

async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

#[tokio::test]
async fn test_index_form() {
    let dir = tempfile::tempdir().unwrap();
    let router = app(state_for(dir.path()), &unlimited());
    let response = send(&router, get("/")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("<form"));
}

#[tokio::test]
async fn test_form_prediction_returns_pdf() {
    let dir = tempfile::tempdir().unwrap();
    train_into(dir.path());
    let router = app(state_for(&dir.path().join("artifacts")), &unlimited());

    let response = send(&router, form_request(&form_fields("86", "full stack"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    let disposition = response.headers()[header::CONTENT_DISPOSITION].to_str().unwrap().to_string();
    assert!(disposition.starts_with("attachment"));
    assert!(disposition.contains("career_prediction.pdf"));
    assert!(body_bytes(response).await.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_form_missing_field_renders_error_page() {
    let dir = tempfile::tempdir().unwrap();
    train_into(dir.path());
    let router = app(state_for(&dir.path().join("artifacts")), &unlimited());

    let mut fields = form_fields("70", "full stack");
    fields.retain(|(k, _)| *k != "Percentage in Mathematics");
    let response = send(&router, form_request(&fields)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("Prediction Error:"));
    assert!(html.contains("Please check inputs."));
}

#[tokio::test]
async fn test_form_rejection_renders_error_page() {
    let dir = tempfile::tempdir().unwrap();
    train_into(dir.path());
    let router = app(state_for(&dir.path().join("artifacts")), &unlimited());

    let request = Request::builder()
        .method("POST")
        .uri("/predict")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let response = send(&router, request).await;
    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/html"));
    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("Prediction Error:"));
    assert!(html.contains("Please check inputs."));
}

#[tokio::test]
async fn test_missing_assets() {
    let dir = tempfile::tempdir().unwrap();
    let router = app(state_for(dir.path()), &unlimited());

    let response = send(&router, form_request(&form_fields("70", "python"))).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("Deployment Error: Model assets not found on server."));

    let response = send(&router, json_request("/api/predict", serde_json::json!({ "fields": {} }))).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);
    assert_eq!(json["error"]["code"], "ARTIFACTS_UNAVAILABLE");
}

#[tokio::test]
async fn test_assets_picked_up_after_training() {
    let dir = tempfile::tempdir().unwrap();
    let state = state_for(&dir.path().join("artifacts"));
    let router = app(state.clone(), &unlimited());

    let response = send(&router, get("/api/model")).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(!state.is_loaded());

    train_into(dir.path());

    let response = send(&router, get("/api/model")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(state.is_loaded());
    let json = body_json(response).await;
    assert_eq!(json["data"]["classes"], serde_json::json!(ROLES));
    assert_eq!(json["data"]["manifest"]["n_classes"], 2);
}

#[tokio::test]
async fn test_json_prediction() {
    let dir = tempfile::tempdir().unwrap();
    train_into(dir.path());
    let router = app(state_for(&dir.path().join("artifacts")), &unlimited());

    let mut fields = serde_json::Map::new();
    for field in SOURCE_FIELDS {
        fields.insert(field.to_string(), serde_json::json!(51));
    }
    fields.insert("self-learning capability?".into(), serde_json::json!("no"));
    fields.insert("certifications".into(), serde_json::json!("shell programming"));

    let response = send(&router, json_request("/api/predict", serde_json::json!({ "fields": fields }))).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    let role = json["data"]["role"].as_str().unwrap();
    assert!(ROLES.contains(&role));
    assert!(json["data"]["report"].as_str().unwrap().starts_with("Predicted Role: "));
    assert!(json["data"]["info"]["skills"].is_string());
}

#[tokio::test]
async fn test_json_prediction_bad_value() {
    let dir = tempfile::tempdir().unwrap();
    train_into(dir.path());
    let router = app(state_for(&dir.path().join("artifacts")), &unlimited());

    let body = serde_json::json!({ "fields": { "percentage in Algorithms": "eighty" } });
    let response = send(&router, json_request("/api/predict", body)).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["error"]["code"], "PREDICTION_ERROR");
}

#[tokio::test]
async fn test_roles_catalog() {
    let dir = tempfile::tempdir().unwrap();
    let router = app(state_for(dir.path()), &unlimited());
    let json = body_json(send(&router, get("/api/roles")).await).await;
    assert_eq!(json["data"]["count"], 34);
    let first = &json["data"]["roles"][0];
    assert!(first["name"].is_string());
    assert!(first["potential_companies"].is_string());
}

#[tokio::test]
async fn test_rate_limit_spares_health() {
    let dir = tempfile::tempdir().unwrap();
    let options = ServerOptions {
        rate_limit: RateLimitConfig {
            requests_per_second: 1,
            burst_size: 1,
            enabled: true,
        },
        ..ServerOptions::default()
    };
    let router = app(state_for(dir.path()), &options);

    assert_eq!(send(&router, get("/api/roles")).await.status(), StatusCode::OK);
    let limited = send(&router, get("/api/roles")).await;
    assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body_json(limited).await["error"]["code"], "RATE_LIMITED");

    for _ in 0..3 {
        let health = send(&router, get("/health")).await;
        assert_eq!(health.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_openapi_document() {
    let dir = tempfile::tempdir().unwrap();
    let router = app(state_for(dir.path()), &unlimited());
    let response = send(&router, get("/api-docs/openapi.json")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["paths"]["/api/predict"].is_object());
}
