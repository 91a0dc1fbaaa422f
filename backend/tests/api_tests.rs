//! HTTP API integration tests
//!
//! Drives the router in-process with `tower::ServiceExt::oneshot`.

mod common;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use rainrisk_backend::{
    config::{Config, ModelConfig, ServerConfig},
    create_app, AppState, RainRiskModel,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{observations, settings};

fn app() -> Router {
    let model = RainRiskModel::train(observations(), &settings(42)).unwrap();
    let config = Config {
        environment: "test".to_string(),
        server: ServerConfig::default(),
        model: ModelConfig::default(),
    };
    create_app(AppState {
        model: Arc::new(model),
        config: Arc::new(config),
    })
}

async fn send(request: Request<Body>) -> (StatusCode, Value) {
    let response = app().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: String) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_health_reports_model() {
    let (status, body) = send(get("/api/v1/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["environment"], "test");
    assert_eq!(body["model"]["trees"], 25);
    assert_eq!(body["model"]["locations"], 4);
}

#[tokio::test]
async fn test_plain_health() {
    let response = app().oneshot(get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"OK");
}

#[tokio::test]
async fn test_predict() {
    let body = json!({
        "location": "Darwin",
        "rainfall": 15.0,
        "humidity_am": 92.0,
        "humidity_pm": 88.0,
        "pressure_am": 1002.0,
        "pressure_pm": 1000.0,
        "cloud_am": 8.0,
        "awi": 120.0
    });
    let (status, body) = send(post_json("/api/v1/predictions", body.to_string())).await;
    assert_eq!(status, StatusCode::OK);

    let p = body["rain_probability"].as_f64().unwrap();
    assert!((0.0..=1.0).contains(&p));
    assert!(body["confidence"].as_f64().unwrap() >= 0.5);
    assert_eq!(body["location_code"], 2);
    assert_eq!(body["location_recognized"], true);
    assert_eq!(body["wetness"], "saturated");
    assert_eq!(body["imputed"], json!(["cloud_pm"]));
}

#[tokio::test]
async fn test_predict_unknown_location() {
    let body = json!({ "location": "Atlantis", "humidity_am": 50.0 });
    let (status, body) = send(post_json("/api/v1/predictions", body.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["location_code"], 0);
    assert_eq!(body["location_recognized"], false);
    assert_eq!(body["wetness"], Value::Null);
}

#[tokio::test]
async fn test_predict_rejects_text_reading() {
    let body = json!({ "location": "Darwin", "humidity_am": "very humid" });
    let (status, body) = send(post_json("/api/v1/predictions", body.to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.starts_with("Invalid input! Please enter numerical values"));
}

#[tokio::test]
async fn test_predict_rejects_blank_location() {
    let body = json!({ "location": "  ", "rainfall": 1.0 });
    let (status, body) = send(post_json("/api/v1/predictions", body.to_string())).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "location");
}

#[tokio::test]
async fn test_predict_live_derives_awi() {
    let body = json!({
        "conditions": {
            "location": "Cairns",
            "humidity_am": 90.0,
            "humidity_pm": 85.0,
            "pressure_am": 1003.0,
            "pressure_pm": 1001.0,
            "cloud_am": 8.0,
            "cloud_pm": 8.0,
            "rainfall_now": 12.0
        },
        "recent_rainfall": [40.0, 5.0, null, 10.0, 10.0, 0.0, 0.0, 12.0]
    });
    let (status, body) = send(post_json("/api/v1/predictions/live", body.to_string())).await;
    assert_eq!(status, StatusCode::OK);
    // last seven days only
    assert_eq!(body["awi"], 37.0);
    assert_eq!(body["wetness"], "moderately_wet");
}

#[tokio::test]
async fn test_wetness_endpoint() {
    let (status, body) = send(get("/api/v1/wetness?awi=150")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "saturated");
    assert_eq!(body["label"], "Saturated");

    let (status, body) = send(get("/api/v1/wetness?awi=wet")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["field"], "awi");
}

#[tokio::test]
async fn test_model_summary() {
    let (status, body) = send(get("/api/v1/model")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["n_trees"], 25);
    assert_eq!(body["training_rows"], 240);
    assert_eq!(body["features"][7], "awi");
    assert_eq!(body["medians"].as_array().unwrap().len(), 8);
}

#[tokio::test]
async fn test_locations() {
    let (status, body) = send(get("/api/v1/locations")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0], json!({ "name": "Albury", "code": 0 }));
    assert_eq!(body.as_array().unwrap().len(), 4);

    let (status, body) = send(get("/api/v1/locations/Hobart")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 3);

    let (status, body) = send(get("/api/v1/locations/Atlantis")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}
