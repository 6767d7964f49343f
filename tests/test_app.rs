//! End-to-end wiring of the server from configuration

use std::io::Write;

use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode},
};
use serde_json::{Value, json};
use tower::ServiceExt;

use bearded_rust::bearded_core::config::{ApiKeyConfig, StorageBackend};
use bearded_rust::bearded_orchestrator::presentation::auth::StaticApiKeyResolver;
use bearded_rust::{AppError, Config, create_app};

const OWNER: &str = "7b0c3f4e-8a43-4b47-9d0a-3c7f6f2c1e11";
const PROJECT: &str = "0b8e6c52-7d2e-4e5e-9a51-2f1a9f3f7c10";
const TARGET: &str = "5f0c8a1e-2b7d-4c3a-8e9f-1a2b3c4d5e6f";
const PLAN: &str = "9a8b7c6d-5e4f-4a3b-9c2d-1e0f9a8b7c6d";
const API_KEY: &str = "bd_wiring_test_key";

fn seed_file(seed: &Value) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(seed.to_string().as_bytes()).unwrap();
    file
}

fn catalog() -> Value {
    json!({
        "projects": [{"id": PROJECT, "owner": OWNER, "name": "acme"}],
        "targets": [{"id": TARGET, "project": PROJECT, "type": "web", "address": "https://acme.example"}],
        "plans": [{
            "id": PLAN,
            "name": "web baseline",
            "targetType": "web",
            "workflow": [
                {"name": "discovery", "plugin": "nmap:1.0"},
                {"name": "spider", "plugin": "zap:2.1"}
            ]
        }],
        "plugins": [
            {"id": "1c1c1c1c-1c1c-4c1c-8c1c-1c1c1c1c1c1c", "name": "nmap", "version": "1.0"},
            {"id": "2d2d2d2d-2d2d-4d2d-8d2d-2d2d2d2d2d2d", "name": "zap", "version": "2.1"}
        ]
    })
}

fn memory_config(seed: &tempfile::NamedTempFile) -> Config {
    let mut config = Config::default();
    config.storage.backend = StorageBackend::Memory;
    config.storage.seed_file = Some(seed.path().to_path_buf());
    config.server.enable_docs = false;
    config.auth.api_keys = vec![ApiKeyConfig {
        user_id: OWNER.to_string(),
        key_sha256: StaticApiKeyResolver::hash_key(API_KEY),
    }];
    config
}

#[tokio::test]
async fn seeded_memory_backend_serves_scan_creation() {
    let seed = seed_file(&catalog());
    let app = create_app(memory_config(&seed)).await.unwrap();

    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/scans")
        .header("content-type", "application/json")
        .header("x-api-key", API_KEY)
        .body(Body::from(
            json!({"project": PROJECT, "target": TARGET, "plan": PLAN}).to_string(),
        ))
        .unwrap();
    let response = app.router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["owner"], OWNER);
    assert_eq!(body["sessions"].as_array().unwrap().len(), 2);
    assert_eq!(
        body["sessions"][1]["plugin"],
        "2d2d2d2d-2d2d-4d2d-8d2d-2d2d2d2d2d2d"
    );
}

#[tokio::test]
async fn docs_are_only_mounted_when_enabled() {
    let seed = seed_file(&catalog());

    let disabled = create_app(memory_config(&seed)).await.unwrap();
    let response = disabled
        .router
        .oneshot(
            Request::builder()
                .uri("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let mut config = memory_config(&seed);
    config.server.enable_docs = true;
    let enabled = create_app(config).await.unwrap();
    let response = enabled
        .router
        .oneshot(
            Request::builder()
                .uri("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn duplicate_plugin_in_seed_fails_startup() {
    let mut seed = catalog();
    seed["plugins"]
        .as_array_mut()
        .unwrap()
        .push(json!({"id": "3e3e3e3e-3e3e-4e3e-8e3e-3e3e3e3e3e3e", "name": "nmap", "version": "1.0"}));
    let file = seed_file(&seed);

    let result = create_app(memory_config(&file)).await;

    assert!(matches!(result, Err(AppError::Seed(_))));
}

#[tokio::test]
async fn malformed_api_key_entry_fails_startup() {
    let seed = seed_file(&catalog());
    let mut config = memory_config(&seed);
    config.auth.api_keys[0].key_sha256 = "not-hex".to_string();

    let result = create_app(config).await;

    assert!(matches!(result, Err(AppError::ApiKeys(_))));
}
