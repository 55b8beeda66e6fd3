use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use cloudbeds_reports::config::ApiConfig;
use cloudbeds_reports::server::{router, AppState};
use cloudbeds_reports::{Settings, SettingsStore};
use httpmock::prelude::*;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

struct TestApp {
    app: Router,
    settings_path: std::path::PathBuf,
    _temp_dir: TempDir,
}

fn api_config(base_url: String) -> ApiConfig {
    ApiConfig {
        base_url,
        timeout_seconds: 5,
        retry_attempts: 1,
        retry_delay_ms: 10,
        page_size: 100,
        max_pages: 5,
    }
}

async fn test_app(base_url: String, saved: Option<Settings>) -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    let settings_path = temp_dir.path().join("settings.json");
    let store = SettingsStore::at_path(&settings_path);
    if let Some(settings) = saved {
        store.save(&settings).await.unwrap();
    }

    let state = AppState::new(api_config(base_url), store).unwrap();
    TestApp {
        app: router(state),
        settings_path,
        _temp_dir: temp_dir,
    }
}

async fn get(app: &Router, uri: &str) -> (StatusCode, String) {
    let response = app
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn get_json(app: &Router, uri: &str) -> Value {
    let (status, body) = get(app, uri).await;
    assert_eq!(status, StatusCode::OK);
    serde_json::from_str(&body).unwrap()
}

#[tokio::test]
async fn test_index_serves_page() {
    let test = test_app("http://127.0.0.1:9".to_string(), None).await;

    let (status, body) = get(&test.app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("Cloudbeds Reports"));
}

#[tokio::test]
async fn test_save_and_get_settings() {
    let test = test_app("http://127.0.0.1:9".to_string(), None).await;

    let response = test
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/save-settings")
                .header("Content-Type", "application/json")
                .body(Body::from(
                    json!({"access_token": " tok ", "property_id": "321"}).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let saved: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(saved["success"], true);
    assert_eq!(saved["message"], "Settings saved successfully!");
    assert!(test.settings_path.exists());

    let body = get_json(&test.app, "/api/get-settings").await;
    assert_eq!(body["data"]["access_token"], "tok");
    assert_eq!(body["data"]["property_id"], "321");
}

#[tokio::test]
async fn test_save_settings_rejects_malformed_body() {
    let test = test_app("http://127.0.0.1:9".to_string(), None).await;

    let response = test
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/save-settings")
                .header("Content-Type", "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["success"], false);
    assert!(!test.settings_path.exists());
}

#[tokio::test]
async fn test_connection_without_token_reports_failure() {
    let test = test_app("http://127.0.0.1:9".to_string(), None).await;

    let body = get_json(&test.app, "/api/test-connection").await;

    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Please configure your access token first.");
}

#[tokio::test]
async fn test_connection_with_invalid_token_reports_failure() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/getSources")
            .header("Authorization", "Bearer wrong");
        then.status(401)
            .header("Content-Type", "application/json")
            .json_body(json!({"success": false, "message": "Invalid token"}));
    });
    let test = test_app(server.base_url(), None).await;

    let body = get_json(
        &test.app,
        "/api/test-connection?access_token=wrong&property_id=6000",
    )
    .await;

    api_mock.assert_hits(1);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Invalid token");
}

#[tokio::test]
async fn test_connection_prefers_form_values_over_saved() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/getSources")
            .header("Authorization", "Bearer from-form")
            .query_param("propertyID", "77");
        then.status(200)
            .json_body(json!({"success": true, "data": []}));
    });
    let test = test_app(server.base_url(), Some(Settings::new("saved", "6000"))).await;

    let body = get_json(
        &test.app,
        "/api/test-connection?access_token=from-form&property_id=77",
    )
    .await;

    api_mock.assert();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Connection successful!");
}

#[tokio::test]
async fn test_sources_without_token() {
    let test = test_app("http://127.0.0.1:9".to_string(), None).await;

    let body = get_json(&test.app, "/api/sources").await;

    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Access token not configured");
}

#[tokio::test]
async fn test_sources_returns_flattened_rows() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/getSources");
        then.status(200).json_body(json!({"success": true, "data": [[
            {"propertyID": "6000", "sourceID": "s-1", "sourceName": "Direct",
             "taxes": [{"taxID": "t1", "name": "VAT", "amount": 10, "amountType": "percentage", "type": "exclusive"}]},
            {"propertyID": "6000", "sourceID": "s-2", "sourceName": "OTA"}
        ]]}));
    });
    let test = test_app(server.base_url(), Some(Settings::new("tok", "6000"))).await;

    let body = get_json(&test.app, "/api/sources").await;

    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["count"], 2);
    assert_eq!(body["data"]["columns"][0], "propertyID");
    assert_eq!(body["data"]["columns"][7], "tax_1_taxID");
    assert_eq!(body["data"]["sources"][0]["tax_1_name"], "VAT");
    assert_eq!(body["data"]["sources"][1]["tax_1_name"], "");
}

#[tokio::test]
async fn test_rooms_counts_room_types_and_rooms() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/getRoomTypes");
        then.status(200).json_body(json!({"success": true, "data": [
            {"roomTypeID": "1", "roomTypeName": "Double"}
        ]}));
    });
    server.mock(|when, then| {
        when.method(GET).path("/getRooms");
        then.status(200).json_body(json!({"success": true, "data": [
            {"propertyID": "6000", "rooms": [
                {"roomID": "101", "roomName": "101", "roomTypeID": 1},
                {"roomID": "102", "roomName": "102", "roomTypeID": "1"}
            ]}
        ]}));
    });
    let test = test_app(server.base_url(), Some(Settings::new("tok", "6000"))).await;

    let body = get_json(&test.app, "/api/rooms").await;

    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["count"], 3);
    assert_eq!(body["data"]["room_types_count"], 1);
    assert_eq!(body["data"]["rooms_count"], 2);
}

#[tokio::test]
async fn test_rooms_error_names_the_failing_call() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/getRoomTypes");
        then.status(403)
            .json_body(json!({"success": false, "message": "Access denied"}));
    });
    let test = test_app(server.base_url(), Some(Settings::new("tok", "6000"))).await;

    let body = get_json(&test.app, "/api/rooms").await;

    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Room types: Access denied");
}

#[tokio::test]
async fn test_taxes_fees_route() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/getTaxesAndFees");
        then.status(200).json_body(json!({"success": true, "data": [
            {"taxID": "t1", "name": "VAT"},
            {"feeID": "f1", "name": "Cleaning"}
        ]}));
    });
    let test = test_app(server.base_url(), Some(Settings::new("tok", "6000"))).await;

    let body = get_json(&test.app, "/api/taxes-fees").await;

    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["count"], 2);
    assert_eq!(body["data"]["columns"], json!(["feeID", "name", "taxID"]));
}

#[tokio::test]
async fn test_table_fragment_escapes_cells() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/getSources");
        then.status(200).json_body(json!({"data": [
            {"sourceID": "s-1", "sourceName": "<b>Direct</b>"}
        ]}));
    });
    let test = test_app(server.base_url(), Some(Settings::new("tok", "6000"))).await;

    let (status, body) = get(&test.app, "/table?type=sources").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<table"));
    assert!(body.contains("&lt;b&gt;Direct&lt;/b&gt;"));

    let (status, _) = get(&test.app, "/table?type=guests").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
