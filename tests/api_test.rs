mod common;

use axum::http::StatusCode;
use care_directory::{entities::service::ServiceCategory, services::RegistrationWriteMode};
use common::{service_id, TestApp};
use serde_json::json;

#[tokio::test]
async fn health_reports_database_up() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "up");
    assert_eq!(body["database"]["status"], "up");
}

#[tokio::test]
async fn register_then_search_and_fetch_detail() {
    let app = TestApp::new().await;
    let day = service_id(app.db(), ServiceCategory::DayService).await;

    let (status, body) = app
        .post(
            "/api/v1/facilities",
            json!({
                "name": "さくらデイサービス",
                "address": "西新宿2-8-1",
                "district": "新宿区",
                "appealPoints": "送迎あり",
                "serviceIds": [day, day]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    let facility_id = body["facilityId"].as_i64().expect("facilityId");

    let (status, body) = app
        .get("/api/v1/facilities?query=%E3%81%95%E3%81%8F%E3%82%89&district=%E6%96%B0%E5%AE%BF%E5%8C%BA&availableOnly=true")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalCount"], 1);
    assert_eq!(body["results"][0]["id"], facility_id);
    assert_eq!(body["results"][0]["services"][0]["availability"], "available");
    assert_eq!(body["results"][0]["services"][0]["service"]["category"], "day_service");

    let (status, body) = app
        .get(&format!("/api/v1/facilities/{}", facility_id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "さくらデイサービス");
    assert_eq!(body["appealPoints"], "送迎あり");
    assert_eq!(body["services"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn invalid_draft_is_rejected_with_field() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(
            "/api/v1/facilities",
            json!({
                "name": "さくら苑",
                "address": "西新宿2-8-1",
                "serviceIds": [1]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "district");
    assert_eq!(body["error"], "Bad Request");

    let (status, body) = app
        .post(
            "/api/v1/facilities",
            json!({
                "name": "さくら苑",
                "address": "西新宿2-8-1",
                "district": "新宿区",
                "serviceIds": []
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "serviceIds");
}

#[tokio::test]
async fn failed_association_insert_is_a_server_error() {
    let app = TestApp::with_mode(RegistrationWriteMode::Compensating).await;

    let (status, body) = app
        .post(
            "/api/v1/facilities",
            json!({
                "name": "さくら苑",
                "address": "西新宿2-8-1",
                "district": "新宿区",
                "serviceIds": [424242]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body["message"].as_str().unwrap_or_default().contains("FOREIGN"));

    let (_, body) = app.get("/api/v1/facilities").await;
    assert_eq!(body["totalCount"], 0);
}

#[tokio::test]
async fn unknown_facility_is_not_found() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/api/v1/facilities/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn catalog_endpoints_list_services_and_districts() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/v1/services").await;
    assert_eq!(status, StatusCode::OK);
    let services = body.as_array().expect("service list");
    assert!(!services.is_empty());
    assert!(services.iter().all(|s| s["category"].is_string()));

    let (status, body) = app.get("/api/v1/districts").await;
    assert_eq!(status, StatusCode::OK);
    let districts = body.as_array().expect("district list");
    assert_eq!(districts.len(), 23);
    assert!(districts.iter().any(|d| *d == "新宿区"));
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/api-docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/v1/facilities"].is_object());
}

#[tokio::test]
async fn malformed_requests_use_the_error_body() {
    let app = TestApp::new().await;

    let (status, body) = app
        .post(
            "/api/v1/facilities",
            json!({
                "name": "さくら苑",
                "address": "西新宿2-8-1",
                "district": null,
                "serviceIds": [1]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Bad Request");
    assert_eq!(body["field"], "body");
    assert!(body["timestamp"].is_string());

    let (status, body) = app.get("/api/v1/facilities?availableOnly=maybe").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "query");

    let (status, body) = app.get("/api/v1/facilities/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "id");
}

#[tokio::test]
async fn non_json_draft_uses_the_error_body() {
    let app = TestApp::new().await;

    let request = axum::http::Request::builder()
        .method(axum::http::Method::POST)
        .uri("/api/v1/facilities")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["field"], "body");
    assert_eq!(body["error"], "Bad Request");
}
