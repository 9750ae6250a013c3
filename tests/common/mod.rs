#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request},
    Router,
};
use chrono::{DateTime, Duration, TimeZone, Utc};
use http_body_util::BodyExt;
use sea_orm::{EntityTrait, Set};
use serde_json::Value;
use tower::ServiceExt;

use care_directory::{
    config::AppConfig,
    db::{self, DbConfig, DbPool},
    entities::{
        facility::{self, Entity as Facility},
        facility_service::{self, Availability, Entity as FacilityServiceLink},
        service::{self, Entity as Service, ServiceCategory},
    },
    services::{catalog, RegistrationWriteMode},
    AppState,
};

/// Fixed reference time; fixture facility `n` is updated `n` minutes later.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap()
}

/// Fresh in-memory SQLite database with the schema applied and the default
/// catalog seeded.
pub async fn test_db() -> Arc<DbPool> {
    let pool = db::establish_connection_with_config(&DbConfig::in_memory_sqlite())
        .await
        .expect("failed to create test database");
    db::run_migrations(&pool)
        .await
        .expect("failed to run migrations in tests");
    catalog::seed_default_catalog(&pool)
        .await
        .expect("failed to seed catalog");
    Arc::new(pool)
}

pub fn test_config(write_mode: RegistrationWriteMode) -> AppConfig {
    let mut cfg = AppConfig::new(
        "sqlite::memory:".to_string(),
        "127.0.0.1".to_string(),
        18_080,
        "development".to_string(),
    );
    cfg.registration_write_mode = write_mode;
    cfg
}

/// Catalog service id for the first seeded service of `category`
pub async fn service_id(db: &DbPool, category: ServiceCategory) -> i32 {
    Service::find()
        .all(db)
        .await
        .expect("list services")
        .into_iter()
        .find(|s: &service::Model| s.category == category)
        .map(|s| s.id)
        .expect("seeded category")
}

/// Inserts a facility row directly, bypassing the entity hooks so the
/// timestamps stay deterministic.
pub async fn insert_facility(
    db: &DbPool,
    minutes: i64,
    name: &str,
    district: &str,
    active: bool,
) -> i32 {
    let stamp = epoch() + Duration::minutes(minutes);
    let result = Facility::insert(facility::ActiveModel {
        name: Set(name.to_string()),
        description: Set(None),
        appeal_points: Set(None),
        address: Set("1-1-1".to_string()),
        district: Set(district.to_string()),
        phone_number: Set(None),
        website_url: Set(None),
        image_url: Set(None),
        is_active: Set(active),
        created_at: Set(stamp),
        updated_at: Set(stamp),
        ..Default::default()
    })
    .exec(db)
    .await
    .expect("insert facility fixture");
    result.last_insert_id
}

pub async fn link_service(
    db: &DbPool,
    facility_id: i32,
    service_id: i32,
    availability: Availability,
) {
    let now = epoch();
    FacilityServiceLink::insert(facility_service::ActiveModel {
        facility_id: Set(facility_id),
        service_id: Set(service_id),
        availability: Set(availability),
        capacity: Set(None),
        current_users: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    })
    .exec(db)
    .await
    .expect("insert association fixture");
}

/// Router-level harness over a fresh database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_mode(RegistrationWriteMode::Transactional).await
    }

    pub async fn with_mode(write_mode: RegistrationWriteMode) -> Self {
        let db = test_db().await;
        let state = AppState::new(db, test_config(write_mode));
        let router = care_directory::app(state.clone()).expect("development config allows CORS");
        Self { router, state }
    }

    pub fn db(&self) -> &DbPool {
        self.state.db.as_ref()
    }

    /// Send a request against the router, returning status and JSON body.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (axum::http::StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.send(request).await
    }

    /// Send a prebuilt request, returning status and JSON body.
    pub async fn send(&self, request: Request<Body>) -> (axum::http::StatusCode, Value) {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request");

        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("read response body")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (axum::http::StatusCode, Value) {
        self.request(Method::GET, uri, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (axum::http::StatusCode, Value) {
        self.request(Method::POST, uri, Some(body)).await
    }
}
