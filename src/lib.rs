//! Care-service facility directory.
//!
//! Visitors search active facilities by name, ward, service category and
//! availability; operators register facilities together with the services
//! they offer.

pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod handlers;
pub mod migrator;
pub mod models;
pub mod openapi;
pub mod repositories;
pub mod services;

use axum::{http::HeaderValue, routing::get, Router};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

// App state definition
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DatabaseConnection>,
    pub config: config::AppConfig,
    pub services: handlers::AppServices,
}

impl AppState {
    /// State backed by the SeaORM store on `db`, honouring the configured
    /// registration write mode.
    pub fn new(db: Arc<DatabaseConnection>, config: config::AppConfig) -> Self {
        let services = handlers::AppServices::new(db.clone(), config.registration_write_mode);
        Self {
            db,
            config,
            services,
        }
    }
}

/// Versioned API routes, mounted under `/api/v1`
pub fn api_v1_routes() -> Router<AppState> {
    Router::new().merge(handlers::facilities::facility_routes())
}

/// CORS policy from config: explicit origins win, otherwise permissive in
/// development or when explicitly allowed.
pub fn cors_layer(cfg: &config::AppConfig) -> Option<CorsLayer> {
    let origins: Vec<HeaderValue> = cfg
        .cors_origins()
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if !origins.is_empty() {
        Some(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else if cfg.should_allow_permissive_cors() {
        info!(
            "Using permissive CORS because explicit origins were not configured ({})",
            if cfg.is_development() {
                "development environment"
            } else {
                "explicit override enabled"
            }
        );
        Some(CorsLayer::permissive())
    } else {
        None
    }
}

/// Full application router: health, v1 API, OpenAPI document and Swagger UI.
///
/// Returns `None` when no CORS policy can be derived from the config.
pub fn app(state: AppState) -> Option<Router> {
    let cors = cors_layer(&state.config)?;

    let router = Router::new()
        .route("/", get(|| async { "care-directory up" }))
        .route("/health", get(handlers::health::health_check))
        .nest("/api/v1", api_v1_routes())
        .with_state(state)
        .merge(openapi::swagger_ui())
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    Some(router)
}
