use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};

use crate::{
    entities::service,
    errors::ServiceError,
    models::{District, FacilityDraft, FacilityWithServices, RegistrationOutcome, SearchFilters, SearchResult},
    AppState,
};

/// Facility directory routes, mounted under `/api/v1`
pub fn facility_routes() -> Router<AppState> {
    Router::new()
        .route("/facilities", get(search_facilities).post(register_facility))
        .route("/facilities/:id", get(get_facility))
        .route("/services", get(list_services))
        .route("/districts", get(list_districts))
}

#[utoipa::path(
    get,
    path = "/api/v1/facilities",
    params(SearchFilters),
    responses(
        (status = 200, description = "Matching active facilities, newest first", body = SearchResult),
        (status = 400, description = "Malformed query string", body = crate::errors::ErrorResponse),
        (status = 503, description = "Storage unavailable", body = crate::errors::ErrorResponse)
    ),
    tag = "facilities"
)]
pub async fn search_facilities(
    State(state): State<AppState>,
    filters: Result<Query<SearchFilters>, QueryRejection>,
) -> Result<Json<SearchResult>, ServiceError> {
    let Query(filters) = filters?;
    let result = state.services.search.search(&filters).await?;
    Ok(Json(result))
}

#[utoipa::path(
    post,
    path = "/api/v1/facilities",
    request_body = FacilityDraft,
    responses(
        (status = 201, description = "Facility registered", body = RegistrationOutcome),
        (status = 400, description = "Invalid draft", body = crate::errors::ErrorResponse),
        (status = 500, description = "Registration write failed", body = crate::errors::ErrorResponse)
    ),
    tag = "facilities"
)]
pub async fn register_facility(
    State(state): State<AppState>,
    draft: Result<Json<FacilityDraft>, JsonRejection>,
) -> Result<(StatusCode, Json<RegistrationOutcome>), ServiceError> {
    let Json(draft) = draft?;
    let outcome = state.services.registration.register(draft).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

#[utoipa::path(
    get,
    path = "/api/v1/facilities/{id}",
    params(
        ("id" = i32, Path, description = "Facility ID")
    ),
    responses(
        (status = 200, description = "Facility with its services", body = FacilityWithServices),
        (status = 400, description = "Malformed facility id", body = crate::errors::ErrorResponse),
        (status = 404, description = "Facility not found or retired", body = crate::errors::ErrorResponse),
        (status = 503, description = "Storage unavailable", body = crate::errors::ErrorResponse)
    ),
    tag = "facilities"
)]
pub async fn get_facility(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<FacilityWithServices>, ServiceError> {
    let Path(id) = id?;
    let facility = state.services.catalog.facility(id).await?;
    Ok(Json(facility))
}

#[utoipa::path(
    get,
    path = "/api/v1/services",
    responses(
        (status = 200, description = "Service catalog", body = [service::Model]),
        (status = 503, description = "Storage unavailable", body = crate::errors::ErrorResponse)
    ),
    tag = "catalog"
)]
pub async fn list_services(
    State(state): State<AppState>,
) -> Result<Json<Vec<service::Model>>, ServiceError> {
    let services = state.services.catalog.services().await?;
    Ok(Json(services))
}

#[utoipa::path(
    get,
    path = "/api/v1/districts",
    responses(
        (status = 200, description = "Districts a facility may be registered in", body = [District])
    ),
    tag = "catalog"
)]
pub async fn list_districts(State(state): State<AppState>) -> Json<Vec<District>> {
    Json(state.services.catalog.districts())
}
