use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Care Directory API",
        version = "0.1.0",
        description = r#"
# Care Facility Directory

Search care-service facilities by name, ward, service category and
availability, and register new facilities together with the services they
offer.

## Search

`GET /api/v1/facilities` returns at most 100 active facilities, most recently
updated first. `totalCount` is the number of facilities in the response.

## Errors

Every error uses the same body:

```json
{
  "error": "Bad Request",
  "message": "Invalid input for `district`: is required",
  "field": "district",
  "timestamp": "2024-01-01T00:00:00Z"
}
```
        "#,
        license(
            name = "MIT",
            url = "https://opensource.org/licenses/MIT"
        )
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development")
    ),
    tags(
        (name = "facilities", description = "Facility search, detail and registration"),
        (name = "catalog", description = "Service catalog and districts"),
        (name = "health", description = "Health check endpoints")
    ),
    paths(
        crate::handlers::facilities::search_facilities,
        crate::handlers::facilities::register_facility,
        crate::handlers::facilities::get_facility,
        crate::handlers::facilities::list_services,
        crate::handlers::facilities::list_districts,
        crate::handlers::health::health_check,
    ),
    components(
        schemas(
            crate::models::SearchResult,
            crate::models::FacilityWithServices,
            crate::models::FacilityServiceDetail,
            crate::models::FacilityDraft,
            crate::models::RegistrationOutcome,
            crate::models::District,
            crate::entities::facility::Model,
            crate::entities::service::Model,
            crate::entities::service::ServiceCategory,
            crate::entities::facility_service::Model,
            crate::entities::facility_service::Availability,
            crate::handlers::health::HealthResponse,
            crate::errors::ErrorResponse
        )
    )
)]
pub struct ApiDocV1;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDocV1::openapi())
        .config(utoipa_swagger_ui::Config::from("/api-docs/openapi.json").try_it_out_enabled(true))
}
