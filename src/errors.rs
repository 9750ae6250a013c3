use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::error::DbErr;
use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Error body returned by every endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// HTTP status category (e.g., "Not Found", "Bad Request")
    pub error: String,
    /// Human-readable error description
    pub message: String,
    /// Offending input field, for rejected registrations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// ISO 8601 timestamp when error occurred
    pub timestamp: String,
}

/// Which insert of a registration failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteStage {
    /// The facility row itself; nothing was left behind.
    Facility,
    /// The service association batch; the facility row was rolled back or
    /// deleted by compensation.
    Services,
}

impl fmt::Display for WriteStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteStage::Facility => f.write_str("facility insert"),
            WriteStage::Services => f.write_str("service association insert"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Invalid input for `{field}`: {message}")]
    InvalidInput { field: String, message: String },

    #[error("Storage read failed: {0}")]
    StorageRead(#[source] DbErr),

    #[error("Storage write failed during {stage}: {source}")]
    StorageWrite { stage: WriteStage, source: DbErr },

    /// The association batch failed and the rollback delete failed too; the
    /// facility row is orphaned and needs manual reconciliation.
    #[error(
        "Compensation failed for facility {facility_id}: association insert failed ({cause}), delete failed ({source})"
    )]
    CompensationFailed {
        facility_id: i32,
        cause: DbErr,
        source: DbErr,
    },

    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        let field_errors = err.field_errors();
        let mut fields: Vec<_> = field_errors.iter().collect();
        fields.sort_by_key(|(name, _)| **name);

        match fields.first() {
            Some((name, errors)) => {
                let message = errors
                    .first()
                    .map(|e| match &e.message {
                        Some(msg) => msg.to_string(),
                        None => format!("failed `{}` check", e.code),
                    })
                    .unwrap_or_else(|| "is invalid".to_string());
                ServiceError::invalid_input(to_camel_case(name), message)
            }
            None => ServiceError::invalid_input("payload", err.to_string()),
        }
    }
}

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        ServiceError::invalid_input("body", rejection.body_text())
    }
}

impl From<QueryRejection> for ServiceError {
    fn from(rejection: QueryRejection) -> Self {
        ServiceError::invalid_input("query", rejection.body_text())
    }
}

impl From<PathRejection> for ServiceError {
    fn from(rejection: PathRejection) -> Self {
        ServiceError::invalid_input("id", rejection.body_text())
    }
}

fn to_camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for ch in field.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}

impl ServiceError {
    pub fn invalid_input(field: impl Into<String>, message: impl Into<String>) -> Self {
        ServiceError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns the HTTP status code for this error.
    /// This is the single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidInput { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::StorageRead(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::StorageWrite { .. } | Self::CompensationFailed { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Returns the error message suitable for HTTP responses.
    /// Storage failures return generic messages; operators read the logs.
    pub fn response_message(&self) -> String {
        match self {
            Self::StorageRead(_) => "The directory is temporarily unavailable".to_string(),
            Self::StorageWrite { .. } | Self::CompensationFailed { .. } => {
                "Facility registration failed; please try again later".to_string()
            }
            _ => self.to_string(),
        }
    }

    /// The offending field for rejected input
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::InvalidInput { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Facility left behind by a failed compensation, if any
    pub fn orphaned_facility_id(&self) -> Option<i32> {
        match self {
            Self::CompensationFailed { facility_id, .. } => Some(*facility_id),
            _ => None,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, status = status.as_u16(), "Request failed");
        }

        let err = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.response_message(),
            field: self.field().map(str::to_string),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(err)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use validator::Validate;

    #[test]
    fn service_error_status_code_mapping() {
        assert_eq!(
            ServiceError::invalid_input("name", "is required").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::StorageRead(DbErr::Custom("down".into())).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            ServiceError::StorageWrite {
                stage: WriteStage::Facility,
                source: DbErr::Custom("x".into()),
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ServiceError::CompensationFailed {
                facility_id: 7,
                cause: DbErr::Custom("a".into()),
                source: DbErr::Custom("b".into()),
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn response_message_hides_storage_details() {
        let read = ServiceError::StorageRead(DbErr::Custom("connection refused".into()));
        assert_eq!(
            read.response_message(),
            "The directory is temporarily unavailable"
        );
        assert!(!read.response_message().contains("connection"));

        let write = ServiceError::StorageWrite {
            stage: WriteStage::Services,
            source: DbErr::Custom("UNIQUE constraint failed".into()),
        };
        assert!(!write.response_message().contains("UNIQUE"));

        let invalid = ServiceError::invalid_input("district", "is required");
        assert_eq!(
            invalid.response_message(),
            "Invalid input for `district`: is required"
        );
    }

    #[test]
    fn compensation_failure_keeps_facility_id_and_both_causes() {
        let err = ServiceError::CompensationFailed {
            facility_id: 42,
            cause: DbErr::Custom("fk violation".into()),
            source: DbErr::Custom("connection reset".into()),
        };
        assert_eq!(err.orphaned_facility_id(), Some(42));
        let text = err.to_string();
        assert!(text.contains("42"));
        assert!(text.contains("fk violation"));
        assert!(text.contains("connection reset"));
    }

    #[test]
    fn validation_errors_name_the_field_in_camel_case() {
        #[derive(Validate)]
        struct Probe {
            #[validate(url)]
            website_url: Option<String>,
        }

        let err = Probe {
            website_url: Some("not a url".into()),
        }
        .validate()
        .unwrap_err();
        let service_err = ServiceError::from(err);
        assert_eq!(service_err.field(), Some("websiteUrl"));
    }

    #[tokio::test]
    async fn invalid_input_response_carries_field() {
        let response = ServiceError::invalid_input("serviceIds", "must not be empty").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let payload: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(payload.field.as_deref(), Some("serviceIds"));
        assert_eq!(payload.error, "Bad Request");
    }
}
