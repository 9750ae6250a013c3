use sea_orm::ActiveEnum;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::entities::{
    facility,
    facility_service::{self, Availability},
    service,
};
use crate::errors::ServiceError;
use crate::models::district::District;

/// Visitor search input. Every field is optional; blank strings mean "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase", default)]
#[into_params(parameter_in = Query)]
pub struct SearchFilters {
    /// Case-insensitive substring of the facility name
    pub query: Option<String>,
    /// Exact ward name, e.g. `新宿区`
    pub district: Option<String>,
    /// Service category code, e.g. `day_service`
    pub service_category: Option<String>,
    /// Only facilities with at least one available service
    pub available_only: bool,
}

impl SearchFilters {
    pub fn text_query(&self) -> Option<&str> {
        non_blank(self.query.as_deref())
    }

    pub fn district_filter(&self) -> Option<&str> {
        non_blank(self.district.as_deref())
    }

    pub fn category_filter(&self) -> Option<&str> {
        non_blank(self.service_category.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// An association row with its catalog entry resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FacilityServiceDetail {
    #[serde(flatten)]
    pub association: facility_service::Model,
    pub service: Option<service::Model>,
}

/// A facility joined with its service associations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FacilityWithServices {
    #[serde(flatten)]
    pub facility: facility::Model,
    pub services: Vec<FacilityServiceDetail>,
}

impl FacilityWithServices {
    /// True when any association resolves to a service of `category`.
    pub fn offers_category(&self, category: &str) -> bool {
        self.services.iter().any(|detail| {
            detail
                .service
                .as_ref()
                .is_some_and(|svc| svc.category.to_value() == category)
        })
    }

    pub fn has_available_service(&self) -> bool {
        self.services
            .iter()
            .any(|detail| detail.association.availability == Availability::Available)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub results: Vec<FacilityWithServices>,
    /// Number of rows returned, not the number of rows matching in storage
    pub total_count: usize,
}

/// Operator registration payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct FacilityDraft {
    #[validate(length(max = 200))]
    pub name: String,
    #[validate(length(max = 4000))]
    pub description: Option<String>,
    #[validate(length(max = 4000))]
    pub appeal_points: Option<String>,
    #[validate(length(max = 500))]
    pub address: String,
    pub district: String,
    #[validate(length(max = 32))]
    pub phone_number: Option<String>,
    #[validate(url)]
    pub website_url: Option<String>,
    #[validate(url)]
    pub image_url: Option<String>,
    pub service_ids: Vec<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationOutcome {
    pub facility_id: i32,
}

/// Facility attributes after validation, ready for insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFacility {
    pub name: String,
    pub description: Option<String>,
    pub appeal_points: Option<String>,
    pub address: String,
    pub district: District,
    pub phone_number: Option<String>,
    pub website_url: Option<String>,
    pub image_url: Option<String>,
}

/// Association values for one service; the facility id is supplied at insert time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewFacilityService {
    pub service_id: i32,
    pub availability: Availability,
    pub capacity: Option<i32>,
    pub current_users: i32,
}

impl NewFacilityService {
    /// Defaults for a freshly registered service: available, no capacity, no users.
    pub fn new(service_id: i32) -> Self {
        Self {
            service_id,
            availability: Availability::Available,
            capacity: None,
            current_users: 0,
        }
    }

    pub fn check_occupancy(&self) -> Result<(), ServiceError> {
        check_occupancy(self.capacity, self.current_users)
    }
}

/// Occupancy invariant for an association: counts are non-negative and
/// `current_users` never exceeds a set `capacity`.
pub fn check_occupancy(capacity: Option<i32>, current_users: i32) -> Result<(), ServiceError> {
    if current_users < 0 {
        return Err(ServiceError::invalid_input(
            "currentUsers",
            "must not be negative",
        ));
    }
    match capacity {
        Some(cap) if cap < 0 => Err(ServiceError::invalid_input(
            "capacity",
            "must not be negative",
        )),
        Some(cap) if current_users > cap => Err(ServiceError::invalid_input(
            "currentUsers",
            format!("{} exceeds capacity {}", current_users, cap),
        )),
        _ => Ok(()),
    }
}
