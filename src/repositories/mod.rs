use async_trait::async_trait;
use sea_orm::DbErr;

use crate::entities::service;
use crate::models::{FacilityWithServices, NewFacility, NewFacilityService};

pub mod facility_repository;

pub use facility_repository::SeaOrmFacilityStore;

/// Composed read predicate for [`FacilityStore::find_facilities`].
///
/// Rows come back ordered by `updated_at` descending, then `id` descending,
/// and never more than `limit` of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacilityQuery {
    pub active_only: bool,
    /// Case-insensitive substring of the facility name
    pub name_contains: Option<String>,
    /// Exact district match
    pub district: Option<String>,
    pub limit: u64,
}

/// Failure of a single-transaction registration write. The transaction is
/// rolled back in every case.
#[derive(Debug, thiserror::Error)]
pub enum AtomicWriteError {
    #[error("facility insert failed: {0}")]
    Facility(#[source] DbErr),
    #[error("facility service insert failed: {0}")]
    Services(#[source] DbErr),
    #[error("store does not support multi-table transactions")]
    Unsupported,
}

/// Storage capability consumed by the search and registration services.
///
/// Every method either applies fully or reports an error; the association
/// batch insert is all-or-nothing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FacilityStore: Send + Sync {
    /// Facilities matching `query`, each joined with its associations and
    /// their resolved catalog services.
    async fn find_facilities(
        &self,
        query: &FacilityQuery,
    ) -> Result<Vec<FacilityWithServices>, DbErr>;

    /// One facility by id regardless of `is_active`.
    async fn find_facility(&self, id: i32) -> Result<Option<FacilityWithServices>, DbErr>;

    async fn list_services(&self) -> Result<Vec<service::Model>, DbErr>;

    /// Inserts a facility row and returns its storage-assigned id.
    async fn insert_facility(&self, facility: NewFacility) -> Result<i32, DbErr>;

    async fn insert_facility_services(
        &self,
        facility_id: i32,
        rows: Vec<NewFacilityService>,
    ) -> Result<(), DbErr>;

    /// Deletes a facility together with its associations.
    async fn delete_facility(&self, id: i32) -> Result<(), DbErr>;

    fn supports_transactions(&self) -> bool {
        false
    }

    /// Inserts the facility and its associations in one transaction.
    async fn insert_facility_with_services(
        &self,
        _facility: NewFacility,
        _rows: Vec<NewFacilityService>,
    ) -> Result<i32, AtomicWriteError> {
        Err(AtomicWriteError::Unsupported)
    }
}
