pub mod facilities;
pub mod health;

use crate::db::DbPool;
use crate::repositories::{FacilityStore, SeaOrmFacilityStore};
use crate::services::{
    FacilityCatalogService, FacilityRegistrationService, FacilitySearchService,
    RegistrationWriteMode,
};
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub search: Arc<FacilitySearchService>,
    pub registration: Arc<FacilityRegistrationService>,
    pub catalog: Arc<FacilityCatalogService>,
}

impl AppServices {
    /// Wires every service onto the SeaORM-backed store.
    pub fn new(db_pool: Arc<DbPool>, write_mode: RegistrationWriteMode) -> Self {
        let store: Arc<dyn FacilityStore> = Arc::new(SeaOrmFacilityStore::new(db_pool));
        Self::with_store(store, write_mode)
    }

    /// Wires every service onto an arbitrary store.
    pub fn with_store(store: Arc<dyn FacilityStore>, write_mode: RegistrationWriteMode) -> Self {
        Self {
            search: Arc::new(FacilitySearchService::new(store.clone())),
            registration: Arc::new(FacilityRegistrationService::new(store.clone(), write_mode)),
            catalog: Arc::new(FacilityCatalogService::new(store)),
        }
    }
}
