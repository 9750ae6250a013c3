// Visitor search
pub mod facility_search;

// Operator registration
pub mod facility_registration;

// Detail and reference data lookups
pub mod catalog;

pub use catalog::FacilityCatalogService;
pub use facility_registration::{FacilityRegistrationService, RegistrationWriteMode};
pub use facility_search::{FacilitySearchService, MAX_SEARCH_RESULTS};
