pub mod district;
pub mod facility;

pub use district::District;
pub use facility::{
    FacilityDraft, FacilityServiceDetail, FacilityWithServices, NewFacility, NewFacilityService,
    RegistrationOutcome, SearchFilters, SearchResult,
};
