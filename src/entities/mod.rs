pub mod facility;
pub mod facility_service;
pub mod service;
