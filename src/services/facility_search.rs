use metrics::counter;
use std::sync::Arc;
use tracing::{debug, error, instrument};

use crate::{
    errors::ServiceError,
    models::{FacilityWithServices, SearchFilters, SearchResult},
    repositories::{FacilityQuery, FacilityStore},
};

/// Upper bound on facilities returned by a single search
pub const MAX_SEARCH_RESULTS: u64 = 100;

/// Visitor-facing facility search
#[derive(Clone)]
pub struct FacilitySearchService {
    store: Arc<dyn FacilityStore>,
}

impl FacilitySearchService {
    pub fn new(store: Arc<dyn FacilityStore>) -> Self {
        Self { store }
    }

    /// Active facilities matching `filters`, most recently updated first.
    ///
    /// Name and district narrow the storage read; category and availability
    /// are applied to the fetched rows, so `total_count` counts what was
    /// returned rather than every match in storage.
    #[instrument(skip(self))]
    pub async fn search(&self, filters: &SearchFilters) -> Result<SearchResult, ServiceError> {
        counter!("care_directory.search.requests", 1);

        let query = build_query(filters);
        let rows = self.store.find_facilities(&query).await.map_err(|e| {
            error!(error = %e, "Facility search read failed");
            ServiceError::StorageRead(e)
        })?;
        let fetched = rows.len();

        let results = apply_collection_filters(rows, filters);
        debug!(fetched, returned = results.len(), "Facility search completed");

        Ok(SearchResult {
            total_count: results.len(),
            results,
        })
    }
}

/// Storage predicate for `filters`: active rows, name substring and exact
/// district, capped at [`MAX_SEARCH_RESULTS`].
pub fn build_query(filters: &SearchFilters) -> FacilityQuery {
    FacilityQuery {
        active_only: true,
        name_contains: filters.text_query().map(str::to_string),
        district: filters.district_filter().map(str::to_string),
        limit: MAX_SEARCH_RESULTS,
    }
}

/// Narrows fetched rows by the filters storage cannot express over the
/// association join. Order is preserved and the result never exceeds
/// [`MAX_SEARCH_RESULTS`].
pub fn apply_collection_filters(
    rows: Vec<FacilityWithServices>,
    filters: &SearchFilters,
) -> Vec<FacilityWithServices> {
    let text = filters.text_query().map(str::to_lowercase);
    let district = filters.district_filter();
    let category = filters.category_filter();

    rows.into_iter()
        .filter(|row| row.facility.is_active)
        .filter(|row| {
            text.as_deref()
                .map_or(true, |t| row.facility.name.to_lowercase().contains(t))
        })
        .filter(|row| district.map_or(true, |d| row.facility.district == d))
        .filter(|row| category.map_or(true, |c| row.offers_category(c)))
        .filter(|row| !filters.available_only || row.has_available_service())
        .take(MAX_SEARCH_RESULTS as usize)
        .collect()
}
