//! Property-based tests for the search post-filter stage.
//!
//! The stage must hold its guarantees for arbitrary fetched rows, not just
//! the ones a well-behaved store returns.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;

use care_directory::{
    entities::{
        facility,
        facility_service::{self, Availability},
        service::{self, ServiceCategory},
    },
    models::{FacilityServiceDetail, FacilityWithServices, SearchFilters},
    services::{facility_search::apply_collection_filters, MAX_SEARCH_RESULTS},
};

const NAMES: [&str; 6] = ["さくら苑", "さくらデイ", "Green Hill", "GREEN park", "あおば", "ひまわり"];
const DISTRICTS: [&str; 3] = ["新宿区", "渋谷区", "港区"];
const CATEGORIES: [ServiceCategory; 3] = [
    ServiceCategory::DayService,
    ServiceCategory::HomeCare,
    ServiceCategory::ShortStay,
];

fn association_strategy() -> impl Strategy<Value = (usize, bool)> {
    (0..CATEGORIES.len(), any::<bool>())
}

fn row_strategy() -> impl Strategy<Value = (usize, usize, bool, Vec<(usize, bool)>)> {
    (
        0..NAMES.len(),
        0..DISTRICTS.len(),
        any::<bool>(),
        prop::collection::vec(association_strategy(), 0..4),
    )
}

/// Rows in non-increasing `updated_at` order, as storage returns them
fn rows_strategy() -> impl Strategy<Value = Vec<FacilityWithServices>> {
    prop::collection::vec(row_strategy(), 0..160).prop_map(|specs| {
        let base = Utc.with_ymd_and_hms(2024, 4, 1, 9, 0, 0).unwrap();
        let count = specs.len() as i32;
        specs
            .into_iter()
            .enumerate()
            .map(|(i, (name, district, active, links))| {
                let id = count - i as i32;
                let stamp = base + Duration::minutes(i64::from(id));
                let services = links
                    .into_iter()
                    .enumerate()
                    .map(|(j, (category, available))| FacilityServiceDetail {
                        association: facility_service::Model {
                            id: id * 10 + j as i32,
                            facility_id: id,
                            service_id: category as i32 + 1,
                            availability: if available {
                                Availability::Available
                            } else {
                                Availability::Unavailable
                            },
                            capacity: None,
                            current_users: 0,
                            created_at: stamp,
                            updated_at: stamp,
                        },
                        service: Some(service::Model {
                            id: category as i32 + 1,
                            name: format!("service-{}", category),
                            category: CATEGORIES[category],
                            description: None,
                        }),
                    })
                    .collect();
                FacilityWithServices {
                    facility: facility::Model {
                        id,
                        name: NAMES[name].to_string(),
                        description: None,
                        appeal_points: None,
                        address: "1-1".to_string(),
                        district: DISTRICTS[district].to_string(),
                        phone_number: None,
                        website_url: None,
                        image_url: None,
                        is_active: active,
                        created_at: stamp,
                        updated_at: stamp,
                    },
                    services,
                }
            })
            .collect()
    })
}

fn filters_strategy() -> impl Strategy<Value = SearchFilters> {
    (
        prop::option::of(prop_oneof![
            Just("さくら".to_string()),
            Just("green".to_string()),
            Just("   ".to_string()),
            Just("Park".to_string()),
        ]),
        prop::option::of(prop_oneof![
            Just("新宿区".to_string()),
            Just("港区".to_string()),
            Just(String::new()),
        ]),
        prop::option::of(prop_oneof![
            Just("day_service".to_string()),
            Just("short_stay".to_string()),
            Just(String::new()),
        ]),
        any::<bool>(),
    )
        .prop_map(|(query, district, service_category, available_only)| SearchFilters {
            query,
            district,
            service_category,
            available_only,
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn every_result_satisfies_every_filter(
        rows in rows_strategy(),
        filters in filters_strategy(),
    ) {
        let kept = apply_collection_filters(rows, &filters);

        prop_assert!(kept.len() <= MAX_SEARCH_RESULTS as usize);
        for row in &kept {
            prop_assert!(row.facility.is_active);
            if let Some(text) = filters.text_query() {
                prop_assert!(row.facility.name.to_lowercase().contains(&text.to_lowercase()));
            }
            if let Some(district) = filters.district_filter() {
                prop_assert_eq!(&row.facility.district, district);
            }
            if let Some(category) = filters.category_filter() {
                prop_assert!(row.offers_category(category));
            }
            if filters.available_only {
                prop_assert!(row.has_available_service());
            }
        }
    }

    #[test]
    fn order_is_preserved(rows in rows_strategy(), filters in filters_strategy()) {
        let kept = apply_collection_filters(rows, &filters);
        for pair in kept.windows(2) {
            prop_assert!(pair[0].facility.updated_at >= pair[1].facility.updated_at);
            prop_assert!(pair[0].facility.id > pair[1].facility.id);
        }
    }

    #[test]
    fn availability_flag_off_excludes_nothing_extra(rows in rows_strategy(), filters in filters_strategy()) {
        let relaxed = SearchFilters { available_only: false, ..filters.clone() };
        let strict = SearchFilters { available_only: true, ..filters };

        let relaxed_ids: Vec<i32> = apply_collection_filters(rows.clone(), &relaxed)
            .into_iter()
            .map(|r| r.facility.id)
            .collect();
        let strict_ids: Vec<i32> = apply_collection_filters(rows, &strict)
            .into_iter()
            .map(|r| r.facility.id)
            .collect();

        prop_assert!(strict_ids.iter().all(|id| relaxed_ids.contains(id)));
    }

    #[test]
    fn blank_query_equals_no_query(rows in rows_strategy(), spaces in "[ \t]{0,4}") {
        let blank = SearchFilters { query: Some(spaces), ..Default::default() };
        let none = SearchFilters::default();
        prop_assert_eq!(
            apply_collection_filters(rows.clone(), &blank),
            apply_collection_filters(rows, &none)
        );
    }
}
