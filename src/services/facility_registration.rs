use metrics::counter;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use validator::Validate;

use crate::{
    errors::{ServiceError, WriteStage},
    models::{District, FacilityDraft, NewFacility, NewFacilityService, RegistrationOutcome},
    repositories::{AtomicWriteError, FacilityStore},
};

/// How a registration keeps the facility row and its associations consistent.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RegistrationWriteMode {
    /// Both inserts in one transaction; falls back to compensation when the
    /// store has no multi-table transactions.
    #[default]
    Transactional,
    /// Two independent inserts, undone by deleting the facility row.
    Compensating,
}

/// Operator-facing facility registration
#[derive(Clone)]
pub struct FacilityRegistrationService {
    store: Arc<dyn FacilityStore>,
    mode: RegistrationWriteMode,
}

impl FacilityRegistrationService {
    pub fn new(store: Arc<dyn FacilityStore>, mode: RegistrationWriteMode) -> Self {
        Self { store, mode }
    }

    /// Registers a facility with its offered services. Single attempt: no
    /// write is retried, and invalid drafts touch no storage at all.
    #[instrument(skip(self, draft), fields(name = %draft.name, services = draft.service_ids.len()))]
    pub async fn register(&self, draft: FacilityDraft) -> Result<RegistrationOutcome, ServiceError> {
        let (facility, service_ids) = prepare(draft)?;

        let rows: Vec<NewFacilityService> = service_ids
            .into_iter()
            .map(NewFacilityService::new)
            .collect();
        for row in &rows {
            row.check_occupancy()?;
        }

        let atomic = match self.mode {
            RegistrationWriteMode::Transactional if self.store.supports_transactions() => true,
            RegistrationWriteMode::Transactional => {
                debug!("Store has no multi-table transactions; using compensating write");
                false
            }
            RegistrationWriteMode::Compensating => false,
        };
        let facility_id = if atomic {
            self.write_atomically(facility, rows).await?
        } else {
            self.write_with_compensation(facility, rows).await?
        };

        counter!("care_directory.registration.created", 1);
        info!(facility_id, "Facility registered");
        Ok(RegistrationOutcome { facility_id })
    }

    async fn write_atomically(
        &self,
        facility: NewFacility,
        rows: Vec<NewFacilityService>,
    ) -> Result<i32, ServiceError> {
        self.store
            .insert_facility_with_services(facility, rows)
            .await
            .map_err(|e| {
                let err = match e {
                    AtomicWriteError::Facility(source) => ServiceError::StorageWrite {
                        stage: WriteStage::Facility,
                        source,
                    },
                    AtomicWriteError::Services(source) => ServiceError::StorageWrite {
                        stage: WriteStage::Services,
                        source,
                    },
                    AtomicWriteError::Unsupported => ServiceError::StorageWrite {
                        stage: WriteStage::Facility,
                        source: sea_orm::DbErr::Custom(
                            "store reported no transaction support".to_string(),
                        ),
                    },
                };
                error!(error = %err, "Transactional registration rolled back");
                err
            })
    }

    async fn write_with_compensation(
        &self,
        facility: NewFacility,
        rows: Vec<NewFacilityService>,
    ) -> Result<i32, ServiceError> {
        let facility_id = self.store.insert_facility(facility).await.map_err(|source| {
            error!(error = %source, "Facility insert failed");
            ServiceError::StorageWrite {
                stage: WriteStage::Facility,
                source,
            }
        })?;

        let cause = match self.store.insert_facility_services(facility_id, rows).await {
            Ok(()) => return Ok(facility_id),
            Err(cause) => cause,
        };

        warn!(facility_id, error = %cause, "Service association insert failed; deleting facility");
        match self.store.delete_facility(facility_id).await {
            Ok(()) => {
                counter!("care_directory.registration.compensated", 1);
                Err(ServiceError::StorageWrite {
                    stage: WriteStage::Services,
                    source: cause,
                })
            }
            Err(source) => {
                counter!("care_directory.registration.compensation_failed", 1);
                error!(
                    facility_id,
                    cause = %cause,
                    error = %source,
                    "Compensating delete failed; facility is orphaned"
                );
                Err(ServiceError::CompensationFailed {
                    facility_id,
                    cause,
                    source,
                })
            }
        }
    }
}

/// Checks mandatory fields and field limits, then splits the draft into the
/// facility row and its de-duplicated service ids (first occurrence wins).
fn prepare(draft: FacilityDraft) -> Result<(NewFacility, Vec<i32>), ServiceError> {
    if draft.name.trim().is_empty() {
        return Err(ServiceError::invalid_input("name", "is required"));
    }
    let district = match draft.district.trim() {
        "" => return Err(ServiceError::invalid_input("district", "is required")),
        raw => District::parse(raw).ok_or_else(|| {
            ServiceError::invalid_input("district", format!("`{}` is not a known district", raw))
        })?,
    };
    if draft.address.trim().is_empty() {
        return Err(ServiceError::invalid_input("address", "is required"));
    }
    if draft.service_ids.is_empty() {
        return Err(ServiceError::invalid_input(
            "serviceIds",
            "at least one service is required",
        ));
    }
    if let Some(bad) = draft.service_ids.iter().find(|id| **id <= 0) {
        return Err(ServiceError::invalid_input(
            "serviceIds",
            format!("{} is not a valid service id", bad),
        ));
    }
    draft.validate()?;

    let mut seen = HashSet::new();
    let service_ids = draft
        .service_ids
        .iter()
        .copied()
        .filter(|id| seen.insert(*id))
        .collect();

    let facility = NewFacility {
        name: draft.name.trim().to_string(),
        description: draft.description,
        appeal_points: draft.appeal_points,
        address: draft.address.trim().to_string(),
        district,
        phone_number: draft.phone_number,
        website_url: draft.website_url,
        image_url: draft.image_url,
    };
    Ok((facility, service_ids))
}
