use sea_orm::{DbErr, EntityTrait, PaginatorTrait, Set};
use std::sync::Arc;
use tracing::{error, info, instrument};

use crate::{
    db::DbPool,
    entities::service::{self, Entity as Service, ServiceCategory},
    errors::ServiceError,
    models::{District, FacilityWithServices},
    repositories::FacilityStore,
};

/// Read-only lookups behind the facility detail page and the registration form
#[derive(Clone)]
pub struct FacilityCatalogService {
    store: Arc<dyn FacilityStore>,
}

impl FacilityCatalogService {
    pub fn new(store: Arc<dyn FacilityStore>) -> Self {
        Self { store }
    }

    /// A published facility with its services. Retired facilities are
    /// reported as missing.
    #[instrument(skip(self))]
    pub async fn facility(&self, id: i32) -> Result<FacilityWithServices, ServiceError> {
        let found = self.store.find_facility(id).await.map_err(|e| {
            error!(facility_id = id, error = %e, "Facility lookup failed");
            ServiceError::StorageRead(e)
        })?;

        found
            .filter(|f| f.facility.is_active)
            .ok_or_else(|| ServiceError::NotFound(format!("Facility {} not found", id)))
    }

    /// Every catalog service, grouped by category
    pub async fn services(&self) -> Result<Vec<service::Model>, ServiceError> {
        self.store.list_services().await.map_err(|e| {
            error!(error = %e, "Service catalog read failed");
            ServiceError::StorageRead(e)
        })
    }

    pub fn districts(&self) -> Vec<District> {
        District::all()
    }
}

/// Reference catalog loaded by `seed-catalog`
pub fn default_catalog() -> Vec<(&'static str, ServiceCategory, &'static str)> {
    vec![
        ("訪問介護", ServiceCategory::HomeCare, "ホームヘルパーによる自宅での身体介護・生活援助"),
        ("通所介護", ServiceCategory::DayService, "日帰りで食事・入浴・機能訓練を提供するデイサービス"),
        ("通所リハビリテーション", ServiceCategory::DayService, "医療機関等でのリハビリ中心のデイケア"),
        ("短期入所生活介護", ServiceCategory::ShortStay, "数日から数週間の宿泊を伴うショートステイ"),
        ("介護老人福祉施設", ServiceCategory::Residential, "常時介護が必要な方のための特別養護老人ホーム"),
        ("認知症対応型共同生活介護", ServiceCategory::Residential, "認知症の方が少人数で暮らすグループホーム"),
        ("訪問看護", ServiceCategory::VisitingNursing, "看護師が自宅を訪問して行う療養上の世話"),
        ("居宅介護支援", ServiceCategory::CareManagement, "ケアマネジャーによるケアプラン作成"),
        ("福祉用具貸与", ServiceCategory::WelfareEquipment, "車いす・介護ベッド等のレンタル"),
    ]
}

/// Inserts [`default_catalog`] when the services table is empty. Returns the
/// number of rows inserted.
pub async fn seed_default_catalog(db: &DbPool) -> Result<usize, DbErr> {
    let existing = Service::find().count(db).await?;
    if existing > 0 {
        info!(existing, "Service catalog already populated; skipping seed");
        return Ok(0);
    }

    let rows: Vec<service::ActiveModel> = default_catalog()
        .into_iter()
        .map(|(name, category, description)| service::ActiveModel {
            name: Set(name.to_string()),
            category: Set(category),
            description: Set(Some(description.to_string())),
            ..Default::default()
        })
        .collect();
    let inserted = rows.len();

    Service::insert_many(rows).exec(db).await?;
    info!(inserted, "Seeded service catalog");
    Ok(inserted)
}
