use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Catalog entry for a care service. Reference data, seeded outside the
/// registration flow.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "services")]
#[serde(rename_all = "camelCase")]
#[schema(as = Service)]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub category: ServiceCategory,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
}

/// Service category enumeration
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    #[sea_orm(string_value = "home_care")]
    HomeCare,
    #[sea_orm(string_value = "day_service")]
    DayService,
    #[sea_orm(string_value = "short_stay")]
    ShortStay,
    #[sea_orm(string_value = "residential")]
    Residential,
    #[sea_orm(string_value = "visiting_nursing")]
    VisitingNursing,
    #[sea_orm(string_value = "care_management")]
    CareManagement,
    #[sea_orm(string_value = "welfare_equipment")]
    WelfareEquipment,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::facility_service::Entity")]
    FacilityServices,
}

impl Related<super::facility_service::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FacilityServices.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
