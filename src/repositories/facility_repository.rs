use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DbBackend, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionError, TransactionTrait,
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::db::DbPool;
use crate::entities::{
    facility::{self, Entity as Facility},
    facility_service::{self, Entity as FacilityServiceLink},
    service::{self, Entity as Service},
};
use crate::models::{FacilityServiceDetail, FacilityWithServices, NewFacility, NewFacilityService};

use super::{AtomicWriteError, FacilityQuery, FacilityStore};

/// Rows fetched per round trip when names are matched in process
const NAME_SCAN_PAGE_SIZE: u64 = 500;

/// SeaORM-backed [`FacilityStore`]
#[derive(Debug, Clone)]
pub struct SeaOrmFacilityStore {
    db: Arc<DbPool>,
}

impl SeaOrmFacilityStore {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Loads associations and catalog services for `facilities` with a single
    /// query, preserving the facility order.
    async fn attach_services(
        &self,
        facilities: Vec<facility::Model>,
    ) -> Result<Vec<FacilityWithServices>, DbErr> {
        if facilities.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = facilities.iter().map(|f| f.id).collect();
        let links = FacilityServiceLink::find()
            .filter(facility_service::Column::FacilityId.is_in(ids))
            .order_by_asc(facility_service::Column::Id)
            .find_also_related(Service)
            .all(self.db.as_ref())
            .await?;

        let mut by_facility: HashMap<i32, Vec<FacilityServiceDetail>> = HashMap::new();
        for (association, service) in links {
            by_facility
                .entry(association.facility_id)
                .or_default()
                .push(FacilityServiceDetail {
                    association,
                    service,
                });
        }

        Ok(facilities
            .into_iter()
            .map(|facility| {
                let services = by_facility.remove(&facility.id).unwrap_or_default();
                FacilityWithServices { facility, services }
            })
            .collect())
    }

    /// SQLite's `LOWER` and `LIKE` only fold ASCII, so names with other cased
    /// letters (full-width Latin, accents) cannot be matched in SQL there.
    fn lower_is_ascii_only(&self) -> bool {
        self.db.get_database_backend() == DbBackend::Sqlite
    }

    /// Walks `select` in order, keeping rows whose lowercased name contains
    /// `text`, until `limit` rows are collected.
    async fn scan_by_name(
        &self,
        select: Select<Facility>,
        text: &str,
        limit: u64,
    ) -> Result<Vec<facility::Model>, DbErr> {
        let limit = limit as usize;
        let mut matched = Vec::new();
        let mut pages = select.paginate(self.db.as_ref(), NAME_SCAN_PAGE_SIZE);

        while let Some(page) = pages.fetch_and_next().await? {
            matched.extend(
                page.into_iter()
                    .filter(|f| f.name.to_lowercase().contains(text)),
            );
            if matched.len() >= limit {
                break;
            }
        }
        matched.truncate(limit);
        debug!(matched = matched.len(), "Matched facility names in process");
        Ok(matched)
    }
}

/// Escapes LIKE wildcards so user text matches literally.
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

async fn insert_facility_row<C: ConnectionTrait>(
    conn: &C,
    facility: NewFacility,
) -> Result<i32, DbErr> {
    let model = facility::ActiveModel {
        name: Set(facility.name),
        description: Set(facility.description),
        appeal_points: Set(facility.appeal_points),
        address: Set(facility.address),
        district: Set(facility.district.name().to_string()),
        phone_number: Set(facility.phone_number),
        website_url: Set(facility.website_url),
        image_url: Set(facility.image_url),
        is_active: Set(true),
        ..Default::default()
    }
    .insert(conn)
    .await?;

    Ok(model.id)
}

async fn insert_link_rows<C: ConnectionTrait>(
    conn: &C,
    facility_id: i32,
    rows: Vec<NewFacilityService>,
) -> Result<(), DbErr> {
    if rows.is_empty() {
        return Ok(());
    }

    // insert_many skips ActiveModelBehavior, so timestamps are set here
    let now = Utc::now();
    let count = rows.len();
    let models = rows.into_iter().map(|row| facility_service::ActiveModel {
        facility_id: Set(facility_id),
        service_id: Set(row.service_id),
        availability: Set(row.availability),
        capacity: Set(row.capacity),
        current_users: Set(row.current_users),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    });

    FacilityServiceLink::insert_many(models).exec(conn).await?;
    debug!(facility_id, rows = count, "Inserted facility service rows");
    Ok(())
}

#[async_trait]
impl FacilityStore for SeaOrmFacilityStore {
    #[instrument(skip(self))]
    async fn find_facilities(
        &self,
        query: &FacilityQuery,
    ) -> Result<Vec<FacilityWithServices>, DbErr> {
        let mut select = Facility::find();

        if query.active_only {
            select = select.filter(facility::Column::IsActive.eq(true));
        }
        if let Some(district) = &query.district {
            select = select.filter(facility::Column::District.eq(district.as_str()));
        }
        let select = select
            .order_by_desc(facility::Column::UpdatedAt)
            .order_by_desc(facility::Column::Id);

        let facilities = match query.name_contains.as_deref().map(str::to_lowercase) {
            Some(text) if self.lower_is_ascii_only() => {
                self.scan_by_name(select, &text, query.limit).await?
            }
            Some(text) => {
                let pattern = format!("%{}%", escape_like(&text));
                select
                    .filter(
                        Expr::expr(Func::lower(Expr::col(facility::Column::Name)))
                            .like(LikeExpr::new(pattern).escape('\\')),
                    )
                    .limit(query.limit)
                    .all(self.db.as_ref())
                    .await?
            }
            None => select.limit(query.limit).all(self.db.as_ref()).await?,
        };

        self.attach_services(facilities).await
    }

    #[instrument(skip(self))]
    async fn find_facility(&self, id: i32) -> Result<Option<FacilityWithServices>, DbErr> {
        let Some(facility) = Facility::find_by_id(id).one(self.db.as_ref()).await? else {
            return Ok(None);
        };
        Ok(self.attach_services(vec![facility]).await?.pop())
    }

    async fn list_services(&self) -> Result<Vec<service::Model>, DbErr> {
        Service::find()
            .order_by_asc(service::Column::Category)
            .order_by_asc(service::Column::Id)
            .all(self.db.as_ref())
            .await
    }

    #[instrument(skip(self, facility), fields(name = %facility.name))]
    async fn insert_facility(&self, facility: NewFacility) -> Result<i32, DbErr> {
        insert_facility_row(self.db.as_ref(), facility).await
    }

    #[instrument(skip(self, rows), fields(rows = rows.len()))]
    async fn insert_facility_services(
        &self,
        facility_id: i32,
        rows: Vec<NewFacilityService>,
    ) -> Result<(), DbErr> {
        insert_link_rows(self.db.as_ref(), facility_id, rows).await
    }

    #[instrument(skip(self))]
    async fn delete_facility(&self, id: i32) -> Result<(), DbErr> {
        let db = self.db.as_ref();

        FacilityServiceLink::delete_many()
            .filter(facility_service::Column::FacilityId.eq(id))
            .exec(db)
            .await?;

        let result = Facility::delete_by_id(id).exec(db).await?;
        if result.rows_affected == 0 {
            return Err(DbErr::RecordNotFound(format!(
                "Facility with ID {} not found",
                id
            )));
        }
        Ok(())
    }

    fn supports_transactions(&self) -> bool {
        true
    }

    #[instrument(skip(self, facility, rows), fields(rows = rows.len()))]
    async fn insert_facility_with_services(
        &self,
        facility: NewFacility,
        rows: Vec<NewFacilityService>,
    ) -> Result<i32, AtomicWriteError> {
        self.db
            .transaction::<_, i32, AtomicWriteError>(move |txn| {
                Box::pin(async move {
                    let facility_id = insert_facility_row(txn, facility)
                        .await
                        .map_err(AtomicWriteError::Facility)?;
                    insert_link_rows(txn, facility_id, rows)
                        .await
                        .map_err(AtomicWriteError::Services)?;
                    Ok(facility_id)
                })
            })
            .await
            .map_err(|e| match e {
                // begin or commit failed, nothing was persisted
                TransactionError::Connection(db_err) => AtomicWriteError::Facility(db_err),
                TransactionError::Transaction(err) => err,
            })
    }
}
