use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240401_000001_create_services_table::Migration),
            Box::new(m20240401_000002_create_facilities_table::Migration),
            Box::new(m20240401_000003_create_facility_services_table::Migration),
        ]
    }
}

// Migration implementations

mod m20240401_000001_create_services_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240401_000001_create_services_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Catalog reference data, aligned with entities::service Model
            manager
                .create_table(
                    Table::create()
                        .table(Services::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Services::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Services::Name).string().not_null())
                        .col(ColumnDef::new(Services::Category).string_len(32).not_null())
                        .col(ColumnDef::new(Services::Description).text().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_services_category")
                        .table(Services::Table)
                        .col(Services::Category)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Services::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Services {
        Table,
        Id,
        Name,
        Category,
        Description,
    }
}

mod m20240401_000002_create_facilities_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240401_000002_create_facilities_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Facilities::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Facilities::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(ColumnDef::new(Facilities::Name).string().not_null())
                        .col(ColumnDef::new(Facilities::Description).text().null())
                        .col(ColumnDef::new(Facilities::AppealPoints).text().null())
                        .col(ColumnDef::new(Facilities::Address).string().not_null())
                        .col(ColumnDef::new(Facilities::District).string().not_null())
                        .col(ColumnDef::new(Facilities::PhoneNumber).string().null())
                        .col(ColumnDef::new(Facilities::WebsiteUrl).string().null())
                        .col(ColumnDef::new(Facilities::ImageUrl).string().null())
                        .col(
                            ColumnDef::new(Facilities::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Facilities::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Facilities::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            // Search reads active rows newest first
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_facilities_active_updated_at")
                        .table(Facilities::Table)
                        .col(Facilities::IsActive)
                        .col(Facilities::UpdatedAt)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_facilities_district")
                        .table(Facilities::Table)
                        .col(Facilities::District)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Facilities::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Facilities {
        Table,
        Id,
        Name,
        Description,
        AppealPoints,
        Address,
        District,
        PhoneNumber,
        WebsiteUrl,
        ImageUrl,
        IsActive,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240401_000003_create_facility_services_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240401_000003_create_facility_services_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Join rows die with their facility
            manager
                .create_table(
                    Table::create()
                        .table(FacilityServices::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(FacilityServices::Id)
                                .integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(FacilityServices::FacilityId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(FacilityServices::ServiceId)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(FacilityServices::Availability)
                                .string_len(16)
                                .not_null()
                                .default("available"),
                        )
                        .col(ColumnDef::new(FacilityServices::Capacity).integer().null())
                        .col(
                            ColumnDef::new(FacilityServices::CurrentUsers)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(FacilityServices::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(FacilityServices::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_facility_services_facility_id")
                                .from(FacilityServices::Table, FacilityServices::FacilityId)
                                .to(Facilities::Table, Facilities::Id)
                                .on_delete(ForeignKeyAction::Cascade)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_facility_services_service_id")
                                .from(FacilityServices::Table, FacilityServices::ServiceId)
                                .to(Services::Table, Services::Id)
                                .on_delete(ForeignKeyAction::Restrict)
                                .on_update(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            // At most one association per (facility, service)
            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_facility_services_facility_service")
                        .table(FacilityServices::Table)
                        .col(FacilityServices::FacilityId)
                        .col(FacilityServices::ServiceId)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_facility_services_service_id")
                        .table(FacilityServices::Table)
                        .col(FacilityServices::ServiceId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(FacilityServices::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum FacilityServices {
        Table,
        Id,
        FacilityId,
        ServiceId,
        Availability,
        Capacity,
        CurrentUsers,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum Facilities {
        Table,
        Id,
    }

    #[derive(DeriveIden)]
    enum Services {
        Table,
        Id,
    }
}
