use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_addresses_table::Migration),
            Box::new(m20240101_000002_create_storage_facilities_table::Migration),
            Box::new(m20240101_000003_create_moves_table::Migration),
            Box::new(m20240101_000004_create_entitlements_table::Migration),
            Box::new(m20240101_000005_create_mto_shipments_table::Migration),
            Box::new(m20240101_000006_create_mto_service_items_table::Migration),
            Box::new(m20240101_000007_create_sit_extensions_table::Migration),
            Box::new(m20240101_000008_create_reweighs_table::Migration),
            Box::new(m20240101_000009_create_domestic_transit_times_table::Migration),
        ]
    }
}

mod m20240101_000001_create_addresses_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_addresses_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Addresses::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Addresses::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Addresses::StreetAddress1).string().not_null())
                        .col(ColumnDef::new(Addresses::StreetAddress2).string().null())
                        .col(ColumnDef::new(Addresses::City).string().not_null())
                        .col(ColumnDef::new(Addresses::State).string_len(2).not_null())
                        .col(ColumnDef::new(Addresses::PostalCode).string_len(10).not_null())
                        .col(ColumnDef::new(Addresses::Country).string().null())
                        .col(
                            ColumnDef::new(Addresses::IsOconus)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Addresses::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Addresses::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Addresses::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Addresses {
        Table,
        Id,
        #[sea_orm(iden = "street_address_1")]
        StreetAddress1,
        #[sea_orm(iden = "street_address_2")]
        StreetAddress2,
        City,
        State,
        PostalCode,
        Country,
        IsOconus,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000002_create_storage_facilities_table {
    use super::m20240101_000001_create_addresses_table::Addresses;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_storage_facilities_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(StorageFacilities::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StorageFacilities::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StorageFacilities::FacilityName)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(StorageFacilities::AddressId).uuid().not_null())
                        .col(ColumnDef::new(StorageFacilities::LotNumber).string().null())
                        .col(
                            ColumnDef::new(StorageFacilities::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(StorageFacilities::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_storage_facilities_address_id")
                                .from(StorageFacilities::Table, StorageFacilities::AddressId)
                                .to(Addresses::Table, Addresses::Id),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(StorageFacilities::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum StorageFacilities {
        Table,
        Id,
        FacilityName,
        AddressId,
        LotNumber,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000003_create_moves_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_moves_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Moves::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Moves::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Moves::Locator).string_len(16).not_null())
                        .col(ColumnDef::new(Moves::Status).string_len(32).not_null())
                        .col(
                            ColumnDef::new(Moves::AvailableToPrimeAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(Moves::Show).boolean().not_null().default(true))
                        .col(ColumnDef::new(Moves::ApprovedAt).timestamp_with_time_zone().null())
                        .col(
                            ColumnDef::new(Moves::ApprovalsRequestedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Moves::ExcessWeightQualifiedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(Moves::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Moves::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_moves_locator")
                        .table(Moves::Table)
                        .col(Moves::Locator)
                        .unique()
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Moves::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum Moves {
        Table,
        Id,
        Locator,
        Status,
        AvailableToPrimeAt,
        Show,
        ApprovedAt,
        ApprovalsRequestedAt,
        ExcessWeightQualifiedAt,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000004_create_entitlements_table {
    use super::m20240101_000003_create_moves_table::Moves;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_entitlements_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Entitlements::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Entitlements::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Entitlements::MoveId)
                                .uuid()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Entitlements::DbAuthorizedWeight).integer().null())
                        .col(
                            ColumnDef::new(Entitlements::TotalWeightAllowance)
                                .integer()
                                .null(),
                        )
                        .col(ColumnDef::new(Entitlements::StorageInTransit).integer().null())
                        .col(
                            ColumnDef::new(Entitlements::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Entitlements::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_entitlements_move_id")
                                .from(Entitlements::Table, Entitlements::MoveId)
                                .to(Moves::Table, Moves::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Entitlements::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Entitlements {
        Table,
        Id,
        MoveId,
        DbAuthorizedWeight,
        TotalWeightAllowance,
        StorageInTransit,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000005_create_mto_shipments_table {
    use super::m20240101_000001_create_addresses_table::Addresses;
    use super::m20240101_000002_create_storage_facilities_table::StorageFacilities;
    use super::m20240101_000003_create_moves_table::Moves;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_mto_shipments_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(MtoShipments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MtoShipments::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MtoShipments::MoveId).uuid().not_null())
                        .col(ColumnDef::new(MtoShipments::ShipmentType).string_len(32).not_null())
                        .col(ColumnDef::new(MtoShipments::Status).string_len(32).not_null())
                        .col(
                            ColumnDef::new(MtoShipments::MarketCode)
                                .string_len(1)
                                .not_null()
                                .default("d"),
                        )
                        .col(ColumnDef::new(MtoShipments::PickupAddressId).uuid().null())
                        .col(ColumnDef::new(MtoShipments::DestinationAddressId).uuid().null())
                        .col(
                            ColumnDef::new(MtoShipments::SecondaryPickupAddressId)
                                .uuid()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(MtoShipments::SecondaryDestinationAddressId)
                                .uuid()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(MtoShipments::TertiaryPickupAddressId)
                                .uuid()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(MtoShipments::TertiaryDestinationAddressId)
                                .uuid()
                                .null(),
                        )
                        .col(ColumnDef::new(MtoShipments::StorageFacilityId).uuid().null())
                        .col(ColumnDef::new(MtoShipments::RequestedPickupDate).date().null())
                        .col(ColumnDef::new(MtoShipments::ScheduledPickupDate).date().null())
                        .col(ColumnDef::new(MtoShipments::ActualPickupDate).date().null())
                        .col(
                            ColumnDef::new(MtoShipments::FirstAvailableDeliveryDate)
                                .date()
                                .null(),
                        )
                        .col(ColumnDef::new(MtoShipments::RequiredDeliveryDate).date().null())
                        .col(ColumnDef::new(MtoShipments::PrimeEstimatedWeight).integer().null())
                        .col(ColumnDef::new(MtoShipments::PrimeActualWeight).integer().null())
                        .col(ColumnDef::new(MtoShipments::NtsRecordedWeight).integer().null())
                        .col(ColumnDef::new(MtoShipments::BillableWeightCap).integer().null())
                        .col(ColumnDef::new(MtoShipments::SitDaysAllowance).integer().null())
                        .col(
                            ColumnDef::new(MtoShipments::ApprovedDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(MtoShipments::RejectionReason).text().null())
                        .col(
                            ColumnDef::new(MtoShipments::Diversion)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(MtoShipments::DivertedFromShipmentId)
                                .uuid()
                                .null(),
                        )
                        .col(ColumnDef::new(MtoShipments::DiversionReason).text().null())
                        .col(
                            ColumnDef::new(MtoShipments::UsesExternalVendor)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(MtoShipments::TerminatedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(MtoShipments::TerminationComments).text().null())
                        .col(ColumnDef::new(MtoShipments::CounselorRemarks).text().null())
                        .col(ColumnDef::new(MtoShipments::CustomerRemarks).text().null())
                        .col(
                            ColumnDef::new(MtoShipments::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MtoShipments::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_mto_shipments_move_id")
                                .from(MtoShipments::Table, MtoShipments::MoveId)
                                .to(Moves::Table, Moves::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_mto_shipments_pickup_address_id")
                                .from(MtoShipments::Table, MtoShipments::PickupAddressId)
                                .to(Addresses::Table, Addresses::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_mto_shipments_destination_address_id")
                                .from(MtoShipments::Table, MtoShipments::DestinationAddressId)
                                .to(Addresses::Table, Addresses::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_mto_shipments_storage_facility_id")
                                .from(MtoShipments::Table, MtoShipments::StorageFacilityId)
                                .to(StorageFacilities::Table, StorageFacilities::Id),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_mto_shipments_diverted_from_shipment_id")
                                .from(MtoShipments::Table, MtoShipments::DivertedFromShipmentId)
                                .to(MtoShipments::Table, MtoShipments::Id),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_mto_shipments_move_id")
                        .table(MtoShipments::Table)
                        .col(MtoShipments::MoveId)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_mto_shipments_status")
                        .table(MtoShipments::Table)
                        .col(MtoShipments::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(MtoShipments::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub(super) enum MtoShipments {
        Table,
        Id,
        MoveId,
        ShipmentType,
        Status,
        MarketCode,
        PickupAddressId,
        DestinationAddressId,
        SecondaryPickupAddressId,
        SecondaryDestinationAddressId,
        TertiaryPickupAddressId,
        TertiaryDestinationAddressId,
        StorageFacilityId,
        RequestedPickupDate,
        ScheduledPickupDate,
        ActualPickupDate,
        FirstAvailableDeliveryDate,
        RequiredDeliveryDate,
        PrimeEstimatedWeight,
        PrimeActualWeight,
        NtsRecordedWeight,
        BillableWeightCap,
        SitDaysAllowance,
        ApprovedDate,
        RejectionReason,
        Diversion,
        DivertedFromShipmentId,
        DiversionReason,
        UsesExternalVendor,
        TerminatedAt,
        TerminationComments,
        CounselorRemarks,
        CustomerRemarks,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000006_create_mto_service_items_table {
    use super::m20240101_000003_create_moves_table::Moves;
    use super::m20240101_000005_create_mto_shipments_table::MtoShipments;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000006_create_mto_service_items_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(MtoServiceItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MtoServiceItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MtoServiceItems::MoveId).uuid().not_null())
                        .col(ColumnDef::new(MtoServiceItems::ShipmentId).uuid().null())
                        .col(
                            ColumnDef::new(MtoServiceItems::ReServiceCode)
                                .string_len(16)
                                .not_null(),
                        )
                        .col(ColumnDef::new(MtoServiceItems::Status).string_len(32).not_null())
                        .col(ColumnDef::new(MtoServiceItems::SitEntryDate).date().null())
                        .col(ColumnDef::new(MtoServiceItems::SitDepartureDate).date().null())
                        .col(
                            ColumnDef::new(MtoServiceItems::ApprovedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(MtoServiceItems::RejectedAt)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(ColumnDef::new(MtoServiceItems::Reason).text().null())
                        .col(
                            ColumnDef::new(MtoServiceItems::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MtoServiceItems::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_mto_service_items_move_id")
                                .from(MtoServiceItems::Table, MtoServiceItems::MoveId)
                                .to(Moves::Table, Moves::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_mto_service_items_shipment_id")
                                .from(MtoServiceItems::Table, MtoServiceItems::ShipmentId)
                                .to(MtoShipments::Table, MtoShipments::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_mto_service_items_shipment_id")
                        .table(MtoServiceItems::Table)
                        .col(MtoServiceItems::ShipmentId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(MtoServiceItems::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum MtoServiceItems {
        Table,
        Id,
        MoveId,
        ShipmentId,
        ReServiceCode,
        Status,
        SitEntryDate,
        SitDepartureDate,
        ApprovedAt,
        RejectedAt,
        Reason,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000007_create_sit_extensions_table {
    use super::m20240101_000005_create_mto_shipments_table::MtoShipments;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000007_create_sit_extensions_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(SitExtensions::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SitExtensions::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SitExtensions::ShipmentId).uuid().not_null())
                        .col(
                            ColumnDef::new(SitExtensions::RequestReason)
                                .string_len(48)
                                .not_null(),
                        )
                        .col(ColumnDef::new(SitExtensions::ContractorRemarks).text().null())
                        .col(ColumnDef::new(SitExtensions::RequestedDays).integer().not_null())
                        .col(ColumnDef::new(SitExtensions::ApprovedDays).integer().null())
                        .col(ColumnDef::new(SitExtensions::Status).string_len(16).not_null())
                        .col(ColumnDef::new(SitExtensions::OfficeRemarks).text().null())
                        .col(
                            ColumnDef::new(SitExtensions::DecisionDate)
                                .timestamp_with_time_zone()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(SitExtensions::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SitExtensions::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_sit_extensions_shipment_id")
                                .from(SitExtensions::Table, SitExtensions::ShipmentId)
                                .to(MtoShipments::Table, MtoShipments::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SitExtensions::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum SitExtensions {
        Table,
        Id,
        ShipmentId,
        RequestReason,
        ContractorRemarks,
        RequestedDays,
        ApprovedDays,
        Status,
        OfficeRemarks,
        DecisionDate,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000008_create_reweighs_table {
    use super::m20240101_000005_create_mto_shipments_table::MtoShipments;
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000008_create_reweighs_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Reweighs::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Reweighs::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Reweighs::ShipmentId)
                                .uuid()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Reweighs::RequestedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Reweighs::RequestedBy).string_len(16).not_null())
                        .col(ColumnDef::new(Reweighs::Weight).integer().null())
                        .col(ColumnDef::new(Reweighs::VerificationReason).text().null())
                        .col(
                            ColumnDef::new(Reweighs::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Reweighs::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .foreign_key(
                            ForeignKey::create()
                                .name("fk_reweighs_shipment_id")
                                .from(Reweighs::Table, Reweighs::ShipmentId)
                                .to(MtoShipments::Table, MtoShipments::Id)
                                .on_delete(ForeignKeyAction::Cascade),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Reweighs::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Reweighs {
        Table,
        Id,
        ShipmentId,
        RequestedAt,
        RequestedBy,
        Weight,
        VerificationReason,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000009_create_domestic_transit_times_table {
    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000009_create_domestic_transit_times_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(GhcDomesticTransitTimes::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(GhcDomesticTransitTimes::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(GhcDomesticTransitTimes::MaxDaysTransitTime)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(GhcDomesticTransitTimes::WeightLbsLower)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(GhcDomesticTransitTimes::WeightLbsUpper)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(GhcDomesticTransitTimes::DistanceMilesLower)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(GhcDomesticTransitTimes::DistanceMilesUpper)
                                .integer()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(GhcDomesticTransitTimes::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum GhcDomesticTransitTimes {
        Table,
        Id,
        MaxDaysTransitTime,
        WeightLbsLower,
        WeightLbsUpper,
        DistanceMilesLower,
        DistanceMilesUpper,
    }
}
