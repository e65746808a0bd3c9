use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Billable service codes this crate creates or inspects.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[strum(serialize_all = "UPPERCASE")]
pub enum ReServiceCode {
    /// Domestic linehaul
    #[sea_orm(string_value = "DLH")]
    Dlh,
    /// Domestic shorthaul
    #[sea_orm(string_value = "DSH")]
    Dsh,
    /// Fuel surcharge
    #[sea_orm(string_value = "FSC")]
    Fsc,
    /// Domestic origin price
    #[sea_orm(string_value = "DOP")]
    Dop,
    /// Domestic destination price
    #[sea_orm(string_value = "DDP")]
    Ddp,
    /// Domestic packing
    #[sea_orm(string_value = "DPK")]
    Dpk,
    /// Domestic unpacking
    #[sea_orm(string_value = "DUPK")]
    Dupk,
    /// Domestic NTS packing
    #[sea_orm(string_value = "DNPK")]
    Dnpk,
    /// Domestic mobile home factor
    #[sea_orm(string_value = "DMHF")]
    Dmhf,
    /// Domestic haul-away boat factor
    #[sea_orm(string_value = "DBHF")]
    Dbhf,
    /// Domestic tow-away boat factor
    #[sea_orm(string_value = "DBTF")]
    Dbtf,
    /// Domestic origin first day SIT
    #[sea_orm(string_value = "DOFSIT")]
    Dofsit,
    /// Domestic origin additional days SIT
    #[sea_orm(string_value = "DOASIT")]
    Doasit,
    /// Domestic destination first day SIT
    #[sea_orm(string_value = "DDFSIT")]
    Ddfsit,
    /// Domestic destination additional days SIT
    #[sea_orm(string_value = "DDASIT")]
    Ddasit,
    /// International shipping and linehaul
    #[sea_orm(string_value = "ISLH")]
    Islh,
    /// International HHG pack
    #[sea_orm(string_value = "IHPK")]
    Ihpk,
    /// International HHG unpack
    #[sea_orm(string_value = "IHUPK")]
    Ihupk,
    /// International port of embarkation fuel surcharge
    #[sea_orm(string_value = "POEFSC")]
    Poefsc,
    /// International port of debarkation fuel surcharge
    #[sea_orm(string_value = "PODFSC")]
    Podfsc,
}

impl ReServiceCode {
    /// First-day SIT codes; the only ones that carry departure dates.
    pub fn is_departure_sit(self) -> bool {
        matches!(self, ReServiceCode::Dofsit | ReServiceCode::Ddfsit)
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceItemStatus {
    #[sea_orm(string_value = "SUBMITTED")]
    Submitted,
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
}

/// The `mto_service_items` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "mto_service_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub move_id: Uuid,
    pub shipment_id: Option<Uuid>,
    pub re_service_code: ReServiceCode,
    pub status: ServiceItemStatus,
    pub sit_entry_date: Option<NaiveDate>,
    pub sit_departure_date: Option<NaiveDate>,
    pub approved_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::mto_shipment::Entity",
        from = "Column::ShipmentId",
        to = "super::mto_shipment::Column::Id",
        on_delete = "Cascade"
    )]
    Shipment,
}

impl Related<super::mto_shipment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shipment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
