use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ReweighRequester {
    #[sea_orm(string_value = "CUSTOMER")]
    Customer,
    #[sea_orm(string_value = "PRIME")]
    Prime,
    #[sea_orm(string_value = "SYSTEM")]
    System,
    #[sea_orm(string_value = "TOO")]
    Too,
}

/// A request to weigh a shipment again; at most one per shipment.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "reweighs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub shipment_id: Uuid,
    pub requested_at: DateTime<Utc>,
    pub requested_by: ReweighRequester,
    pub weight: Option<i32>,
    pub verification_reason: Option<String>,
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
