use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Status of the move as a whole.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum MoveStatus {
    #[sea_orm(string_value = "DRAFT")]
    #[strum(serialize = "DRAFT")]
    Draft,
    #[sea_orm(string_value = "SUBMITTED")]
    #[strum(serialize = "SUBMITTED")]
    Submitted,
    #[sea_orm(string_value = "NEEDS SERVICE COUNSELING")]
    #[strum(serialize = "NEEDS SERVICE COUNSELING")]
    NeedsServiceCounseling,
    #[sea_orm(string_value = "SERVICE COUNSELING COMPLETED")]
    #[strum(serialize = "SERVICE COUNSELING COMPLETED")]
    ServiceCounselingCompleted,
    #[sea_orm(string_value = "APPROVED")]
    #[strum(serialize = "APPROVED")]
    Approved,
    #[sea_orm(string_value = "APPROVALS REQUESTED")]
    #[strum(serialize = "APPROVALS REQUESTED")]
    ApprovalsRequested,
    #[sea_orm(string_value = "CANCELED")]
    #[strum(serialize = "CANCELED")]
    Canceled,
}

/// The `moves` table: the aggregate that owns shipments.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "moves")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Short human-facing move code.
    pub locator: String,

    pub status: MoveStatus,

    /// Set once the move has been released to the prime contractor.
    pub available_to_prime_at: Option<DateTime<Utc>>,

    /// Hidden moves are never visible to the prime.
    pub show: bool,

    pub approved_at: Option<DateTime<Utc>>,
    pub approvals_requested_at: Option<DateTime<Utc>>,
    pub excess_weight_qualified_at: Option<DateTime<Utc>>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::mto_shipment::Entity")]
    Shipments,
    #[sea_orm(has_one = "super::entitlement::Entity")]
    Entitlement,
}

impl Related<super::mto_shipment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shipments.def()
    }
}

impl Related<super::entitlement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Entitlement.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// Whether the prime contractor may see and act on this move.
    pub fn is_available_to_prime(&self) -> bool {
        self.show && self.available_to_prime_at.is_some()
    }
}
