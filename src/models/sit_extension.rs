use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SitExtensionStatus {
    #[sea_orm(string_value = "PENDING")]
    Pending,
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    #[sea_orm(string_value = "DENIED")]
    Denied,
}

/// Why the contractor asked for more storage days.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(48))")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SitExtensionRequestReason {
    #[sea_orm(string_value = "SERIOUS_ILLNESS_MEMBER")]
    SeriousIllnessMember,
    #[sea_orm(string_value = "SERIOUS_ILLNESS_DEPENDENT")]
    SeriousIllnessDependent,
    #[sea_orm(string_value = "IMPENDING_ASSIGNMENT")]
    ImpendingAssignment,
    #[sea_orm(string_value = "DIRECTED_TEMPORARY_DUTY")]
    DirectedTemporaryDuty,
    #[sea_orm(string_value = "NONAVAILABILITY_OF_CIVILIAN_HOUSING")]
    NonavailabilityOfCivilianHousing,
    #[sea_orm(string_value = "AWAITING_COMPLETION_OF_RESIDENCE")]
    AwaitingCompletionOfResidence,
    #[sea_orm(string_value = "OTHER")]
    Other,
}

/// The `sit_extensions` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "sit_extensions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub shipment_id: Uuid,

    pub request_reason: SitExtensionRequestReason,

    #[validate(length(max = 2000, message = "Remarks cannot exceed 2000 characters"))]
    pub contractor_remarks: Option<String>,

    #[validate(range(min = 1, message = "Requested days must be greater than zero"))]
    pub requested_days: i32,

    #[validate(range(min = 1, message = "Approved days must be greater than zero"))]
    pub approved_days: Option<i32>,

    pub status: SitExtensionStatus,

    #[validate(length(max = 2000, message = "Remarks cannot exceed 2000 characters"))]
    pub office_remarks: Option<String>,

    pub decision_date: Option<DateTime<Utc>>,

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
