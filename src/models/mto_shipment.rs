use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Shipment status enumeration
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ShipmentStatus {
    #[default]
    #[sea_orm(string_value = "DRAFT")]
    Draft,
    #[sea_orm(string_value = "SUBMITTED")]
    Submitted,
    #[sea_orm(string_value = "APPROVED")]
    Approved,
    #[sea_orm(string_value = "REJECTED")]
    Rejected,
    #[sea_orm(string_value = "CANCELLATION_REQUESTED")]
    CancellationRequested,
    #[sea_orm(string_value = "CANCELED")]
    Canceled,
    #[sea_orm(string_value = "DIVERSION_REQUESTED")]
    DiversionRequested,
    #[sea_orm(string_value = "APPROVALS_REQUESTED")]
    ApprovalsRequested,
    #[sea_orm(string_value = "TERMINATED_FOR_CAUSE")]
    TerminatedForCause,
}

/// Kind of goods movement a shipment represents.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum ShipmentType {
    #[sea_orm(string_value = "HHG")]
    #[strum(serialize = "HHG")]
    Hhg,
    #[sea_orm(string_value = "HHG_INTO_NTS")]
    #[strum(serialize = "HHG_INTO_NTS")]
    HhgIntoNts,
    #[sea_orm(string_value = "HHG_OUTOF_NTS")]
    #[strum(serialize = "HHG_OUTOF_NTS")]
    HhgOutOfNts,
    #[sea_orm(string_value = "MOBILE_HOME")]
    #[strum(serialize = "MOBILE_HOME")]
    MobileHome,
    #[sea_orm(string_value = "BOAT_HAUL_AWAY")]
    #[strum(serialize = "BOAT_HAUL_AWAY")]
    BoatHaulAway,
    #[sea_orm(string_value = "BOAT_TOW_AWAY")]
    #[strum(serialize = "BOAT_TOW_AWAY")]
    BoatTowAway,
    #[sea_orm(string_value = "PPM")]
    #[strum(serialize = "PPM")]
    Ppm,
    #[sea_orm(string_value = "UNACCOMPANIED_BAGGAGE")]
    #[strum(serialize = "UNACCOMPANIED_BAGGAGE")]
    UnaccompaniedBaggage,
}

/// Domestic (`d`) or international (`i`) pricing market.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(1))")]
pub enum MarketCode {
    #[default]
    #[sea_orm(string_value = "d")]
    #[strum(serialize = "d")]
    Domestic,
    #[sea_orm(string_value = "i")]
    #[strum(serialize = "i")]
    International,
}

/// The `mto_shipments` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, Validate)]
#[sea_orm(table_name = "mto_shipments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub move_id: Uuid,

    pub shipment_type: ShipmentType,

    pub status: ShipmentStatus,

    pub market_code: MarketCode,

    pub pickup_address_id: Option<Uuid>,
    pub destination_address_id: Option<Uuid>,
    pub secondary_pickup_address_id: Option<Uuid>,
    pub secondary_destination_address_id: Option<Uuid>,
    pub tertiary_pickup_address_id: Option<Uuid>,
    pub tertiary_destination_address_id: Option<Uuid>,
    pub storage_facility_id: Option<Uuid>,

    pub requested_pickup_date: Option<NaiveDate>,
    pub scheduled_pickup_date: Option<NaiveDate>,
    pub actual_pickup_date: Option<NaiveDate>,
    pub first_available_delivery_date: Option<NaiveDate>,
    /// Written once, when the shipment is first approved with enough data.
    pub required_delivery_date: Option<NaiveDate>,

    #[validate(range(min = 0, message = "Weight cannot be negative"))]
    pub prime_estimated_weight: Option<i32>,
    #[validate(range(min = 0, message = "Weight cannot be negative"))]
    pub prime_actual_weight: Option<i32>,
    #[validate(range(min = 0, message = "Weight cannot be negative"))]
    pub nts_recorded_weight: Option<i32>,
    #[validate(range(min = 0, message = "Weight cannot be negative"))]
    pub billable_weight_cap: Option<i32>,

    #[validate(range(min = 0, message = "SIT allowance cannot be negative"))]
    pub sit_days_allowance: Option<i32>,

    pub approved_date: Option<DateTime<Utc>>,

    #[validate(length(max = 1000, message = "Rejection reason cannot exceed 1000 characters"))]
    pub rejection_reason: Option<String>,

    pub diversion: bool,
    pub diverted_from_shipment_id: Option<Uuid>,
    #[validate(length(max = 1000, message = "Diversion reason cannot exceed 1000 characters"))]
    pub diversion_reason: Option<String>,

    pub uses_external_vendor: bool,

    pub terminated_at: Option<DateTime<Utc>>,
    #[validate(length(max = 1000, message = "Termination comments cannot exceed 1000 characters"))]
    pub termination_comments: Option<String>,

    #[validate(length(max = 2000, message = "Remarks cannot exceed 2000 characters"))]
    pub counselor_remarks: Option<String>,
    #[validate(length(max = 2000, message = "Remarks cannot exceed 2000 characters"))]
    pub customer_remarks: Option<String>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::move_task_order::Entity",
        from = "Column::MoveId",
        to = "super::move_task_order::Column::Id",
        on_delete = "Cascade"
    )]
    Move,

    #[sea_orm(
        belongs_to = "super::address::Entity",
        from = "Column::PickupAddressId",
        to = "super::address::Column::Id"
    )]
    PickupAddress,

    #[sea_orm(
        belongs_to = "super::address::Entity",
        from = "Column::DestinationAddressId",
        to = "super::address::Column::Id"
    )]
    DestinationAddress,

    #[sea_orm(
        belongs_to = "super::storage_facility::Entity",
        from = "Column::StorageFacilityId",
        to = "super::storage_facility::Column::Id"
    )]
    StorageFacility,

    /// Back-reference only; the parent does not own its diversions.
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::DivertedFromShipmentId",
        to = "Column::Id"
    )]
    DivertedFrom,

    #[sea_orm(has_many = "super::mto_service_item::Entity")]
    ServiceItems,

    #[sea_orm(has_many = "super::sit_extension::Entity")]
    SitExtensions,

    #[sea_orm(has_many = "super::reweigh::Entity")]
    Reweighs,
}

impl Related<super::move_task_order::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Move.def()
    }
}

impl Related<super::storage_facility::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StorageFacility.def()
    }
}

impl Related<super::mto_service_item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ServiceItems.def()
    }
}

impl Related<super::sit_extension::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SitExtensions.def()
    }
}

impl Related<super::reweigh::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reweighs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn is_nts(&self) -> bool {
        self.shipment_type == ShipmentType::HhgIntoNts
    }

    pub fn is_nts_release(&self) -> bool {
        self.shipment_type == ShipmentType::HhgOutOfNts
    }

    pub fn is_ppm(&self) -> bool {
        self.shipment_type == ShipmentType::Ppm
    }

    pub fn is_international(&self) -> bool {
        self.market_code == MarketCode::International
    }

    /// Weight used for delivery-date planning and authorized-weight accounting.
    ///
    /// NTS-release shipments are weighed when they go into storage, so the
    /// recorded weight is preferred over the prime's estimate.
    pub fn planning_weight(&self) -> Option<i32> {
        if self.is_nts_release() {
            self.nts_recorded_weight.or(self.prime_estimated_weight)
        } else {
            self.prime_estimated_weight
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_renders_screaming_snake_case() {
        assert_eq!(ShipmentStatus::DiversionRequested.to_string(), "DIVERSION_REQUESTED");
        assert_eq!(ShipmentStatus::TerminatedForCause.to_string(), "TERMINATED_FOR_CAUSE");
        assert_eq!(ShipmentStatus::default(), ShipmentStatus::Draft);
    }

    #[test]
    fn shipment_type_renders_wire_code() {
        assert_eq!(ShipmentType::HhgOutOfNts.to_string(), "HHG_OUTOF_NTS");
        assert_eq!(ShipmentType::Hhg.to_string(), "HHG");
    }
}
