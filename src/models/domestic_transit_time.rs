use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One row of the domestic transit-time reference table.
///
/// A row matches a shipment when both its distance and its weight fall inside
/// the row's bounds. An upper bound of zero leaves that range open-ended.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "ghc_domestic_transit_times")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub max_days_transit_time: i32,
    pub weight_lbs_lower: i32,
    pub weight_lbs_upper: i32,
    pub distance_miles_lower: i32,
    pub distance_miles_upper: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn covers(&self, distance_miles: i32, weight_lbs: i32) -> bool {
        let distance_ok = self.distance_miles_lower <= distance_miles
            && (self.distance_miles_upper == 0 || self.distance_miles_upper >= distance_miles);
        let weight_ok = self.weight_lbs_lower <= weight_lbs
            && (self.weight_lbs_upper == 0 || self.weight_lbs_upper >= weight_lbs);
        distance_ok && weight_ok
    }
}
