//! Required delivery date (RDD) computation.
//!
//! RDD = scheduled pickup + table transit days, with a 10 day surcharge for
//! Alaska destinations and a further 10 days for remote Alaska postal codes.

use async_trait::async_trait;
use chrono::{Duration, NaiveDate};
use once_cell::sync::Lazy;
use sea_orm::{ColumnTrait, Condition, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::errors::ServiceError;
use crate::models::{address, domestic_transit_time};
use crate::repositories::LoadedShipment;

pub const ALASKA_SURCHARGE_DAYS: i64 = 10;
pub const REMOTE_ALASKA_SURCHARGE_DAYS: i64 = 10;

/// Alaska postal codes with no road connection to the rest of the state.
static REMOTE_ALASKA_ZIPS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "99801", "99802", "99803", "99811", "99812", "99820", "99821", "99824", "99825", "99826",
        "99827", "99829", "99830", "99832", "99833", "99835", "99836", "99840", "99841", "99850",
        "99901", "99903", "99918", "99919", "99921", "99922", "99923", "99925", "99926", "99927",
        "99928", "99929", "99950",
    ]
    .into_iter()
    .collect()
});

pub fn is_remote_alaska_zip(zip5: &str) -> bool {
    REMOTE_ALASKA_ZIPS.contains(zip5)
}

/// Route distance between two postal codes.
#[async_trait]
pub trait Planner: Send + Sync {
    async fn zip_transit_distance(
        &self,
        pickup_zip: &str,
        destination_zip: &str,
    ) -> Result<i32, ServiceError>;
}

/// Domestic transit-time table keyed by distance and weight bands.
#[async_trait]
pub trait TransitTimeLookup: Send + Sync {
    /// Maximum transit days for a shipment of `weight_lbs` over `distance_miles`.
    async fn max_transit_days(
        &self,
        txn: &DatabaseTransaction,
        distance_miles: i32,
        weight_lbs: i32,
    ) -> Result<i32, ServiceError>;
}

fn transit_time_not_found(distance_miles: i32, weight_lbs: i32) -> ServiceError {
    ServiceError::not_found(
        uuid::Uuid::nil(),
        format!(
            "failed to find transit time for shipment of {} lbs weight and {} mile distance",
            weight_lbs, distance_miles
        ),
    )
}

/// Reads `ghc_domestic_transit_times` inside the caller's transaction.
#[derive(Debug, Default, Clone, Copy)]
pub struct DbTransitTimeLookup;

#[async_trait]
impl TransitTimeLookup for DbTransitTimeLookup {
    async fn max_transit_days(
        &self,
        txn: &DatabaseTransaction,
        distance_miles: i32,
        weight_lbs: i32,
    ) -> Result<i32, ServiceError> {
        use domestic_transit_time::Column;

        // A zero upper bound leaves the band open. Overlapping bands resolve
        // to the one starting lowest, same as TransitTimeTable.
        let row = domestic_transit_time::Entity::find()
            .filter(Column::DistanceMilesLower.lte(distance_miles))
            .filter(
                Condition::any()
                    .add(Column::DistanceMilesUpper.eq(0))
                    .add(Column::DistanceMilesUpper.gte(distance_miles)),
            )
            .filter(Column::WeightLbsLower.lte(weight_lbs))
            .filter(
                Condition::any()
                    .add(Column::WeightLbsUpper.eq(0))
                    .add(Column::WeightLbsUpper.gte(weight_lbs)),
            )
            .order_by_asc(Column::DistanceMilesLower)
            .order_by_asc(Column::WeightLbsLower)
            .order_by_asc(Column::Id)
            .one(txn)
            .await
            .map_err(ServiceError::db_error)?;
        row.map(|row| row.max_days_transit_time)
            .ok_or_else(|| transit_time_not_found(distance_miles, weight_lbs))
    }
}

/// In-memory transit-time table.
#[derive(Debug, Clone, Default)]
pub struct TransitTimeTable {
    rows: Vec<domestic_transit_time::Model>,
}

impl TransitTimeTable {
    pub fn new(rows: Vec<domestic_transit_time::Model>) -> Self {
        Self { rows }
    }

    pub fn lookup(&self, distance_miles: i32, weight_lbs: i32) -> Result<i32, ServiceError> {
        self.rows
            .iter()
            .filter(|row| row.covers(distance_miles, weight_lbs))
            .min_by_key(|row| (row.distance_miles_lower, row.weight_lbs_lower, row.id))
            .map(|row| row.max_days_transit_time)
            .ok_or_else(|| transit_time_not_found(distance_miles, weight_lbs))
    }
}

#[async_trait]
impl TransitTimeLookup for TransitTimeTable {
    async fn max_transit_days(
        &self,
        _txn: &DatabaseTransaction,
        distance_miles: i32,
        weight_lbs: i32,
    ) -> Result<i32, ServiceError> {
        self.lookup(distance_miles, weight_lbs)
    }
}

/// Applies transit days and the Alaska surcharges to a pickup date.
pub fn required_delivery_date(
    pickup_date: NaiveDate,
    max_transit_days: i32,
    destination: &address::Model,
) -> NaiveDate {
    let mut days = i64::from(max_transit_days);
    if destination.is_alaska() {
        days += ALASKA_SURCHARGE_DAYS;
        if is_remote_alaska_zip(destination.zip5()) {
            days += REMOTE_ALASKA_SURCHARGE_DAYS;
        }
    }
    pickup_date + Duration::days(days)
}

pub struct RequiredDeliveryDateCalculator {
    planner: Arc<dyn Planner>,
    transit_times: Arc<dyn TransitTimeLookup>,
}

impl RequiredDeliveryDateCalculator {
    pub fn new(planner: Arc<dyn Planner>, transit_times: Arc<dyn TransitTimeLookup>) -> Self {
        Self {
            planner,
            transit_times,
        }
    }

    #[instrument(skip(self, txn, pickup, destination), fields(pickup = %pickup.postal_code, destination = %destination.postal_code))]
    pub async fn calculate(
        &self,
        txn: &DatabaseTransaction,
        pickup: &address::Model,
        destination: &address::Model,
        pickup_date: NaiveDate,
        weight_lbs: i32,
    ) -> Result<NaiveDate, ServiceError> {
        let distance = self
            .planner
            .zip_transit_distance(&pickup.postal_code, &destination.postal_code)
            .await?;
        let max_days = self
            .transit_times
            .max_transit_days(txn, distance, weight_lbs)
            .await
            .map_err(|e| {
                warn!("Transit time lookup failed: {}", e);
                e
            })?;
        let rdd = required_delivery_date(pickup_date, max_days, destination);
        debug!(distance, max_days, %rdd, "Computed required delivery date");
        Ok(rdd)
    }

    /// Computes and stores the RDD on a loaded shipment when it is still
    /// unset and the shipment has a scheduled pickup date, both endpoints and
    /// a planning weight. Returns the date that was stored, if any.
    pub async fn set_for_shipment(
        &self,
        txn: &DatabaseTransaction,
        loaded: &mut LoadedShipment,
    ) -> Result<Option<NaiveDate>, ServiceError> {
        let shipment = &loaded.shipment;
        if shipment.required_delivery_date.is_some() {
            return Ok(None);
        }
        let (Some(pickup_date), Some(weight)) =
            (shipment.scheduled_pickup_date, shipment.planning_weight())
        else {
            return Ok(None);
        };
        let Some((pickup, destination)) = endpoints(loaded)? else {
            return Ok(None);
        };

        let rdd = self
            .calculate(txn, pickup, destination, pickup_date, weight)
            .await?;
        loaded.shipment.required_delivery_date = Some(rdd);
        Ok(Some(rdd))
    }
}

/// Origin and destination used for planning.
///
/// Shipments going into storage deliver to the storage facility; shipments
/// coming out of storage are picked up there.
pub fn endpoints(
    loaded: &LoadedShipment,
) -> Result<Option<(&address::Model, &address::Model)>, ServiceError> {
    let shipment = &loaded.shipment;
    let facility_address = || {
        loaded
            .storage_facility
            .as_ref()
            .map(|f| &f.address)
            .ok_or_else(|| {
                ServiceError::conflict(
                    shipment.id,
                    format!(
                        "{} shipment {} is missing a storage facility",
                        shipment.shipment_type, shipment.id
                    ),
                )
            })
    };

    let (pickup, destination) = if shipment.is_nts() {
        (loaded.pickup_address.as_ref(), Some(facility_address()?))
    } else if shipment.is_nts_release() {
        (Some(facility_address()?), loaded.destination_address.as_ref())
    } else {
        (
            loaded.pickup_address.as_ref(),
            loaded.destination_address.as_ref(),
        )
    };
    Ok(pickup.zip(destination))
}
