//! Storage-in-transit day accounting for a shipment.

use chrono::{Duration, NaiveDate};
use sea_orm::ConnectionTrait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::models::mto_service_item::{self, ReServiceCode, ServiceItemStatus};
use crate::models::sit_extension;
use crate::repositories::shipment_repository::{self, ShipmentAssociations};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum SitLocation {
    Origin,
    Destination,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentSit {
    pub service_item_id: Uuid,
    pub location: SitLocation,
    pub days_in_sit: i32,
    pub sit_entry_date: NaiveDate,
    pub sit_departure_date: Option<NaiveDate>,
    /// Last day covered by the allowance; only known while still in storage.
    pub sit_allowance_end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitStatus {
    pub shipment_id: Uuid,
    pub total_sit_days_used: i32,
    /// Negative once the allowance has been overrun. `None` after departure.
    pub total_days_remaining: Option<i32>,
    pub current_sit: CurrentSit,
    pub past_sits: Vec<mto_service_item::Model>,
}

/// Whole days spent in storage by one service item as of `today`.
pub fn days_in_sit(item: &mto_service_item::Model, today: NaiveDate) -> i32 {
    let Some(entry) = item.sit_entry_date else {
        return 0;
    };
    let end = item.sit_departure_date.unwrap_or(today);
    (end - entry).num_days().max(0) as i32
}

/// Base entitlement days plus every approved extension.
pub fn calculate_allowance(base_days: Option<i32>, extensions: &[sit_extension::Model]) -> i32 {
    base_days.unwrap_or(0)
        + extensions
            .iter()
            .filter_map(|e| e.approved_days)
            .sum::<i32>()
}

fn is_counted(item: &mto_service_item::Model) -> bool {
    item.re_service_code.is_departure_sit()
        && item.status == ServiceItemStatus::Approved
        && item.sit_entry_date.is_some()
}

/// Derives the SIT status of a shipment from its service items.
///
/// Returns `None` when the shipment has no approved departure-SIT items.
pub fn calculate(
    shipment_id: Uuid,
    service_items: &[mto_service_item::Model],
    sit_days_allowance: i32,
    today: NaiveDate,
) -> Option<SitStatus> {
    let mut current: Option<&mto_service_item::Model> = None;
    let mut past_sits = Vec::new();
    let mut total_sit_days_used = 0;

    for item in service_items.iter().filter(|i| is_counted(i)) {
        match current {
            Some(latest) if item.sit_entry_date <= latest.sit_entry_date => {
                total_sit_days_used += days_in_sit(item, today);
                past_sits.push(item.clone());
            }
            Some(latest) => {
                total_sit_days_used += days_in_sit(latest, today);
                past_sits.push(latest.clone());
                current = Some(item);
            }
            None => current = Some(item),
        }
    }

    let current = current?;
    let days_in_current = days_in_sit(current, today);
    total_sit_days_used += days_in_current;

    let still_in_storage = current.sit_departure_date.is_none();
    let total_days_remaining = still_in_storage.then(|| sit_days_allowance - total_sit_days_used);
    let sit_allowance_end_date =
        total_days_remaining.map(|remaining| today + Duration::days(i64::from(remaining)));

    let location = if current.re_service_code == ReServiceCode::Dofsit {
        SitLocation::Origin
    } else {
        SitLocation::Destination
    };

    Some(SitStatus {
        shipment_id,
        total_sit_days_used,
        total_days_remaining,
        current_sit: CurrentSit {
            service_item_id: current.id,
            location,
            days_in_sit: days_in_current,
            // Counted items always carry an entry date.
            sit_entry_date: current.sit_entry_date.unwrap_or(today),
            sit_departure_date: current.sit_departure_date,
            sit_allowance_end_date,
        },
        past_sits,
    })
}

/// Loads a shipment and reports its SIT status.
///
/// Uses the shipment's own allowance when set, otherwise the entitlement's
/// base SIT days plus approved extensions.
pub async fn sit_status_for_shipment<C: ConnectionTrait>(
    conn: &C,
    shipment_id: Uuid,
    today: NaiveDate,
) -> Result<Option<SitStatus>, ServiceError> {
    let loaded = shipment_repository::load_shipment(
        conn,
        shipment_id,
        ShipmentAssociations {
            service_items: true,
            sit_extensions: true,
            ..ShipmentAssociations::default()
        },
    )
    .await?;

    let allowance = match loaded.shipment.sit_days_allowance {
        Some(days) => days,
        None => {
            let entitlement =
                shipment_repository::find_entitlement(conn, loaded.shipment.move_id).await?;
            calculate_allowance(entitlement.storage_in_transit, &loaded.sit_extensions)
        }
    };

    Ok(calculate(
        shipment_id,
        &loaded.service_items,
        allowance,
        today,
    ))
}
