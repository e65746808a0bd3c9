//! Shipment-level service items generated when a shipment is approved.

use std::sync::Arc;

use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseTransaction, IntoActiveModel};
use tracing::{debug, error};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::etag;
use crate::models::address;
use crate::models::mto_service_item::{self, ReServiceCode, ServiceItemStatus};
use crate::models::mto_shipment::{self, ShipmentType};
use crate::repositories::LoadedShipment;

use ReServiceCode::*;

/// Items every domestic full-service shipment gets besides packing.
const DOMESTIC_BASE: [ReServiceCode; 4] = [Dlh, Fsc, Dop, Ddp];

/// Reservice codes for a domestic shipment of the given type.
///
/// HHG moves within one three-digit zip area are priced as shorthaul
/// (DSH) instead of linehaul (DLH).
pub fn domestic_service_codes(
    shipment_type: ShipmentType,
    pickup: Option<&address::Model>,
    destination: Option<&address::Model>,
) -> Vec<ReServiceCode> {
    match shipment_type {
        ShipmentType::Hhg => {
            let same_zip3 = match (pickup, destination) {
                (Some(p), Some(d)) => p.zip3() == d.zip3(),
                _ => false,
            };
            let haul = if same_zip3 { Dsh } else { Dlh };
            vec![haul, Fsc, Dop, Ddp, Dpk, Dupk]
        }
        ShipmentType::HhgIntoNts => with_base(Dnpk),
        ShipmentType::HhgOutOfNts => with_base(Dupk),
        ShipmentType::MobileHome => with_base(Dmhf),
        ShipmentType::BoatHaulAway => with_base(Dbhf),
        ShipmentType::BoatTowAway => with_base(Dbtf),
        ShipmentType::Ppm | ShipmentType::UnaccompaniedBaggage => Vec::new(),
    }
}

fn with_base(extra: ReServiceCode) -> Vec<ReServiceCode> {
    let mut codes = DOMESTIC_BASE.to_vec();
    codes.push(extra);
    codes
}

/// Reservice codes auto-approved for an international shipment.
pub const INTERNATIONAL_CODES: [ReServiceCode; 4] = [Islh, Ihpk, Ihupk, Poefsc];

/// An approved, shipment-level service item ready to insert.
pub fn approved_item(shipment: &mto_shipment::Model, code: ReServiceCode) -> mto_service_item::Model {
    let now = etag::now();
    mto_service_item::Model {
        id: Uuid::new_v4(),
        move_id: shipment.move_id,
        shipment_id: Some(shipment.id),
        re_service_code: code,
        status: ServiceItemStatus::Approved,
        sit_entry_date: None,
        sit_departure_date: None,
        approved_at: Some(now),
        rejected_at: None,
        reason: None,
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
pub trait ServiceItemCreator: Send + Sync {
    async fn create_service_item(
        &self,
        txn: &DatabaseTransaction,
        item: mto_service_item::Model,
    ) -> Result<mto_service_item::Model, ServiceError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DbServiceItemCreator;

#[async_trait]
impl ServiceItemCreator for DbServiceItemCreator {
    async fn create_service_item(
        &self,
        txn: &DatabaseTransaction,
        item: mto_service_item::Model,
    ) -> Result<mto_service_item::Model, ServiceError> {
        if item.shipment_id.is_none() && item.re_service_code.is_departure_sit() {
            return Err(ServiceError::conflict(
                item.id,
                "SIT service items must belong to a shipment",
            ));
        }
        let id = item.id;
        item.into_active_model()
            .reset_all()
            .insert(txn)
            .await
            .map_err(|e| {
                error!("Failed to create service item {}: {}", id, e);
                ServiceError::db_error(e)
            })
    }
}

/// Creates the approved items for an international shipment.
#[async_trait]
pub trait InternationalServiceItems: Send + Sync {
    async fn create_approved_service_items(
        &self,
        txn: &DatabaseTransaction,
        shipment: &mto_shipment::Model,
    ) -> Result<Vec<mto_service_item::Model>, ServiceError>;
}

/// Inserts the fixed international item set through a [`ServiceItemCreator`].
#[derive(Clone)]
pub struct DbInternationalServiceItems {
    creator: Arc<dyn ServiceItemCreator>,
}

impl DbInternationalServiceItems {
    pub fn new(creator: Arc<dyn ServiceItemCreator>) -> Self {
        Self { creator }
    }
}

impl Default for DbInternationalServiceItems {
    fn default() -> Self {
        Self::new(Arc::new(DbServiceItemCreator))
    }
}

#[async_trait]
impl InternationalServiceItems for DbInternationalServiceItems {
    async fn create_approved_service_items(
        &self,
        txn: &DatabaseTransaction,
        shipment: &mto_shipment::Model,
    ) -> Result<Vec<mto_service_item::Model>, ServiceError> {
        let mut created = Vec::with_capacity(INTERNATIONAL_CODES.len());
        for code in INTERNATIONAL_CODES {
            created.push(
                self.creator
                    .create_service_item(txn, approved_item(shipment, code))
                    .await?,
            );
        }
        Ok(created)
    }
}

/// Inserts the domestic item set for a shipment that was just approved.
pub async fn create_domestic_service_items(
    creator: &dyn ServiceItemCreator,
    txn: &DatabaseTransaction,
    loaded: &LoadedShipment,
) -> Result<Vec<mto_service_item::Model>, ServiceError> {
    let shipment = &loaded.shipment;
    let codes = domestic_service_codes(
        shipment.shipment_type,
        loaded.pickup_address.as_ref(),
        loaded.destination_address.as_ref(),
    );
    debug!(shipment_id = %shipment.id, ?codes, "Creating domestic service items");

    let mut created = Vec::with_capacity(codes.len());
    for code in codes {
        created.push(
            creator
                .create_service_item(txn, approved_item(shipment, code))
                .await?,
        );
    }
    Ok(created)
}
