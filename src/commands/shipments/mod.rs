pub mod approve_diversion_command;
pub mod approve_shipment_command;
pub mod cancel_shipment_command;
pub mod reject_shipment_command;
pub mod request_cancellation_command;
pub mod request_diversion_command;
pub mod request_reweigh_command;
pub mod terminate_shipment_command;
pub mod update_shipment_command;
pub mod update_shipment_status_command;

use sea_orm::DatabaseTransaction;
use tracing::{debug, error};
use uuid::Uuid;

use crate::commands::CommandContext;
use crate::errors::ServiceError;
use crate::events::Event;
use crate::models::move_task_order::{self, MoveStatus};
use crate::models::mto_service_item;
use crate::models::mto_shipment::{self, ShipmentStatus};
use crate::repositories::shipment_repository;
use crate::repositories::{LoadedShipment, ShipmentAssociations};
use crate::services::service_items;

/// Loads a shipment for a mutating command and checks the caller's eTag.
pub(crate) async fn load_for_update(
    txn: &DatabaseTransaction,
    shipment_id: Uuid,
    etag: &str,
    associations: ShipmentAssociations,
) -> Result<LoadedShipment, ServiceError> {
    let loaded = shipment_repository::load_shipment(txn, shipment_id, associations).await?;
    shipment_repository::check_etag(&loaded.shipment, etag).map_err(|e| {
        debug!(shipment_id = %shipment_id, "Stale eTag supplied");
        e
    })?;
    Ok(loaded)
}

/// Creates the shipment-level service items when a shipment is approved for
/// the first time.
///
/// Only a shipment coming straight from `Submitted` gets items, and never one
/// that already has some. International shipments go through the
/// international collaborator; every other shipment gets the fixed domestic
/// set for its type.
pub(crate) async fn create_shipment_service_items(
    ctx: &CommandContext,
    txn: &DatabaseTransaction,
    loaded: &LoadedShipment,
    previous_status: ShipmentStatus,
) -> Result<Vec<mto_service_item::Model>, ServiceError> {
    if previous_status != ShipmentStatus::Submitted {
        return Ok(Vec::new());
    }
    let existing = shipment_repository::count_service_items(txn, loaded.id()).await?;
    if existing > 0 {
        debug!(existing, "Shipment already has service items");
        return Ok(Vec::new());
    }

    let created = if loaded.shipment.is_international() {
        ctx.international_service_items()
            .create_approved_service_items(txn, &loaded.shipment)
            .await
    } else {
        service_items::create_domestic_service_items(
            ctx.service_item_creator.as_ref(),
            txn,
            loaded,
        )
        .await
    };
    created.map_err(|e| {
        error!(
            "Failed to create service items for shipment {}: {}",
            loaded.id(),
            e
        );
        e
    })
}

/// Recomputes the move's authorized weight and excess-weight flag after a
/// shipment's weights start counting.
///
/// Returns the new authorized weight, or `None` when the shipment has no
/// planning weight yet.
pub(crate) async fn refresh_move_weights(
    ctx: &CommandContext,
    txn: &DatabaseTransaction,
    shipment: &mto_shipment::Model,
) -> Result<Option<i32>, ServiceError> {
    if shipment.planning_weight().is_none() {
        return Ok(None);
    }
    let entitlement = ctx.authorized_weight().recalculate(txn, shipment).await?;
    ctx.move_weights
        .check_excess_weight(txn, shipment.move_id, shipment)
        .await?;
    Ok(entitlement.db_authorized_weight)
}

/// Re-derives the move's status once a shipment transition is saved.
///
/// Moves that are not yet (or no longer) in office review are left alone.
/// Returns the new status when it changed.
pub(crate) async fn reroute_move(
    ctx: &CommandContext,
    txn: &DatabaseTransaction,
    move_task_order: &move_task_order::Model,
) -> Result<Option<MoveStatus>, ServiceError> {
    if !matches!(
        move_task_order.status,
        MoveStatus::Approved | MoveStatus::ApprovalsRequested
    ) {
        return Ok(None);
    }
    let updated = ctx
        .move_router
        .approve_or_request_approval(txn, move_task_order.id)
        .await?;
    Ok((updated.status != move_task_order.status).then_some(updated.status))
}

/// Emits `MoveStatusChanged` when [`reroute_move`] changed the move.
pub(crate) async fn announce_move_status(
    ctx: &CommandContext,
    move_id: Uuid,
    new_status: Option<MoveStatus>,
) {
    if let Some(new_status) = new_status {
        ctx.event_sender
            .send_or_log(Event::MoveStatusChanged {
                move_id,
                new_status,
            })
            .await;
    }
}
