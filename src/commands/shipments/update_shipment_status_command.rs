use crate::{
    commands::{Command, CommandContext},
    db,
    errors::{ConflictStatusError, ServiceError},
    events::Event,
    models::mto_shipment::{self, ShipmentStatus},
    repositories::{shipment_repository, LoadedShipment, ShipmentAssociations},
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uuid::Uuid;
use validator::Validate;

use super::{
    announce_move_status, create_shipment_service_items, load_for_update, refresh_move_weights,
    reroute_move,
};

/// Moves a shipment to `status` through the state machine.
///
/// Only the office-driven targets are reachable here: `Approved`, `Rejected`,
/// `CancellationRequested`, `Canceled` and `DiversionRequested`.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct UpdateShipmentStatusCommand {
    pub shipment_id: Uuid,

    pub status: ShipmentStatus,

    #[validate(length(max = 1000, message = "Rejection reason cannot exceed 1000 characters"))]
    pub rejection_reason: Option<String>,

    #[validate(length(max = 1000, message = "Diversion reason cannot exceed 1000 characters"))]
    pub diversion_reason: Option<String>,

    #[validate(length(min = 1, message = "eTag is required"))]
    pub etag: String,
}

#[async_trait::async_trait]
impl Command for UpdateShipmentStatusCommand {
    type Result = mto_shipment::Model;

    #[instrument(skip(self, ctx), fields(shipment_id = %self.shipment_id, status = %self.status))]
    async fn execute(&self, ctx: &CommandContext) -> Result<Self::Result, ServiceError> {
        shipment_repository::validate_model(self.shipment_id, self)?;

        let txn = db::begin(&ctx.db_pool).await?;
        let mut loaded = load_for_update(
            &txn,
            self.shipment_id,
            &self.etag,
            ShipmentAssociations::locations(),
        )
        .await?;

        let old_status = loaded.shipment.status;

        if self.status != ShipmentStatus::Rejected {
            loaded.shipment.rejection_reason = None;
        }
        self.transition(ctx, &mut loaded)?;

        let approved = loaded.shipment.status == ShipmentStatus::Approved;
        if approved {
            ctx.rdd_calculator()
                .set_for_shipment(&txn, &mut loaded)
                .await?;
        }

        loaded.shipment = shipment_repository::save_shipment(&txn, &loaded.shipment).await?;

        let authorized_weight = if approved {
            let created = create_shipment_service_items(ctx, &txn, &loaded, old_status).await?;
            debug!(service_items = created.len(), "Created service items on approval");
            refresh_move_weights(ctx, &txn, &loaded.shipment).await?
        } else {
            None
        };
        let move_status = reroute_move(ctx, &txn, &loaded.move_task_order).await?;

        db::commit(txn).await?;

        info!(
            "Shipment {} moved from {} to {}",
            loaded.id(),
            old_status,
            loaded.shipment.status
        );
        ctx.event_sender
            .send_or_log(Event::ShipmentStatusChanged {
                shipment_id: loaded.id(),
                old_status,
                new_status: loaded.shipment.status,
            })
            .await;
        if let Some(authorized_weight) = authorized_weight {
            ctx.event_sender
                .send_or_log(Event::AuthorizedWeightUpdated {
                    move_id: loaded.shipment.move_id,
                    authorized_weight,
                })
                .await;
        }
        announce_move_status(ctx, loaded.shipment.move_id, move_status).await;

        Ok(loaded.shipment)
    }
}

impl UpdateShipmentStatusCommand {
    fn transition(
        &self,
        ctx: &CommandContext,
        loaded: &mut LoadedShipment,
    ) -> Result<(), ServiceError> {
        let router = &ctx.shipment_router;
        let shipment = &mut loaded.shipment;
        match self.status {
            ShipmentStatus::CancellationRequested => router.request_cancellation(shipment),
            ShipmentStatus::Approved => router.approve(shipment, &loaded.move_task_order),
            ShipmentStatus::Canceled => router.cancel(shipment),
            ShipmentStatus::DiversionRequested => {
                router.request_diversion(shipment, self.diversion_reason.clone())
            }
            ShipmentStatus::Rejected => router.reject(shipment, self.rejection_reason.clone()),
            other => Err(ConflictStatusError {
                id: shipment.id,
                from: shipment.status,
                to: other,
                allowed_from: Vec::new(),
            }
            .into()),
        }
    }
}
