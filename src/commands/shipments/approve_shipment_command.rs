use crate::{
    commands::{Command, CommandContext},
    db,
    errors::ServiceError,
    events::{Event, EventSender},
    models::mto_shipment,
    repositories::{shipment_repository, ShipmentAssociations},
};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

use super::{
    announce_move_status, create_shipment_service_items, refresh_move_weights, reroute_move,
};

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct ApproveShipmentCommand {
    pub shipment_id: Uuid,

    #[validate(length(min = 1, message = "eTag is required"))]
    pub etag: String,
}

impl ApproveShipmentCommand {
    pub fn new(shipment_id: Uuid, etag: impl Into<String>) -> Self {
        Self {
            shipment_id,
            etag: etag.into(),
        }
    }
}

#[async_trait::async_trait]
impl Command for ApproveShipmentCommand {
    type Result = mto_shipment::Model;

    #[instrument(skip(self, ctx), fields(shipment_id = %self.shipment_id))]
    async fn execute(&self, ctx: &CommandContext) -> Result<Self::Result, ServiceError> {
        shipment_repository::validate_model(self.shipment_id, self)?;

        let txn = db::begin(&ctx.db_pool).await?;

        let mut loaded = shipment_repository::load_shipment(
            &txn,
            self.shipment_id,
            ShipmentAssociations::locations(),
        )
        .await?;
        if loaded.shipment.uses_external_vendor {
            error!(
                "Refusing to approve shipment {} handled by an external vendor",
                self.shipment_id
            );
            return Err(ServiceError::conflict(
                self.shipment_id,
                "cannot approve a shipment if it uses an external vendor",
            ));
        }
        shipment_repository::check_etag(&loaded.shipment, &self.etag)?;
        let previous_status = loaded.shipment.status;

        ctx.shipment_router
            .approve(&mut loaded.shipment, &loaded.move_task_order)?;
        ctx.rdd_calculator()
            .set_for_shipment(&txn, &mut loaded)
            .await?;
        loaded.shipment = shipment_repository::save_shipment(&txn, &loaded.shipment).await?;

        let authorized_weight = refresh_move_weights(ctx, &txn, &loaded.shipment).await?;
        let service_items =
            create_shipment_service_items(ctx, &txn, &loaded, previous_status).await?;
        let move_status = reroute_move(ctx, &txn, &loaded.move_task_order).await?;

        db::commit(txn).await?;

        info!(
            service_items = service_items.len(),
            required_delivery_date = ?loaded.shipment.required_delivery_date,
            "Shipment approved"
        );
        self.trigger_events(&ctx.event_sender, &loaded.shipment, authorized_weight)
            .await;
        announce_move_status(ctx, loaded.shipment.move_id, move_status).await;

        Ok(loaded.shipment)
    }
}

impl ApproveShipmentCommand {
    async fn trigger_events(
        &self,
        event_sender: &EventSender,
        shipment: &mto_shipment::Model,
        authorized_weight: Option<i32>,
    ) {
        event_sender
            .send_or_log(Event::ShipmentApproved {
                shipment_id: shipment.id,
                move_id: shipment.move_id,
                required_delivery_date: shipment.required_delivery_date,
            })
            .await;
        if let Some(authorized_weight) = authorized_weight {
            event_sender
                .send_or_log(Event::AuthorizedWeightUpdated {
                    move_id: shipment.move_id,
                    authorized_weight,
                })
                .await;
        }
    }
}

