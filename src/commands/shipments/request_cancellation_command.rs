use crate::{
    commands::{Command, CommandContext},
    db,
    errors::ServiceError,
    events::Event,
    models::mto_shipment,
    repositories::{shipment_repository, ShipmentAssociations},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use super::{announce_move_status, load_for_update, reroute_move};

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct RequestCancellationCommand {
    pub shipment_id: Uuid,

    #[validate(length(min = 1, message = "eTag is required"))]
    pub etag: String,
}

/// Cancellation has to be requested before the goods are picked up.
fn ensure_before_pickup(
    shipment: &mto_shipment::Model,
    today: NaiveDate,
) -> Result<(), ServiceError> {
    match shipment.actual_pickup_date {
        Some(picked_up) if today >= picked_up => {
            warn!(
                shipment_id = %shipment.id,
                %picked_up,
                "Cancellation requested on or after the actual pickup date"
            );
            Err(ServiceError::conflict(
                shipment.id,
                format!(
                    "cannot request cancellation of shipment {} on or after its actual pickup date {}",
                    shipment.id, picked_up
                ),
            ))
        }
        _ => Ok(()),
    }
}

#[async_trait::async_trait]
impl Command for RequestCancellationCommand {
    type Result = mto_shipment::Model;

    #[instrument(skip(self, ctx), fields(shipment_id = %self.shipment_id))]
    async fn execute(&self, ctx: &CommandContext) -> Result<Self::Result, ServiceError> {
        shipment_repository::validate_model(self.shipment_id, self)?;

        let txn = db::begin(&ctx.db_pool).await?;
        let mut loaded = load_for_update(
            &txn,
            self.shipment_id,
            &self.etag,
            ShipmentAssociations::default(),
        )
        .await?;

        ensure_before_pickup(&loaded.shipment, ctx.today())?;
        ctx.shipment_router
            .request_cancellation(&mut loaded.shipment)?;
        let shipment = shipment_repository::save_shipment(&txn, &loaded.shipment).await?;
        let move_status = reroute_move(ctx, &txn, &loaded.move_task_order).await?;

        db::commit(txn).await?;

        info!("Cancellation requested for shipment ID: {}", shipment.id);
        ctx.event_sender
            .send_or_log(Event::ShipmentCancellationRequested {
                shipment_id: shipment.id,
            })
            .await;
        announce_move_status(ctx, shipment.move_id, move_status).await;

        Ok(shipment)
    }
}
