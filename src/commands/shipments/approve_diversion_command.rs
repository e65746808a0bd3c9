use crate::{
    commands::{Command, CommandContext},
    db,
    errors::ServiceError,
    events::Event,
    models::mto_shipment,
    repositories::{shipment_repository, ShipmentAssociations},
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use super::{announce_move_status, load_for_update, reroute_move};

/// Approves a diversion shipment, which enters the system as `Submitted`.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct ApproveDiversionCommand {
    pub shipment_id: Uuid,

    #[validate(length(min = 1, message = "eTag is required"))]
    pub etag: String,
}

#[async_trait::async_trait]
impl Command for ApproveDiversionCommand {
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

        ctx.shipment_router.approve_diversion(&mut loaded.shipment)?;
        let shipment = shipment_repository::save_shipment(&txn, &loaded.shipment).await?;
        let move_status = reroute_move(ctx, &txn, &loaded.move_task_order).await?;

        db::commit(txn).await?;

        info!("Diversion approved for shipment ID: {}", shipment.id);
        ctx.event_sender
            .send_or_log(Event::ShipmentDiversionApproved {
                shipment_id: shipment.id,
            })
            .await;
        announce_move_status(ctx, shipment.move_id, move_status).await;

        Ok(shipment)
    }
}
