use crate::{
    commands::{Command, CommandContext},
    db,
    errors::ServiceError,
    etag,
    events::Event,
    models::mto_shipment,
    repositories::{shipment_repository, ShipmentAssociations},
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use super::load_for_update;

pub const TERMINATION_PREFIX: &str = "TERMINATED FOR CAUSE - ";

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct TerminateShipmentCommand {
    pub shipment_id: Uuid,

    #[validate(length(min = 1, message = "eTag is required"))]
    pub etag: String,

    #[validate(length(min = 1, max = 900, message = "Termination comments must be between 1 and 900 characters"))]
    pub termination_comments: String,
}

fn ensure_terminable(shipment: &mto_shipment::Model) -> Result<(), ServiceError> {
    if shipment.is_ppm() {
        return Err(ServiceError::conflict(
            shipment.id,
            "PPM shipments cannot be terminated for cause",
        ));
    }
    if let Some(picked_up) = shipment.actual_pickup_date {
        return Err(ServiceError::conflict(
            shipment.id,
            format!(
                "shipment {} was already picked up on {} and cannot be terminated",
                shipment.id, picked_up
            ),
        ));
    }
    Ok(())
}

#[async_trait::async_trait]
impl Command for TerminateShipmentCommand {
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

        ensure_terminable(&loaded.shipment)?;
        ctx.shipment_router.terminate(&mut loaded.shipment)?;
        let terminated_at = etag::now();
        loaded.shipment.terminated_at = Some(terminated_at);
        loaded.shipment.termination_comments =
            Some(format!("{}{}", TERMINATION_PREFIX, self.termination_comments));
        let shipment = shipment_repository::save_shipment(&txn, &loaded.shipment).await?;

        db::commit(txn).await?;

        info!("Shipment terminated for cause, shipment ID: {}", shipment.id);
        ctx.event_sender
            .send_or_log(Event::ShipmentTerminated {
                shipment_id: shipment.id,
                terminated_at,
            })
            .await;

        Ok(shipment)
    }
}
