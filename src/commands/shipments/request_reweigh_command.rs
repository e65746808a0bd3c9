use crate::{
    commands::{Command, CommandContext},
    db,
    errors::ServiceError,
    etag,
    events::Event,
    models::reweigh::{self, ReweighRequester},
    repositories::{shipment_repository, ShipmentAssociations},
    services::validation::ValidationChain,
};
use sea_orm::{ActiveModelTrait, ActiveValue::Set};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

use super::load_for_update;

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct RequestReweighCommand {
    pub shipment_id: Uuid,

    #[validate(length(min = 1, message = "eTag is required"))]
    pub etag: String,

    pub requested_by: ReweighRequester,
}

#[async_trait::async_trait]
impl Command for RequestReweighCommand {
    type Result = reweigh::Model;

    #[instrument(skip(self, ctx), fields(shipment_id = %self.shipment_id, requested_by = %self.requested_by))]
    async fn execute(&self, ctx: &CommandContext) -> Result<Self::Result, ServiceError> {
        shipment_repository::validate_model(self.shipment_id, self)?;

        let txn = db::begin(&ctx.db_pool).await?;
        let loaded = load_for_update(
            &txn,
            self.shipment_id,
            &self.etag,
            ShipmentAssociations::default(),
        )
        .await?;

        ValidationChain::reweigh()
            .validate(&txn, &loaded.shipment, &loaded)
            .await?;

        let now = etag::now();
        let created = reweigh::ActiveModel {
            id: Set(Uuid::new_v4()),
            shipment_id: Set(self.shipment_id),
            requested_at: Set(now),
            requested_by: Set(self.requested_by),
            weight: Set(None),
            verification_reason: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            error!("Failed to create reweigh for shipment {}: {}", self.shipment_id, e);
            ServiceError::db_error(e)
        })?;

        db::commit(txn).await?;

        info!("Reweigh requested for shipment ID: {}", self.shipment_id);
        ctx.event_sender
            .send_or_log(Event::ReweighRequested {
                shipment_id: self.shipment_id,
                reweigh_id: created.id,
            })
            .await;

        Ok(created)
    }
}
