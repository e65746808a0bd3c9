use crate::{
    commands::{Command, CommandContext},
    db, etag,
    errors::ServiceError,
    events::Event,
    models::sit_extension::{self, SitExtensionRequestReason, SitExtensionStatus},
    repositories::shipment_repository,
};
use sea_orm::{ActiveModelTrait, IntoActiveModel};
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

/// The Prime asks for more storage days on a shipment.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct CreateSitExtensionCommand {
    pub shipment_id: Uuid,

    pub request_reason: SitExtensionRequestReason,

    #[validate(range(min = 1, message = "Requested days must be greater than zero"))]
    pub requested_days: i32,

    #[validate(length(max = 2000, message = "Remarks cannot exceed 2000 characters"))]
    pub contractor_remarks: Option<String>,
}

#[async_trait::async_trait]
impl Command for CreateSitExtensionCommand {
    type Result = sit_extension::Model;

    #[instrument(skip(self, ctx), fields(shipment_id = %self.shipment_id, requested_days = self.requested_days))]
    async fn execute(&self, ctx: &CommandContext) -> Result<Self::Result, ServiceError> {
        shipment_repository::validate_model(self.shipment_id, self)?;

        let txn = db::begin(&ctx.db_pool).await?;
        let shipment = shipment_repository::find_shipment(&txn, self.shipment_id).await?;

        let now = etag::now();
        let extension = sit_extension::Model {
            id: Uuid::new_v4(),
            shipment_id: shipment.id,
            request_reason: self.request_reason,
            contractor_remarks: self.contractor_remarks.clone(),
            requested_days: self.requested_days,
            approved_days: None,
            status: SitExtensionStatus::Pending,
            office_remarks: None,
            decision_date: None,
            created_at: now,
            updated_at: now,
        };
        let created = extension
            .into_active_model()
            .reset_all()
            .insert(&txn)
            .await
            .map_err(|e| {
                error!(
                    "Failed to create SIT extension for shipment {}: {}",
                    self.shipment_id, e
                );
                ServiceError::db_error(e)
            })?;

        let move_task_order = ctx
            .move_router
            .send_to_office_user(&txn, shipment.move_id)
            .await?;

        db::commit(txn).await?;

        info!(sit_extension_id = %created.id, "SIT extension requested");
        ctx.event_sender
            .send_or_log(Event::SitExtensionCreated {
                shipment_id: shipment.id,
                sit_extension_id: created.id,
            })
            .await;
        ctx.event_sender
            .send_or_log(Event::MoveStatusChanged {
                move_id: move_task_order.id,
                new_status: move_task_order.status,
            })
            .await;

        Ok(created)
    }
}
