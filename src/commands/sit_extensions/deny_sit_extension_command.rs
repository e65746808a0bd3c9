use crate::{
    commands::{Command, CommandContext},
    db,
    errors::ServiceError,
    events::Event,
    models::{mto_shipment, sit_extension::SitExtensionStatus},
    repositories::shipment_repository,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use super::{load_pending_extension, record_decision, Decision};

/// Denies a pending extension. The shipment's SIT allowance is left as is.
#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct DenySitExtensionCommand {
    pub shipment_id: Uuid,

    pub sit_extension_id: Uuid,

    #[validate(length(max = 2000, message = "Remarks cannot exceed 2000 characters"))]
    pub office_remarks: Option<String>,

    #[validate(length(min = 1, message = "eTag is required"))]
    pub etag: String,
}

#[async_trait::async_trait]
impl Command for DenySitExtensionCommand {
    type Result = mto_shipment::Model;

    #[instrument(skip(self, ctx), fields(shipment_id = %self.shipment_id, sit_extension_id = %self.sit_extension_id))]
    async fn execute(&self, ctx: &CommandContext) -> Result<Self::Result, ServiceError> {
        shipment_repository::validate_model(self.sit_extension_id, self)?;

        let txn = db::begin(&ctx.db_pool).await?;
        let (shipment, extension) =
            load_pending_extension(&txn, self.shipment_id, self.sit_extension_id, &self.etag)
                .await?;

        record_decision(
            &txn,
            extension,
            Decision {
                status: SitExtensionStatus::Denied,
                approved_days: None,
                office_remarks: self.office_remarks.clone(),
            },
        )
        .await?;

        let move_task_order = ctx
            .move_router
            .approve_or_request_approval(&txn, shipment.move_id)
            .await?;

        db::commit(txn).await?;

        info!(move_status = %move_task_order.status, "SIT extension denied");
        ctx.event_sender
            .send_or_log(Event::SitExtensionDenied {
                shipment_id: shipment.id,
                sit_extension_id: self.sit_extension_id,
            })
            .await;
        ctx.event_sender
            .send_or_log(Event::MoveStatusChanged {
                move_id: move_task_order.id,
                new_status: move_task_order.status,
            })
            .await;

        Ok(shipment)
    }
}
