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

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct ApproveSitExtensionCommand {
    pub shipment_id: Uuid,

    pub sit_extension_id: Uuid,

    #[validate(range(min = 1, message = "Approved days must be greater than zero"))]
    pub approved_days: i32,

    #[validate(length(max = 2000, message = "Remarks cannot exceed 2000 characters"))]
    pub office_remarks: Option<String>,

    #[validate(length(min = 1, message = "eTag is required"))]
    pub etag: String,
}

/// Allowance after granting `approved_days` more.
pub fn extended_allowance(current: Option<i32>, approved_days: i32) -> i32 {
    current.map_or(approved_days, |days| days + approved_days)
}

#[async_trait::async_trait]
impl Command for ApproveSitExtensionCommand {
    type Result = mto_shipment::Model;

    #[instrument(skip(self, ctx), fields(shipment_id = %self.shipment_id, sit_extension_id = %self.sit_extension_id))]
    async fn execute(&self, ctx: &CommandContext) -> Result<Self::Result, ServiceError> {
        shipment_repository::validate_model(self.sit_extension_id, self)?;

        let txn = db::begin(&ctx.db_pool).await?;
        let (mut shipment, extension) =
            load_pending_extension(&txn, self.shipment_id, self.sit_extension_id, &self.etag)
                .await?;

        record_decision(
            &txn,
            extension,
            Decision {
                status: SitExtensionStatus::Approved,
                approved_days: Some(self.approved_days),
                office_remarks: self.office_remarks.clone(),
            },
        )
        .await?;

        let previous_allowance = shipment.sit_days_allowance;
        shipment.sit_days_allowance =
            Some(extended_allowance(previous_allowance, self.approved_days));
        let shipment = shipment_repository::save_shipment(&txn, &shipment).await?;

        let move_task_order = ctx
            .move_router
            .approve_or_request_approval(&txn, shipment.move_id)
            .await?;

        db::commit(txn).await?;

        info!(
            previous_allowance = ?previous_allowance,
            sit_days_allowance = ?shipment.sit_days_allowance,
            move_status = %move_task_order.status,
            "SIT extension approved"
        );
        ctx.event_sender
            .send_or_log(Event::SitExtensionApproved {
                shipment_id: shipment.id,
                sit_extension_id: self.sit_extension_id,
                approved_days: self.approved_days,
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
