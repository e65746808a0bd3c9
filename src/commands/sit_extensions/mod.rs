pub mod approve_sit_extension_command;
pub mod create_sit_extension_command;
pub mod deny_sit_extension_command;

use sea_orm::{ActiveModelTrait, DatabaseTransaction, IntoActiveModel};
use tracing::error;
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::etag;
use crate::models::mto_shipment;
use crate::models::sit_extension::{self, SitExtensionStatus};
use crate::repositories::shipment_repository;

/// Fetches the shipment and a still-pending extension on it, checking the
/// shipment's eTag.
pub(crate) async fn load_pending_extension(
    txn: &DatabaseTransaction,
    shipment_id: Uuid,
    sit_extension_id: Uuid,
    supplied_etag: &str,
) -> Result<(mto_shipment::Model, sit_extension::Model), ServiceError> {
    let shipment = shipment_repository::find_shipment(txn, shipment_id).await?;
    let extension = shipment_repository::find_sit_extension(txn, sit_extension_id).await?;
    if extension.shipment_id != shipment.id {
        return Err(ServiceError::not_found(
            sit_extension_id,
            format!("while looking for SIT extension on shipment {}", shipment_id),
        ));
    }
    shipment_repository::check_etag(&shipment, supplied_etag)?;
    if extension.status != SitExtensionStatus::Pending {
        return Err(ServiceError::conflict(
            sit_extension_id,
            format!(
                "SIT extension {} was already {} and cannot be decided again",
                sit_extension_id, extension.status
            ),
        ));
    }
    Ok((shipment, extension))
}

/// An office decision on an extension, written as one update.
pub(crate) struct Decision {
    pub status: SitExtensionStatus,
    pub approved_days: Option<i32>,
    pub office_remarks: Option<String>,
}

pub(crate) async fn record_decision(
    txn: &DatabaseTransaction,
    extension: sit_extension::Model,
    decision: Decision,
) -> Result<sit_extension::Model, ServiceError> {
    let id = extension.id;
    let mut decided = extension;
    decided.status = decision.status;
    if decision.approved_days.is_some() {
        decided.approved_days = decision.approved_days;
    }
    if decision.office_remarks.is_some() {
        decided.office_remarks = decision.office_remarks;
    }
    let now = etag::next_timestamp(decided.updated_at);
    decided.decision_date = Some(now);
    decided.updated_at = now;
    shipment_repository::validate_model(id, &decided)?;

    decided
        .into_active_model()
        .reset_all()
        .update(txn)
        .await
        .map_err(|e| {
            error!("Failed to record decision on SIT extension {}: {}", id, e);
            ServiceError::db_error(e)
        })
}
