//! Re-derives a move's status after one of its shipments or SIT extensions changes.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, Set,
};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::etag;
use crate::models::move_task_order::{self, MoveStatus};
use crate::models::mto_service_item::{self, ServiceItemStatus};
use crate::models::mto_shipment::ShipmentStatus;
use crate::models::sit_extension::{self, SitExtensionStatus};
use crate::repositories::shipment_repository;

/// Shipment statuses that still need an office decision.
pub const AWAITING_REVIEW: &[ShipmentStatus] = &[
    ShipmentStatus::Submitted,
    ShipmentStatus::ApprovalsRequested,
    ShipmentStatus::DiversionRequested,
];

#[async_trait]
pub trait MoveRouter: Send + Sync {
    /// Moves the move to `Approved` when nothing is waiting on the office,
    /// otherwise to `ApprovalsRequested`.
    async fn approve_or_request_approval(
        &self,
        txn: &DatabaseTransaction,
        move_id: Uuid,
    ) -> Result<move_task_order::Model, ServiceError>;

    /// Flags the move for office review.
    async fn send_to_office_user(
        &self,
        txn: &DatabaseTransaction,
        move_id: Uuid,
    ) -> Result<move_task_order::Model, ServiceError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct DbMoveRouter;

impl DbMoveRouter {
    /// True when a shipment, SIT extension or service item on the move is
    /// waiting for an office decision.
    pub async fn has_pending_reviews(
        &self,
        txn: &DatabaseTransaction,
        move_id: Uuid,
    ) -> Result<bool, ServiceError> {
        let shipments = shipment_repository::shipments_for_move(txn, move_id).await?;
        if shipments.iter().any(|s| AWAITING_REVIEW.contains(&s.status)) {
            return Ok(true);
        }

        let shipment_ids: Vec<Uuid> = shipments.iter().map(|s| s.id).collect();
        let pending_extensions = sit_extension::Entity::find()
            .filter(sit_extension::Column::ShipmentId.is_in(shipment_ids))
            .filter(sit_extension::Column::Status.eq(SitExtensionStatus::Pending))
            .count(txn)
            .await
            .map_err(ServiceError::db_error)?;
        if pending_extensions > 0 {
            return Ok(true);
        }

        let unreviewed_items = mto_service_item::Entity::find()
            .filter(mto_service_item::Column::MoveId.eq(move_id))
            .filter(mto_service_item::Column::Status.eq(ServiceItemStatus::Submitted))
            .count(txn)
            .await
            .map_err(ServiceError::db_error)?;
        Ok(unreviewed_items > 0)
    }

    async fn set_status(
        &self,
        txn: &DatabaseTransaction,
        current: move_task_order::Model,
        status: MoveStatus,
    ) -> Result<move_task_order::Model, ServiceError> {
        if current.status == status {
            return Ok(current);
        }
        let move_id = current.id;
        let now = etag::next_timestamp(current.updated_at);
        let mut active = current.into_active_model();
        active.status = Set(status);
        match status {
            MoveStatus::Approved => active.approved_at = Set(Some(now)),
            MoveStatus::ApprovalsRequested => active.approvals_requested_at = Set(Some(now)),
            _ => {}
        }
        active.updated_at = Set(now);
        let updated = active.update(txn).await.map_err(|e| {
            error!("Failed to update status of move {}: {}", move_id, e);
            ServiceError::db_error(e)
        })?;
        info!(move_id = %move_id, status = %status, "Move status changed");
        Ok(updated)
    }
}

fn ensure_not_canceled(move_task_order: &move_task_order::Model) -> Result<(), ServiceError> {
    if move_task_order.status == MoveStatus::Canceled {
        return Err(ServiceError::conflict(
            move_task_order.id,
            format!(
                "The status for the move with ID {} can not be sent to 'Approvals Requested' if the status is cancelled.",
                move_task_order.id
            ),
        ));
    }
    Ok(())
}

#[async_trait]
impl MoveRouter for DbMoveRouter {
    async fn approve_or_request_approval(
        &self,
        txn: &DatabaseTransaction,
        move_id: Uuid,
    ) -> Result<move_task_order::Model, ServiceError> {
        let current = shipment_repository::find_move(txn, move_id).await?;
        ensure_not_canceled(&current)?;

        let target = if self.has_pending_reviews(txn, move_id).await? {
            MoveStatus::ApprovalsRequested
        } else {
            MoveStatus::Approved
        };
        self.set_status(txn, current, target).await
    }

    async fn send_to_office_user(
        &self,
        txn: &DatabaseTransaction,
        move_id: Uuid,
    ) -> Result<move_task_order::Model, ServiceError> {
        let current = shipment_repository::find_move(txn, move_id).await?;
        ensure_not_canceled(&current)?;
        self.set_status(txn, current, MoveStatus::ApprovalsRequested)
            .await
    }
}

