use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, DatabaseTransaction, IntoActiveModel, Set};
use tracing::{error, info};
use uuid::Uuid;

use crate::errors::ServiceError;
use crate::etag;
use crate::models::move_task_order;
use crate::models::mto_shipment::{self, ShipmentStatus};
use crate::repositories::shipment_repository;

/// Shipment statuses whose weights count toward a move's totals.
pub fn counts_toward_move_weight(status: ShipmentStatus) -> bool {
    matches!(
        status,
        ShipmentStatus::Approved
            | ShipmentStatus::ApprovalsRequested
            | ShipmentStatus::DiversionRequested
            | ShipmentStatus::CancellationRequested
    )
}

/// Sum of estimated weights on a move, using `updated` in place of its
/// stored row so that an unsaved change is reflected.
pub fn sum_estimated_weights(
    shipments: &[mto_shipment::Model],
    updated: Option<&mto_shipment::Model>,
) -> i64 {
    let stored = shipments
        .iter()
        .filter(|s| updated.map_or(true, |u| u.id != s.id))
        .filter(|s| counts_toward_move_weight(s.status))
        .filter_map(|s| s.prime_estimated_weight)
        .map(i64::from)
        .sum::<i64>();
    let pending = updated
        .filter(|u| counts_toward_move_weight(u.status))
        .and_then(|u| u.prime_estimated_weight)
        .map_or(0, i64::from);
    stored + pending
}

pub fn at_risk_of_excess(sum_of_weights: i64, total_weight_allowance: i32, threshold: f64) -> bool {
    ((f64::from(total_weight_allowance) * threshold) as i64) <= sum_of_weights
}

#[async_trait]
pub trait MoveWeights: Send + Sync {
    /// Sets or clears the move's excess-weight flag and returns the move.
    async fn check_excess_weight(
        &self,
        txn: &DatabaseTransaction,
        move_id: Uuid,
        updated_shipment: &mto_shipment::Model,
    ) -> Result<move_task_order::Model, ServiceError>;
}

#[derive(Debug, Clone, Copy)]
pub struct DbMoveWeights {
    risk_threshold: f64,
}

impl DbMoveWeights {
    pub fn new(risk_threshold: f64) -> Self {
        Self { risk_threshold }
    }
}

#[async_trait]
impl MoveWeights for DbMoveWeights {
    async fn check_excess_weight(
        &self,
        txn: &DatabaseTransaction,
        move_id: Uuid,
        updated_shipment: &mto_shipment::Model,
    ) -> Result<move_task_order::Model, ServiceError> {
        let current = shipment_repository::find_move(txn, move_id).await?;
        let entitlement = shipment_repository::find_entitlement(txn, move_id).await?;
        let Some(allowance) = entitlement.total_weight_allowance else {
            return Ok(current);
        };

        let shipments = shipment_repository::shipments_for_move(txn, move_id).await?;
        let sum = sum_estimated_weights(&shipments, Some(updated_shipment));
        let at_risk = at_risk_of_excess(sum, allowance, self.risk_threshold);

        let qualified_at = match (at_risk, current.excess_weight_qualified_at) {
            (true, None) => Some(etag::now()),
            (false, Some(_)) => None,
            _ => return Ok(current),
        };

        let now = etag::next_timestamp(current.updated_at);
        let mut active = current.into_active_model();
        active.excess_weight_qualified_at = Set(qualified_at);
        active.updated_at = Set(now);
        let updated = active.update(txn).await.map_err(|e| {
            error!("Failed to save excess weight flag for move {}: {}", move_id, e);
            ServiceError::db_error(e)
        })?;
        info!(move_id = %move_id, at_risk, sum, allowance, "Excess weight flag updated");
        Ok(updated)
    }
}
