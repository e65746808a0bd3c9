//! Move-level authorized weight derived from the move's approved shipments.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, IntoActiveModel, QueryFilter,
    QuerySelect, Set,
};
use tracing::{error, info, instrument};

use crate::errors::ServiceError;
use crate::etag;
use crate::models::entitlement;
use crate::models::mto_shipment::{self, ShipmentStatus};
use crate::repositories::shipment_repository;

/// `round(sum(weights) * multiplier)`, or `None` when the result does not
/// fit a weight column.
pub fn authorized_weight<I>(weights: I, multiplier: f64) -> Option<i32>
where
    I: IntoIterator<Item = i32>,
{
    let total: i64 = weights.into_iter().map(i64::from).sum();
    let weight = (total as f64 * multiplier).round();
    if !weight.is_finite() {
        return None;
    }
    i32::try_from(weight as i64).ok()
}

/// Shipments whose weight feeds the authorized weight.
pub fn counts_as_approved(status: ShipmentStatus) -> bool {
    matches!(
        status,
        ShipmentStatus::Approved | ShipmentStatus::ApprovalsRequested
    )
}

/// Planning weights of `approved` plus every other approved shipment on its move.
pub fn approved_weights<'a>(
    approved: &'a mto_shipment::Model,
    siblings: &'a [mto_shipment::Model],
) -> impl Iterator<Item = i32> + 'a {
    std::iter::once(approved)
        .chain(
            siblings
                .iter()
                .filter(move |s| s.id != approved.id && counts_as_approved(s.status)),
        )
        .filter_map(|s| s.planning_weight())
}

#[derive(Debug, Clone, Copy)]
pub struct AuthorizedWeightRecalculator {
    multiplier: f64,
}

impl AuthorizedWeightRecalculator {
    pub fn new(multiplier: f64) -> Self {
        Self { multiplier }
    }

    /// Recomputes the entitlement's authorized weight from scratch.
    ///
    /// The entitlement row is read with `FOR UPDATE` where the database
    /// supports it, so concurrent approvals on one move queue up behind each
    /// other instead of both summing a stale set of siblings.
    #[instrument(skip(self, txn, approved), fields(shipment_id = %approved.id, move_id = %approved.move_id))]
    pub async fn recalculate(
        &self,
        txn: &DatabaseTransaction,
        approved: &mto_shipment::Model,
    ) -> Result<entitlement::Model, ServiceError> {
        let move_id = approved.move_id;
        let current = entitlement::Entity::find()
            .filter(entitlement::Column::MoveId.eq(move_id))
            .lock_exclusive()
            .one(txn)
            .await
            .map_err(ServiceError::db_error)?
            .ok_or_else(|| ServiceError::not_found(move_id, "while looking for move entitlement"))?;

        let siblings = shipment_repository::shipments_for_move(txn, move_id).await?;
        let weight = authorized_weight(approved_weights(approved, &siblings), self.multiplier)
            .ok_or_else(|| {
                error!("Authorized weight for move {} is out of range", move_id);
                ServiceError::unprocessable(move_id, "authorized weight exceeds the supported range")
            })?;

        let now = etag::next_timestamp(current.updated_at);
        let mut active = current.into_active_model();
        active.db_authorized_weight = Set(Some(weight));
        active.updated_at = Set(now);
        let updated = active.update(txn).await.map_err(|e| {
            error!("Failed to save authorized weight for move {}: {}", move_id, e);
            ServiceError::db_error(e)
        })?;

        info!(authorized_weight = weight, "Authorized weight recalculated");
        Ok(updated)
    }
}
