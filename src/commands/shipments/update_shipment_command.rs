use crate::{
    commands::{Command, CommandContext},
    db,
    errors::ServiceError,
    events::Event,
    models::{
        move_task_order::MoveStatus,
        mto_shipment::{self, ShipmentStatus},
    },
    repositories::{shipment_repository, LoadedShipment, ShipmentAssociations},
    services::{
        authorized_weight::counts_as_approved,
        validation::{OfficeRole, ValidationChain},
    },
};
use chrono::NaiveDate;
use sea_orm::DatabaseTransaction;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use uuid::Uuid;
use validator::Validate;

use super::{announce_move_status, load_for_update, refresh_move_weights};

/// Who is editing the shipment; decides which guards run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpdatedBy {
    Customer,
    Office { role: Option<OfficeRole> },
    Prime,
}

/// Fields a caller may change. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct ShipmentPatch {
    pub status: Option<ShipmentStatus>,
    pub requested_pickup_date: Option<NaiveDate>,
    pub scheduled_pickup_date: Option<NaiveDate>,
    pub actual_pickup_date: Option<NaiveDate>,
    pub first_available_delivery_date: Option<NaiveDate>,
    #[validate(range(min = 0, message = "Weight cannot be negative"))]
    pub prime_estimated_weight: Option<i32>,
    #[validate(range(min = 0, message = "Weight cannot be negative"))]
    pub prime_actual_weight: Option<i32>,
    #[validate(range(min = 0, message = "Weight cannot be negative"))]
    pub nts_recorded_weight: Option<i32>,
    pub secondary_pickup_address_id: Option<Uuid>,
    pub secondary_destination_address_id: Option<Uuid>,
    pub tertiary_pickup_address_id: Option<Uuid>,
    pub tertiary_destination_address_id: Option<Uuid>,
    pub diversion: Option<bool>,
    pub diverted_from_shipment_id: Option<Uuid>,
    #[validate(length(max = 2000, message = "Remarks cannot exceed 2000 characters"))]
    pub counselor_remarks: Option<String>,
    #[validate(length(max = 2000, message = "Remarks cannot exceed 2000 characters"))]
    pub customer_remarks: Option<String>,
}

impl ShipmentPatch {
    /// Overlays the patch on `stored`. Status is handled by the command.
    fn apply_to(&self, stored: &mto_shipment::Model) -> mto_shipment::Model {
        let mut candidate = stored.clone();
        macro_rules! overlay {
            ($($field:ident),* $(,)?) => {
                $(
                    if let Some(value) = &self.$field {
                        candidate.$field = Some(value.clone());
                    }
                )*
            };
        }
        overlay!(
            requested_pickup_date,
            scheduled_pickup_date,
            actual_pickup_date,
            first_available_delivery_date,
            prime_estimated_weight,
            prime_actual_weight,
            nts_recorded_weight,
            secondary_pickup_address_id,
            secondary_destination_address_id,
            tertiary_pickup_address_id,
            tertiary_destination_address_id,
            diverted_from_shipment_id,
            counselor_remarks,
            customer_remarks,
        );
        if let Some(diversion) = self.diversion {
            candidate.diversion = diversion;
        }
        candidate
    }

    fn changes_weights(&self) -> bool {
        self.prime_estimated_weight.is_some() || self.nts_recorded_weight.is_some()
    }
}

#[derive(Debug, Serialize, Deserialize, Validate, Clone)]
pub struct UpdateShipmentCommand {
    pub shipment_id: Uuid,

    #[validate(length(min = 1, message = "eTag is required"))]
    pub etag: String,

    pub updated_by: UpdatedBy,

    #[validate]
    pub patch: ShipmentPatch,
}

#[async_trait::async_trait]
impl Command for UpdateShipmentCommand {
    type Result = mto_shipment::Model;

    #[instrument(skip(self, ctx), fields(shipment_id = %self.shipment_id, updated_by = ?self.updated_by))]
    async fn execute(&self, ctx: &CommandContext) -> Result<Self::Result, ServiceError> {
        shipment_repository::validate_model(self.shipment_id, self)?;

        let txn = db::begin(&ctx.db_pool).await?;
        let loaded = load_for_update(
            &txn,
            self.shipment_id,
            &self.etag,
            ShipmentAssociations::all(),
        )
        .await?;

        let mut candidate = self.patch.apply_to(&loaded.shipment);
        self.apply_status(ctx, &loaded, &mut candidate)?;

        self.chain(ctx).validate(&txn, &candidate, &loaded).await?;
        let move_status = mark_as_diversion(ctx, &txn, &loaded, &mut candidate).await?;
        inherit_diversion_weight(&txn, &mut candidate).await?;

        let shipment = shipment_repository::save_shipment(&txn, &candidate).await?;

        if self.patch.changes_weights() && counts_as_approved(shipment.status) {
            let authorized_weight = refresh_move_weights(ctx, &txn, &shipment).await?;
            debug!(
                ?authorized_weight,
                "Authorized weight refreshed after weight update"
            );
        }

        db::commit(txn).await?;

        info!("Shipment updated for shipment ID: {}", shipment.id);
        ctx.event_sender
            .send_or_log(Event::ShipmentUpdated {
                shipment_id: shipment.id,
            })
            .await;
        announce_move_status(ctx, shipment.move_id, move_status).await;

        Ok(shipment)
    }
}

impl UpdateShipmentCommand {
    fn chain(&self, ctx: &CommandContext) -> ValidationChain {
        match self.updated_by {
            UpdatedBy::Customer => ValidationChain::customer(ctx.today()),
            UpdatedBy::Office { role } => ValidationChain::office(role, ctx.today()),
            UpdatedBy::Prime => ValidationChain::prime(),
        }
    }

    /// Customers submit drafts through the state machine; everybody else
    /// changes status with [`super::update_shipment_status_command`].
    fn apply_status(
        &self,
        ctx: &CommandContext,
        loaded: &LoadedShipment,
        candidate: &mut mto_shipment::Model,
    ) -> Result<(), ServiceError> {
        let Some(target) = self.patch.status else {
            return Ok(());
        };
        if target == loaded.shipment.status {
            return Ok(());
        }
        match (self.updated_by, target) {
            (UpdatedBy::Customer, ShipmentStatus::Submitted) => {
                ctx.shipment_router.submit(candidate)
            }
            (UpdatedBy::Customer, _) => {
                candidate.status = target;
                Ok(())
            }
            _ => Err(ServiceError::conflict(
                loaded.id(),
                "office and prime users change shipment status through the status updater",
            )),
        }
    }
}

/// A shipment newly flagged as a diversion goes back to `Submitted` and its
/// move back to the office. Returns the move's new status when it changed.
async fn mark_as_diversion(
    ctx: &CommandContext,
    txn: &DatabaseTransaction,
    loaded: &LoadedShipment,
    candidate: &mut mto_shipment::Model,
) -> Result<Option<MoveStatus>, ServiceError> {
    if loaded.shipment.diversion || !candidate.diversion {
        return Ok(None);
    }
    candidate.status = ShipmentStatus::Submitted;
    let updated = ctx
        .move_router
        .send_to_office_user(txn, loaded.shipment.move_id)
        .await?;
    info!(
        shipment_id = %candidate.id,
        move_status = %updated.status,
        "Shipment marked as a diversion"
    );
    Ok((updated.status != loaded.move_task_order.status).then_some(updated.status))
}

/// A diversion carries its parent's actual weight unless one was supplied.
async fn inherit_diversion_weight(
    txn: &DatabaseTransaction,
    candidate: &mut mto_shipment::Model,
) -> Result<(), ServiceError> {
    if !candidate.diversion || candidate.prime_actual_weight.is_some() {
        return Ok(());
    }
    let Some(parent_id) = candidate.diverted_from_shipment_id else {
        return Ok(());
    };
    let parent = shipment_repository::find_shipment(txn, parent_id).await?;
    if parent.prime_actual_weight.is_some() {
        debug!(
            shipment_id = %candidate.id,
            parent_id = %parent_id,
            "Inheriting actual weight from parent shipment"
        );
        candidate.prime_actual_weight = parent.prime_actual_weight;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::mto_shipment::{MarketCode, ShipmentType};
    use chrono::Utc;

    fn stored() -> mto_shipment::Model {
        let now = Utc::now();
        mto_shipment::Model {
            id: Uuid::new_v4(),
            move_id: Uuid::new_v4(),
            shipment_type: ShipmentType::Hhg,
            status: ShipmentStatus::Submitted,
            market_code: MarketCode::Domestic,
            pickup_address_id: None,
            destination_address_id: None,
            secondary_pickup_address_id: None,
            secondary_destination_address_id: None,
            tertiary_pickup_address_id: None,
            tertiary_destination_address_id: None,
            storage_facility_id: None,
            requested_pickup_date: None,
            scheduled_pickup_date: None,
            actual_pickup_date: None,
            first_available_delivery_date: None,
            required_delivery_date: None,
            prime_estimated_weight: Some(1200),
            prime_actual_weight: None,
            nts_recorded_weight: None,
            billable_weight_cap: None,
            sit_days_allowance: None,
            approved_date: None,
            rejection_reason: None,
            diversion: false,
            diverted_from_shipment_id: None,
            diversion_reason: None,
            uses_external_vendor: false,
            terminated_at: None,
            termination_comments: None,
            counselor_remarks: Some("keep".into()),
            customer_remarks: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn patch_only_overwrites_supplied_fields() {
        let stored = stored();
        let pickup = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        let patch = ShipmentPatch {
            scheduled_pickup_date: Some(pickup),
            customer_remarks: Some("fragile".into()),
            diversion: Some(true),
            ..ShipmentPatch::default()
        };
        let candidate = patch.apply_to(&stored);

        assert_eq!(candidate.scheduled_pickup_date, Some(pickup));
        assert_eq!(candidate.customer_remarks.as_deref(), Some("fragile"));
        assert_eq!(candidate.counselor_remarks.as_deref(), Some("keep"));
        assert_eq!(candidate.prime_estimated_weight, Some(1200));
        assert!(candidate.diversion);
        assert_eq!(candidate.status, stored.status);
        assert_eq!(candidate.updated_at, stored.updated_at);
    }

    #[test]
    fn only_weight_fields_trigger_reweighting() {
        assert!(!ShipmentPatch::default().changes_weights());
        assert!(ShipmentPatch {
            nts_recorded_weight: Some(3000),
            ..ShipmentPatch::default()
        }
        .changes_weights());
        assert!(!ShipmentPatch {
            prime_actual_weight: Some(3000),
            ..ShipmentPatch::default()
        }
        .changes_weights());
    }
}
