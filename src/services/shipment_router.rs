//! Shipment status state machine.
//!
//! Every transition mutates the shipment in memory only; callers persist.

use chrono::Utc;

use crate::errors::{ConflictStatusError, ServiceError};
use crate::models::move_task_order::{self, MoveStatus};
use crate::models::mto_shipment::{self, ShipmentStatus};

use ShipmentStatus::*;

pub const SUBMIT_FROM: &[ShipmentStatus] = &[Draft];
pub const APPROVE_FROM: &[ShipmentStatus] = &[Submitted, DiversionRequested, ApprovalsRequested];
pub const REJECT_FROM: &[ShipmentStatus] = &[Submitted];
pub const REQUEST_CANCELLATION_FROM: &[ShipmentStatus] = &[Approved];
pub const CANCEL_FROM: &[ShipmentStatus] = &[CancellationRequested];
pub const REQUEST_DIVERSION_FROM: &[ShipmentStatus] = &[Approved];
pub const APPROVE_DIVERSION_FROM: &[ShipmentStatus] = &[Submitted];
pub const TERMINATE_FROM: &[ShipmentStatus] = &[Approved];

#[derive(Debug, Clone, Copy, Default)]
pub struct ShipmentRouter;

impl ShipmentRouter {
    pub fn new() -> Self {
        Self
    }

    pub fn submit(&self, shipment: &mut mto_shipment::Model) -> Result<(), ServiceError> {
        transition(shipment, Submitted, SUBMIT_FROM)
    }

    /// Approves a submitted shipment, or re-approves one after a diversion
    /// request or a post-approval change.
    pub fn approve(
        &self,
        shipment: &mut mto_shipment::Model,
        move_task_order: &move_task_order::Model,
    ) -> Result<(), ServiceError> {
        if shipment.uses_external_vendor {
            return Err(ServiceError::conflict(
                shipment.id,
                "cannot approve a shipment if it uses an external vendor",
            ));
        }

        let move_ready = matches!(
            move_task_order.status,
            MoveStatus::Approved | MoveStatus::ApprovalsRequested
        ) || (shipment.is_ppm()
            && move_task_order.status == MoveStatus::NeedsServiceCounseling);
        if !move_ready {
            return Err(ServiceError::conflict(
                shipment.id,
                format!(
                    "Cannot approve a shipment if the move status isn't {} or {}, or if it isn't a PPM shipment with a move status of {}. The current status for the move with ID {} is {}",
                    MoveStatus::Approved,
                    MoveStatus::ApprovalsRequested,
                    MoveStatus::NeedsServiceCounseling,
                    move_task_order.id,
                    move_task_order.status,
                ),
            ));
        }

        // A diversion request on a shipment that is not itself a diversion
        // cannot be approved through this path.
        if shipment.status == DiversionRequested && !shipment.diversion {
            return Err(conflict_status(shipment, Approved, APPROVE_FROM));
        }

        transition(shipment, Approved, APPROVE_FROM)?;
        shipment.approved_date = Some(Utc::now());
        Ok(())
    }

    pub fn reject(
        &self,
        shipment: &mut mto_shipment::Model,
        rejection_reason: Option<String>,
    ) -> Result<(), ServiceError> {
        transition(shipment, Rejected, REJECT_FROM)?;
        shipment.rejection_reason = rejection_reason;
        Ok(())
    }

    pub fn request_cancellation(
        &self,
        shipment: &mut mto_shipment::Model,
    ) -> Result<(), ServiceError> {
        transition(shipment, CancellationRequested, REQUEST_CANCELLATION_FROM)
    }

    pub fn cancel(&self, shipment: &mut mto_shipment::Model) -> Result<(), ServiceError> {
        transition(shipment, Canceled, CANCEL_FROM)
    }

    pub fn request_diversion(
        &self,
        shipment: &mut mto_shipment::Model,
        diversion_reason: Option<String>,
    ) -> Result<(), ServiceError> {
        transition(shipment, DiversionRequested, REQUEST_DIVERSION_FROM)?;
        shipment.diversion_reason = diversion_reason;
        Ok(())
    }

    /// Approves a diversion shipment, which enters the system as `Submitted`.
    pub fn approve_diversion(&self, shipment: &mut mto_shipment::Model) -> Result<(), ServiceError> {
        if !shipment.diversion {
            return Err(ServiceError::conflict(
                shipment.id,
                format!(
                    "Cannot approve the diversion because the shipment with id '{}' has the Diversion field set to false.",
                    shipment.id
                ),
            ));
        }
        if shipment.uses_external_vendor {
            return Err(ServiceError::conflict(
                shipment.id,
                format!(
                    "Cannot approve the diversion because the shipment with id '{}' has the UsesExternalVendor field set to true.",
                    shipment.id
                ),
            ));
        }
        transition(shipment, Approved, APPROVE_DIVERSION_FROM)?;
        shipment.approved_date = Some(Utc::now());
        Ok(())
    }

    pub fn terminate(&self, shipment: &mut mto_shipment::Model) -> Result<(), ServiceError> {
        transition(shipment, TerminatedForCause, TERMINATE_FROM)
    }
}

fn conflict_status(
    shipment: &mto_shipment::Model,
    to: ShipmentStatus,
    allowed_from: &[ShipmentStatus],
) -> ServiceError {
    ConflictStatusError {
        id: shipment.id,
        from: shipment.status,
        to,
        allowed_from: allowed_from.to_vec(),
    }
    .into()
}

fn transition(
    shipment: &mut mto_shipment::Model,
    to: ShipmentStatus,
    allowed_from: &[ShipmentStatus],
) -> Result<(), ServiceError> {
    if !allowed_from.contains(&shipment.status) {
        return Err(conflict_status(shipment, to, allowed_from));
    }
    shipment.status = to;
    Ok(())
}
