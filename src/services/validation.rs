//! Guard chains run before a shipment is written.
//!
//! A guard either reports field problems, which the chain collects across
//! every guard, or fails outright, which stops the chain on the spot.

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{ColumnTrait, DatabaseTransaction, EntityTrait, PaginatorTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::errors::{FieldErrors, ServiceError};
use crate::models::mto_shipment::{self, ShipmentStatus, ShipmentType};
use crate::models::reweigh;
use crate::repositories::shipment_repository;
use crate::repositories::LoadedShipment;

/// Why a guard refused a candidate shipment.
#[derive(Debug)]
pub enum GuardOutcome {
    /// Field-level problems; the chain keeps going and merges them.
    Accumulate(FieldErrors),
    /// Anything else; the chain returns it immediately.
    Fatal(ServiceError),
}

impl From<ServiceError> for GuardOutcome {
    fn from(err: ServiceError) -> Self {
        GuardOutcome::Fatal(err)
    }
}

impl From<FieldErrors> for GuardOutcome {
    fn from(errors: FieldErrors) -> Self {
        GuardOutcome::Accumulate(errors)
    }
}

pub type GuardResult = Result<(), GuardOutcome>;

fn field_error(field: &str, message: impl Into<String>) -> GuardOutcome {
    let mut errors = FieldErrors::new();
    errors.add(field, message);
    GuardOutcome::Accumulate(errors)
}

/// A single predicate over the candidate shipment and the stored one.
#[async_trait]
pub trait ShipmentGuard: Send + Sync {
    fn name(&self) -> &'static str;

    async fn check(
        &self,
        txn: &DatabaseTransaction,
        candidate: &mto_shipment::Model,
        current: &LoadedShipment,
    ) -> GuardResult;
}

/// Office roles that may edit shipments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum OfficeRole {
    ServicesCounselor,
    #[strum(serialize = "TOO")]
    TransportationOrderingOfficer,
    #[strum(serialize = "TIO")]
    TransportationInvoicingOfficer,
}

impl OfficeRole {
    /// Statuses a shipment may be in for this role to edit it.
    pub fn editable_statuses(self) -> &'static [ShipmentStatus] {
        use ShipmentStatus::*;
        match self {
            OfficeRole::ServicesCounselor => &[Submitted, Approved],
            OfficeRole::TransportationOrderingOfficer => &[
                Submitted,
                Approved,
                ApprovalsRequested,
                CancellationRequested,
                Canceled,
                DiversionRequested,
            ],
            OfficeRole::TransportationInvoicingOfficer => &[Approved],
        }
    }

    pub fn can_edit(self, status: ShipmentStatus) -> bool {
        self.editable_statuses().contains(&status)
    }
}

/// Customers may only move their own shipment between `Draft` and `Submitted`.
#[derive(Debug, Default)]
pub struct CheckStatus;

#[async_trait]
impl ShipmentGuard for CheckStatus {
    fn name(&self) -> &'static str {
        "checkStatus"
    }

    async fn check(
        &self,
        _txn: &DatabaseTransaction,
        candidate: &mto_shipment::Model,
        _current: &LoadedShipment,
    ) -> GuardResult {
        match candidate.status {
            ShipmentStatus::Draft | ShipmentStatus::Submitted => Ok(()),
            _ => Err(field_error("status", "can only update status to DRAFT or SUBMITTED")),
        }
    }
}

/// Role × current-status capability check for office users.
#[derive(Debug)]
pub struct CheckUpdateAllowed {
    pub role: Option<OfficeRole>,
}

#[async_trait]
impl ShipmentGuard for CheckUpdateAllowed {
    fn name(&self) -> &'static str {
        "checkUpdateAllowed"
    }

    async fn check(
        &self,
        _txn: &DatabaseTransaction,
        _candidate: &mto_shipment::Model,
        current: &LoadedShipment,
    ) -> GuardResult {
        let status = current.shipment.status;
        match self.role {
            Some(role) if role.can_edit(status) => Ok(()),
            Some(role) => Err(ServiceError::forbidden(
                current.id(),
                format!("{} cannot update a shipment in status {}", role, status),
            )
            .into()),
            None => Err(ServiceError::forbidden(
                current.id(),
                "only office users can update this shipment",
            )
            .into()),
        }
    }
}

/// The shipment's move must be visible to the Prime, shown, and not handled
/// by an external vendor.
#[derive(Debug, Default)]
pub struct CheckAvailToPrime;

#[async_trait]
impl ShipmentGuard for CheckAvailToPrime {
    fn name(&self) -> &'static str {
        "checkAvailToPrime"
    }

    async fn check(
        &self,
        _txn: &DatabaseTransaction,
        _candidate: &mto_shipment::Model,
        current: &LoadedShipment,
    ) -> GuardResult {
        if current.move_task_order.is_available_to_prime() && !current.shipment.uses_external_vendor
        {
            return Ok(());
        }
        Err(ServiceError::not_found(
            current.id(),
            format!(
                "while looking for Prime-available shipment with id {}",
                current.id()
            ),
        )
        .into())
    }
}

pub const REWEIGH_ALLOWED_STATUSES: &[ShipmentStatus] = &[
    ShipmentStatus::Approved,
    ShipmentStatus::ApprovalsRequested,
    ShipmentStatus::DiversionRequested,
];

/// A reweigh can be requested once, and only on an active shipment.
#[derive(Debug, Default)]
pub struct CheckReweighAllowed;

#[async_trait]
impl ShipmentGuard for CheckReweighAllowed {
    fn name(&self) -> &'static str {
        "checkReweighAllowed"
    }

    async fn check(
        &self,
        txn: &DatabaseTransaction,
        _candidate: &mto_shipment::Model,
        current: &LoadedShipment,
    ) -> GuardResult {
        let status = current.shipment.status;
        if !REWEIGH_ALLOWED_STATUSES.contains(&status) {
            return Err(ServiceError::conflict(
                current.id(),
                format!(
                    "can only reweigh a shipment that is APPROVED, APPROVALS_REQUESTED or DIVERSION_REQUESTED; current status is {}",
                    status
                ),
            )
            .into());
        }

        let existing = reweigh::Entity::find()
            .filter(reweigh::Column::ShipmentId.eq(current.id()))
            .count(txn)
            .await
            .map_err(ServiceError::db_error)?;
        if existing > 0 {
            return Err(ServiceError::conflict(current.id(), "reweigh already requested").into());
        }
        Ok(())
    }
}

/// Unaccompanied baggage only exists for moves with an OCONUS leg.
#[derive(Debug, Default)]
pub struct CheckUbShipmentOconusRequirement;

#[async_trait]
impl ShipmentGuard for CheckUbShipmentOconusRequirement {
    fn name(&self) -> &'static str {
        "checkUBShipmentOCONUSRequirement"
    }

    async fn check(
        &self,
        _txn: &DatabaseTransaction,
        candidate: &mto_shipment::Model,
        current: &LoadedShipment,
    ) -> GuardResult {
        if candidate.shipment_type != ShipmentType::UnaccompaniedBaggage {
            return Ok(());
        }
        let oconus = [&current.pickup_address, &current.destination_address]
            .into_iter()
            .flatten()
            .any(|a| a.is_oconus);
        if oconus {
            Ok(())
        } else {
            Err(field_error(
                "shipment_type",
                "At least one address for a UB shipment must be OCONUS",
            ))
        }
    }
}

/// A tertiary address is only meaningful after a secondary one.
#[derive(Debug, Default)]
pub struct CheckTertiaryAddresses;

#[async_trait]
impl ShipmentGuard for CheckTertiaryAddresses {
    fn name(&self) -> &'static str {
        "checkTertiaryAddresses"
    }

    async fn check(
        &self,
        _txn: &DatabaseTransaction,
        candidate: &mto_shipment::Model,
        _current: &LoadedShipment,
    ) -> GuardResult {
        let mut errors = FieldErrors::new();
        if candidate.tertiary_pickup_address_id.is_some()
            && candidate.secondary_pickup_address_id.is_none()
        {
            errors.add(
                "tertiary_pickup_address",
                "a tertiary pickup address requires a secondary pickup address",
            );
        }
        if candidate.tertiary_destination_address_id.is_some()
            && candidate.secondary_destination_address_id.is_none()
        {
            errors.add(
                "tertiary_destination_address",
                "a tertiary destination address requires a secondary destination address",
            );
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.into())
        }
    }
}

/// A changed requested pickup date must be tomorrow or later. PPMs are exempt.
#[derive(Debug)]
pub struct CheckRequestedPickupDate {
    pub today: NaiveDate,
}

#[async_trait]
impl ShipmentGuard for CheckRequestedPickupDate {
    fn name(&self) -> &'static str {
        "checkRequestedPickupDate"
    }

    async fn check(
        &self,
        _txn: &DatabaseTransaction,
        candidate: &mto_shipment::Model,
        current: &LoadedShipment,
    ) -> GuardResult {
        if candidate.is_ppm() || candidate.requested_pickup_date == current.shipment.requested_pickup_date {
            return Ok(());
        }
        match candidate.requested_pickup_date {
            Some(date) if date <= self.today => Err(field_error(
                "requested_pickup_date",
                "RequestedPickupDate must be greater than or equal to tomorrow's date.",
            )),
            _ => Ok(()),
        }
    }
}

/// The Prime sets its estimated and actual weights once.
#[derive(Debug, Default)]
pub struct CheckPrimeWeightsOnce;

#[async_trait]
impl ShipmentGuard for CheckPrimeWeightsOnce {
    fn name(&self) -> &'static str {
        "checkPrimeWeightsOnce"
    }

    async fn check(
        &self,
        _txn: &DatabaseTransaction,
        candidate: &mto_shipment::Model,
        current: &LoadedShipment,
    ) -> GuardResult {
        let stored = &current.shipment;
        let mut errors = FieldErrors::new();
        if stored.prime_estimated_weight.is_some()
            && candidate.prime_estimated_weight != stored.prime_estimated_weight
        {
            errors.add(
                "prime_estimated_weight",
                "cannot be updated after initial estimation",
            );
        }
        if stored.prime_actual_weight.is_some()
            && candidate.prime_actual_weight != stored.prime_actual_weight
        {
            errors.add("prime_actual_weight", "cannot be updated once recorded");
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors.into())
        }
    }
}

/// The diversion flag and the parent reference must agree, and the
/// parent chain must lead back to an ordinary shipment on the same move.
#[derive(Debug, Default)]
pub struct CheckDiversionValid;

#[async_trait]
impl ShipmentGuard for CheckDiversionValid {
    fn name(&self) -> &'static str {
        "checkDiversionValid"
    }

    async fn check(
        &self,
        txn: &DatabaseTransaction,
        candidate: &mto_shipment::Model,
        _current: &LoadedShipment,
    ) -> GuardResult {
        let id = candidate.id;
        let parent_id = match (candidate.diversion, candidate.diverted_from_shipment_id) {
            (false, None) => return Ok(()),
            (true, None) => {
                return Err(ServiceError::conflict(
                    id,
                    "a diversion must reference the shipment it was diverted from",
                )
                .into())
            }
            (false, Some(_)) => {
                return Err(ServiceError::conflict(
                    id,
                    "diverted_from_shipment_id can only be set when diversion is true",
                )
                .into())
            }
            (true, Some(parent_id)) => parent_id,
        };

        if parent_id == id {
            return Err(ServiceError::conflict(id, "a shipment cannot be diverted from itself").into());
        }

        let parent = shipment_repository::find_shipment(txn, parent_id)
            .await
            .map_err(|_| {
                ServiceError::conflict(
                    id,
                    format!("diverted_from_shipment_id {} does not exist", parent_id),
                )
            })?;
        if parent.move_id != candidate.move_id {
            return Err(ServiceError::conflict(
                id,
                "a diversion must belong to the same move as its parent shipment",
            )
            .into());
        }

        // Walk the back-references; reaching the candidate again means a cycle.
        let mut seen = HashSet::from([id, parent_id]);
        let mut next = parent.diverted_from_shipment_id;
        while let Some(ancestor_id) = next {
            if !seen.insert(ancestor_id) {
                warn!(shipment_id = %id, "diversion chain loops back through {}", ancestor_id);
                return Err(ServiceError::conflict(id, "diversion chain must not contain a cycle").into());
            }
            next = shipment_repository::find_shipment(txn, ancestor_id)
                .await?
                .diverted_from_shipment_id;
        }

        if let (Some(supplied), Some(inherited)) =
            (candidate.prime_actual_weight, parent.prime_actual_weight)
        {
            if supplied != inherited {
                return Err(ServiceError::conflict(
                    id,
                    "a diversion inherits its actual weight from the parent shipment and cannot supply a different one",
                )
                .into());
            }
        }
        Ok(())
    }
}

/// An ordered list of guards.
#[derive(Default)]
pub struct ValidationChain {
    guards: Vec<Box<dyn ShipmentGuard>>,
}

impl ValidationChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, guard: impl ShipmentGuard + 'static) -> Self {
        self.guards.push(Box::new(guard));
        self
    }

    pub fn guard_names(&self) -> Vec<&'static str> {
        self.guards.iter().map(|g| g.name()).collect()
    }

    /// Guards for a customer editing their own shipment.
    pub fn customer(today: NaiveDate) -> Self {
        Self::new()
            .with(CheckStatus)
            .with(CheckRequestedPickupDate { today })
            .with(CheckTertiaryAddresses)
            .with(CheckUbShipmentOconusRequirement)
            .with(CheckDiversionValid)
    }

    /// Guards for an office user acting in `role`.
    pub fn office(role: Option<OfficeRole>, today: NaiveDate) -> Self {
        Self::new()
            .with(CheckUpdateAllowed { role })
            .with(CheckRequestedPickupDate { today })
            .with(CheckTertiaryAddresses)
            .with(CheckUbShipmentOconusRequirement)
            .with(CheckDiversionValid)
    }

    /// Guards for updates coming from the Prime contractor.
    pub fn prime() -> Self {
        Self::new()
            .with(CheckAvailToPrime)
            .with(CheckTertiaryAddresses)
            .with(CheckDiversionValid)
            .with(CheckPrimeWeightsOnce)
    }

    pub fn reweigh() -> Self {
        Self::new().with(CheckReweighAllowed)
    }

    /// Runs every guard in order.
    ///
    /// Field errors from all guards come back together as one `InvalidInput`;
    /// the first non-field error is returned as-is and later guards never run.
    pub async fn validate(
        &self,
        txn: &DatabaseTransaction,
        candidate: &mto_shipment::Model,
        current: &LoadedShipment,
    ) -> Result<(), ServiceError> {
        let mut errors = FieldErrors::new();
        for guard in &self.guards {
            match guard.check(txn, candidate, current).await {
                Ok(()) => {}
                Err(GuardOutcome::Accumulate(found)) => {
                    debug!(guard = guard.name(), shipment_id = %candidate.id, "guard reported {}", found);
                    errors.append(found);
                }
                Err(GuardOutcome::Fatal(err)) => {
                    debug!(guard = guard.name(), shipment_id = %candidate.id, "guard failed: {}", err);
                    return Err(err);
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ServiceError::invalid_input(
                candidate.id,
                errors,
                "invalid input found while validating the shipment",
            ))
        }
    }
}
