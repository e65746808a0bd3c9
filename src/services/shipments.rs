use crate::{
    commands::shipments::{
        approve_diversion_command::ApproveDiversionCommand,
        approve_shipment_command::ApproveShipmentCommand,
        cancel_shipment_command::CancelShipmentCommand,
        reject_shipment_command::RejectShipmentCommand,
        request_cancellation_command::RequestCancellationCommand,
        request_diversion_command::RequestDiversionCommand,
        request_reweigh_command::RequestReweighCommand,
        terminate_shipment_command::TerminateShipmentCommand,
        update_shipment_command::UpdateShipmentCommand,
        update_shipment_status_command::UpdateShipmentStatusCommand,
    },
    commands::{Command, CommandContext},
    errors::ServiceError,
    models::{mto_shipment, reweigh},
    repositories::{shipment_repository, LoadedShipment, ShipmentAssociations},
};
use tracing::instrument;
use uuid::Uuid;

/// Service for moving shipments through their lifecycle
#[derive(Clone, Debug)]
pub struct ShipmentLifecycleService {
    ctx: CommandContext,
}

impl ShipmentLifecycleService {
    /// Creates a new shipment lifecycle service instance
    pub fn new(ctx: CommandContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &CommandContext {
        &self.ctx
    }

    /// Fetches a shipment with every association
    #[instrument(skip(self))]
    pub async fn get_shipment(&self, shipment_id: Uuid) -> Result<LoadedShipment, ServiceError> {
        shipment_repository::load_shipment(
            self.ctx.db_pool.as_ref(),
            shipment_id,
            ShipmentAssociations::all(),
        )
        .await
    }

    /// Approves a shipment, setting its delivery date and service items
    #[instrument(skip(self, command))]
    pub async fn approve_shipment(
        &self,
        command: ApproveShipmentCommand,
    ) -> Result<mto_shipment::Model, ServiceError> {
        command.execute(&self.ctx).await
    }

    /// Rejects a submitted shipment
    #[instrument(skip(self, command))]
    pub async fn reject_shipment(
        &self,
        command: RejectShipmentCommand,
    ) -> Result<mto_shipment::Model, ServiceError> {
        command.execute(&self.ctx).await
    }

    #[instrument(skip(self, command))]
    pub async fn request_diversion(
        &self,
        command: RequestDiversionCommand,
    ) -> Result<mto_shipment::Model, ServiceError> {
        command.execute(&self.ctx).await
    }

    #[instrument(skip(self, command))]
    pub async fn approve_diversion(
        &self,
        command: ApproveDiversionCommand,
    ) -> Result<mto_shipment::Model, ServiceError> {
        command.execute(&self.ctx).await
    }

    #[instrument(skip(self, command))]
    pub async fn request_cancellation(
        &self,
        command: RequestCancellationCommand,
    ) -> Result<mto_shipment::Model, ServiceError> {
        command.execute(&self.ctx).await
    }

    #[instrument(skip(self, command))]
    pub async fn cancel_shipment(
        &self,
        command: CancelShipmentCommand,
    ) -> Result<mto_shipment::Model, ServiceError> {
        command.execute(&self.ctx).await
    }

    /// Terminates an approved shipment for cause
    #[instrument(skip(self, command))]
    pub async fn terminate_shipment(
        &self,
        command: TerminateShipmentCommand,
    ) -> Result<mto_shipment::Model, ServiceError> {
        command.execute(&self.ctx).await
    }

    /// Moves a shipment to a new status
    #[instrument(skip(self, command))]
    pub async fn update_status(
        &self,
        command: UpdateShipmentStatusCommand,
    ) -> Result<mto_shipment::Model, ServiceError> {
        command.execute(&self.ctx).await
    }

    /// Applies a customer, office or prime edit
    #[instrument(skip(self, command))]
    pub async fn update_shipment(
        &self,
        command: UpdateShipmentCommand,
    ) -> Result<mto_shipment::Model, ServiceError> {
        command.execute(&self.ctx).await
    }

    #[instrument(skip(self, command))]
    pub async fn request_reweigh(
        &self,
        command: RequestReweighCommand,
    ) -> Result<reweigh::Model, ServiceError> {
        command.execute(&self.ctx).await
    }
}
