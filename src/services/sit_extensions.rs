use crate::{
    commands::sit_extensions::{
        approve_sit_extension_command::ApproveSitExtensionCommand,
        create_sit_extension_command::CreateSitExtensionCommand,
        deny_sit_extension_command::DenySitExtensionCommand,
    },
    commands::{Command, CommandContext},
    errors::ServiceError,
    models::{mto_shipment, sit_extension},
    services::sit_status::{self, SitStatus},
};
use tracing::instrument;
use uuid::Uuid;

/// Service for storage-in-transit extensions and SIT day accounting
#[derive(Clone, Debug)]
pub struct SitExtensionService {
    ctx: CommandContext,
}

impl SitExtensionService {
    pub fn new(ctx: CommandContext) -> Self {
        Self { ctx }
    }

    /// Records a pending extension request and flags the move for review
    #[instrument(skip(self, command))]
    pub async fn create_extension(
        &self,
        command: CreateSitExtensionCommand,
    ) -> Result<sit_extension::Model, ServiceError> {
        command.execute(&self.ctx).await
    }

    /// Approves an extension and grows the shipment's SIT allowance
    #[instrument(skip(self, command))]
    pub async fn approve_extension(
        &self,
        command: ApproveSitExtensionCommand,
    ) -> Result<mto_shipment::Model, ServiceError> {
        command.execute(&self.ctx).await
    }

    #[instrument(skip(self, command))]
    pub async fn deny_extension(
        &self,
        command: DenySitExtensionCommand,
    ) -> Result<mto_shipment::Model, ServiceError> {
        command.execute(&self.ctx).await
    }

    /// Current SIT usage for a shipment, or `None` if it never entered storage
    #[instrument(skip(self))]
    pub async fn sit_status(&self, shipment_id: Uuid) -> Result<Option<SitStatus>, ServiceError> {
        sit_status::sit_status_for_shipment(self.ctx.db_pool.as_ref(), shipment_id, self.ctx.today())
            .await
    }
}
