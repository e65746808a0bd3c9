use crate::{
    config::AppConfig,
    db::DbPool,
    errors::ServiceError,
    events::EventSender,
    services::{
        authorized_weight::AuthorizedWeightRecalculator,
        move_router::{DbMoveRouter, MoveRouter},
        move_weights::{DbMoveWeights, MoveWeights},
        required_delivery_date::{
            DbTransitTimeLookup, Planner, RequiredDeliveryDateCalculator, TransitTimeLookup,
        },
        service_items::{
            DbInternationalServiceItems, DbServiceItemCreator, InternationalServiceItems,
            ServiceItemCreator,
        },
        shipment_router::ShipmentRouter,
    },
};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;

pub mod shipments;
pub mod sit_extensions;

const DEFAULT_AUTHORIZED_WEIGHT_MULTIPLIER: f64 = 1.10;
const DEFAULT_EXCESS_WEIGHT_RISK_THRESHOLD: f64 = 0.9;

/// Command trait for implementing the Command Pattern
///
/// This trait allows for encapsulating all the logic needed to execute a business operation
/// into a single object that can be validated, executed, and produce events.
#[async_trait]
pub trait Command: Send + Sync {
    /// The return type of the command when executed successfully
    type Result;

    /// Execute the command with the given dependencies
    ///
    /// # Arguments
    /// * `ctx` - Database pool, event channel and the collaborators a use case may call
    ///
    /// # Returns
    /// * `Result<Self::Result, ServiceError>` - The result of command execution or an error
    async fn execute(&self, ctx: &CommandContext) -> Result<Self::Result, ServiceError>;
}

/// Everything a command needs besides its own payload.
///
/// Collaborators default to the database-backed implementations; tests and
/// callers with their own pricing or routing swap them with the `with_*`
/// builders.
#[derive(Clone)]
pub struct CommandContext {
    pub db_pool: Arc<DbPool>,
    pub event_sender: Arc<EventSender>,
    pub planner: Arc<dyn Planner>,
    pub transit_times: Arc<dyn TransitTimeLookup>,
    pub move_router: Arc<dyn MoveRouter>,
    pub move_weights: Arc<dyn MoveWeights>,
    pub service_item_creator: Arc<dyn ServiceItemCreator>,
    pub shipment_router: ShipmentRouter,
    pub authorized_weight_multiplier: f64,
    international_service_items: Option<Arc<dyn InternationalServiceItems>>,
    fixed_today: Option<NaiveDate>,
}

impl CommandContext {
    pub fn new(
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
        planner: Arc<dyn Planner>,
    ) -> Self {
        Self {
            db_pool,
            event_sender,
            planner,
            transit_times: Arc::new(DbTransitTimeLookup),
            move_router: Arc::new(DbMoveRouter),
            move_weights: Arc::new(DbMoveWeights::new(DEFAULT_EXCESS_WEIGHT_RISK_THRESHOLD)),
            service_item_creator: Arc::new(DbServiceItemCreator),
            shipment_router: ShipmentRouter::new(),
            authorized_weight_multiplier: DEFAULT_AUTHORIZED_WEIGHT_MULTIPLIER,
            international_service_items: None,
            fixed_today: None,
        }
    }

    /// Builds a context whose business tunables come from configuration.
    pub fn from_config(
        config: &AppConfig,
        db_pool: Arc<DbPool>,
        event_sender: Arc<EventSender>,
        planner: Arc<dyn Planner>,
    ) -> Self {
        Self::new(db_pool, event_sender, planner)
            .with_move_weights(Arc::new(DbMoveWeights::new(
                config.excess_weight_risk_threshold,
            )))
            .with_authorized_weight_multiplier(config.authorized_weight_multiplier)
    }

    pub fn with_transit_times(mut self, transit_times: Arc<dyn TransitTimeLookup>) -> Self {
        self.transit_times = transit_times;
        self
    }

    pub fn with_move_router(mut self, move_router: Arc<dyn MoveRouter>) -> Self {
        self.move_router = move_router;
        self
    }

    pub fn with_move_weights(mut self, move_weights: Arc<dyn MoveWeights>) -> Self {
        self.move_weights = move_weights;
        self
    }

    pub fn with_service_item_creator(mut self, creator: Arc<dyn ServiceItemCreator>) -> Self {
        self.service_item_creator = creator;
        self
    }

    pub fn with_international_service_items(
        mut self,
        international: Arc<dyn InternationalServiceItems>,
    ) -> Self {
        self.international_service_items = Some(international);
        self
    }

    pub fn with_authorized_weight_multiplier(mut self, multiplier: f64) -> Self {
        self.authorized_weight_multiplier = multiplier;
        self
    }

    /// Pins the calendar date used by date-dependent rules.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.fixed_today = Some(today);
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.fixed_today
            .unwrap_or_else(|| Utc::now().date_naive())
    }

    pub fn rdd_calculator(&self) -> RequiredDeliveryDateCalculator {
        RequiredDeliveryDateCalculator::new(self.planner.clone(), self.transit_times.clone())
    }

    /// The international item collaborator; unless replaced, it inserts
    /// through [`Self::service_item_creator`].
    pub fn international_service_items(&self) -> Arc<dyn InternationalServiceItems> {
        match &self.international_service_items {
            Some(international) => international.clone(),
            None => Arc::new(DbInternationalServiceItems::new(
                self.service_item_creator.clone(),
            )),
        }
    }

    pub fn authorized_weight(&self) -> AuthorizedWeightRecalculator {
        AuthorizedWeightRecalculator::new(self.authorized_weight_multiplier)
    }
}

impl std::fmt::Debug for CommandContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandContext")
            .field("authorized_weight_multiplier", &self.authorized_weight_multiplier)
            .field("fixed_today", &self.fixed_today)
            .finish_non_exhaustive()
    }
}
