#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use sea_orm::{ActiveModelTrait, EntityTrait, IntoActiveModel, Set};
use shipment_lifecycle::{
    commands::CommandContext,
    db::{self, DbConfig, DbPool},
    errors::ServiceError,
    etag,
    events::{Event, EventSender},
    models::{
        address, domestic_transit_time, entitlement,
        move_task_order::{self, MoveStatus},
        mto_service_item::{self, ReServiceCode, ServiceItemStatus},
        mto_shipment::{self, MarketCode, ShipmentStatus, ShipmentType},
        sit_extension::{self, SitExtensionRequestReason, SitExtensionStatus},
        storage_facility,
    },
    services::required_delivery_date::Planner,
};
use tokio::sync::mpsc;
use uuid::Uuid;

/// Inserts every column of a seeded row.
macro_rules! seed {
    ($active:expr, $db:expr) => {
        $active
            .reset_all()
            .insert($db)
            .await
            .expect("failed to seed row")
    };
}

/// Distance every lookup reports unless a test swaps the planner.
pub const PLANNED_DISTANCE: i32 = 1_200;
/// Transit days for [`PLANNED_DISTANCE`] in the seeded table.
pub const LONG_HAUL_DAYS: i64 = 12;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// The date the harness pins as "today".
pub fn today() -> NaiveDate {
    date(2024, 6, 1)
}

/// Planner stub with a fixed route distance.
#[derive(Debug, Clone, Copy)]
pub struct FixedPlanner(pub i32);

#[async_trait]
impl Planner for FixedPlanner {
    async fn zip_transit_distance(
        &self,
        _pickup_zip: &str,
        _destination_zip: &str,
    ) -> Result<i32, ServiceError> {
        Ok(self.0)
    }
}

/// Helper harness backed by an in-memory SQLite database.
pub struct TestHarness {
    pub db: Arc<DbPool>,
    pub ctx: CommandContext,
    pub events: mpsc::Receiver<Event>,
}

/// A move that is ready for approvals, with one submitted HHG shipment.
pub struct Scenario {
    pub move_task_order: move_task_order::Model,
    pub entitlement: entitlement::Model,
    pub pickup: address::Model,
    pub destination: address::Model,
    pub shipment: mto_shipment::Model,
}

impl TestHarness {
    /// Construct a fresh database and a command context pinned to [`today`].
    pub async fn new() -> Self {
        // A single connection keeps every query on the same in-memory database.
        let config = DbConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            idle_timeout: Duration::from_secs(3_600),
            ..DbConfig::default()
        };
        let pool = db::establish_connection_with_config(&config)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db = Arc::new(pool);
        let (sender, events) = EventSender::channel(256);
        let ctx = CommandContext::new(
            db.clone(),
            Arc::new(sender),
            Arc::new(FixedPlanner(PLANNED_DISTANCE)),
        )
        .with_today(today());

        let harness = Self { db, ctx, events };
        harness.seed_transit_times().await;
        harness
    }

    /// Two distance bands: up to 1000 miles takes 7 days, anything longer 12.
    pub async fn seed_transit_times(&self) {
        for (lower, upper, days) in [(0, 1_000, 7), (1_001, 0, LONG_HAUL_DAYS as i32)] {
            self.seed_transit_band(lower, upper, days).await;
        }
    }

    /// A distance band open on weight; an `upper` of zero leaves it open too.
    pub async fn seed_transit_band(&self, lower: i32, upper: i32, days: i32) {
        let row = domestic_transit_time::Model {
            id: Uuid::new_v4(),
            max_days_transit_time: days,
            weight_lbs_lower: 0,
            weight_lbs_upper: 0,
            distance_miles_lower: lower,
            distance_miles_upper: upper,
        };
        seed!(row.into_active_model(), self.db.as_ref());
    }

    pub async fn seed_address(&self, state: &str, postal_code: &str) -> address::Model {
        let now = etag::now();
        let row = address::Model {
            id: Uuid::new_v4(),
            street_address_1: "123 Any Street".to_string(),
            street_address_2: None,
            city: "Anytown".to_string(),
            state: state.to_string(),
            postal_code: postal_code.to_string(),
            country: Some("US".to_string()),
            is_oconus: state == "AK" || state == "HI",
            created_at: now,
            updated_at: now,
        };
        seed!(row.into_active_model(), self.db.as_ref())
    }

    pub async fn seed_move(&self, status: MoveStatus) -> move_task_order::Model {
        let now = etag::now();
        let row = move_task_order::Model {
            id: Uuid::new_v4(),
            locator: Uuid::new_v4().simple().to_string()[..6].to_uppercase(),
            status,
            available_to_prime_at: Some(now),
            show: true,
            approved_at: None,
            approvals_requested_at: None,
            excess_weight_qualified_at: None,
            created_at: now,
            updated_at: now,
        };
        seed!(row.into_active_model(), self.db.as_ref())
    }

    pub async fn seed_entitlement(
        &self,
        move_id: Uuid,
        total_weight_allowance: Option<i32>,
        storage_in_transit: Option<i32>,
    ) -> entitlement::Model {
        let now = etag::now();
        let row = entitlement::Model {
            id: Uuid::new_v4(),
            move_id,
            db_authorized_weight: None,
            total_weight_allowance,
            storage_in_transit,
            created_at: now,
            updated_at: now,
        };
        seed!(row.into_active_model(), self.db.as_ref())
    }

    pub async fn seed_storage_facility(&self, address: &address::Model) -> storage_facility::Model {
        let now = etag::now();
        let row = storage_facility::Model {
            id: Uuid::new_v4(),
            facility_name: "Long Term Storage".to_string(),
            address_id: address.id,
            lot_number: Some("LOT-42".to_string()),
            created_at: now,
            updated_at: now,
        };
        seed!(row.into_active_model(), self.db.as_ref())
    }

    /// An unsaved submitted HHG shipment on `move_id`; tweak then insert.
    pub fn shipment(move_id: Uuid) -> mto_shipment::Model {
        let now = etag::now();
        mto_shipment::Model {
            id: Uuid::new_v4(),
            move_id,
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
            requested_pickup_date: Some(date(2024, 6, 2)),
            scheduled_pickup_date: Some(date(2024, 6, 3)),
            actual_pickup_date: None,
            first_available_delivery_date: None,
            required_delivery_date: None,
            prime_estimated_weight: None,
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
            counselor_remarks: None,
            customer_remarks: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub async fn insert_shipment(&self, shipment: mto_shipment::Model) -> mto_shipment::Model {
        seed!(shipment.into_active_model(), self.db.as_ref())
    }

    /// Approved move with a 5000 lb allowance and 90 SIT days, plus one
    /// submitted 1000 lb HHG shipment from Beverly Hills to Atlanta.
    pub async fn scenario(&self, move_status: MoveStatus) -> Scenario {
        let move_task_order = self.seed_move(move_status).await;
        let entitlement = self
            .seed_entitlement(move_task_order.id, Some(5_000), Some(90))
            .await;
        let pickup = self.seed_address("CA", "90210").await;
        let destination = self.seed_address("GA", "30301").await;

        let mut shipment = Self::shipment(move_task_order.id);
        shipment.pickup_address_id = Some(pickup.id);
        shipment.destination_address_id = Some(destination.id);
        shipment.prime_estimated_weight = Some(1_000);
        let shipment = self.insert_shipment(shipment).await;

        Scenario {
            move_task_order,
            entitlement,
            pickup,
            destination,
            shipment,
        }
    }

    pub async fn insert_sit_item(
        &self,
        shipment: &mto_shipment::Model,
        code: ReServiceCode,
        entry: NaiveDate,
        departure: Option<NaiveDate>,
    ) -> mto_service_item::Model {
        let now = etag::now();
        let row = mto_service_item::Model {
            id: Uuid::new_v4(),
            move_id: shipment.move_id,
            shipment_id: Some(shipment.id),
            re_service_code: code,
            status: ServiceItemStatus::Approved,
            sit_entry_date: Some(entry),
            sit_departure_date: departure,
            approved_at: Some(now),
            rejected_at: None,
            reason: None,
            created_at: now,
            updated_at: now,
        };
        seed!(row.into_active_model(), self.db.as_ref())
    }

    pub async fn insert_sit_extension(
        &self,
        shipment: &mto_shipment::Model,
        requested_days: i32,
        status: SitExtensionStatus,
        approved_days: Option<i32>,
    ) -> sit_extension::Model {
        let now = etag::now();
        let row = sit_extension::Model {
            id: Uuid::new_v4(),
            shipment_id: shipment.id,
            request_reason: SitExtensionRequestReason::AwaitingCompletionOfResidence,
            contractor_remarks: Some("house not ready".to_string()),
            requested_days,
            approved_days,
            status,
            office_remarks: None,
            decision_date: None,
            created_at: now,
            updated_at: now,
        };
        seed!(row.into_active_model(), self.db.as_ref())
    }

    /// Moves a stored shipment to `status` outside the state machine.
    pub async fn set_status(
        &self,
        shipment: &mto_shipment::Model,
        status: ShipmentStatus,
    ) -> mto_shipment::Model {
        let mut active = shipment.clone().into_active_model();
        active.status = Set(status);
        active.updated_at = Set(etag::next_timestamp(shipment.updated_at));
        active
            .update(self.db.as_ref())
            .await
            .expect("failed to update shipment status")
    }

    pub async fn reload(&self, shipment_id: Uuid) -> mto_shipment::Model {
        mto_shipment::Entity::find_by_id(shipment_id)
            .one(self.db.as_ref())
            .await
            .expect("query shipment")
            .expect("shipment exists")
    }

    pub async fn reload_move(&self, move_id: Uuid) -> move_task_order::Model {
        move_task_order::Entity::find_by_id(move_id)
            .one(self.db.as_ref())
            .await
            .expect("query move")
            .expect("move exists")
    }

    pub async fn reload_entitlement(&self, entitlement_id: Uuid) -> entitlement::Model {
        entitlement::Entity::find_by_id(entitlement_id)
            .one(self.db.as_ref())
            .await
            .expect("query entitlement")
            .expect("entitlement exists")
    }

    pub async fn reload_extension(&self, extension_id: Uuid) -> sit_extension::Model {
        sit_extension::Entity::find_by_id(extension_id)
            .one(self.db.as_ref())
            .await
            .expect("query SIT extension")
            .expect("SIT extension exists")
    }

    pub async fn service_items_for(&self, shipment_id: Uuid) -> Vec<mto_service_item::Model> {
        use sea_orm::{ColumnTrait, QueryFilter};
        mto_service_item::Entity::find()
            .filter(mto_service_item::Column::ShipmentId.eq(shipment_id))
            .all(self.db.as_ref())
            .await
            .expect("query service items")
    }

    /// Events published so far, oldest first.
    pub fn drain_events(&mut self) -> Vec<Event> {
        let mut drained = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            drained.push(event);
        }
        drained
    }
}

/// The eTag a caller would hold after reading `shipment`.
pub fn etag_of(shipment: &mto_shipment::Model) -> String {
    etag::generate(shipment.updated_at)
}
