//! Reads and writes of the shipment aggregate.
//!
//! Every function takes the connection it runs on so that use cases can keep
//! all of their reads and writes inside a single transaction.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder,
};
use tracing::error;
use uuid::Uuid;
use validator::Validate;

use crate::errors::{FieldErrors, ServiceError};
use crate::etag;
use crate::models::{
    address, entitlement, move_task_order, mto_service_item, mto_shipment, sit_extension,
    storage_facility,
};

/// Which associations to load alongside a shipment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ShipmentAssociations {
    pub addresses: bool,
    pub storage_facility: bool,
    pub service_items: bool,
    pub sit_extensions: bool,
}

impl ShipmentAssociations {
    pub fn all() -> Self {
        Self {
            addresses: true,
            storage_facility: true,
            service_items: true,
            sit_extensions: true,
        }
    }

    pub fn locations() -> Self {
        Self {
            addresses: true,
            storage_facility: true,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StorageFacilityWithAddress {
    pub facility: storage_facility::Model,
    pub address: address::Model,
}

/// A shipment together with the associations a use case asked for.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedShipment {
    pub shipment: mto_shipment::Model,
    pub move_task_order: move_task_order::Model,
    pub pickup_address: Option<address::Model>,
    pub destination_address: Option<address::Model>,
    pub secondary_pickup_address: Option<address::Model>,
    pub secondary_destination_address: Option<address::Model>,
    pub tertiary_pickup_address: Option<address::Model>,
    pub tertiary_destination_address: Option<address::Model>,
    pub storage_facility: Option<StorageFacilityWithAddress>,
    pub service_items: Vec<mto_service_item::Model>,
    pub sit_extensions: Vec<sit_extension::Model>,
}

impl LoadedShipment {
    pub fn id(&self) -> Uuid {
        self.shipment.id
    }

    pub fn etag(&self) -> String {
        etag::generate(self.shipment.updated_at)
    }
}

pub async fn find_shipment<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<mto_shipment::Model, ServiceError> {
    mto_shipment::Entity::find_by_id(id)
        .one(conn)
        .await
        .map_err(|e| {
            error!("Failed to find shipment {}: {}", id, e);
            ServiceError::db_error(e)
        })?
        .ok_or_else(|| ServiceError::not_found(id, "while looking for shipment"))
}

pub async fn find_move<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<move_task_order::Model, ServiceError> {
    move_task_order::Entity::find_by_id(id)
        .one(conn)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| ServiceError::not_found(id, "while looking for move"))
}

pub async fn find_entitlement<C: ConnectionTrait>(
    conn: &C,
    move_id: Uuid,
) -> Result<entitlement::Model, ServiceError> {
    entitlement::Entity::find()
        .filter(entitlement::Column::MoveId.eq(move_id))
        .one(conn)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| ServiceError::not_found(move_id, "while looking for move entitlement"))
}

pub async fn find_sit_extension<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<sit_extension::Model, ServiceError> {
    sit_extension::Entity::find_by_id(id)
        .one(conn)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| ServiceError::not_found(id, "while looking for SIT extension"))
}

async fn find_address<C: ConnectionTrait>(
    conn: &C,
    id: Option<Uuid>,
) -> Result<Option<address::Model>, ServiceError> {
    let Some(id) = id else {
        return Ok(None);
    };
    address::Entity::find_by_id(id)
        .one(conn)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| ServiceError::not_found(id, "while looking for address"))
        .map(Some)
}

async fn find_storage_facility<C: ConnectionTrait>(
    conn: &C,
    id: Option<Uuid>,
) -> Result<Option<StorageFacilityWithAddress>, ServiceError> {
    let Some(id) = id else {
        return Ok(None);
    };
    let facility = storage_facility::Entity::find_by_id(id)
        .one(conn)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| ServiceError::not_found(id, "while looking for storage facility"))?;
    let address = address::Entity::find_by_id(facility.address_id)
        .one(conn)
        .await
        .map_err(ServiceError::db_error)?
        .ok_or_else(|| {
            ServiceError::not_found(facility.address_id, "while looking for storage facility address")
        })?;
    Ok(Some(StorageFacilityWithAddress { facility, address }))
}

/// Fetches a shipment, its move and the requested associations.
pub async fn load_shipment<C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
    associations: ShipmentAssociations,
) -> Result<LoadedShipment, ServiceError> {
    let shipment = find_shipment(conn, id).await?;
    let move_task_order = find_move(conn, shipment.move_id).await?;

    let mut loaded = LoadedShipment {
        shipment,
        move_task_order,
        pickup_address: None,
        destination_address: None,
        secondary_pickup_address: None,
        secondary_destination_address: None,
        tertiary_pickup_address: None,
        tertiary_destination_address: None,
        storage_facility: None,
        service_items: Vec::new(),
        sit_extensions: Vec::new(),
    };

    if associations.addresses {
        let s = &loaded.shipment;
        let (pickup, destination) = (s.pickup_address_id, s.destination_address_id);
        let (secondary_pickup, secondary_destination) =
            (s.secondary_pickup_address_id, s.secondary_destination_address_id);
        let (tertiary_pickup, tertiary_destination) =
            (s.tertiary_pickup_address_id, s.tertiary_destination_address_id);
        loaded.pickup_address = find_address(conn, pickup).await?;
        loaded.destination_address = find_address(conn, destination).await?;
        loaded.secondary_pickup_address = find_address(conn, secondary_pickup).await?;
        loaded.secondary_destination_address = find_address(conn, secondary_destination).await?;
        loaded.tertiary_pickup_address = find_address(conn, tertiary_pickup).await?;
        loaded.tertiary_destination_address = find_address(conn, tertiary_destination).await?;
    }

    if associations.storage_facility {
        loaded.storage_facility =
            find_storage_facility(conn, loaded.shipment.storage_facility_id).await?;
    }

    if associations.service_items {
        loaded.service_items = mto_service_item::Entity::find()
            .filter(mto_service_item::Column::ShipmentId.eq(id))
            .order_by_asc(mto_service_item::Column::CreatedAt)
            .all(conn)
            .await
            .map_err(ServiceError::db_error)?;
    }

    if associations.sit_extensions {
        loaded.sit_extensions = sit_extension::Entity::find()
            .filter(sit_extension::Column::ShipmentId.eq(id))
            .order_by_asc(sit_extension::Column::CreatedAt)
            .all(conn)
            .await
            .map_err(ServiceError::db_error)?;
    }

    Ok(loaded)
}

/// All shipments on a move, oldest first.
pub async fn shipments_for_move<C: ConnectionTrait>(
    conn: &C,
    move_id: Uuid,
) -> Result<Vec<mto_shipment::Model>, ServiceError> {
    mto_shipment::Entity::find()
        .filter(mto_shipment::Column::MoveId.eq(move_id))
        .order_by_asc(mto_shipment::Column::CreatedAt)
        .all(conn)
        .await
        .map_err(ServiceError::db_error)
}

/// Number of service items already attached to a shipment.
pub async fn count_service_items<C: ConnectionTrait>(
    conn: &C,
    shipment_id: Uuid,
) -> Result<u64, ServiceError> {
    mto_service_item::Entity::find()
        .filter(mto_service_item::Column::ShipmentId.eq(shipment_id))
        .count(conn)
        .await
        .map_err(ServiceError::db_error)
}

/// Fails with `PreconditionFailed` unless `supplied` matches the stored shipment.
pub fn check_etag(shipment: &mto_shipment::Model, supplied: &str) -> Result<(), ServiceError> {
    if etag::matches(supplied, shipment.updated_at) {
        Ok(())
    } else {
        Err(ServiceError::precondition_failed(
            shipment.id,
            "eTag does not match the current version of the shipment",
        ))
    }
}

/// Runs model-level validation, returning the failures as `InvalidInput`.
pub fn validate_model<M: Validate>(id: Uuid, model: &M) -> Result<(), ServiceError> {
    model.validate().map_err(|e| {
        ServiceError::invalid_input(id, FieldErrors::from(e), "invalid input found while validating")
    })
}

/// Writes every column of `shipment`, guarded on the `updated_at` that was read.
///
/// Returns the stored row. A concurrent write in between surfaces as
/// `PreconditionFailed`.
pub async fn save_shipment<C: ConnectionTrait>(
    conn: &C,
    shipment: &mto_shipment::Model,
) -> Result<mto_shipment::Model, ServiceError> {
    validate_model(shipment.id, shipment)?;

    let previous = shipment.updated_at;
    let mut next = shipment.clone();
    next.updated_at = etag::next_timestamp(previous);

    let active = next.into_active_model().reset_all();
    mto_shipment::Entity::update(active)
        .filter(mto_shipment::Column::UpdatedAt.eq(previous))
        .exec(conn)
        .await
        .map_err(|e| {
            error!("Failed to save shipment {}: {}", shipment.id, e);
            ServiceError::from_write(shipment.id, e)
        })
}
