pub mod shipment_repository;

pub use shipment_repository::{LoadedShipment, ShipmentAssociations, StorageFacilityWithAddress};
