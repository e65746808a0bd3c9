pub mod address;
pub mod domestic_transit_time;
pub mod entitlement;
pub mod move_task_order;
pub mod mto_service_item;
pub mod mto_shipment;
pub mod reweigh;
pub mod sit_extension;
pub mod storage_facility;
