// Domain rules
pub mod authorized_weight;
pub mod required_delivery_date;
pub mod shipment_router;
pub mod sit_status;
pub mod validation;

// Collaborators with database-backed defaults
pub mod move_router;
pub mod move_weights;
pub mod service_items;

// Facades over the commands
pub mod shipments;
pub mod sit_extensions;
