//! Shipment lifecycle core
//!
//! Status routing, required-delivery-date and SIT accounting, and the
//! approval orchestration for household-goods shipments.
#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]
#![allow(elided_lifetimes_in_paths)]
#![warn(clippy::all, clippy::perf, clippy::dbg_macro)]

pub mod commands;
pub mod config;
pub mod db;
pub mod errors;
pub mod etag;
pub mod events;
pub mod migrator;
pub mod models;
pub mod repositories;
pub mod services;

pub use commands::{Command, CommandContext};
pub use errors::ServiceError;
pub use services::shipments::ShipmentLifecycleService;
pub use services::sit_extensions::SitExtensionService;
