//! Core library for the `weatherdash` CLI.
//!
//! This crate defines:
//! - Configuration handling for the dashboard backend address
//! - An HTTP client for the dashboard's temperature and ETL endpoints
//! - The temperature lookup flow and its notification seam
//!
//! It is used by `weatherdash-cli`, but can also be reused by other binaries or services.

pub mod client;
pub mod config;
pub mod error;
pub mod lookup;
pub mod model;
pub mod notify;

pub use client::{DashboardClient, TemperatureSource};
pub use config::{Config, DEFAULT_BASE_URL};
pub use error::{BackendError, LookupError};
pub use lookup::TemperatureLookup;
pub use model::{CleanedRecord, EtlStatus, HealthReport, RunAck};
pub use notify::{MemoryNotifier, Notify, StdoutNotifier};
