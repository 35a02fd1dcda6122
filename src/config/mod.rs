//! Configuration loading and management.
//!
//! This module is split into logical submodules:
//! - [`types`]: Config struct definitions and serde defaults
//! - [`validation`]: Startup validation returning every problem found

mod types;
mod validation;

pub use types::{
    ApiConfig, Config, ConfigError, DashboardConfig, DatabaseConfig, RelayConfig, RosterConfig,
    SyncConfig,
};
pub use validation::{ValidationError, validate};
