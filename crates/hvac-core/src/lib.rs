//! hvac-core: shared types for the HVAC maintenance ledger.
//!
//! Holds the [`MaintenanceRecord`] schema (whose serialized field labels are
//! what rich queries match on), the fixed seed data, and the `hvac.toml`
//! configuration parser.

pub mod config;
pub mod record;

pub use config::{ConfigError, LedgerConfig};
pub use record::*;
