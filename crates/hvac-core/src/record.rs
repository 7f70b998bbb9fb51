//! Maintenance record schema.
//!
//! Records are stored as JSON. The serde labels below are part of the
//! persisted format: structured queries address fields by these exact
//! strings, so they must never change.

use serde::{Deserialize, Serialize};

/// JSON label of [`MaintenanceRecord::install_date`].
pub const FIELD_INSTALL_DATE: &str = "Date Installed";

/// JSON label of [`MaintenanceRecord::maintenance_date`].
pub const FIELD_MAINTENANCE_DATE: &str = "Maintenance Date";

/// JSON label of [`MaintenanceRecord::building_id`].
pub const FIELD_BUILDING_ID: &str = "Building Id";

/// JSON label of [`MaintenanceRecord::installer_id`].
pub const FIELD_INSTALLER_ID: &str = "Installer Id";

/// Key prefix used by the seed data and the fetch-all range scan.
pub const DEFAULT_KEY_PREFIX: &str = "Maintenance";

/// A single equipment-maintenance entry.
///
/// The storage key is not part of the record; callers pick it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MaintenanceRecord {
    /// Unix timestamp (seconds) of installation.
    #[serde(rename = "Date Installed")]
    pub install_date: i64,
    /// Unix timestamp (seconds) of the maintenance visit.
    #[serde(rename = "Maintenance Date")]
    pub maintenance_date: i64,
    #[serde(rename = "Building Id")]
    pub building_id: String,
    #[serde(rename = "Installer Id")]
    pub installer_id: String,
}

impl MaintenanceRecord {
    pub fn new(
        install_date: i64,
        maintenance_date: i64,
        building_id: impl Into<String>,
        installer_id: impl Into<String>,
    ) -> Self {
        Self {
            install_date,
            maintenance_date,
            building_id: building_id.into(),
            installer_id: installer_id.into(),
        }
    }

    /// Serialize to the stored JSON byte form.
    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    /// Decode a stored record.
    pub fn from_bytes(bytes: &[u8]) -> serde_json::Result<Self> {
        serde_json::from_slice(bytes)
    }
}

/// Build the storage key for seed slot `index` (`{prefix}{index}`).
pub fn record_key(prefix: &str, index: usize) -> String {
    format!("{prefix}{index}")
}

/// The four records written by the seed operation, in slot order.
pub fn seed_records() -> [MaintenanceRecord; 4] {
    [
        MaintenanceRecord::new(1542931200, 1548201600, "500A", "0005679"),
        MaintenanceRecord::new(1542844800, 1548201600, "500B", "0005678"),
        MaintenanceRecord::new(1542844800, 1548301600, "400C", "0005689"),
        MaintenanceRecord::new(1542931200, 1548301600, "500A", "0005679"),
    ]
}
