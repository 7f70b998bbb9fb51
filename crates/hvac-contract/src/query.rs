//! Structured-filter construction for the `filterBy*` functions.
//!
//! Filters become [`Selector`] values, never query text assembled from
//! caller strings.

use hvac_core::{FIELD_BUILDING_ID, FIELD_INSTALLER_ID, FIELD_INSTALL_DATE, FIELD_MAINTENANCE_DATE};
use hvac_state::Selector;

use crate::error::{ContractError, ContractResult};

/// A single-predicate record filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    /// `Installer Id == id`
    InstallerIs(String),
    /// `Building Id == id`
    BuildingIs(String),
    /// `Date Installed < epoch`
    InstalledBefore(i64),
    /// `Maintenance Date > epoch`
    MaintainedAfter(i64),
}

impl Filter {
    pub fn to_selector(&self) -> Selector {
        match self {
            Filter::InstallerIs(id) => Selector::new().where_eq(FIELD_INSTALLER_ID, id.as_str()),
            Filter::BuildingIs(id) => Selector::new().where_eq(FIELD_BUILDING_ID, id.as_str()),
            Filter::InstalledBefore(epoch) => Selector::new().where_lt(FIELD_INSTALL_DATE, *epoch),
            Filter::MaintainedAfter(epoch) => {
                Selector::new().where_gt(FIELD_MAINTENANCE_DATE, *epoch)
            }
        }
    }
}

/// Parse a decimal epoch-seconds argument for `field`.
pub fn parse_epoch(field: &'static str, raw: &str) -> ContractResult<i64> {
    raw.parse::<i64>()
        .map_err(|source| ContractError::MalformedNumber {
            field,
            value: raw.to_string(),
            source,
        })
}
