//! hvac-contract: the maintenance-record contract.
//!
//! A host hands the contract a [`LedgerStore`](hvac_state::LedgerStore) and
//! an [`InvocationContext`] (function name plus positional string
//! arguments); the contract runs one [`Function`] to completion and answers
//! with a [`Response`].
//!
//! # Functions
//!
//! | Name | Args | Effect |
//! |---|---|---|
//! | `initLedger` | – | write the four seed records |
//! | `createNewMaintenance` | key, installDate, maintenanceDate, buildingId, installerId | write one record |
//! | `showSingleMaintenance` | key | stored bytes, empty if absent |
//! | `showAllHvacMaintenance` | – | range scan over the seed key space |
//! | `filterByInstallerID` | installerId | `Installer Id == arg` |
//! | `filterByBuildingId` | buildingId | `Building Id == arg` |
//! | `filterByInstallDates` | epoch | `Date Installed < arg` |
//! | `filterByMaintenanceDate` | epoch | `Maintenance Date > arg` |
//!
//! The contract keeps no state between invocations; every call is a fresh
//! read or write against the store.

pub mod assemble;
pub mod contract;
pub mod error;
pub mod function;
pub mod invocation;
pub mod query;

pub use assemble::assemble_results;
pub use contract::MaintenanceContract;
pub use error::{ContractError, ContractResult, ErrorKind};
pub use function::{Arity, Function};
pub use invocation::{Invocation, InvocationContext, Response};
pub use query::Filter;
