//! Operation handlers and function dispatch.

use hvac_core::config::KeySpaceConfig;
use hvac_core::{
    FIELD_INSTALL_DATE, FIELD_MAINTENANCE_DATE, MaintenanceRecord, record_key, seed_records,
};
use hvac_state::LedgerStore;
use tracing::{debug, info, warn};

use crate::assemble::assemble_results;
use crate::error::{ContractError, ContractResult};
use crate::function::Function;
use crate::invocation::{InvocationContext, Response};
use crate::query::{Filter, parse_epoch};

/// The maintenance-record contract.
///
/// Holds only the key-space layout; the store is passed to every call.
#[derive(Debug, Clone, Default)]
pub struct MaintenanceContract {
    key_space: KeySpaceConfig,
}

/// First positional argument, for functions that need at least one.
fn first_arg(args: &[String]) -> ContractResult<&str> {
    match args {
        [first, ..] => Ok(first.as_str()),
        [] => Err(ContractError::ArgumentCount {
            expected: 1,
            got: 0,
        }),
    }
}

impl MaintenanceContract {
    pub fn new(key_space: KeySpaceConfig) -> Self {
        Self { key_space }
    }

    /// Instantiation hook. Touches no state.
    pub fn init(&self) -> Response {
        Response::success(Vec::new())
    }

    /// Resolve the context's function name and run it, mapping any failure
    /// to an error response.
    pub fn invoke<S>(&self, store: &S, ctx: &dyn InvocationContext) -> Response
    where
        S: LedgerStore + ?Sized,
    {
        let name = ctx.function_name();
        let result = name
            .parse::<Function>()
            .and_then(|function| self.call(store, function, ctx.args()));

        match result {
            Ok(payload) => {
                info!(function = %name, bytes = payload.len(), "invocation succeeded");
                Response::success(payload)
            }
            Err(e) => {
                warn!(function = %name, kind = ?e.kind(), error = %e, "invocation failed");
                Response::error(&e)
            }
        }
    }

    /// Run `function` with positional `args`.
    pub fn call<S>(&self, store: &S, function: Function, args: &[String]) -> ContractResult<Vec<u8>>
    where
        S: LedgerStore + ?Sized,
    {
        debug!(%function, args = args.len(), "dispatching");
        function.arity().check(args.len())?;
        match function {
            Function::InitLedger => self.init_ledger(store),
            Function::CreateNewMaintenance => self.create_new_maintenance(store, args),
            Function::ShowSingleMaintenance => self.show_single_maintenance(store, args),
            Function::ShowAllHvacMaintenance => self.show_all_maintenance(store),
            Function::FilterByInstallerId => {
                let id = first_arg(args)?;
                self.filter(store, &Filter::InstallerIs(id.to_string()))
            }
            Function::FilterByBuildingId => {
                let id = first_arg(args)?;
                self.filter(store, &Filter::BuildingIs(id.to_string()))
            }
            Function::FilterByInstallDates => {
                let epoch = parse_epoch(FIELD_INSTALL_DATE, first_arg(args)?)?;
                self.filter(store, &Filter::InstalledBefore(epoch))
            }
            Function::FilterByMaintenanceDate => {
                let epoch = parse_epoch(FIELD_MAINTENANCE_DATE, first_arg(args)?)?;
                self.filter(store, &Filter::MaintainedAfter(epoch))
            }
        }
    }

    /// Write the four seed records under `{prefix}0` … `{prefix}3`,
    /// overwriting whatever is there.
    pub fn init_ledger<S>(&self, store: &S) -> ContractResult<Vec<u8>>
    where
        S: LedgerStore + ?Sized,
    {
        let records = seed_records();
        for (index, record) in records.iter().enumerate() {
            let key = record_key(&self.key_space.key_prefix, index);
            store.put_state(&key, &record.to_bytes()?)?;
            debug!(%key, building = %record.building_id, "seed record written");
        }
        info!(count = records.len(), "ledger seeded");
        Ok(Vec::new())
    }

    /// `key, installDate, maintenanceDate, buildingId, installerId`
    pub fn create_new_maintenance<S>(&self, store: &S, args: &[String]) -> ContractResult<Vec<u8>>
    where
        S: LedgerStore + ?Sized,
    {
        let [key, install_date, maintenance_date, building_id, installer_id] = args else {
            return Err(ContractError::ArgumentCount {
                expected: 5,
                got: args.len(),
            });
        };

        let record = MaintenanceRecord::new(
            parse_epoch(FIELD_INSTALL_DATE, install_date)?,
            parse_epoch(FIELD_MAINTENANCE_DATE, maintenance_date)?,
            building_id.as_str(),
            installer_id.as_str(),
        );
        store.put_state(key, &record.to_bytes()?)?;
        info!(%key, "maintenance record created");
        Ok(Vec::new())
    }

    /// Stored bytes at `key`. An absent key answers with an empty payload.
    pub fn show_single_maintenance<S>(&self, store: &S, args: &[String]) -> ContractResult<Vec<u8>>
    where
        S: LedgerStore + ?Sized,
    {
        let [key] = args else {
            return Err(ContractError::ArgumentCount {
                expected: 1,
                got: args.len(),
            });
        };

        match store.get_state(key)? {
            Some(bytes) => Ok(bytes),
            None => {
                debug!(%key, "no record at key");
                Ok(Vec::new())
            }
        }
    }

    /// Every record in `[{prefix}0, {prefix}{range_end})`, in key order.
    pub fn show_all_maintenance<S>(&self, store: &S) -> ContractResult<Vec<u8>>
    where
        S: LedgerStore + ?Sized,
    {
        let (start, end) = self.key_space.range_bounds();
        let entries = store.get_state_by_range(&start, &end)?;
        assemble_results(entries)
    }

    /// Every record matching `filter`, in key order.
    pub fn filter<S>(&self, store: &S, filter: &Filter) -> ContractResult<Vec<u8>>
    where
        S: LedgerStore + ?Sized,
    {
        let selector = filter.to_selector();
        debug!(query = %selector, "issuing rich query");
        let entries = store.get_query_result(&selector)?;
        assemble_results(entries)
    }
}
