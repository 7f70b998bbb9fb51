use std::path::{Path, PathBuf};

use anyhow::Context;
use hvac_contract::{Invocation, MaintenanceContract, Response};
use hvac_core::LedgerConfig;
use hvac_state::RedbLedger;
use tracing::info;

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG: &str = "hvac.toml";

/// Load the config file (explicit, or `./hvac.toml` if present, or defaults)
/// and apply command-line overrides.
pub fn load_config(
    path: Option<&Path>,
    data_dir: Option<PathBuf>,
    in_memory: bool,
) -> anyhow::Result<LedgerConfig> {
    let mut config = match path {
        Some(path) => LedgerConfig::from_file(path)?,
        None if Path::new(DEFAULT_CONFIG).is_file() => {
            LedgerConfig::from_file(Path::new(DEFAULT_CONFIG))?
        }
        None => LedgerConfig::default(),
    };

    if let Some(dir) = data_dir {
        config.store.data_dir = dir;
    }
    if in_memory {
        config.store.in_memory = true;
    }
    Ok(config)
}

pub fn open_store(config: &LedgerConfig) -> anyhow::Result<RedbLedger> {
    if config.store.in_memory {
        info!("using in-memory ledger");
        return Ok(RedbLedger::open_in_memory()?);
    }

    std::fs::create_dir_all(&config.store.data_dir).with_context(|| {
        format!("failed to create data dir {}", config.store.data_dir.display())
    })?;
    let path = config.ledger_path();
    let store = RedbLedger::open(&path)?;
    info!(path = ?path, "ledger opened");
    Ok(store)
}

/// Run one invocation against a freshly opened ledger. `None` runs the
/// instantiation hook, which needs no store.
pub fn run(invocation: Option<Invocation>, config: &LedgerConfig) -> anyhow::Result<Response> {
    let contract = MaintenanceContract::new(config.ledger.clone());
    let Some(invocation) = invocation else {
        return Ok(contract.init());
    };

    let store = open_store(config)?;
    Ok(contract.invoke(&store, &invocation))
}

#[cfg(test)]
mod tests {
    use hvac_contract::{ErrorKind, Function};

    use super::*;

    fn on_disk(dir: &Path) -> LedgerConfig {
        load_config(None, Some(dir.join("state")), false).unwrap()
    }

    #[test]
    fn overrides_win_over_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hvac.toml");
        std::fs::write(&path, "[store]\ndata_dir = \"/from/file\"\n").unwrap();

        let config = load_config(Some(path.as_path()), Some(dir.path().to_path_buf()), true).unwrap();
        assert_eq!(config.store.data_dir, dir.path());
        assert!(config.store.in_memory);
    }

    #[test]
    fn explicit_missing_config_is_an_error() {
        assert!(load_config(Some(Path::new("/nonexistent/hvac.toml")), None, false).is_err());
    }

    #[test]
    fn records_persist_across_runs() {
        let dir = tempfile::tempdir().unwrap();
        let config = on_disk(dir.path());

        let seeded = run(
            Some(Invocation::call(Function::InitLedger, Vec::<String>::new())),
            &config,
        )
        .unwrap();
        assert!(seeded.is_success());
        assert!(config.ledger_path().exists());

        let shown = run(
            Some(Invocation::call(Function::ShowSingleMaintenance, ["Maintenance2"])),
            &config,
        )
        .unwrap();
        let record = hvac_core::MaintenanceRecord::from_bytes(&shown.payload).unwrap();
        assert_eq!(record.building_id, "400C");
    }

    #[test]
    fn init_hook_skips_store() {
        let dir = tempfile::tempdir().unwrap();
        let config = on_disk(dir.path());

        let resp = run(None, &config).unwrap();
        assert!(resp.is_success());
        assert!(!config.ledger_path().exists());
    }

    #[test]
    fn in_memory_runs_do_not_share_state() {
        let config = load_config(None, None, true).unwrap();
        run(
            Some(Invocation::call(Function::InitLedger, Vec::<String>::new())),
            &config,
        )
        .unwrap();

        let resp = run(
            Some(Invocation::call(Function::ShowAllHvacMaintenance, Vec::<String>::new())),
            &config,
        )
        .unwrap();
        assert_eq!(resp.payload, b"[]");
    }

    #[test]
    fn contract_errors_are_responses_not_failures() {
        let config = load_config(None, None, true).unwrap();
        let resp = run(Some(Invocation::new("createNewMaintenance", ["k"])), &config).unwrap();
        assert_eq!(resp.kind, Some(ErrorKind::ArgumentCount));
    }
}
