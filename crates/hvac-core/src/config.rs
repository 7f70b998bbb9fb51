//! hvac.toml configuration parser.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::record::DEFAULT_KEY_PREFIX;

/// Name of the redb file created inside `store.data_dir`.
pub const LEDGER_FILE_NAME: &str = "ledger.redb";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub store: StoreConfig,
    pub ledger: KeySpaceConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub data_dir: PathBuf,
    /// Use an ephemeral in-memory store instead of `data_dir`.
    pub in_memory: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeySpaceConfig {
    pub key_prefix: String,
    /// Suffix of the exclusive upper bound of the fetch-all range scan.
    pub range_end: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
    pub filter: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            in_memory: false,
        }
    }
}

impl Default for KeySpaceConfig {
    fn default() -> Self {
        Self {
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
            range_end: "999".to_string(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl LedgerConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Full path of the on-disk ledger file.
    pub fn ledger_path(&self) -> PathBuf {
        self.store.data_dir.join(LEDGER_FILE_NAME)
    }
}

impl KeySpaceConfig {
    /// Inclusive start and exclusive end of the fetch-all range scan.
    pub fn range_bounds(&self) -> (String, String) {
        (
            format!("{}0", self.key_prefix),
            format!("{}{}", self.key_prefix, self.range_end),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config: LedgerConfig = toml::from_str("").unwrap();
        assert_eq!(config, LedgerConfig::default());
        assert_eq!(
            config.ledger.range_bounds(),
            ("Maintenance0".to_string(), "Maintenance999".to_string())
        );
    }

    #[test]
    fn parse_partial_sections() {
        let toml_str = r#"
[store]
in_memory = true

[ledger]
key_prefix = "Unit"
"#;
        let config: LedgerConfig = toml::from_str(toml_str).unwrap();
        assert!(config.store.in_memory);
        assert_eq!(config.store.data_dir, PathBuf::from("./data"));
        assert_eq!(config.ledger.key_prefix, "Unit");
        assert_eq!(config.ledger.range_end, "999");
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hvac.toml");
        let state_dir = dir.path().join("state");
        std::fs::write(
            &path,
            format!(
                "[store]\ndata_dir = {:?}\n\n[log]\nfilter = \"debug\"\n",
                state_dir.display().to_string()
            ),
        )
        .unwrap();

        let loaded = LedgerConfig::from_file(&path).unwrap();
        assert_eq!(loaded.store.data_dir, state_dir);
        assert_eq!(loaded.log.filter, "debug");
        assert_eq!(loaded.ledger, KeySpaceConfig::default());
        assert_eq!(loaded.ledger_path(), state_dir.join(LEDGER_FILE_NAME));
    }

    #[test]
    fn missing_file_reports_path() {
        let err = LedgerConfig::from_file(Path::new("/nonexistent/hvac.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/hvac.toml"));
    }
}
