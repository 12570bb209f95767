use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

/// Data backend used to persist contract storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Volatile, process local.
    Memory,
    /// On-disk RocksDB database.
    Rocksdb,
    /// Redis server.
    Redis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub backend: BackendKind,
    pub rocksdb_path: PathBuf,
    pub rocksdb_sync: bool,
    pub redis_url: Option<String>,
    pub redis_namespace: String,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        let rocksdb_path = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(env!("CARGO_PKG_NAME"))
            .join("db");

        Self {
            backend: BackendKind::Rocksdb,
            rocksdb_path,
            rocksdb_sync: true,
            redis_url: None,
            redis_namespace: String::from("slot-store"),
            log_filter: String::from("info"),
        }
    }
}

impl Config {
    pub fn create_or_read_default() -> anyhow::Result<(PathBuf, Self)> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("failed to compute config dir"))?
            .join(env!("CARGO_PKG_NAME"));

        fs::create_dir_all(&config_dir).ok();

        let config = config_dir.join("config.toml");
        if config.exists() && !config.is_file() {
            anyhow::bail!(
                "the provided config path `{}` is not a valid path",
                config.display()
            );
        } else if config.is_file() {
            return Self::from_path(&config);
        }

        let slf = Self::default();

        fs::write(&config, toml::to_string(&slf)?)?;

        Ok((config, slf))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> anyhow::Result<(PathBuf, Self)> {
        let toml_str = fs::read_to_string(path.as_ref())?;

        Ok((path.as_ref().to_path_buf(), toml::from_str(&toml_str)?))
    }
}
