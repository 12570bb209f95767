use std::{fmt, fs};

use slot_store::{DataBackend, MemoryBackend};
use slot_store_redis::RedisBackend;
use slot_store_rocksdb::RocksBackend;

use crate::{BackendKind, Config};

#[derive(Debug, Clone)]
pub enum CliBackend {
    Memory(MemoryBackend),
    Rocks(RocksBackend),
    Redis(RedisBackend),
}

impl CliBackend {
    /// Opens the backend selected by the configuration.
    pub fn open(config: &Config) -> anyhow::Result<Self> {
        Ok(match config.backend {
            BackendKind::Memory => Self::Memory(Default::default()),

            BackendKind::Rocksdb => {
                fs::create_dir_all(&config.rocksdb_path)?;

                RocksBackend::open(&config.rocksdb_path)?
                    .with_sync(config.rocksdb_sync)
                    .into()
            }

            BackendKind::Redis => {
                let url = config
                    .redis_url
                    .as_deref()
                    .ok_or_else(|| anyhow::anyhow!("the redis backend requires `redis_url`"))?;

                RedisBackend::open(url)?
                    .with_namespace(config.redis_namespace.as_str())
                    .into()
            }
        })
    }
}

impl Default for CliBackend {
    fn default() -> Self {
        Self::Memory(Default::default())
    }
}

impl From<MemoryBackend> for CliBackend {
    fn from(b: MemoryBackend) -> Self {
        Self::Memory(b)
    }
}

impl From<RocksBackend> for CliBackend {
    fn from(b: RocksBackend) -> Self {
        Self::Rocks(b)
    }
}

impl From<RedisBackend> for CliBackend {
    fn from(b: RedisBackend) -> Self {
        Self::Redis(b)
    }
}

impl DataBackend for CliBackend {
    fn get(&self, prefix: &[u8], key: &[u8]) -> anyhow::Result<Option<Vec<u8>>> {
        match self {
            CliBackend::Memory(b) => b.get(prefix, key),
            CliBackend::Rocks(b) => b.get(prefix, key),
            CliBackend::Redis(b) => b.get(prefix, key),
        }
    }

    fn has(&self, prefix: &[u8], key: &[u8]) -> anyhow::Result<bool> {
        match self {
            CliBackend::Memory(b) => b.has(prefix, key),
            CliBackend::Rocks(b) => b.has(prefix, key),
            CliBackend::Redis(b) => b.has(prefix, key),
        }
    }

    fn set(&self, prefix: &[u8], key: &[u8], data: &[u8]) -> anyhow::Result<Option<Vec<u8>>> {
        match self {
            CliBackend::Memory(b) => b.set(prefix, key, data),
            CliBackend::Rocks(b) => b.set(prefix, key, data),
            CliBackend::Redis(b) => b.set(prefix, key, data),
        }
    }

    fn set_batch(&self, prefix: &[u8], entries: &[(&[u8], &[u8])]) -> anyhow::Result<()> {
        match self {
            CliBackend::Memory(b) => b.set_batch(prefix, entries),
            CliBackend::Rocks(b) => b.set_batch(prefix, entries),
            CliBackend::Redis(b) => b.set_batch(prefix, entries),
        }
    }
}

impl fmt::Display for CliBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliBackend::Memory(_) => write!(f, "memory"),
            CliBackend::Rocks(_) => write!(f, "rocksdb"),
            CliBackend::Redis(_) => write!(f, "redis"),
        }
    }
}
