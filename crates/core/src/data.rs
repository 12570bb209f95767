use std::sync::Arc;

use hashbrown::HashMap;
use parking_lot::Mutex;

use crate::{Blake3Hasher, Hash, Hasher as _};

/// A generic data backend to support multiple contexts.
///
/// Implementations are cheap handles to shared state; clones observe the same data.
pub trait DataBackend: Clone {
    /// Returns the underlying data from the backend.
    fn get(&self, prefix: &[u8], key: &[u8]) -> anyhow::Result<Option<Vec<u8>>>;

    /// Returns `true` if the provided data exists within the set.
    fn has(&self, prefix: &[u8], key: &[u8]) -> anyhow::Result<bool>;

    /// Replaces the underlying data from the backend.
    ///
    /// Returns the previous data, if existed.
    fn set(&self, prefix: &[u8], key: &[u8], data: &[u8]) -> anyhow::Result<Option<Vec<u8>>>;

    /// Replaces all the provided entries under the prefix.
    ///
    /// Either every entry is written or none is.
    fn set_batch(&self, prefix: &[u8], entries: &[(&[u8], &[u8])]) -> anyhow::Result<()>;
}

/// A memory data backend.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    data: Arc<Mutex<HashMap<Hash, Vec<u8>>>>,
}

impl MemoryBackend {
    /// Domain separator of the stored keys.
    pub const PREFIX: &[u8] = b"data";

    fn key(prefix: &[u8], key: &[u8]) -> Hash {
        Blake3Hasher::digest([Self::PREFIX, prefix, key])
    }

    /// Returns the number of stored entries, across all prefixes.
    pub fn len(&self) -> usize {
        self.data.lock().len()
    }

    /// Returns `true` if nothing was ever written.
    pub fn is_empty(&self) -> bool {
        self.data.lock().is_empty()
    }
}

impl DataBackend for MemoryBackend {
    fn get(&self, prefix: &[u8], key: &[u8]) -> anyhow::Result<Option<Vec<u8>>> {
        let key = Self::key(prefix, key);

        Ok(self.data.lock().get(&key).cloned())
    }

    fn has(&self, prefix: &[u8], key: &[u8]) -> anyhow::Result<bool> {
        let key = Self::key(prefix, key);

        Ok(self.data.lock().contains_key(&key))
    }

    fn set(&self, prefix: &[u8], key: &[u8], data: &[u8]) -> anyhow::Result<Option<Vec<u8>>> {
        let key = Self::key(prefix, key);

        Ok(self.data.lock().insert(key, data.to_vec()))
    }

    fn set_batch(&self, prefix: &[u8], entries: &[(&[u8], &[u8])]) -> anyhow::Result<()> {
        let entries: Vec<_> = entries
            .iter()
            .map(|(k, v)| (Self::key(prefix, k), v.to_vec()))
            .collect();

        self.data.lock().extend(entries);

        Ok(())
    }
}
