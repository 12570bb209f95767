use std::{fmt, path::Path, sync::Arc};

use rocksdb::{Options, SliceTransform, WriteBatch, WriteOptions, DB};
use slot_store::{Blake3Hasher, DataBackend, Hash, Hasher as _, HASH_LEN};

/// A RocksDB data backend.
#[derive(Clone)]
pub struct RocksBackend {
    data: Arc<DB>,
    sync: bool,
}

impl RocksBackend {
    /// Opens a new RocksDB backend, creating the database if missing.
    pub fn open<P>(path: P) -> anyhow::Result<Self>
    where
        P: AsRef<Path>,
    {
        let mut opts = Options::default();

        let st = SliceTransform::create_fixed_prefix(HASH_LEN);

        opts.set_prefix_extractor(st);
        opts.create_if_missing(true);

        tracing::debug!("opening rocksdb at `{}`", path.as_ref().display());

        let data = DB::open(&opts, path)?;

        Ok(Self {
            data: Arc::new(data),
            sync: false,
        })
    }

    /// Flushes every write to disk before returning from it.
    pub fn with_sync(mut self, sync: bool) -> Self {
        self.sync = sync;
        self
    }

    /// Computes the prefix key.
    pub fn prefix(bytes: &[u8]) -> Hash {
        Blake3Hasher::digest([b"prefix".as_slice(), bytes])
    }

    fn key(prefix: &[u8], key: &[u8]) -> Vec<u8> {
        let prefix = Self::prefix(prefix);

        [prefix.as_slice(), key].concat()
    }

    fn write_options(&self) -> WriteOptions {
        let mut opts = WriteOptions::default();

        opts.set_sync(self.sync);

        opts
    }
}

impl fmt::Debug for RocksBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RocksBackend")
            .field("path", &self.data.path())
            .field("sync", &self.sync)
            .finish()
    }
}

impl DataBackend for RocksBackend {
    fn get(&self, prefix: &[u8], key: &[u8]) -> anyhow::Result<Option<Vec<u8>>> {
        let key = Self::key(prefix, key);

        Ok(self.data.get(&key)?)
    }

    fn has(&self, prefix: &[u8], key: &[u8]) -> anyhow::Result<bool> {
        let key = Self::key(prefix, key);

        Ok(self.data.get_pinned(&key)?.is_some())
    }

    fn set(&self, prefix: &[u8], key: &[u8], data: &[u8]) -> anyhow::Result<Option<Vec<u8>>> {
        let key = Self::key(prefix, key);
        let replaced = self.data.get(&key)?;

        self.data.put_opt(&key, data, &self.write_options())?;

        Ok(replaced)
    }

    fn set_batch(&self, prefix: &[u8], entries: &[(&[u8], &[u8])]) -> anyhow::Result<()> {
        let mut batch = WriteBatch::default();

        for (k, v) in entries {
            batch.put(Self::key(prefix, k), v);
        }

        self.data.write_opt(batch, &self.write_options())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use proptest::collection;
    use proptest::prelude::*;
    use slot_store::{ContractStorage, DataBackend};

    use crate::RocksBackend;

    #[test]
    fn raw_data_roundtrip() {
        let path = ::tempfile::tempdir().unwrap();
        let backend = RocksBackend::open(path.path()).unwrap();
        let prf = b"prefix";
        let key = b"key";

        assert!(backend.get(prf, key).unwrap().is_none());
        assert!(!backend.has(prf, key).unwrap());

        assert!(backend.set(prf, key, b"val").unwrap().is_none());
        assert!(backend.has(prf, key).unwrap());
        assert_eq!(
            backend.set(prf, key, b"vxl").unwrap(),
            Some(b"val".to_vec())
        );
        assert_eq!(backend.get(prf, key).unwrap(), Some(b"vxl".to_vec()));
        assert!(backend.get(b"other", key).unwrap().is_none());
    }

    proptest! {
        #[test]
        fn rocksdb_property_check(values in collection::vec(any::<u64>(), 1..50)) {
            let path = ::tempfile::tempdir().unwrap();
            let backend = RocksBackend::open(path.path()).unwrap();
            let storage = ContractStorage::new(backend, [7u8; 32]);

            for (i, v) in values.iter().enumerate() {
                let mut key = [0u8; 32];

                key[..8].copy_from_slice(&(i as u64).to_be_bytes());

                storage.put(&key, *v).unwrap();

                prop_assert_eq!(storage.get(&key).unwrap(), *v);
            }
        }
    }
}
