//! Mocks for the interfaces of the system.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use crate::{DataBackend, MemoryBackend};

/// A memory backend that fails on demand.
#[derive(Debug, Clone, Default)]
pub struct FaultyBackend {
    data: MemoryBackend,
    fail_reads: Arc<AtomicBool>,
    fail_writes: Arc<AtomicBool>,
}

impl FaultyBackend {
    /// Makes subsequent reads fail.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes subsequent writes fail.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Returns the wrapped backend.
    pub fn inner(&self) -> &MemoryBackend {
        &self.data
    }

    fn ensure_read(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.fail_reads.load(Ordering::SeqCst),
            "injected read fault"
        );

        Ok(())
    }

    fn ensure_write(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            !self.fail_writes.load(Ordering::SeqCst),
            "injected write fault"
        );

        Ok(())
    }
}

impl DataBackend for FaultyBackend {
    fn get(&self, prefix: &[u8], key: &[u8]) -> anyhow::Result<Option<Vec<u8>>> {
        self.ensure_read()?;
        self.data.get(prefix, key)
    }

    fn has(&self, prefix: &[u8], key: &[u8]) -> anyhow::Result<bool> {
        self.ensure_read()?;
        self.data.has(prefix, key)
    }

    fn set(&self, prefix: &[u8], key: &[u8], data: &[u8]) -> anyhow::Result<Option<Vec<u8>>> {
        self.ensure_write()?;
        self.data.set(prefix, key, data)
    }

    fn set_batch(&self, prefix: &[u8], entries: &[(&[u8], &[u8])]) -> anyhow::Result<()> {
        self.ensure_write()?;
        self.data.set_batch(prefix, entries)
    }
}
