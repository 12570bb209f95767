use std::collections::BTreeMap;

use crate::{ContractStorage, DataBackend, Storage, StorageKey, StorageSlot, Word};

/// The write set of a single invocation.
///
/// Reads observe the pending writes of the invocation first. Nothing reaches the data backend
/// until [`Journal::commit`]; dropping the journal discards the writes.
#[derive(Debug)]
pub struct Journal<'a, D: DataBackend> {
    storage: &'a ContractStorage<D>,
    writes: BTreeMap<StorageKey, Word>,
}

impl<'a, D: DataBackend> Journal<'a, D> {
    /// Opens an empty journal over the namespace.
    pub fn new(storage: &'a ContractStorage<D>) -> Self {
        Self {
            storage,
            writes: BTreeMap::new(),
        }
    }

    /// Returns the number of pending slot writes.
    pub fn len(&self) -> usize {
        self.writes.len()
    }

    /// Returns `true` if no slot was written.
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    /// Returns the pending writes as full slots, ordered by key.
    pub fn slots(&self) -> Vec<StorageSlot> {
        self.writes
            .iter()
            .map(|(k, v)| StorageSlot::from_word(*k, *v))
            .collect()
    }

    /// Writes the pending slots into the namespace with a single batch.
    ///
    /// Returns the number of committed slots.
    pub fn commit(self) -> anyhow::Result<usize> {
        let slots = self.slots();

        if !slots.is_empty() {
            self.storage.put_slots(&slots)?;
        }

        Ok(slots.len())
    }
}

impl<D: DataBackend> Storage for Journal<'_, D> {
    fn get(&self, key: &StorageKey) -> anyhow::Result<Word> {
        match self.writes.get(key) {
            Some(w) => Ok(*w),
            None => self.storage.get(key),
        }
    }

    fn put(&mut self, key: &StorageKey, value: Word) -> anyhow::Result<()> {
        self.writes.insert(*key, value);

        Ok(())
    }
}
