use anyhow::Context as _;

use crate::{
    Blake3Hasher, ContractId, DataBackend, Hash, Hasher as _, StorageKey, StorageSlot, Word,
};

/// Word storage of a single contract namespace.
pub trait Storage {
    /// Returns the latest value bound to the key, or `0` if the slot was never written.
    fn get(&self, key: &StorageKey) -> anyhow::Result<Word>;

    /// Overwrites the value bound to the key.
    fn put(&mut self, key: &StorageKey, value: Word) -> anyhow::Result<()>;
}

/// A handle to the storage namespace of a contract instance.
#[derive(Debug, Clone)]
pub struct ContractStorage<D: DataBackend> {
    data: D,
    contract: ContractId,
    namespace: Hash,
}

impl<D: DataBackend> ContractStorage<D> {
    /// Data backend prefix for contract namespaces.
    pub const PREFIX: &[u8] = b"contract-storage";

    /// Opens the namespace of the provided contract.
    pub fn new(data: D, contract: ContractId) -> Self {
        let namespace = Self::namespace_from_parts(&contract);

        Self {
            data,
            contract,
            namespace,
        }
    }

    /// Computes the backend prefix of a contract namespace.
    pub fn namespace_from_parts(contract: &ContractId) -> Hash {
        Blake3Hasher::digest([Self::PREFIX, contract.as_slice()])
    }

    /// Returns the contract owning the namespace.
    pub fn contract(&self) -> &ContractId {
        &self.contract
    }

    /// Returns the backend prefix of the namespace.
    pub fn namespace(&self) -> &Hash {
        &self.namespace
    }

    /// Returns the underlying data backend.
    pub fn data(&self) -> &D {
        &self.data
    }

    /// Returns the raw slot bound to the key, if written.
    pub fn get_slot(&self, key: &StorageKey) -> anyhow::Result<Option<StorageSlot>> {
        let value = match self.data.get(&self.namespace, key)? {
            Some(v) => v,
            None => return Ok(None),
        };

        StorageSlot::try_from_raw(*key, &value)
            .with_context(|| format!("corrupted slot `{}`", const_hex::encode(key)))
            .map(Some)
    }

    /// Returns `true` if the slot was ever written.
    pub fn has(&self, key: &StorageKey) -> anyhow::Result<bool> {
        self.data.has(&self.namespace, key)
    }

    /// Returns the word bound to the key, or `0` if the slot was never written.
    pub fn get(&self, key: &StorageKey) -> anyhow::Result<Word> {
        let word = self.get_slot(key)?.map(|s| s.word()).unwrap_or_default();

        tracing::trace!("read slot `{}`: {word}", const_hex::encode(key));

        Ok(word)
    }

    /// Overwrites the word bound to the key.
    pub fn put(&self, key: &StorageKey, value: Word) -> anyhow::Result<()> {
        tracing::trace!("write slot `{}`: {value}", const_hex::encode(key));

        let slot = StorageSlot::from_word(*key, value);

        self.data.set(&self.namespace, &slot.key, &slot.value)?;

        Ok(())
    }

    /// Writes all the slots at once.
    ///
    /// Either every slot is written or none is.
    pub fn put_slots(&self, slots: &[StorageSlot]) -> anyhow::Result<()> {
        let entries: Vec<(&[u8], &[u8])> = slots
            .iter()
            .map(|s| (s.key.as_slice(), s.value.as_slice()))
            .collect();

        self.data.set_batch(&self.namespace, &entries)
    }
}

impl<D: DataBackend> Storage for ContractStorage<D> {
    fn get(&self, key: &StorageKey) -> anyhow::Result<Word> {
        ContractStorage::get(self, key)
    }

    fn put(&mut self, key: &StorageKey, value: Word) -> anyhow::Result<()> {
        ContractStorage::put(self, key, value)
    }
}
