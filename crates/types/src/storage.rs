use msgpacker::MsgPacker;
use serde::{Deserialize, Serialize};

use crate::{Hash, HASH_LEN};

/// Byte length of a word.
pub const WORD_SIZE: usize = 8;

/// A word value, the unit persisted by a single storage write.
pub type Word = u64;

/// A storage slot address within a contract namespace.
pub type StorageKey = Hash;

/// The unique identifier of a contract instance.
///
/// Each identifier owns a distinct storage namespace.
pub type ContractId = Hash;

/// The slot of the contract counter value.
///
/// Deployments expect the value at this exact address; it must never change.
pub const COUNTER_KEY: StorageKey = [0u8; HASH_LEN];

/// A storage binding of a full 32-byte slot.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, MsgPacker,
)]
pub struct StorageSlot {
    /// Slot address.
    #[serde(with = "crate::hex_hash")]
    pub key: StorageKey,

    /// Slot contents.
    #[serde(with = "crate::hex_hash")]
    pub value: Hash,
}

impl StorageSlot {
    /// Creates a new slot binding.
    pub const fn new(key: StorageKey, value: Hash) -> Self {
        Self { key, value }
    }

    /// Creates a slot holding a single word.
    ///
    /// The word is stored big-endian in the first 8 bytes; the remaining bytes are zero.
    pub fn from_word(key: StorageKey, word: Word) -> Self {
        let mut value = Hash::default();

        value[..WORD_SIZE].copy_from_slice(&word.to_be_bytes());

        Self { key, value }
    }

    /// Returns the word stored in the slot.
    pub fn word(&self) -> Word {
        Self::word_from_value(&self.value)
    }

    /// Reads the word of a slot value.
    pub fn word_from_value(value: &Hash) -> Word {
        let mut word = [0u8; WORD_SIZE];

        word.copy_from_slice(&value[..WORD_SIZE]);

        Word::from_be_bytes(word)
    }

    /// Creates a slot from a raw value as returned by a data backend.
    ///
    /// Fails if the value is not a full slot.
    pub fn try_from_raw(key: StorageKey, bytes: &[u8]) -> anyhow::Result<Self> {
        let value = Hash::try_from(bytes).map_err(|_| {
            anyhow::anyhow!(
                "invalid slot length: expected {HASH_LEN} bytes, found {}",
                bytes.len()
            )
        })?;

        Ok(Self { key, value })
    }
}

#[test]
fn counter_key_is_all_zero() {
    assert_eq!(COUNTER_KEY, [0u8; 32]);
}

#[test]
fn word_slot_layout_is_left_aligned() {
    let slot = StorageSlot::from_word(COUNTER_KEY, 0x0102030405060708);

    assert_eq!(&slot.value[..WORD_SIZE], &[1, 2, 3, 4, 5, 6, 7, 8]);
    assert!(slot.value[WORD_SIZE..].iter().all(|b| *b == 0));
    assert_eq!(slot.word(), 0x0102030405060708);
}

#[test]
fn raw_slots_must_be_full_width() {
    let full = StorageSlot::from_word(COUNTER_KEY, u64::MAX);

    assert!(StorageSlot::try_from_raw(COUNTER_KEY, &[0u8; WORD_SIZE]).is_err());
    assert!(StorageSlot::try_from_raw(COUNTER_KEY, &[0u8; HASH_LEN + 1]).is_err());
    assert_eq!(
        StorageSlot::try_from_raw(COUNTER_KEY, &full.value).unwrap(),
        full
    );
}

#[test]
fn storage_slot_json_uses_prefixed_hex() {
    let slot = StorageSlot::from_word([1u8; HASH_LEN], 42);
    let json = serde_json::to_value(slot).unwrap();

    assert_eq!(
        json["key"].as_str().unwrap(),
        "0x0101010101010101010101010101010101010101010101010101010101010101"
    );
    assert_eq!(
        json["value"].as_str().unwrap(),
        "0x000000000000002a000000000000000000000000000000000000000000000000"
    );

    let parsed: StorageSlot = serde_json::from_value(json).unwrap();

    assert_eq!(parsed, slot);
}

#[test]
fn storage_slot_packs_with_msgpacker() {
    use msgpacker::{Packable as _, Unpackable as _};

    let slot = StorageSlot::from_word([3u8; HASH_LEN], u64::MAX);
    let bytes = slot.pack_to_vec();
    let (n, parsed) = StorageSlot::unpack(&bytes).unwrap();

    assert_eq!(n, bytes.len());
    assert_eq!(parsed, slot);
    assert!(StorageSlot::unpack(&bytes[..bytes.len() - 1]).is_err());
}
