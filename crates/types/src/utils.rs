use alloc::string::String;

use crate::{Hash, HASH_LEN};

/// Parses a hex string, with or without the `0x` prefix, into a hash.
pub fn parse_hash<S: AsRef<str>>(s: S) -> anyhow::Result<Hash> {
    let s = s.as_ref();
    let s = s.strip_prefix("0x").unwrap_or(s);

    anyhow::ensure!(
        s.len() == HASH_LEN * 2,
        "expected {} hex characters, found {}",
        HASH_LEN * 2,
        s.len()
    );

    const_hex::decode_to_array(s).map_err(|e| anyhow::anyhow!("failed to decode hex: {e}"))
}

/// Serde adapter for hashes as `0x`-prefixed hex strings.
pub mod hex_hash {
    use super::*;
    use serde::{de, Deserialize as _, Deserializer, Serializer};

    /// Serializes the hash as a prefixed hex string.
    pub fn serialize<S: Serializer>(hash: &Hash, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&const_hex::encode_prefixed(hash))
    }

    /// Deserializes a hash from a hex string.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Hash, D::Error> {
        let s = String::deserialize(deserializer)?;

        parse_hash(s).map_err(de::Error::custom)
    }
}

#[test]
fn parse_hash_accepts_both_forms() {
    let plain = "ff".repeat(HASH_LEN);
    let prefixed = alloc::format!("0x{plain}");

    assert_eq!(parse_hash(&plain).unwrap(), [0xff; HASH_LEN]);
    assert_eq!(parse_hash(prefixed).unwrap(), [0xff; HASH_LEN]);
    assert!(parse_hash("0x00").is_err());
    assert!(parse_hash("zz".repeat(HASH_LEN)).is_err());
}
