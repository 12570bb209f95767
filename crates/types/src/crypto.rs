/// The hash output byte-length, also the width of a storage key.
pub const HASH_LEN: usize = 32;

/// The hash output array.
pub type Hash = [u8; HASH_LEN];

/// The hasher high-level definition.
pub trait Hasher: Clone {
    /// Consumes the provided iterator, computing the hash of the data.
    fn digest<'a>(data: impl IntoIterator<Item = &'a [u8]>) -> Hash;
}

#[cfg(feature = "blake3")]
pub use blake3::*;

#[cfg(feature = "blake3")]
mod blake3 {
    use super::*;

    /// A blake3 hasher implementation.
    #[derive(Debug, Default, Clone, Copy)]
    pub struct Blake3Hasher;

    impl Blake3Hasher {
        /// Prefix for data hash.
        pub const DATA_PREFIX: &[u8] = &[0x00];
    }

    impl Hasher for Blake3Hasher {
        fn digest<'a>(data: impl IntoIterator<Item = &'a [u8]>) -> Hash {
            let mut h = ::blake3::Hasher::new();

            h.update(Self::DATA_PREFIX);

            data.into_iter().for_each(|d| {
                h.update(d);
            });

            h.finalize().into()
        }
    }

    #[test]
    fn digest_is_sensitive_to_parts() {
        let a = Blake3Hasher::digest([b"contract-storage".as_slice(), &[1u8; HASH_LEN]]);
        let b = Blake3Hasher::digest([b"contract-storage".as_slice(), &[2u8; HASH_LEN]]);

        assert_ne!(a, b);
        assert_eq!(
            a,
            Blake3Hasher::digest([b"contract-storage".as_slice(), &[1u8; HASH_LEN]])
        );
    }
}
