use std::fmt;

use crate::{CodecError, ContractId, Method, Selector, HASH_LEN, WORD_SIZE};

/// An external call into a contract.
///
/// Wire layout: `contract (32) || selector (8) || args`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    /// Target contract.
    pub contract: ContractId,

    /// Function selector.
    pub selector: Selector,

    /// Encoded arguments.
    pub args: Vec<u8>,
}

impl ContractCall {
    /// Length of the fixed header.
    pub const HEADER_LEN: usize = HASH_LEN + WORD_SIZE;

    /// Creates a call of the method to the contract.
    pub fn new(contract: ContractId, method: &Method) -> Self {
        Self {
            contract,
            selector: method.selector(),
            args: method.encode_args(),
        }
    }

    /// Serializes the call into its wire layout.
    pub fn to_bytes(&self) -> Vec<u8> {
        [
            self.contract.as_slice(),
            self.selector.as_slice(),
            self.args.as_slice(),
        ]
        .concat()
    }

    /// Parses a call from its wire layout.
    pub fn try_from_bytes(bytes: &[u8]) -> Result<Self, CodecError> {
        if bytes.len() < Self::HEADER_LEN {
            return Err(CodecError::Truncated {
                expected: Self::HEADER_LEN,
                found: bytes.len(),
            });
        }

        let (contract, rest) = bytes.split_at(HASH_LEN);
        let (selector, args) = rest.split_at(WORD_SIZE);

        let mut call = Self {
            contract: ContractId::default(),
            selector: Selector::default(),
            args: args.to_vec(),
        };

        call.contract.copy_from_slice(contract);
        call.selector.copy_from_slice(selector);

        Ok(call)
    }
}

impl fmt::Display for ContractCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}::{}",
            const_hex::encode(self.contract),
            const_hex::encode(self.selector)
        )
    }
}
