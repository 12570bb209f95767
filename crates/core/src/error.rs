use crate::{ParamType, Selector};

/// A call that doesn't match the declared ABI.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// The call data is shorter than its fixed header.
    #[error("call data too short: expected at least {expected} bytes, found {found}")]
    Truncated {
        /// Minimum length.
        expected: usize,
        /// Provided length.
        found: usize,
    },

    /// The encoded arguments don't have the length of the declared inputs.
    #[error("expected {expected} bytes of arguments, found {found}")]
    Length {
        /// Length of the declared inputs.
        expected: usize,
        /// Provided length.
        found: usize,
    },

    /// An integer word is out of range for its declared type.
    #[error("value `{value}` does not fit in `{ty}`")]
    Overflow {
        /// Declared type.
        ty: ParamType,
        /// Decoded word.
        value: u64,
    },

    /// A boolean word other than `0` or `1`.
    #[error("invalid boolean word `{0}`")]
    InvalidBool(u64),

    /// No declared function has the selector.
    #[error("unknown selector `{}`", const_hex::encode_prefixed(.0))]
    UnknownSelector(Selector),

    /// The declared ABI can't be interpreted.
    #[error("invalid ABI declaration: {0}")]
    Abi(String),

    /// The decoded arguments don't match the function handler.
    #[error("unexpected arguments for `{0}`")]
    UnexpectedArguments(String),
}

/// An invocation failure.
///
/// Both variants abort the whole invocation; no write is committed.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The call was rejected before reaching the handler.
    #[error("invocation shape mismatch: {0}")]
    InvocationShape(#[from] CodecError),

    /// The data backend failed.
    #[error("storage fault: {0}")]
    Storage(anyhow::Error),
}

impl Error {
    /// Returns `true` if the call was rejected by the ABI dispatch.
    pub fn is_invocation_shape(&self) -> bool {
        matches!(self, Error::InvocationShape(_))
    }

    /// Returns `true` if the data backend failed.
    pub fn is_storage(&self) -> bool {
        matches!(self, Error::Storage(_))
    }
}
