use crate::{
    AbiDecoder, AbiEncoder, AbiFunction, AbiParameter, CodecError, ParamType, ProgramAbi, Selector,
    Storage, Token, Word, COUNTER_KEY,
};

/// Name of the capability set.
pub const ABI_NAME: &str = "TestContract";

/// Returns the declared ABI of [`TestContract`].
///
/// The ABI exposes a single write; there is no externally callable read.
pub fn abi() -> ProgramAbi {
    ProgramAbi {
        functions: vec![AbiFunction::new(
            Method::STORE_VALUE,
            vec![AbiParameter::new("val", ParamType::U64)],
            ParamType::Unit,
        )],
    }
}

/// The externally callable capability set.
pub trait TestContract {
    /// Stores the value in the [`COUNTER_KEY`] slot, overwriting any previous value.
    fn store_value(&mut self, val: Word) -> anyhow::Result<()>;
}

/// Execution state of a contract.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum InvocationState {
    /// No invocation in progress.
    #[default]
    Idle,
    /// Inside the storage write.
    Writing,
}

/// The contract bound to a storage namespace.
#[derive(Debug)]
pub struct Contract<S: Storage> {
    storage: S,
    state: InvocationState,
}

impl<S: Storage> Contract<S> {
    /// Binds the contract to its storage namespace.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            state: InvocationState::Idle,
        }
    }

    /// Returns the current execution state.
    pub fn state(&self) -> InvocationState {
        self.state
    }

    /// Releases the storage namespace.
    pub fn into_storage(self) -> S {
        self.storage
    }
}

impl<S: Storage> TestContract for Contract<S> {
    fn store_value(&mut self, val: Word) -> anyhow::Result<()> {
        self.state = InvocationState::Writing;

        let res = self.storage.put(&COUNTER_KEY, val);

        self.state = InvocationState::Idle;

        res
    }
}

/// A decoded call of a [`TestContract`] method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `store_value(val: u64)`.
    StoreValue {
        /// Value to be stored.
        val: Word,
    },
}

impl Method {
    /// ABI name of the `store_value` method.
    pub const STORE_VALUE: &str = "store_value";

    /// Returns the ABI name of the method.
    pub const fn name(&self) -> &'static str {
        match self {
            Method::StoreValue { .. } => Self::STORE_VALUE,
        }
    }

    /// Returns the method arguments as tokens.
    pub fn tokens(&self) -> Vec<Token> {
        match self {
            Method::StoreValue { val } => vec![Token::U64(*val)],
        }
    }

    /// Returns the ABI selector of the method.
    pub fn selector(&self) -> Selector {
        match self {
            Method::StoreValue { .. } => crate::selector("store_value(u64)"),
        }
    }

    /// Encodes the method arguments.
    pub fn encode_args(&self) -> Vec<u8> {
        AbiEncoder::encode(&self.tokens())
    }

    /// Resolves a call against the declared ABI.
    ///
    /// Fails if the selector is unknown or the arguments don't match the declared inputs.
    pub fn decode(selector: &Selector, args: &[u8]) -> Result<Self, CodecError> {
        let abi = abi();
        let function = abi
            .resolve(selector)
            .map_err(|e| CodecError::Abi(e.to_string()))?
            .ok_or(CodecError::UnknownSelector(*selector))?;

        let types = function
            .input_types()
            .map_err(|e| CodecError::Abi(e.to_string()))?;

        let tokens = AbiDecoder::decode(&types, args)?;

        match (function.name.as_str(), tokens.as_slice()) {
            (Self::STORE_VALUE, [Token::U64(val)]) => Ok(Method::StoreValue { val: *val }),
            (name, _) => Err(CodecError::UnexpectedArguments(name.to_string())),
        }
    }

    /// Invokes the handler of the method.
    ///
    /// Returns the output token of the method.
    pub fn dispatch<C: TestContract + ?Sized>(&self, contract: &mut C) -> anyhow::Result<Token> {
        match self {
            Method::StoreValue { val } => contract.store_value(*val).map(|_| Token::Unit),
        }
    }
}
