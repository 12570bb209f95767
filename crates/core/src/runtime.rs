use std::sync::Arc;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::{
    AbiEncoder, Contract, ContractCall, ContractId, ContractStorage, DataBackend, Error, Journal,
    Method,
};

/// The outcome of a successful invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Invoked contract.
    #[serde(with = "crate::hex_hash")]
    pub contract: ContractId,

    /// ABI name of the invoked method.
    pub method: String,

    /// Number of committed slots.
    pub slots: usize,

    /// Encoded return value; empty for unit.
    pub ret: Vec<u8>,
}

/// Executes contract invocations against a data backend.
///
/// Invocations are serialized; each one runs to completion before the next starts, including
/// invocations submitted through clones of the runtime.
#[derive(Debug, Clone)]
pub struct Runtime<D: DataBackend> {
    data: D,
    lock: Arc<Mutex<()>>,
}

impl<D: DataBackend> Runtime<D> {
    /// Creates a runtime over the backend.
    pub fn new(data: D) -> Self {
        Self {
            data,
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Returns the underlying data backend.
    pub fn data(&self) -> &D {
        &self.data
    }

    /// Opens the storage namespace of a contract.
    pub fn storage(&self, contract: &ContractId) -> ContractStorage<D> {
        ContractStorage::new(self.data.clone(), *contract)
    }

    /// Executes the call.
    ///
    /// The writes of the handler are committed in a single batch on normal return. On any error
    /// the storage is left untouched.
    pub fn invoke(&self, call: &ContractCall) -> Result<Receipt, Error> {
        let _guard = self.lock.lock();

        tracing::debug!("invoking `{call}`...");

        let method = Method::decode(&call.selector, &call.args).inspect_err(|e| {
            tracing::warn!("call `{call}` rejected: {e}");
        })?;

        let storage = self.storage(&call.contract);
        let mut contract = Contract::new(Journal::new(&storage));

        let ret = method.dispatch(&mut contract).map_err(|e| {
            tracing::warn!("invocation `{call}` aborted: {e}");
            Error::Storage(e)
        })?;

        let slots = contract.into_storage().commit().map_err(|e| {
            tracing::warn!("commit of `{call}` failed: {e}");
            Error::Storage(e)
        })?;

        tracing::debug!("invocation `{call}` committed {slots} slot(s)");

        Ok(Receipt {
            contract: call.contract,
            method: method.name().to_string(),
            slots,
            ret: AbiEncoder::encode(&[ret]),
        })
    }

    /// Encodes and executes a method call.
    pub fn call(&self, contract: ContractId, method: Method) -> Result<Receipt, Error> {
        self.invoke(&ContractCall::new(contract, &method))
    }
}
