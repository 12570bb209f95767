use serde_json::{json, Value};
use slot_store::{abi, parse_hash, ContractCall, DataBackend, Method, Runtime, ABI_NAME};

mod cli;
mod config;
mod data;

pub use cli::*;
pub use config::*;
pub use data::*;

/// Returns the declared ABI of the contract.
pub fn abi_json() -> anyhow::Result<Value> {
    let abi = abi();

    Ok(json!({
        "name": ABI_NAME,
        "packed": abi.to_hex(),
        "functions": serde_json::to_value(abi.functions)?,
    }))
}

/// Encodes a `store_value` call into its hex wire layout.
pub fn encode_call(contract: &str, val: u64) -> anyhow::Result<Value> {
    let contract = parse_hash(contract)?;
    let method = Method::StoreValue { val };
    let call = ContractCall::new(contract, &method);

    Ok(json!({
        "call": call.to_string(),
        "data": const_hex::encode_prefixed(call.to_bytes()),
    }))
}

pub struct App<D: DataBackend> {
    runtime: Runtime<D>,
}

impl App<CliBackend> {
    /// Opens the backend selected by the configuration.
    pub fn open(config: &Config) -> anyhow::Result<Self> {
        let data = CliBackend::open(config)?;

        tracing::debug!("opened the `{data}` backend");

        Ok(Self::new(data))
    }
}

impl<D: DataBackend> App<D> {
    pub fn new(data: D) -> Self {
        Self {
            runtime: Runtime::new(data),
        }
    }

    pub fn runtime(&self) -> &Runtime<D> {
        &self.runtime
    }

    /// Invokes `store_value` on the contract.
    pub fn call(&self, contract: &str, val: u64) -> anyhow::Result<Value> {
        let contract = parse_hash(contract)?;
        let receipt = self.runtime.call(contract, Method::StoreValue { val })?;

        Ok(serde_json::to_value(receipt)?)
    }

    /// Invokes a call from its hex wire layout.
    pub fn call_raw(&self, data: &str) -> anyhow::Result<Value> {
        let data = data.strip_prefix("0x").unwrap_or(data);
        let bytes = const_hex::decode(data)?;
        let call = ContractCall::try_from_bytes(&bytes)?;
        let receipt = self.runtime.invoke(&call)?;

        Ok(serde_json::to_value(receipt)?)
    }
}
