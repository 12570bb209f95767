#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod call;
mod codec;
mod contract;
mod data;
mod error;
mod journal;
mod runtime;
mod storage;

#[cfg(feature = "mocks")]
pub mod mocks;

#[cfg(test)]
mod tests;

pub use call::*;
pub use codec::*;
pub use contract::*;
pub use data::*;
pub use error::*;
pub use journal::*;
pub use runtime::*;
pub use slot_store_types::*;
pub use storage::*;
