#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
#![no_std]

extern crate alloc;

mod abi;
mod crypto;
mod storage;
mod utils;

pub use abi::*;
pub use crypto::*;
pub use storage::*;
pub use utils::*;
