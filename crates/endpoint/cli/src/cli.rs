use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::BackendKind;

#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path of the configuration file. Defaults to the user config directory.
    #[arg(short, long, value_name = "CONFIG", env = "SLOT_STORE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Overrides the configured data backend.
    #[arg(short, long, value_name = "BACKEND")]
    pub backend: Option<BackendKind>,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Prints the declared ABI of the contract.
    Abi,

    /// Encodes a `store_value` call into its hex wire layout.
    Encode {
        /// Hex identifier of the target contract.
        #[arg(short, long, value_name = "CONTRACT")]
        contract: String,

        /// Value to be stored.
        #[arg(value_name = "VALUE")]
        val: u64,
    },

    /// Invokes `store_value` on the contract.
    Call {
        /// Hex identifier of the target contract.
        #[arg(short, long, value_name = "CONTRACT")]
        contract: String,

        /// Value to be stored.
        #[arg(value_name = "VALUE")]
        val: u64,
    },

    /// Invokes a call from its hex wire layout.
    CallRaw {
        /// Hex encoded `contract || selector || args`.
        #[arg(value_name = "HEX")]
        data: String,
    },
}
