//! SatForge: an OP_20 fungible token contract for Bitcoin L1 smart-contract
//! runtimes, with the selector dispatcher and calldata codec it runs on.

pub mod abi;
pub mod config;
pub mod deploy;
pub mod ledger;
pub mod logging;
pub mod metadata;
pub mod token;
#[cfg(test)]
pub mod tests;

pub use abi::Op20Call;
pub use config::DeployConfig;
pub use deploy::ConstructionArgs;
pub use metadata::TokenMetadata;
pub use token::SatForgeToken;

pub use satforge_support::{
    address::Address, context::TxContext, error::Op20Error, error::Op20Result,
    event::Op20Event, response::CallResponse, selector::encode_selector, Amount,
};
