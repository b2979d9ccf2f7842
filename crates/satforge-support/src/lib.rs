//! # SatForge Support
//!
//! Environment-agnostic building blocks shared by the OP_20 runtime and the
//! token contract: the 32-byte [`address::Address`], the 256-bit
//! [`Amount`], the big-endian calldata codec, selector derivation, event
//! records and the contract error type.

pub mod address;
pub mod calldata;
pub mod context;
pub mod error;
pub mod event;
pub mod response;
pub mod selector;
pub mod utils;

pub use ruint::aliases::U256;

/// Token quantities. Every arithmetic step on an amount is checked.
pub type Amount = U256;
