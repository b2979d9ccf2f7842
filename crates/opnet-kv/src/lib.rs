//! # opnet-kv
//!
//! Storage plumbing for contracts running against an external key-value
//! substrate. The host supplies a [`RuntimeEnvironment`]; contracts address
//! slots through [`KeyValuePointer`]s and group their writes with an
//! [`AtomicPointer`] so a call either lands completely or not at all.

pub mod byte_view;
pub mod cache;
pub mod environment;
pub mod index_pointer;
pub mod memory;

pub use byte_view::ByteView;
pub use environment::RuntimeEnvironment;
pub use index_pointer::{AtomicPointer, IndexPointer, KeyValuePointer};
pub use memory::MemoryEnvironment;
