pub mod dispatch;
pub mod fallback;
pub mod runtime;
pub mod storage;

pub use dispatch::{Handler, SelectorTable};
pub use fallback::{Fallback, RevertFallback};
pub use runtime::{ContractResponder, ContractRuntime};
pub use storage::StoragePointer;
