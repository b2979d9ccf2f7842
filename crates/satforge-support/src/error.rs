use crate::selector::Selector;
use thiserror::Error;

/// Every way an OP_20 call can abort. Any of these discards the state
/// changes and events of the call that raised it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Op20Error {
    #[error("OP20: transfer to zero address")]
    InvalidRecipient,

    #[error("OP20: approve to zero address")]
    InvalidSpender,

    #[error("OP20: insufficient balance")]
    InsufficientBalance,

    #[error("OP20: allowance exceeded")]
    InsufficientAllowance,

    #[error("OP20: arithmetic overflow")]
    ArithmeticOverflow,

    #[error("calldata too short: needed {needed} bytes, {remaining} remaining")]
    CalldataTooShort { needed: usize, remaining: usize },

    #[error("malformed calldata: {0}")]
    MalformedCalldata(String),

    #[error("unknown selector 0x{0:08x}")]
    UnknownSelector(Selector),

    #[error("contract already deployed")]
    AlreadyDeployed,

    #[error("contract not deployed")]
    NotDeployed,

    #[error("re-entrant call rejected")]
    Reentrancy,

    #[error("storage error: {0}")]
    Storage(String),
}

pub type Op20Result<T> = Result<T, Op20Error>;
