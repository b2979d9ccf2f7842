//! OP_20 selector table and the client-side view of the same protocol.
//!
//! | method          | calldata                                  | returns        |
//! |-----------------|-------------------------------------------|----------------|
//! | `name`          | (none)                                    | string         |
//! | `symbol`        | (none)                                    | string         |
//! | `decimals`      | (none)                                    | u8             |
//! | `totalSupply`   | (none)                                    | u256           |
//! | `maximumSupply` | (none)                                    | u256           |
//! | `balanceOf`     | address owner                             | u256           |
//! | `allowance`     | address owner, address spender            | u256           |
//! | `transfer`      | address recipient, u256 amount            | bool           |
//! | `approve`       | address spender, u256 amount              | bool           |
//! | `transferFrom`  | address owner, address recipient, u256    | bool           |
//!
//! Bytes following the declared arguments are ignored.

use crate::token::SatForgeToken;
use opnet_kv::RuntimeEnvironment;
use satforge_runtime::SelectorTable;
use satforge_support::{
    address::Address,
    calldata::{BytesWriter, Calldata, U256_LENGTH},
    context::TxContext,
    error::{Op20Error, Op20Result},
    selector::{encode_selector, Selector},
    Amount,
};

pub const NAME: &str = "name";
pub const SYMBOL: &str = "symbol";
pub const DECIMALS: &str = "decimals";
pub const TOTAL_SUPPLY: &str = "totalSupply";
pub const MAXIMUM_SUPPLY: &str = "maximumSupply";
pub const BALANCE_OF: &str = "balanceOf";
pub const ALLOWANCE: &str = "allowance";
pub const TRANSFER: &str = "transfer";
pub const APPROVE: &str = "approve";
pub const TRANSFER_FROM: &str = "transferFrom";

pub fn selector_table<E: RuntimeEnvironment>() -> SelectorTable<SatForgeToken<E>> {
    SelectorTable::new()
        .register(NAME, handle_name::<E>)
        .register(SYMBOL, handle_symbol::<E>)
        .register(DECIMALS, handle_decimals::<E>)
        .register(TOTAL_SUPPLY, handle_total_supply::<E>)
        .register(MAXIMUM_SUPPLY, handle_maximum_supply::<E>)
        .register(BALANCE_OF, handle_balance_of::<E>)
        .register(ALLOWANCE, handle_allowance::<E>)
        .register(TRANSFER, handle_transfer::<E>)
        .register(APPROVE, handle_approve::<E>)
        .register(TRANSFER_FROM, handle_transfer_from::<E>)
}

fn string_response(v: &str) -> Op20Result<BytesWriter> {
    let mut writer = BytesWriter::with_capacity(4 + v.len());
    writer.write_string_with_length(v)?;
    Ok(writer)
}

fn u256_response(v: Amount) -> BytesWriter {
    let mut writer = BytesWriter::with_capacity(U256_LENGTH);
    writer.write_u256(v);
    writer
}

fn bool_response(v: bool) -> BytesWriter {
    let mut writer = BytesWriter::with_capacity(1);
    writer.write_bool(v);
    writer
}

fn handle_name<E: RuntimeEnvironment>(
    token: &mut SatForgeToken<E>,
    _ctx: &TxContext,
    _calldata: &mut Calldata,
) -> Op20Result<BytesWriter> {
    string_response(&token.name()?)
}

fn handle_symbol<E: RuntimeEnvironment>(
    token: &mut SatForgeToken<E>,
    _ctx: &TxContext,
    _calldata: &mut Calldata,
) -> Op20Result<BytesWriter> {
    string_response(&token.symbol()?)
}

fn handle_decimals<E: RuntimeEnvironment>(
    token: &mut SatForgeToken<E>,
    _ctx: &TxContext,
    _calldata: &mut Calldata,
) -> Op20Result<BytesWriter> {
    let mut writer = BytesWriter::with_capacity(1);
    writer.write_u8(token.decimals()?);
    Ok(writer)
}

fn handle_total_supply<E: RuntimeEnvironment>(
    token: &mut SatForgeToken<E>,
    _ctx: &TxContext,
    _calldata: &mut Calldata,
) -> Op20Result<BytesWriter> {
    Ok(u256_response(token.total_supply()))
}

fn handle_maximum_supply<E: RuntimeEnvironment>(
    token: &mut SatForgeToken<E>,
    _ctx: &TxContext,
    _calldata: &mut Calldata,
) -> Op20Result<BytesWriter> {
    Ok(u256_response(token.maximum_supply()?))
}

fn handle_balance_of<E: RuntimeEnvironment>(
    token: &mut SatForgeToken<E>,
    _ctx: &TxContext,
    calldata: &mut Calldata,
) -> Op20Result<BytesWriter> {
    let owner = calldata.read_address()?;
    Ok(u256_response(token.balance_of(&owner)))
}

fn handle_allowance<E: RuntimeEnvironment>(
    token: &mut SatForgeToken<E>,
    _ctx: &TxContext,
    calldata: &mut Calldata,
) -> Op20Result<BytesWriter> {
    let owner = calldata.read_address()?;
    let spender = calldata.read_address()?;
    Ok(u256_response(token.allowance(&owner, &spender)))
}

fn handle_transfer<E: RuntimeEnvironment>(
    token: &mut SatForgeToken<E>,
    ctx: &TxContext,
    calldata: &mut Calldata,
) -> Op20Result<BytesWriter> {
    let recipient = calldata.read_address()?;
    let amount = calldata.read_u256()?;
    Ok(bool_response(token.apply_transfer(ctx, &recipient, amount)?))
}

fn handle_approve<E: RuntimeEnvironment>(
    token: &mut SatForgeToken<E>,
    ctx: &TxContext,
    calldata: &mut Calldata,
) -> Op20Result<BytesWriter> {
    let spender = calldata.read_address()?;
    let amount = calldata.read_u256()?;
    Ok(bool_response(token.apply_approve(ctx, &spender, amount)?))
}

fn handle_transfer_from<E: RuntimeEnvironment>(
    token: &mut SatForgeToken<E>,
    ctx: &TxContext,
    calldata: &mut Calldata,
) -> Op20Result<BytesWriter> {
    let owner = calldata.read_address()?;
    let recipient = calldata.read_address()?;
    let amount = calldata.read_u256()?;
    Ok(bool_response(
        token.apply_transfer_from(ctx, &owner, &recipient, amount)?,
    ))
}

/// A typed OP_20 request, as a caller builds it before sending.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op20Call {
    Name,
    Symbol,
    Decimals,
    TotalSupply,
    MaximumSupply,
    BalanceOf {
        owner: Address,
    },
    Allowance {
        owner: Address,
        spender: Address,
    },
    Transfer {
        recipient: Address,
        amount: Amount,
    },
    Approve {
        spender: Address,
        amount: Amount,
    },
    TransferFrom {
        owner: Address,
        recipient: Address,
        amount: Amount,
    },
}

impl Op20Call {
    pub fn method(&self) -> &'static str {
        match self {
            Op20Call::Name => NAME,
            Op20Call::Symbol => SYMBOL,
            Op20Call::Decimals => DECIMALS,
            Op20Call::TotalSupply => TOTAL_SUPPLY,
            Op20Call::MaximumSupply => MAXIMUM_SUPPLY,
            Op20Call::BalanceOf { .. } => BALANCE_OF,
            Op20Call::Allowance { .. } => ALLOWANCE,
            Op20Call::Transfer { .. } => TRANSFER,
            Op20Call::Approve { .. } => APPROVE,
            Op20Call::TransferFrom { .. } => TRANSFER_FROM,
        }
    }

    pub fn selector(&self) -> Selector {
        encode_selector(self.method())
    }

    pub fn calldata(&self) -> Vec<u8> {
        let mut writer = BytesWriter::new();
        match self {
            Op20Call::Name
            | Op20Call::Symbol
            | Op20Call::Decimals
            | Op20Call::TotalSupply
            | Op20Call::MaximumSupply => {}
            Op20Call::BalanceOf { owner } => {
                writer.write_address(owner);
            }
            Op20Call::Allowance { owner, spender } => {
                writer.write_address(owner).write_address(spender);
            }
            Op20Call::Transfer { recipient, amount } => {
                writer.write_address(recipient).write_u256(*amount);
            }
            Op20Call::Approve { spender, amount } => {
                writer.write_address(spender).write_u256(*amount);
            }
            Op20Call::TransferFrom {
                owner,
                recipient,
                amount,
            } => {
                writer
                    .write_address(owner)
                    .write_address(recipient)
                    .write_u256(*amount);
            }
        }
        writer.into_bytes()
    }

    /// Reads a request back from the wire. `Ok(None)` for selectors outside
    /// the OP_20 set.
    pub fn decode(selector: Selector, calldata: &[u8]) -> Op20Result<Option<Self>> {
        let mut reader = Calldata::from(calldata);
        let method = [
            NAME,
            SYMBOL,
            DECIMALS,
            TOTAL_SUPPLY,
            MAXIMUM_SUPPLY,
            BALANCE_OF,
            ALLOWANCE,
            TRANSFER,
            APPROVE,
            TRANSFER_FROM,
        ]
        .into_iter()
        .find(|name| encode_selector(name) == selector);
        let call = match method {
            Some(NAME) => Op20Call::Name,
            Some(SYMBOL) => Op20Call::Symbol,
            Some(DECIMALS) => Op20Call::Decimals,
            Some(TOTAL_SUPPLY) => Op20Call::TotalSupply,
            Some(MAXIMUM_SUPPLY) => Op20Call::MaximumSupply,
            Some(BALANCE_OF) => Op20Call::BalanceOf {
                owner: reader.read_address()?,
            },
            Some(ALLOWANCE) => Op20Call::Allowance {
                owner: reader.read_address()?,
                spender: reader.read_address()?,
            },
            Some(TRANSFER) => Op20Call::Transfer {
                recipient: reader.read_address()?,
                amount: reader.read_u256()?,
            },
            Some(APPROVE) => Op20Call::Approve {
                spender: reader.read_address()?,
                amount: reader.read_u256()?,
            },
            Some(TRANSFER_FROM) => Op20Call::TransferFrom {
                owner: reader.read_address()?,
                recipient: reader.read_address()?,
                amount: reader.read_u256()?,
            },
            _ => return Ok(None),
        };
        Ok(Some(call))
    }
}

pub fn decode_bool(data: &[u8]) -> Op20Result<bool> {
    Calldata::from(data).read_bool()
}

pub fn decode_u8(data: &[u8]) -> Op20Result<u8> {
    Calldata::from(data).read_u8()
}

pub fn decode_u256(data: &[u8]) -> Op20Result<Amount> {
    Calldata::from(data).read_u256()
}

pub fn decode_string(data: &[u8]) -> Op20Result<String> {
    let mut reader = Calldata::from(data);
    let value = reader.read_string_with_length()?;
    if reader.remaining() != 0 {
        return Err(Op20Error::MalformedCalldata(format!(
            "{} trailing bytes after string",
            reader.remaining()
        )));
    }
    Ok(value)
}
