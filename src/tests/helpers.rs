use crate::abi::Op20Call;
use crate::deploy::ConstructionArgs;
use crate::token::SatForgeToken;
use anyhow::Result;
use opnet_kv::MemoryEnvironment;
use satforge_support::{
    address::Address, context::TxContext, error::Op20Result, response::CallResponse, Amount,
};

pub type TestToken = SatForgeToken<MemoryEnvironment>;

pub const DEPLOYER: u8 = 1;

/// Address whose last byte is `n`.
pub fn addr(n: u8) -> Address {
    let mut bytes = [0u8; 32];
    bytes[31] = n;
    Address::new(bytes)
}

pub fn ctx(n: u8) -> TxContext {
    TxContext::new(addr(n))
}

pub fn amount(v: u64) -> Amount {
    Amount::from(v)
}

/// `v × 10^18`
pub fn tokens(v: u64) -> Amount {
    Amount::from(v) * Amount::from(10u64).pow(Amount::from(18u64))
}

pub fn construction(name: &str, symbol: &str, raw_supply: u64) -> Vec<u8> {
    ConstructionArgs {
        name: name.to_string(),
        symbol: symbol.to_string(),
        raw_supply: Amount::from(raw_supply),
    }
    .encode()
    .expect("construction args fit the codec")
}

/// A token deployed by `addr(DEPLOYER)` with the given raw supply and no
/// decimal scaling, so balances read as plain integers.
pub fn deployed_plain(raw_supply: u64) -> Result<TestToken> {
    let mut token = SatForgeToken::new(MemoryEnvironment::new());
    token.deploy_with_decimals(&ctx(DEPLOYER), &construction("Plain", "PLN", raw_supply), 0)?;
    Ok(token)
}

pub fn deployed_default() -> Result<TestToken> {
    let mut token = SatForgeToken::new(MemoryEnvironment::new());
    token.deploy(&ctx(DEPLOYER), &[])?;
    Ok(token)
}

pub fn send(token: &mut TestToken, sender: u8, call: Op20Call) -> Op20Result<CallResponse> {
    token.call(&ctx(sender), call.selector(), &call.calldata())
}
