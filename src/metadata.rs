use opnet_kv::{KeyValuePointer, RuntimeEnvironment};
use satforge_runtime::{ContractRuntime, StoragePointer};
use satforge_support::{
    error::{Op20Error, Op20Result},
    utils::scale_by_decimals,
    Amount,
};
use std::sync::Arc;

pub const DEFAULT_NAME: &str = "OPfun Token";
pub const DEFAULT_SYMBOL: &str = "OPFUN";
pub const DEFAULT_DECIMALS: u8 = 18;
/// Whole tokens minted when deployment carries no parameters.
pub const DEFAULT_RAW_SUPPLY: u64 = 1_000_000;

/// Immutable token description fixed at deployment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub max_supply: Amount,
}

impl TokenMetadata {
    /// `raw_supply` is in whole tokens and is scaled by `10^decimals`.
    pub fn new(name: String, symbol: String, raw_supply: Amount, decimals: u8) -> Op20Result<Self> {
        Ok(Self {
            name,
            symbol,
            decimals,
            max_supply: scale_by_decimals(raw_supply, decimals)?,
        })
    }
}

/// Storage slots holding [`TokenMetadata`] and the deployed flag.
#[derive(Debug)]
pub struct MetadataStore<E: RuntimeEnvironment> {
    name: StoragePointer<E>,
    symbol: StoragePointer<E>,
    decimals: StoragePointer<E>,
    max_supply: StoragePointer<E>,
    deployed: StoragePointer<E>,
}

impl<E: RuntimeEnvironment> MetadataStore<E> {
    pub fn new(runtime: &ContractRuntime<E>) -> Self {
        Self {
            name: runtime.pointer("/name"),
            symbol: runtime.pointer("/symbol"),
            decimals: runtime.pointer("/decimals"),
            max_supply: runtime.pointer("/maxsupply"),
            deployed: runtime.pointer("/deployed"),
        }
    }

    pub fn is_deployed(&self, env: &mut E) -> bool {
        self.deployed.get_value::<u8>(env) != 0
    }

    pub fn store(&mut self, env: &mut E, metadata: &TokenMetadata) {
        self.name
            .set(env, Arc::new(metadata.name.as_bytes().to_vec()));
        self.symbol
            .set(env, Arc::new(metadata.symbol.as_bytes().to_vec()));
        self.decimals.set_value::<u8>(env, metadata.decimals);
        self.max_supply.set_value::<Amount>(env, metadata.max_supply);
        self.deployed.set_value::<u8>(env, 1);
    }

    fn require_deployed(&self, env: &mut E) -> Op20Result<()> {
        if self.is_deployed(env) {
            Ok(())
        } else {
            Err(Op20Error::NotDeployed)
        }
    }

    fn string_field(&self, env: &mut E, pointer: &StoragePointer<E>, field: &str) -> Op20Result<String> {
        self.require_deployed(env)?;
        String::from_utf8(pointer.get(env).as_ref().clone())
            .map_err(|_| Op20Error::Storage(format!("{} not saved as utf-8", field)))
    }

    pub fn name(&self, env: &mut E) -> Op20Result<String> {
        self.string_field(env, &self.name, "name")
    }

    pub fn symbol(&self, env: &mut E) -> Op20Result<String> {
        self.string_field(env, &self.symbol, "symbol")
    }

    pub fn decimals(&self, env: &mut E) -> Op20Result<u8> {
        self.require_deployed(env)?;
        Ok(self.decimals.get_value::<u8>(env))
    }

    pub fn max_supply(&self, env: &mut E) -> Op20Result<Amount> {
        self.require_deployed(env)?;
        Ok(self.max_supply.get_value::<Amount>(env))
    }

    pub fn load(&self, env: &mut E) -> Op20Result<TokenMetadata> {
        Ok(TokenMetadata {
            name: self.name(env)?,
            symbol: self.symbol(env)?,
            decimals: self.decimals(env)?,
            max_supply: self.max_supply(env)?,
        })
    }
}
