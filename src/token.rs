use crate::abi;
use crate::deploy::resolve_metadata;
use crate::ledger::Ledger;
use crate::logging;
use crate::metadata::{MetadataStore, TokenMetadata, DEFAULT_DECIMALS};
use opnet_kv::RuntimeEnvironment;
use satforge_runtime::{
    ContractResponder, ContractRuntime, Fallback, RevertFallback, SelectorTable,
};
use satforge_support::{
    address::Address,
    calldata::{BytesWriter, Calldata},
    context::TxContext,
    error::{Op20Error, Op20Result},
    event::{Event, Op20Event},
    response::CallResponse,
    selector::Selector,
    Amount,
};

/// The SatForge OP_20 token: a fixed-supply fungible token whose entire
/// supply is minted to the deployer.
pub struct SatForgeToken<E: RuntimeEnvironment> {
    runtime: ContractRuntime<E>,
    ledger: Ledger<E>,
    metadata: MetadataStore<E>,
    abi: SelectorTable<SatForgeToken<E>>,
    fallback: Box<dyn Fallback>,
}

impl<E: RuntimeEnvironment> ContractResponder<E> for SatForgeToken<E> {
    fn runtime(&mut self) -> &mut ContractRuntime<E> {
        &mut self.runtime
    }
}

impl<E: RuntimeEnvironment> SatForgeToken<E> {
    /// Opens the token over `env`. Works both on an empty substrate (deploy
    /// next) and on one holding a previous deployment.
    pub fn new(env: E) -> Self {
        Self::with_fallback(env, Box::new(RevertFallback))
    }

    pub fn with_fallback(env: E, fallback: Box<dyn Fallback>) -> Self {
        let runtime = ContractRuntime::new(env);
        let ledger = Ledger::new(&runtime);
        let metadata = MetadataStore::new(&runtime);
        Self {
            runtime,
            ledger,
            metadata,
            abi: abi::selector_table(),
            fallback,
        }
    }

    pub fn into_env(self) -> E {
        self.runtime.into_env()
    }

    pub fn selector_table(&self) -> &SelectorTable<SatForgeToken<E>> {
        &self.abi
    }

    pub fn is_deployed(&mut self) -> bool {
        self.metadata.is_deployed(self.runtime.env())
    }

    /// One-time construction with the standard 18 decimals.
    pub fn deploy(&mut self, ctx: &TxContext, calldata: &[u8]) -> Op20Result<CallResponse> {
        self.deploy_with_decimals(ctx, calldata, DEFAULT_DECIMALS)
    }

    /// Stores the metadata decoded from `calldata` (or the defaults) and
    /// mints the whole max supply to `ctx.sender`.
    pub fn deploy_with_decimals(
        &mut self,
        ctx: &TxContext,
        calldata: &[u8],
        decimals: u8,
    ) -> Op20Result<CallResponse> {
        let (metadata, events) = self.transact(|token| {
            if token.is_deployed() {
                return Err(Op20Error::AlreadyDeployed);
            }
            let metadata = resolve_metadata(calldata, decimals)?;
            token.metadata.store(token.runtime.env(), &metadata);
            token.mint(&ctx.sender, metadata.max_supply)?;
            Ok(metadata)
        })?;
        self.runtime.log(&format!(
            "deployed {} ({}) max supply {} to {}",
            metadata.name, metadata.symbol, metadata.max_supply, ctx.sender
        ));
        Ok(CallResponse::new(Vec::new(), events))
    }

    /// External entry point: routes `selector` through the ABI table, or to
    /// the fallback when the table has no entry.
    pub fn call(
        &mut self,
        ctx: &TxContext,
        selector: Selector,
        calldata: &[u8],
    ) -> Op20Result<CallResponse> {
        let method = self.abi.name_of(selector);
        let result = self
            .transact(|token| token.dispatch(ctx, selector, &mut Calldata::from(calldata)))
            .map(|(writer, events)| CallResponse::from_writer(writer, events));
        logging::record_call(method, &result);
        result
    }

    fn dispatch(
        &mut self,
        ctx: &TxContext,
        selector: Selector,
        calldata: &mut Calldata,
    ) -> Op20Result<BytesWriter> {
        match self.abi.lookup(selector) {
            Some(handler) => {
                if !self.is_deployed() {
                    return Err(Op20Error::NotDeployed);
                }
                handler(self, ctx, calldata)
            }
            None => {
                log::debug!("selector 0x{:08x} not in table, forwarding to fallback", selector);
                self.fallback.call_method(ctx, selector, calldata)
            }
        }
    }

    pub fn metadata(&mut self) -> Op20Result<TokenMetadata> {
        self.metadata.load(self.runtime.env())
    }

    pub fn name(&mut self) -> Op20Result<String> {
        self.metadata.name(self.runtime.env())
    }

    pub fn symbol(&mut self) -> Op20Result<String> {
        self.metadata.symbol(self.runtime.env())
    }

    pub fn decimals(&mut self) -> Op20Result<u8> {
        self.metadata.decimals(self.runtime.env())
    }

    pub fn maximum_supply(&mut self) -> Op20Result<Amount> {
        self.metadata.max_supply(self.runtime.env())
    }

    pub fn total_supply(&mut self) -> Amount {
        self.ledger.total_supply(self.runtime.env())
    }

    pub fn balance_of(&mut self, owner: &Address) -> Amount {
        self.ledger.balance_of(self.runtime.env(), owner)
    }

    pub fn allowance(&mut self, owner: &Address, spender: &Address) -> Amount {
        self.ledger.allowance(self.runtime.env(), owner, spender)
    }

    /// Moves `amount` from `ctx.sender` to `recipient` as its own call.
    pub fn transfer(
        &mut self,
        ctx: &TxContext,
        recipient: &Address,
        amount: Amount,
    ) -> Op20Result<Vec<Event>> {
        self.transact(|token| token.apply_transfer(ctx, recipient, amount))
            .map(|(_, events)| events)
    }

    /// Sets the allowance of `spender` over `ctx.sender`'s tokens.
    pub fn approve(
        &mut self,
        ctx: &TxContext,
        spender: &Address,
        amount: Amount,
    ) -> Op20Result<Vec<Event>> {
        self.transact(|token| token.apply_approve(ctx, spender, amount))
            .map(|(_, events)| events)
    }

    /// `ctx.sender` spends its allowance over `owner` to pay `recipient`.
    pub fn transfer_from(
        &mut self,
        ctx: &TxContext,
        owner: &Address,
        recipient: &Address,
        amount: Amount,
    ) -> Op20Result<Vec<Event>> {
        self.transact(|token| token.apply_transfer_from(ctx, owner, recipient, amount))
            .map(|(_, events)| events)
    }

    pub(crate) fn apply_transfer(
        &mut self,
        ctx: &TxContext,
        recipient: &Address,
        amount: Amount,
    ) -> Op20Result<bool> {
        let event = self
            .ledger
            .transfer(self.runtime.env(), &ctx.sender, recipient, amount)?;
        self.emit(event);
        Ok(true)
    }

    pub(crate) fn apply_approve(
        &mut self,
        ctx: &TxContext,
        spender: &Address,
        amount: Amount,
    ) -> Op20Result<bool> {
        let event = self
            .ledger
            .approve(self.runtime.env(), &ctx.sender, spender, amount)?;
        self.emit(event);
        Ok(true)
    }

    pub(crate) fn apply_transfer_from(
        &mut self,
        ctx: &TxContext,
        owner: &Address,
        recipient: &Address,
        amount: Amount,
    ) -> Op20Result<bool> {
        let event = self.ledger.transfer_from(
            self.runtime.env(),
            &ctx.sender,
            owner,
            recipient,
            amount,
        )?;
        self.emit(event);
        Ok(true)
    }

    // Only reachable from deployment.
    fn mint(&mut self, to: &Address, amount: Amount) -> Op20Result<()> {
        let max_supply = self.metadata.max_supply(self.runtime.env())?;
        let event = self
            .ledger
            .mint(self.runtime.env(), to, amount, max_supply)?;
        self.emit(event);
        Ok(())
    }

    fn emit(&mut self, event: Op20Event) {
        log::debug!("emit {:?}", event);
        self.runtime.emit(event);
    }
}
