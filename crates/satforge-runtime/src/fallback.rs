use satforge_support::{
    calldata::{BytesWriter, Calldata},
    context::TxContext,
    error::{Op20Error, Op20Result},
    selector::Selector,
};

/// Handler consulted for selectors the contract's own table does not know.
/// Supplied by the hosting base contract.
pub trait Fallback {
    fn call_method(
        &mut self,
        ctx: &TxContext,
        selector: Selector,
        calldata: &mut Calldata,
    ) -> Op20Result<BytesWriter>;
}

/// Base behavior when no further layer exists: the method is unknown.
#[derive(Default, Debug, Clone, Copy)]
pub struct RevertFallback;

impl Fallback for RevertFallback {
    fn call_method(
        &mut self,
        _ctx: &TxContext,
        selector: Selector,
        _calldata: &mut Calldata,
    ) -> Op20Result<BytesWriter> {
        Err(Op20Error::UnknownSelector(selector))
    }
}
