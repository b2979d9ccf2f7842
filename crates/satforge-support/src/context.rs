use crate::address::Address;

/// What the execution environment attributes to the current call. Built at
/// the boundary and passed inward explicitly; operations never look it up.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TxContext {
    /// Acting principal for this call.
    pub sender: Address,
    /// Signer of the enclosing transaction.
    pub origin: Address,
    /// Address of the contract being called.
    pub contract: Address,
}

impl TxContext {
    /// Context for a direct call where the signer is also the caller.
    pub fn new(sender: Address) -> Self {
        Self {
            sender,
            origin: sender,
            contract: Address::ZERO,
        }
    }

    pub fn with_contract(mut self, contract: Address) -> Self {
        self.contract = contract;
        self
    }
}
