//! Balance and allowance accounting.
//!
//! Storage layout under the runtime root:
//!
//! * `/totalsupply`: u256
//! * `/balances/<owner>`: u256
//! * `/allowances/<owner>/<spender>`: u256
//!
//! Absent slots read as zero. Every operation validates and computes all of
//! its new values before the first write, so a failing operation writes
//! nothing even outside a checkpoint.

use opnet_kv::{KeyValuePointer, RuntimeEnvironment};
use satforge_runtime::{ContractRuntime, StoragePointer};
use satforge_support::{
    address::Address,
    error::{Op20Error, Op20Result},
    event::Op20Event,
    utils::overflow_error,
    Amount,
};

#[derive(Debug)]
pub struct Ledger<E: RuntimeEnvironment> {
    total_supply: StoragePointer<E>,
    balances: StoragePointer<E>,
    allowances: StoragePointer<E>,
}

impl<E: RuntimeEnvironment> Ledger<E> {
    pub fn new(runtime: &ContractRuntime<E>) -> Self {
        Self {
            total_supply: runtime.pointer("/totalsupply"),
            balances: runtime.pointer("/balances/"),
            allowances: runtime.pointer("/allowances/"),
        }
    }

    fn balance_pointer(&self, owner: &Address) -> StoragePointer<E> {
        self.balances.select(owner.as_bytes())
    }

    fn allowance_pointer(&self, owner: &Address, spender: &Address) -> StoragePointer<E> {
        self.allowances
            .select(owner.as_bytes())
            .keyword("/")
            .select(spender.as_bytes())
    }

    pub fn total_supply(&self, env: &mut E) -> Amount {
        self.total_supply.get_value::<Amount>(env)
    }

    pub fn balance_of(&self, env: &mut E, owner: &Address) -> Amount {
        self.balance_pointer(owner).get_value::<Amount>(env)
    }

    pub fn allowance(&self, env: &mut E, owner: &Address, spender: &Address) -> Amount {
        self.allowance_pointer(owner, spender)
            .get_value::<Amount>(env)
    }

    /// Debit `from` and credit `to`. A self-transfer leaves the balance as
    /// it was.
    fn move_balance(
        &self,
        env: &mut E,
        from: &Address,
        to: &Address,
        amount: Amount,
    ) -> Op20Result<()> {
        let from_balance = self.balance_of(env, from);
        let debited = from_balance
            .checked_sub(amount)
            .ok_or(Op20Error::InsufficientBalance)?;
        let to_balance = if from == to {
            debited
        } else {
            self.balance_of(env, to)
        };
        let credited = overflow_error(to_balance.checked_add(amount))?;
        self.balance_pointer(from).set_value::<Amount>(env, debited);
        self.balance_pointer(to).set_value::<Amount>(env, credited);
        Ok(())
    }

    pub fn transfer(
        &self,
        env: &mut E,
        sender: &Address,
        recipient: &Address,
        amount: Amount,
    ) -> Op20Result<Op20Event> {
        if recipient.is_zero() {
            return Err(Op20Error::InvalidRecipient);
        }
        self.move_balance(env, sender, recipient, amount)?;
        Ok(Op20Event::Transfer {
            from: *sender,
            to: *recipient,
            amount,
        })
    }

    /// Overwrites the allowance; it does not add to it.
    pub fn approve(
        &self,
        env: &mut E,
        owner: &Address,
        spender: &Address,
        amount: Amount,
    ) -> Op20Result<Op20Event> {
        if spender.is_zero() {
            return Err(Op20Error::InvalidSpender);
        }
        self.allowance_pointer(owner, spender)
            .set_value::<Amount>(env, amount);
        Ok(Op20Event::Approval {
            owner: *owner,
            spender: *spender,
            amount,
        })
    }

    /// `spender` moves `amount` of `owner`'s tokens to `recipient`, consuming
    /// the same amount of allowance.
    pub fn transfer_from(
        &self,
        env: &mut E,
        spender: &Address,
        owner: &Address,
        recipient: &Address,
        amount: Amount,
    ) -> Op20Result<Op20Event> {
        if recipient.is_zero() {
            return Err(Op20Error::InvalidRecipient);
        }
        if self.balance_of(env, owner) < amount {
            return Err(Op20Error::InsufficientBalance);
        }
        let remaining = self
            .allowance(env, owner, spender)
            .checked_sub(amount)
            .ok_or(Op20Error::InsufficientAllowance)?;
        self.move_balance(env, owner, recipient, amount)?;
        self.allowance_pointer(owner, spender)
            .set_value::<Amount>(env, remaining);
        Ok(Op20Event::Transfer {
            from: *owner,
            to: *recipient,
            amount,
        })
    }

    /// Creates `amount` new tokens for `to`, modeled as a transfer from the
    /// zero address. Fails if the result would pass `max_supply`.
    pub fn mint(
        &self,
        env: &mut E,
        to: &Address,
        amount: Amount,
        max_supply: Amount,
    ) -> Op20Result<Op20Event> {
        if to.is_zero() {
            return Err(Op20Error::InvalidRecipient);
        }
        let total = overflow_error(self.total_supply(env).checked_add(amount))?;
        if total > max_supply {
            return Err(Op20Error::ArithmeticOverflow);
        }
        let credited = overflow_error(self.balance_of(env, to).checked_add(amount))?;
        let mut total_supply = self.total_supply.clone();
        total_supply.set_value::<Amount>(env, total);
        self.balance_pointer(to).set_value::<Amount>(env, credited);
        Ok(Op20Event::Transfer {
            from: Address::ZERO,
            to: *to,
            amount,
        })
    }
}
