use satforge_support::{
    calldata::{BytesWriter, Calldata},
    context::TxContext,
    error::Op20Result,
    selector::{encode_selector, Selector},
};
use std::collections::BTreeMap;

/// A decoded-argument entry point: reads its own arguments from the
/// calldata, runs against the contract and returns the encoded result.
pub type Handler<C> = fn(&mut C, &TxContext, &mut Calldata) -> Op20Result<BytesWriter>;

struct Entry<C> {
    name: &'static str,
    handler: Handler<C>,
}

impl<C> Clone for Entry<C> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            handler: self.handler,
        }
    }
}

/// Static selector → handler mapping, filled once when the contract is
/// constructed.
pub struct SelectorTable<C> {
    entries: BTreeMap<Selector, Entry<C>>,
}

impl<C> Default for SelectorTable<C> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<C> Clone for SelectorTable<C> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<C> SelectorTable<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Panics if `name` hashes to a selector that is already taken.
    pub fn register(mut self, name: &'static str, handler: Handler<C>) -> Self {
        let selector = encode_selector(name);
        if let Some(previous) = self.entries.insert(selector, Entry { name, handler }) {
            panic!(
                "selector collision on 0x{:08x}: {} and {}",
                selector, previous.name, name
            );
        }
        self
    }

    pub fn lookup(&self, selector: Selector) -> Option<Handler<C>> {
        self.entries.get(&selector).map(|entry| entry.handler)
    }

    pub fn name_of(&self, selector: Selector) -> Option<&'static str> {
        self.entries.get(&selector).map(|entry| entry.name)
    }

    pub fn methods(&self) -> impl Iterator<Item = (Selector, &'static str)> + '_ {
        self.entries.iter().map(|(selector, entry)| (*selector, entry.name))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
