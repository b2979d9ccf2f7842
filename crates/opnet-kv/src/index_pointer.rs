use crate::byte_view::ByteView;
use crate::cache::{get, set};
use crate::environment::RuntimeEnvironment;
use std::cell::RefCell;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::Arc;

/// A handle on one storage slot. Child slots are derived by appending raw
/// bytes ([`KeyValuePointer::select`]) or a keyword
/// ([`KeyValuePointer::keyword`]) to the parent key.
pub trait KeyValuePointer<E: RuntimeEnvironment> {
    fn wrap(word: &[u8]) -> Self;
    fn unwrap(&self) -> Arc<Vec<u8>>;
    fn set(&mut self, env: &mut E, v: Arc<Vec<u8>>);
    fn get(&self, env: &mut E) -> Arc<Vec<u8>>;
    fn inherits(&mut self, from: &Self);
    fn select(&self, word: &[u8]) -> Self
    where
        Self: Sized,
    {
        let mut key = (*self.unwrap()).clone();
        key.extend_from_slice(word);
        let mut ptr = Self::wrap(&key);
        ptr.inherits(self);
        ptr
    }
    fn from_keyword(word: &str) -> Self
    where
        Self: Sized,
    {
        Self::wrap(word.as_bytes())
    }
    fn keyword(&self, word: &str) -> Self
    where
        Self: Sized,
    {
        self.select(word.as_bytes())
    }

    fn set_value<T: ByteView>(&mut self, env: &mut E, v: T) {
        self.set(env, Arc::new(v.to_bytes()));
    }

    fn get_value<T: ByteView>(&self, env: &mut E) -> T {
        let cloned = self.get(env).as_ref().clone();
        if cloned.is_empty() {
            T::zero()
        } else {
            T::from_bytes(cloned)
        }
    }
}

/// Pointer that reads and writes straight through the environment cache.
#[derive(Debug)]
pub struct IndexPointer<E: RuntimeEnvironment> {
    key: Arc<Vec<u8>>,
    _phantom: PhantomData<E>,
}

impl<E: RuntimeEnvironment> KeyValuePointer<E> for IndexPointer<E> {
    fn wrap(word: &[u8]) -> Self {
        Self {
            key: Arc::new(word.to_vec()),
            _phantom: PhantomData,
        }
    }
    fn unwrap(&self) -> Arc<Vec<u8>> {
        self.key.clone()
    }
    fn inherits(&mut self, _v: &Self) {}
    fn set(&mut self, env: &mut E, v: Arc<Vec<u8>>) {
        set(env, self.unwrap(), v)
    }
    fn get(&self, env: &mut E) -> Arc<Vec<u8>> {
        get(env, self.unwrap())
    }
}

impl<E: RuntimeEnvironment> Clone for IndexPointer<E> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            _phantom: PhantomData,
        }
    }
}

impl<E: RuntimeEnvironment> Default for IndexPointer<E> {
    fn default() -> Self {
        Self::wrap(&[])
    }
}

#[derive(Clone, Default, Debug)]
pub struct IndexCheckpoint(pub HashMap<Arc<Vec<u8>>, Arc<Vec<u8>>>);

impl IndexCheckpoint {
    fn pipe_to(self, target: &mut IndexCheckpoint) {
        target.0.extend(self.0);
    }
}

/// Stack of write overlays shared by every pointer derived from the same
/// root. The bottom layer is never popped.
#[derive(Clone, Debug)]
pub struct IndexCheckpointStack(pub Rc<RefCell<Vec<IndexCheckpoint>>>);

impl Default for IndexCheckpointStack {
    fn default() -> Self {
        Self(Rc::new(RefCell::new(vec![IndexCheckpoint::default()])))
    }
}

impl IndexCheckpointStack {
    pub fn depth(&self) -> usize {
        self.0.borrow().len()
    }
}

/// Pointer whose writes land in the topmost checkpoint layer until that
/// layer is committed or rolled back.
#[derive(Debug)]
pub struct AtomicPointer<E: RuntimeEnvironment> {
    pointer: IndexPointer<E>,
    store: IndexCheckpointStack,
}

impl<E: RuntimeEnvironment> KeyValuePointer<E> for AtomicPointer<E> {
    fn wrap(word: &[u8]) -> Self {
        AtomicPointer {
            pointer: IndexPointer::wrap(word),
            store: IndexCheckpointStack::default(),
        }
    }
    fn unwrap(&self) -> Arc<Vec<u8>> {
        self.pointer.unwrap()
    }
    fn inherits(&mut self, from: &Self) {
        self.store = from.store.clone()
    }
    fn set(&mut self, _env: &mut E, v: Arc<Vec<u8>>) {
        if let Some(layer) = self.store.0.borrow_mut().last_mut() {
            layer.0.insert(self.unwrap(), v);
        }
    }
    fn get(&self, env: &mut E) -> Arc<Vec<u8>> {
        let key = self.unwrap();
        let staged = self
            .store
            .0
            .borrow()
            .iter()
            .rev()
            .find_map(|layer| layer.0.get(&key).cloned());
        match staged {
            Some(value) => value,
            None => self.pointer.get(env),
        }
    }
}

impl<E: RuntimeEnvironment> Clone for AtomicPointer<E> {
    fn clone(&self) -> Self {
        Self {
            pointer: self.pointer.clone(),
            store: self.store.clone(),
        }
    }
}

impl<E: RuntimeEnvironment> Default for AtomicPointer<E> {
    fn default() -> Self {
        AtomicPointer {
            pointer: IndexPointer::default(),
            store: IndexCheckpointStack::default(),
        }
    }
}

impl<E: RuntimeEnvironment> AtomicPointer<E> {
    pub fn checkpoint(&mut self) {
        self.store.0.borrow_mut().push(IndexCheckpoint::default());
    }

    /// Folds the top layer into the one below it. Committing the bottom
    /// layer writes its contents into the environment cache, in key order,
    /// and leaves the layer empty.
    pub fn commit(&mut self, env: &mut E) {
        let mut checkpoints = self.store.0.borrow_mut();
        if checkpoints.len() > 1 {
            if let Some(top) = checkpoints.pop() {
                if let Some(below) = checkpoints.last_mut() {
                    top.pipe_to(below);
                }
            }
            return;
        }
        let base = checkpoints.first_mut().map(std::mem::take).unwrap_or_default();
        drop(checkpoints);
        let mut entries: Vec<_> = base.0.into_iter().collect();
        entries.sort();
        for (k, v) in entries {
            set(env, k, v);
        }
    }

    /// Discards the top layer. Rolling back the bottom layer empties it.
    pub fn rollback(&mut self) {
        let mut checkpoints = self.store.0.borrow_mut();
        if checkpoints.len() > 1 {
            checkpoints.pop();
        } else if let Some(base) = checkpoints.first_mut() {
            base.0.clear();
        }
    }

    pub fn get_pointer(&self) -> IndexPointer<E> {
        self.pointer.clone()
    }

    pub fn checkpoint_depth(&self) -> usize {
        self.store.depth()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryEnvironment;

    #[test]
    fn test_keyword_and_select_build_composite_keys() {
        let root = AtomicPointer::<MemoryEnvironment>::from_keyword("/allowances/");
        let ptr = root.select(&[0xaa]).keyword("/").select(&[0xbb]);
        assert_eq!(*ptr.unwrap(), b"/allowances/\xaa/\xbb".to_vec());
    }

    #[test]
    fn test_rollback_discards_staged_writes() {
        let mut env = MemoryEnvironment::default();
        let mut root = AtomicPointer::<MemoryEnvironment>::default();
        let mut slot = root.keyword("/slot");
        slot.set_value::<u32>(&mut env, 5);
        root.commit(&mut env);

        root.checkpoint();
        slot.set_value::<u32>(&mut env, 9);
        assert_eq!(slot.get_value::<u32>(&mut env), 9);
        root.rollback();
        assert_eq!(slot.get_value::<u32>(&mut env), 5);
        assert_eq!(root.checkpoint_depth(), 1);
    }

    #[test]
    fn test_nested_commit_reaches_environment_only_from_base() {
        let mut env = MemoryEnvironment::default();
        let mut root = AtomicPointer::<MemoryEnvironment>::default();
        let mut slot = root.keyword("/slot");

        root.checkpoint();
        slot.set_value::<u64>(&mut env, 42);
        root.commit(&mut env);
        assert!(env.cache().is_empty());
        assert_eq!(root.checkpoint_depth(), 1);

        root.commit(&mut env);
        assert_eq!(slot.get_pointer().get_value::<u64>(&mut env), 42);
        assert_eq!(env.to_flush().len(), 1);
    }

    #[test]
    fn test_unset_slot_reads_zero() {
        let mut env = MemoryEnvironment::default();
        let root = AtomicPointer::<MemoryEnvironment>::default();
        assert_eq!(root.keyword("/nothing").get_value::<u128>(&mut env), 0);
    }
}
