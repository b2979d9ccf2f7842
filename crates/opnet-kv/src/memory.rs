use crate::cache::decode_flush;
use crate::environment::RuntimeEnvironment;
use anyhow::Result;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// In-process substrate backed by an ordered map. Used by the CLI harness
/// and by tests in place of a real node.
#[derive(Debug, Clone, Default)]
pub struct MemoryEnvironment {
    store: BTreeMap<Vec<u8>, Vec<u8>>,
    cache: HashMap<Arc<Vec<u8>>, Arc<Vec<u8>>>,
    to_flush: Vec<Arc<Vec<u8>>>,
    flushes: usize,
}

impl MemoryEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.store.insert(key, value);
    }

    pub fn stored(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.store.get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Number of batches received through [`RuntimeEnvironment::flush`].
    pub fn flushes(&self) -> usize {
        self.flushes
    }
}

impl RuntimeEnvironment for MemoryEnvironment {
    fn get(&mut self, key: &[u8]) -> Option<Vec<u8>> {
        self.store.get(key).cloned()
    }

    fn flush(&mut self, data: &[u8]) -> Result<()> {
        for (k, v) in decode_flush(data)? {
            self.store.insert(k, v);
        }
        self.flushes += 1;
        Ok(())
    }

    fn log(&self, message: &str) {
        log::info!(target: "opnet_kv::memory", "{}", message);
    }

    fn clear(&mut self) {
        self.cache.clear();
        self.to_flush.clear();
    }

    fn cache(&mut self) -> &mut HashMap<Arc<Vec<u8>>, Arc<Vec<u8>>> {
        &mut self.cache
    }

    fn to_flush(&mut self) -> &mut Vec<Arc<Vec<u8>>> {
        &mut self.to_flush
    }
}
