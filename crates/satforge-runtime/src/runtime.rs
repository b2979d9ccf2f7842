use crate::storage::StoragePointer;
use opnet_kv::{cache, KeyValuePointer, RuntimeEnvironment};
use satforge_support::{
    error::{Op20Error, Op20Result},
    event::Event,
};

/// Owns the storage substrate for one contract instance and brackets every
/// external call in a checkpoint. Events emitted during a call are held back
/// until the call commits.
#[derive(Debug)]
pub struct ContractRuntime<E: RuntimeEnvironment> {
    env: E,
    root: StoragePointer<E>,
    events: Vec<Event>,
    in_flight: bool,
}

impl<E: RuntimeEnvironment> ContractRuntime<E> {
    pub fn new(env: E) -> Self {
        Self {
            env,
            root: StoragePointer::default(),
            events: Vec::new(),
            in_flight: false,
        }
    }

    pub fn env(&mut self) -> &mut E {
        &mut self.env
    }

    pub fn into_env(self) -> E {
        self.env
    }

    /// Slot under the runtime root; shares the root's checkpoint stack.
    pub fn pointer(&self, keyword: &str) -> StoragePointer<E> {
        self.root.keyword(keyword)
    }

    /// Forwards to the substrate's log sink.
    pub fn log(&self, message: &str) {
        self.env.log(message);
    }

    pub fn emit(&mut self, event: impl Into<Event>) {
        self.events.push(event.into());
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn begin(&mut self) -> Op20Result<()> {
        if self.in_flight {
            return Err(Op20Error::Reentrancy);
        }
        self.in_flight = true;
        self.root.checkpoint();
        Ok(())
    }

    /// Folds the call's writes down into the substrate and releases the
    /// events it emitted. If the substrate rejects the batch, the call's
    /// writes are dropped from the cache and its events discarded.
    pub fn commit(&mut self) -> Op20Result<Vec<Event>> {
        self.root.commit(&mut self.env);
        self.root.commit(&mut self.env);
        self.in_flight = false;
        let flushed = match cache::flush(&mut self.env) {
            Ok(flushed) => flushed,
            Err(e) => {
                log::warn!("flush failed, discarding call: {}", e);
                cache::clear(&mut self.env);
                self.events.clear();
                return Err(Op20Error::Storage(e.to_string()));
            }
        };
        let events = std::mem::take(&mut self.events);
        log::debug!(
            "call committed: {} keys flushed, {} events",
            flushed,
            events.len()
        );
        Ok(events)
    }

    pub fn abort(&mut self) {
        self.root.rollback();
        self.events.clear();
        self.in_flight = false;
    }
}

/// Implemented by contracts built on a [`ContractRuntime`].
pub trait ContractResponder<E: RuntimeEnvironment> {
    fn runtime(&mut self) -> &mut ContractRuntime<E>;

    /// Runs `f` as one all-or-nothing call. On error every write made by `f`
    /// is discarded along with its events.
    fn transact<T, F>(&mut self, f: F) -> Op20Result<(T, Vec<Event>)>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> Op20Result<T>,
    {
        self.runtime().begin()?;
        match f(self) {
            Ok(value) => {
                let events = self.runtime().commit()?;
                Ok((value, events))
            }
            Err(e) => {
                log::warn!("call reverted: {}", e);
                self.runtime().abort();
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opnet_kv::MemoryEnvironment;
    use std::collections::HashMap;
    use std::sync::Arc;

    struct Harness {
        runtime: ContractRuntime<MemoryEnvironment>,
    }

    impl ContractResponder<MemoryEnvironment> for Harness {
        fn runtime(&mut self) -> &mut ContractRuntime<MemoryEnvironment> {
            &mut self.runtime
        }
    }

    fn harness() -> Harness {
        Harness {
            runtime: ContractRuntime::new(MemoryEnvironment::default()),
        }
    }

    fn event(name: &str) -> Event {
        Event {
            name: name.to_string(),
            data: vec![],
        }
    }

    #[test]
    fn test_commit_persists_writes_and_events() -> Op20Result<()> {
        let mut p = harness();
        let (_, events) = p.transact(|p| {
            let mut slot = p.runtime.pointer("/slot");
            slot.set_value::<u32>(p.runtime.env(), 7);
            p.runtime.emit(event("Touched"));
            Ok(())
        })?;
        assert_eq!(events, vec![event("Touched")]);
        assert_eq!(p.runtime.env().stored(b"/slot"), Some(7u32.to_le_bytes().to_vec()));
        Ok(())
    }

    #[test]
    fn test_failure_discards_writes_and_events() {
        let mut p = harness();
        let result: Op20Result<((), Vec<Event>)> = p.transact(|p| {
            let mut slot = p.runtime.pointer("/slot");
            slot.set_value::<u32>(p.runtime.env(), 7);
            p.runtime.emit(event("Touched"));
            Err(Op20Error::InsufficientBalance)
        });
        assert_eq!(result, Err(Op20Error::InsufficientBalance));
        let slot = p.runtime.pointer("/slot");
        assert_eq!(slot.get_value::<u32>(p.runtime.env()), 0);
        assert!(p.runtime.env().is_empty());
        assert!(!p.runtime.is_in_flight());

        let (_, events) = p.transact(|_| Ok(())).expect("clean call");
        assert!(events.is_empty());
    }

    /// Rejects the first `failures` batches it is handed.
    #[derive(Debug, Default)]
    struct FailingFlush {
        inner: MemoryEnvironment,
        failures: usize,
    }

    impl RuntimeEnvironment for FailingFlush {
        fn get(&mut self, key: &[u8]) -> Option<Vec<u8>> {
            self.inner.get(key)
        }
        fn flush(&mut self, data: &[u8]) -> anyhow::Result<()> {
            if self.failures > 0 {
                self.failures -= 1;
                anyhow::bail!("disk full");
            }
            self.inner.flush(data)
        }
        fn log(&self, message: &str) {
            self.inner.log(message);
        }
        fn clear(&mut self) {
            self.inner.clear();
        }
        fn cache(&mut self) -> &mut HashMap<Arc<Vec<u8>>, Arc<Vec<u8>>> {
            self.inner.cache()
        }
        fn to_flush(&mut self) -> &mut Vec<Arc<Vec<u8>>> {
            self.inner.to_flush()
        }
    }

    struct OnFlaky {
        runtime: ContractRuntime<FailingFlush>,
    }

    impl ContractResponder<FailingFlush> for OnFlaky {
        fn runtime(&mut self) -> &mut ContractRuntime<FailingFlush> {
            &mut self.runtime
        }
    }

    #[test]
    fn test_failed_flush_discards_writes_and_events() {
        let mut p = OnFlaky {
            runtime: ContractRuntime::new(FailingFlush {
                failures: 1,
                ..FailingFlush::default()
            }),
        };
        let result = p.transact(|p| {
            let mut slot = p.runtime.pointer("/slot");
            slot.set_value::<u32>(p.runtime.env(), 7);
            p.runtime.emit(event("Touched"));
            Ok(())
        });
        assert!(matches!(result, Err(Op20Error::Storage(_))));
        assert!(!p.runtime.is_in_flight());
        let slot = p.runtime.pointer("/slot");
        assert_eq!(slot.get_value::<u32>(p.runtime.env()), 0);

        let (_, events) = p.transact(|_| Ok(())).expect("clean call");
        assert!(events.is_empty());
        assert!(p.runtime.env().inner.is_empty());
    }

    #[test]
    fn test_nested_call_is_rejected() {
        let mut p = harness();
        let result = p.transact(|p| p.transact(|_| Ok(())).map(|_| ()));
        assert_eq!(result.map(|_| ()), Err(Op20Error::Reentrancy));
        assert!(!p.runtime.is_in_flight());
    }
}
