use opnet_kv::AtomicPointer;

/// Every contract slot is addressed through an atomic pointer derived from
/// the runtime root, so all of a call's writes share one checkpoint stack.
pub type StoragePointer<E> = AtomicPointer<E>;
