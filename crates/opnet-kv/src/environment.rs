use anyhow::Result;
use std::collections::HashMap;
use std::sync::Arc;

/// The host-provided key-value substrate a contract runs against.
///
/// Reads go through a write-back cache owned by the environment; dirty keys
/// are collected in [`RuntimeEnvironment::to_flush`] and handed to
/// [`RuntimeEnvironment::flush`] as a single encoded batch.
pub trait RuntimeEnvironment: std::fmt::Debug {
    fn get(&mut self, key: &[u8]) -> Option<Vec<u8>>;
    fn flush(&mut self, data: &[u8]) -> Result<()>;
    fn log(&self, message: &str);
    fn clear(&mut self);
    fn cache(&mut self) -> &mut HashMap<Arc<Vec<u8>>, Arc<Vec<u8>>>;
    fn to_flush(&mut self) -> &mut Vec<Arc<Vec<u8>>>;
}
