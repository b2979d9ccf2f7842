use crate::environment::RuntimeEnvironment;
use anyhow::{anyhow, Result};
use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use std::sync::Arc;

pub fn get<E: RuntimeEnvironment>(env: &mut E, k: Arc<Vec<u8>>) -> Arc<Vec<u8>> {
    if let Some(value) = env.cache().get(&k) {
        return value.clone();
    }
    let value = Arc::new(env.get(k.as_ref()).unwrap_or_default());
    env.cache().insert(k, value.clone());
    value
}

pub fn set<E: RuntimeEnvironment>(env: &mut E, k: Arc<Vec<u8>>, v: Arc<Vec<u8>>) {
    env.cache().insert(k.clone(), v);
    if !env.to_flush().contains(&k) {
        env.to_flush().push(k);
    }
}

/// Encodes every dirty key as `u32 LE len | key | u32 LE len | value` and
/// hands the batch to the substrate. Returns the number of keys written.
pub fn flush<E: RuntimeEnvironment>(env: &mut E) -> Result<usize> {
    let keys = std::mem::take(env.to_flush());
    if keys.is_empty() {
        return Ok(0);
    }
    let mut buffer: Vec<u8> = Vec::new();
    for key in keys.iter() {
        let value = env
            .cache()
            .get(key)
            .cloned()
            .ok_or_else(|| anyhow!("dirty key missing from cache: {}", display_key(key)))?;
        buffer.write_u32::<LittleEndian>(key.len() as u32)?;
        buffer.extend_from_slice(key);
        buffer.write_u32::<LittleEndian>(value.len() as u32)?;
        buffer.extend_from_slice(&value);
    }
    env.flush(&buffer)?;
    log::debug!("flushed {} keys ({} bytes)", keys.len(), buffer.len());
    Ok(keys.len())
}

/// Inverse of the batch layout produced by [`flush`].
pub fn decode_flush(data: &[u8]) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
    fn take<'a>(data: &'a [u8], i: &mut usize, n: usize) -> Result<&'a [u8]> {
        let end = i
            .checked_add(n)
            .filter(|end| *end <= data.len())
            .ok_or_else(|| anyhow!("flush batch truncated at offset {}", i))?;
        let slice = &data[*i..end];
        *i = end;
        Ok(slice)
    }
    let mut pairs = Vec::new();
    let mut i = 0;
    while i < data.len() {
        let key_len = LittleEndian::read_u32(take(data, &mut i, 4)?) as usize;
        let key = take(data, &mut i, key_len)?.to_vec();
        let value_len = LittleEndian::read_u32(take(data, &mut i, 4)?) as usize;
        let value = take(data, &mut i, value_len)?.to_vec();
        pairs.push((key, value));
    }
    Ok(pairs)
}

/// Drops the read cache and any unflushed writes.
pub fn clear<E: RuntimeEnvironment>(env: &mut E) {
    env.clear();
}

fn display_key(key: &[u8]) -> String {
    String::from_utf8(key.to_vec()).unwrap_or_else(|_| format!("{:02x?}", key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryEnvironment;

    #[test]
    fn test_flush_round_trips_through_substrate() -> Result<()> {
        let mut env = MemoryEnvironment::default();
        set(&mut env, Arc::new(b"/a".to_vec()), Arc::new(vec![1, 2, 3]));
        set(&mut env, Arc::new(b"/b".to_vec()), Arc::new(vec![]));
        set(&mut env, Arc::new(b"/a".to_vec()), Arc::new(vec![4]));
        assert_eq!(flush(&mut env)?, 2);
        assert_eq!(env.stored(b"/a"), Some(vec![4]));
        assert_eq!(env.stored(b"/b"), Some(vec![]));
        assert_eq!(flush(&mut env)?, 0);
        Ok(())
    }

    #[test]
    fn test_decode_rejects_truncated_batch() {
        let mut data = vec![];
        data.extend_from_slice(&5u32.to_le_bytes());
        data.extend_from_slice(b"/ab");
        assert!(decode_flush(&data).is_err());
    }

    #[test]
    fn test_get_falls_through_to_substrate() {
        let mut env = MemoryEnvironment::default();
        env.insert(b"/seed".to_vec(), vec![9]);
        assert_eq!(*get(&mut env, Arc::new(b"/seed".to_vec())), vec![9]);
        assert!(get(&mut env, Arc::new(b"/missing".to_vec())).is_empty());
        clear(&mut env);
        assert!(env.cache().is_empty());
    }
}
