use ruint::aliases::U256;

/// Conversion between a typed value and the raw bytes kept in a storage slot.
///
/// An empty slot always decodes through [`ByteView::zero`], which is what
/// gives unset balances and allowances their zero reading.
pub trait ByteView {
    fn to_bytes(&self) -> Vec<u8>;
    fn from_bytes(v: Vec<u8>) -> Self;
    fn zero() -> Self;
    fn maximum() -> Self;
}

macro_rules! impl_byte_view_le {
    ($($t:ty),*) => {
        $(
            impl ByteView for $t {
                fn to_bytes(&self) -> Vec<u8> {
                    self.to_le_bytes().to_vec()
                }
                fn from_bytes(v: Vec<u8>) -> Self {
                    let mut buffer = [0u8; std::mem::size_of::<$t>()];
                    let n = v.len().min(buffer.len());
                    buffer[..n].copy_from_slice(&v[..n]);
                    <$t>::from_le_bytes(buffer)
                }
                fn zero() -> Self {
                    0
                }
                fn maximum() -> Self {
                    <$t>::MAX
                }
            }
        )*
    };
}

impl_byte_view_le!(u8, u32, u64, u128);

// 256-bit amounts are stored big-endian, the same layout used on the wire.
// A slot holding a value wider than 256 bits reads as zero and is logged.
impl ByteView for U256 {
    fn to_bytes(&self) -> Vec<u8> {
        self.to_be_bytes::<32>().to_vec()
    }
    fn from_bytes(v: Vec<u8>) -> Self {
        match U256::try_from_be_slice(&v) {
            Some(value) => value,
            None => {
                log::warn!(
                    "corrupt u256 slot: {} bytes do not fit in 256 bits",
                    v.len()
                );
                U256::ZERO
            }
        }
    }
    fn zero() -> Self {
        U256::ZERO
    }
    fn maximum() -> Self {
        U256::MAX
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_le_values_are_padded() {
        assert_eq!(u32::from_bytes(vec![0x01]), 1);
        assert_eq!(u128::from_bytes(vec![]), 0);
        assert_eq!(u8::from_bytes(vec![7, 9]), 7);
    }

    #[test]
    fn test_u256_layout_is_big_endian() {
        let v = U256::from(0x0102u64);
        let bytes = v.to_bytes();
        assert_eq!(bytes.len(), 32);
        assert_eq!(&bytes[30..], &[0x01, 0x02]);
        assert_eq!(U256::from_bytes(bytes), v);
        assert_eq!(U256::from_bytes(U256::MAX.to_bytes()), U256::maximum());
    }

    #[test]
    fn test_u256_slot_width() {
        let mut padded = vec![0u8; 8];
        padded.extend_from_slice(&U256::from(5u64).to_bytes());
        assert_eq!(U256::from_bytes(padded), U256::from(5u64));
        assert_eq!(U256::from_bytes(vec![1u8; 33]), U256::ZERO);
    }
}
