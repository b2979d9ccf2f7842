use bitcoin::hashes::{sha256, Hash};

/// Four-byte method identifier, compared as a big-endian `u32`.
pub type Selector = u32;

/// First four bytes of `sha256(name)`. Callers compute this on their side to
/// build calldata, so the derivation must stay byte-for-byte stable.
pub fn encode_selector(name: &str) -> Selector {
    let digest = sha256::Hash::hash(name.as_bytes()).to_byte_array();
    u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
}

pub fn selector_bytes(selector: Selector) -> [u8; 4] {
    selector.to_be_bytes()
}
