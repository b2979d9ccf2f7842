//! Big-endian, fixed-width call data codec.
//!
//! | type      | layout                                   |
//! |-----------|------------------------------------------|
//! | `u8`/bool | 1 byte (bool is `0x00` or `0x01`)        |
//! | `u32`     | 4 bytes big-endian                       |
//! | `u256`    | 32 bytes big-endian                      |
//! | address   | 32 raw bytes                             |
//! | string    | `u32` big-endian byte length, then UTF-8 |
//!
//! There is no padding: [`BytesWriter`] emits exactly what [`Calldata`]
//! consumes.

use crate::address::{Address, ADDRESS_LENGTH};
use crate::error::{Op20Error, Op20Result};
use crate::Amount;
use byteorder::{BigEndian, ByteOrder};

pub const U256_LENGTH: usize = 32;

/// Sequential reader over an argument payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Calldata {
    data: Vec<u8>,
    offset: usize,
}

impl Calldata {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data, offset: 0 }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    fn take(&mut self, needed: usize) -> Op20Result<&[u8]> {
        let remaining = self.remaining();
        if needed > remaining {
            return Err(Op20Error::CalldataTooShort { needed, remaining });
        }
        let start = self.offset;
        self.offset += needed;
        Ok(&self.data[start..self.offset])
    }

    pub fn read_u8(&mut self) -> Op20Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_bool(&mut self) -> Op20Result<bool> {
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            v => Err(Op20Error::MalformedCalldata(format!(
                "invalid boolean byte 0x{:02x}",
                v
            ))),
        }
    }

    pub fn read_u32(&mut self) -> Op20Result<u32> {
        Ok(BigEndian::read_u32(self.take(4)?))
    }

    pub fn read_u256(&mut self) -> Op20Result<Amount> {
        let mut word = [0u8; U256_LENGTH];
        word.copy_from_slice(self.take(U256_LENGTH)?);
        Ok(Amount::from_be_bytes(word))
    }

    pub fn read_address(&mut self) -> Op20Result<Address> {
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes.copy_from_slice(self.take(ADDRESS_LENGTH)?);
        Ok(Address::new(bytes))
    }

    pub fn read_string_with_length(&mut self) -> Op20Result<String> {
        let length = self.read_u32()? as usize;
        if length > self.remaining() {
            return Err(Op20Error::MalformedCalldata(format!(
                "string length {} exceeds {} remaining bytes",
                length,
                self.remaining()
            )));
        }
        let bytes = self.take(length)?.to_vec();
        String::from_utf8(bytes)
            .map_err(|e| Op20Error::MalformedCalldata(format!("invalid UTF-8 string: {}", e)))
    }
}

impl From<Vec<u8>> for Calldata {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl From<&[u8]> for Calldata {
    fn from(data: &[u8]) -> Self {
        Self::new(data.to_vec())
    }
}

fn string_length_prefix(len: usize) -> Op20Result<u32> {
    u32::try_from(len).map_err(|_| {
        Op20Error::MalformedCalldata(format!("string of {} bytes exceeds the u32 length prefix", len))
    })
}

/// Append-only encoder mirroring [`Calldata`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BytesWriter {
    buffer: Vec<u8>,
}

impl BytesWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn write_u8(&mut self, v: u8) -> &mut Self {
        self.buffer.push(v);
        self
    }

    pub fn write_bool(&mut self, v: bool) -> &mut Self {
        self.write_u8(v as u8)
    }

    pub fn write_u32(&mut self, v: u32) -> &mut Self {
        let mut word = [0u8; 4];
        BigEndian::write_u32(&mut word, v);
        self.buffer.extend_from_slice(&word);
        self
    }

    pub fn write_u256(&mut self, v: Amount) -> &mut Self {
        self.buffer.extend_from_slice(&v.to_be_bytes::<U256_LENGTH>());
        self
    }

    pub fn write_address(&mut self, v: &Address) -> &mut Self {
        self.buffer.extend_from_slice(v.as_bytes());
        self
    }

    /// Fails for strings whose byte length does not fit the `u32` prefix.
    pub fn write_string_with_length(&mut self, v: &str) -> Op20Result<&mut Self> {
        self.write_u32(string_length_prefix(v.len())?);
        self.buffer.extend_from_slice(v.as_bytes());
        Ok(self)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(last: u8) -> Address {
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes[ADDRESS_LENGTH - 1] = last;
        Address::new(bytes)
    }

    #[test]
    fn test_mixed_payload_reads_back_in_order() -> Op20Result<()> {
        let mut writer = BytesWriter::new();
        writer
            .write_address(&addr(3))
            .write_u256(Amount::MAX)
            .write_string_with_length("Test")?
            .write_bool(true)
            .write_u8(18);
        let mut calldata = Calldata::new(writer.into_bytes());
        assert_eq!(calldata.read_address()?, addr(3));
        assert_eq!(calldata.read_u256()?, Amount::MAX);
        assert_eq!(calldata.read_string_with_length()?, "Test");
        assert!(calldata.read_bool()?);
        assert_eq!(calldata.read_u8()?, 18);
        assert_eq!(calldata.remaining(), 0);
        Ok(())
    }

    #[test]
    fn test_widths_are_fixed() -> Op20Result<()> {
        let mut writer = BytesWriter::new();
        writer.write_u256(Amount::from(1u64));
        assert_eq!(writer.len(), 32);
        assert_eq!(writer.as_bytes()[31], 1);

        let mut writer = BytesWriter::new();
        writer.write_string_with_length("")?;
        assert_eq!(writer.as_bytes(), &[0, 0, 0, 0]);
        Ok(())
    }

    #[test]
    fn test_string_length_prefix_bounds() {
        assert_eq!(string_length_prefix(u32::MAX as usize), Ok(u32::MAX));
        #[cfg(target_pointer_width = "64")]
        assert!(matches!(
            string_length_prefix(u32::MAX as usize + 1),
            Err(Op20Error::MalformedCalldata(_))
        ));
    }

    #[test]
    fn test_short_address_is_too_short() {
        let mut calldata = Calldata::new(vec![0u8; 31]);
        assert_eq!(
            calldata.read_address(),
            Err(Op20Error::CalldataTooShort {
                needed: 32,
                remaining: 31
            })
        );
    }

    #[test]
    fn test_oversized_string_prefix_is_malformed() {
        let mut calldata = Calldata::new(vec![0, 0, 0, 9, b'a', b'b']);
        assert!(matches!(
            calldata.read_string_with_length(),
            Err(Op20Error::MalformedCalldata(_))
        ));
    }

    #[test]
    fn test_invalid_utf8_and_bool_are_malformed() {
        let mut calldata = Calldata::new(vec![0, 0, 0, 1, 0xff]);
        assert!(matches!(
            calldata.read_string_with_length(),
            Err(Op20Error::MalformedCalldata(_))
        ));
        let mut calldata = Calldata::new(vec![2]);
        assert!(matches!(
            calldata.read_bool(),
            Err(Op20Error::MalformedCalldata(_))
        ));
    }
}
