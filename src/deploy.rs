use crate::metadata::{
    TokenMetadata, DEFAULT_NAME, DEFAULT_RAW_SUPPLY, DEFAULT_SYMBOL,
};
use satforge_support::{
    calldata::{BytesWriter, Calldata},
    error::Op20Result,
    Amount,
};

/// Construction payloads shorter than this fall back to the defaults.
pub const MIN_CONSTRUCTION_CALLDATA: usize = 3;

/// Deployment parameters: `(string name, string symbol, u256 rawSupply)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConstructionArgs {
    pub name: String,
    pub symbol: String,
    /// Whole tokens, before decimal scaling.
    pub raw_supply: Amount,
}

impl Default for ConstructionArgs {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            symbol: DEFAULT_SYMBOL.to_string(),
            raw_supply: Amount::from(DEFAULT_RAW_SUPPLY),
        }
    }
}

impl ConstructionArgs {
    /// `Ok(None)` when the payload is too short to carry parameters. A
    /// payload long enough to try must decode completely.
    pub fn decode(calldata: &[u8]) -> Op20Result<Option<Self>> {
        if calldata.len() < MIN_CONSTRUCTION_CALLDATA {
            return Ok(None);
        }
        let mut reader = Calldata::from(calldata);
        Ok(Some(Self {
            name: reader.read_string_with_length()?,
            symbol: reader.read_string_with_length()?,
            raw_supply: reader.read_u256()?,
        }))
    }

    pub fn encode(&self) -> Op20Result<Vec<u8>> {
        let mut writer = BytesWriter::with_capacity(8 + self.name.len() + self.symbol.len() + 32);
        writer
            .write_string_with_length(&self.name)?
            .write_string_with_length(&self.symbol)?
            .write_u256(self.raw_supply);
        Ok(writer.into_bytes())
    }

    pub fn into_metadata(self, decimals: u8) -> Op20Result<TokenMetadata> {
        TokenMetadata::new(self.name, self.symbol, self.raw_supply, decimals)
    }
}

/// Metadata a deployment with `calldata` produces.
pub fn resolve_metadata(calldata: &[u8], decimals: u8) -> Op20Result<TokenMetadata> {
    ConstructionArgs::decode(calldata)?
        .unwrap_or_default()
        .into_metadata(decimals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::DEFAULT_DECIMALS;
    use satforge_support::error::Op20Error;

    #[test]
    fn test_short_payload_uses_defaults() -> Op20Result<()> {
        assert_eq!(ConstructionArgs::decode(&[])?, None);
        assert_eq!(ConstructionArgs::decode(&[1, 2])?, None);
        let metadata = resolve_metadata(&[], DEFAULT_DECIMALS)?;
        assert_eq!(metadata.name, "OPfun Token");
        assert_eq!(metadata.symbol, "OPFUN");
        assert_eq!(
            metadata.max_supply,
            Amount::from(1_000_000u64) * Amount::from(10u64).pow(Amount::from(18u64))
        );
        Ok(())
    }

    #[test]
    fn test_encoded_args_decode_back() -> Op20Result<()> {
        let args = ConstructionArgs {
            name: "Test".to_string(),
            symbol: "TST".to_string(),
            raw_supply: Amount::from(1000u64),
        };
        assert_eq!(ConstructionArgs::decode(&args.encode()?)?, Some(args));
        Ok(())
    }

    #[test]
    fn test_truncated_payload_fails() -> Op20Result<()> {
        let mut payload = ConstructionArgs::default().encode()?;
        payload.truncate(payload.len() - 1);
        assert!(matches!(
            ConstructionArgs::decode(&payload),
            Err(Op20Error::CalldataTooShort { .. })
        ));
        Ok(())
    }

    #[test]
    fn test_supply_scaling_overflow_fails() -> Op20Result<()> {
        let args = ConstructionArgs {
            raw_supply: Amount::MAX,
            ..ConstructionArgs::default()
        };
        assert_eq!(
            resolve_metadata(&args.encode()?, 18),
            Err(Op20Error::ArithmeticOverflow)
        );
        Ok(())
    }
}
