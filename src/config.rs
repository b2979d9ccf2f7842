use crate::deploy::ConstructionArgs;
use crate::metadata::{DEFAULT_DECIMALS, DEFAULT_NAME, DEFAULT_RAW_SUPPLY, DEFAULT_SYMBOL};
use anyhow::{anyhow, Context, Result};
use satforge_support::{address::Address, Amount};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Deployment described as JSON, e.g.
///
/// ```json
/// { "name": "Test", "symbol": "TST", "supply": "1000", "decimals": 18,
///   "deployer": "0x0000…01" }
/// ```
///
/// Missing fields take the contract defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DeployConfig {
    pub name: String,
    pub symbol: String,
    /// Whole tokens as a decimal string; u256 does not fit a JSON number.
    pub supply: String,
    pub decimals: u8,
    pub deployer: Address,
}

pub fn default_deployer() -> Address {
    let mut bytes = [0u8; 32];
    bytes[31] = 1;
    Address::new(bytes)
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            symbol: DEFAULT_SYMBOL.to_string(),
            supply: DEFAULT_RAW_SUPPLY.to_string(),
            decimals: DEFAULT_DECIMALS,
            deployer: default_deployer(),
        }
    }
}

impl DeployConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading deploy config {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("parsing deploy config {}", path.display()))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn raw_supply(&self) -> Result<Amount> {
        self.supply
            .trim()
            .parse::<Amount>()
            .map_err(|e| anyhow!("invalid supply {:?}: {}", self.supply, e))
    }

    pub fn construction_args(&self) -> Result<ConstructionArgs> {
        Ok(ConstructionArgs {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            raw_supply: self.raw_supply()?,
        })
    }

    pub fn to_calldata(&self) -> Result<Vec<u8>> {
        Ok(self.construction_args()?.encode()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() -> Result<()> {
        let config = DeployConfig::from_json(r#"{ "name": "Test", "supply": "1000" }"#)?;
        assert_eq!(config.name, "Test");
        assert_eq!(config.symbol, DEFAULT_SYMBOL);
        assert_eq!(config.decimals, 18);
        assert_eq!(config.deployer, default_deployer());
        assert_eq!(config.raw_supply()?, Amount::from(1000u64));
        Ok(())
    }

    #[test]
    fn test_deployer_parses_from_hex() -> Result<()> {
        let hex = format!("0x{}", "ab".repeat(32));
        let config = DeployConfig::from_json(&format!(r#"{{ "deployer": "{}" }}"#, hex))?;
        assert_eq!(config.deployer, Address::new([0xab; 32]));
        assert!(DeployConfig::from_json(r#"{ "deployer": "0x1234" }"#).is_err());
        Ok(())
    }

    #[test]
    fn test_calldata_matches_construction_encoding() -> Result<()> {
        let config = DeployConfig {
            name: "Test".to_string(),
            symbol: "TST".to_string(),
            supply: "1000".to_string(),
            ..DeployConfig::default()
        };
        let decoded = ConstructionArgs::decode(&config.to_calldata()?)?;
        assert_eq!(decoded, Some(config.construction_args()?));
        Ok(())
    }

    #[test]
    fn test_rejects_non_numeric_supply() {
        let config = DeployConfig {
            supply: "lots".to_string(),
            ..DeployConfig::default()
        };
        assert!(config.raw_supply().is_err());
    }
}
