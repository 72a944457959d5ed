//! Deployment configuration for a token ledger and its sale

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::types::*;
use crate::utils::validation::{validate_metadata, validate_token_price};

/// Configuration for a token ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    pub name: String,
    pub symbol: String,
    pub standard: String,
    /// Supply credited to the creator at construction
    pub initial_supply: Amount,
}

impl Default for TokenConfig {
    fn default() -> Self {
        let metadata = TokenMetadata::default();
        Self {
            name: metadata.name,
            symbol: metadata.symbol,
            standard: metadata.standard,
            initial_supply: 1_000_000,
        }
    }
}

impl TokenConfig {
    /// Metadata described by this configuration
    pub fn metadata(&self) -> TokenMetadata {
        TokenMetadata {
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            standard: self.standard.clone(),
        }
    }

    pub fn validate(&self) -> TokenResult<()> {
        validate_metadata(&self.metadata())
    }
}

/// Configuration for a token sale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaleConfig {
    /// Price of one token unit in the smallest native-currency unit
    pub token_price: Amount,
    /// Units the deployer moves into the sale account after creating it
    pub initial_inventory: Amount,
}

impl Default for SaleConfig {
    fn default() -> Self {
        Self {
            token_price: 1_000_000_000_000_000,
            initial_inventory: 750_000,
        }
    }
}

impl SaleConfig {
    pub fn validate(&self) -> TokenResult<()> {
        validate_token_price(self.token_price)
    }
}

/// Combined configuration for deploying a ledger together with a sale
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentConfig {
    pub token: TokenConfig,
    pub sale: SaleConfig,
}

impl DeploymentConfig {
    /// Parse and validate a configuration from JSON text
    ///
    /// Missing fields fall back to their defaults.
    pub fn from_json_str(json: &str) -> TokenResult<Self> {
        let config: DeploymentConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a configuration file
    pub fn from_path(path: impl AsRef<Path>) -> TokenResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| {
            TokenError::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> TokenResult<()> {
        self.token.validate()?;
        self.sale.validate()?;

        if self.sale.initial_inventory > self.token.initial_supply {
            return Err(TokenError::Validation(format!(
                "Sale inventory {} exceeds initial supply {}",
                self.sale.initial_inventory, self.token.initial_supply
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_describe_dapp_token() {
        let config = DeploymentConfig::default();

        assert_eq!(config.token.name, "Dapp Token");
        assert_eq!(config.token.symbol, "DAPP");
        assert_eq!(config.token.standard, "Dapp Token v1.0");
        assert_eq!(config.token.initial_supply, 1_000_000);
        assert_eq!(config.sale.token_price, 1_000_000_000_000_000);
        assert_eq!(config.sale.initial_inventory, 750_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config =
            DeploymentConfig::from_json_str(r#"{ "token": { "initial_supply": 500 }, "sale": { "initial_inventory": 100 } }"#)
                .unwrap();

        assert_eq!(config.token.initial_supply, 500);
        assert_eq!(config.token.symbol, "DAPP");
        assert_eq!(config.sale.initial_inventory, 100);
        assert_eq!(config.sale.token_price, 1_000_000_000_000_000);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = DeploymentConfig::from_json_str("{ not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }

    #[test]
    fn test_inventory_larger_than_supply_rejected() {
        let err = DeploymentConfig::from_json_str(
            r#"{ "token": { "initial_supply": 10 }, "sale": { "initial_inventory": 11 } }"#,
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_zero_price_rejected() {
        let err = DeploymentConfig::from_json_str(r#"{ "sale": { "token_price": 0 } }"#)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = DeploymentConfig::from_path("/nonexistent/dapp-token.json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Config);
    }
}
