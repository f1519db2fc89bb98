//! Token configuration.
//!
//! Every token contract takes an explicit, validated configuration at
//! construction. There is deliberately no other way to parameterize a
//! contract; configuration is immutable once the contract exists.

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;

/// Token symbols are short on-chain tickers.
pub const MAX_SYMBOL_LEN: usize = 6;

/// Upper bound on display decimals.
pub const MAX_DECIMALS: u8 = 18;

/// Immutable token metadata, validated at construction.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
pub struct TokenConfig {
    name: String,
    symbol: String,
    decimals: u8,
}

impl TokenConfig {
    pub fn new(
        name: impl Into<String>,
        symbol: impl Into<String>,
        decimals: u8,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            name: name.into(),
            symbol: symbol.into(),
            decimals,
        };
        config.validate()?;
        Ok(config)
    }

    /// Revalidates, e.g. after deserializing from external configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::EmptyName);
        }
        if self.symbol.is_empty() {
            return Err(ConfigError::EmptySymbol);
        }
        if self.symbol.len() > MAX_SYMBOL_LEN {
            return Err(ConfigError::SymbolTooLong(self.symbol.len()));
        }
        if self.decimals > MAX_DECIMALS {
            return Err(ConfigError::DecimalsTooLarge(self.decimals));
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        assert!(TokenConfig::new("SomeCoin", "SOM", 9).is_ok());
        assert!(matches!(
            TokenConfig::new("", "SOM", 9),
            Err(ConfigError::EmptyName)
        ));
        assert!(matches!(
            TokenConfig::new("SomeCoin", "", 9),
            Err(ConfigError::EmptySymbol)
        ));
        assert!(matches!(
            TokenConfig::new("SomeCoin", "TOOLONG", 9),
            Err(ConfigError::SymbolTooLong(7))
        ));
        assert!(matches!(
            TokenConfig::new("SomeCoin", "SOM", 19),
            Err(ConfigError::DecimalsTooLarge(19))
        ));
    }
}
