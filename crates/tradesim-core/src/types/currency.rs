//! Currencies that prices are quoted in and accounts are kept in.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DataError;

/// A currency or crypto/commodity unit used as a pair leg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Eur,
    Usd,
    Gbp,
    Jpy,
    Eth,
    Xbt,
    Paxg,
}

impl Currency {
    /// Code as used in technical pair names.
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Usd => "USD",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
            Currency::Eth => "ETH",
            Currency::Xbt => "XBT",
            Currency::Paxg => "PAXG",
        }
    }

    /// Number of decimal places in the currency's minor unit.
    ///
    /// Crypto and commodity units have no fixed minor unit; they fall back to
    /// cent precision, which is what account balances are reported in.
    pub fn minor_unit_precision(&self) -> u32 {
        match self {
            Currency::Jpy => 0,
            _ => 2,
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "EUR" => Ok(Currency::Eur),
            "USD" => Ok(Currency::Usd),
            "GBP" => Ok(Currency::Gbp),
            "JPY" => Ok(Currency::Jpy),
            "ETH" => Ok(Currency::Eth),
            "XBT" | "BTC" => Ok(Currency::Xbt),
            "PAXG" => Ok(Currency::Paxg),
            _ => Err(DataError::UnknownCurrency(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_parse() {
        assert_eq!(Currency::from_str("eur").unwrap(), Currency::Eur);
        assert_eq!(Currency::from_str("BTC").unwrap(), Currency::Xbt);
        assert!(matches!(
            Currency::from_str("DOGE"),
            Err(DataError::UnknownCurrency(_))
        ));
    }

    #[test]
    fn test_currency_serde_matches_code() {
        let json = serde_json::to_string(&Currency::Paxg).unwrap();
        assert_eq!(json, "\"PAXG\"");
        let parsed: Currency = serde_json::from_str("\"USD\"").unwrap();
        assert_eq!(parsed, Currency::Usd);
    }

    #[test]
    fn test_minor_unit_precision() {
        assert_eq!(Currency::Eur.minor_unit_precision(), 2);
        assert_eq!(Currency::Jpy.minor_unit_precision(), 0);
    }
}
