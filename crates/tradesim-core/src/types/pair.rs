//! Instrument registry.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::{Currency, Timeframe};
use crate::error::DataError;

/// A tradable instrument.
///
/// Pairs are immutable and live in a static table; they are looked up by
/// their technical name (e.g. `EUR/USD M1`) and serialize as that name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pair {
    technical_name: &'static str,
    base: Currency,
    quote: Currency,
    point_value: Decimal,
    timeframe: Timeframe,
}

static PAIRS: [Pair; 7] = [
    Pair::new("EUR/USD M1", Currency::Eur, Currency::Usd, dec!(0.0001), Timeframe::M1),
    Pair::new("EUR/USD", Currency::Eur, Currency::Usd, dec!(0.0001), Timeframe::H1),
    Pair::new("GBP/USD", Currency::Gbp, Currency::Usd, dec!(0.0001), Timeframe::H1),
    Pair::new("USD/JPY", Currency::Usd, Currency::Jpy, dec!(0.01), Timeframe::H1),
    Pair::new("ETH/EUR", Currency::Eth, Currency::Eur, dec!(1), Timeframe::H1),
    Pair::new("XBT/EUR", Currency::Xbt, Currency::Eur, dec!(1), Timeframe::H1),
    Pair::new("PAXG/USD", Currency::Paxg, Currency::Usd, dec!(0.01), Timeframe::H1),
];

impl Pair {
    const fn new(
        technical_name: &'static str,
        base: Currency,
        quote: Currency,
        point_value: Decimal,
        timeframe: Timeframe,
    ) -> Self {
        Self {
            technical_name,
            base,
            quote,
            point_value,
            timeframe,
        }
    }

    /// Look up a registered pair by its technical name.
    pub fn from_technical_name(name: &str) -> Result<Pair, DataError> {
        let wanted = name.trim();
        PAIRS
            .iter()
            .find(|p| p.technical_name.eq_ignore_ascii_case(wanted))
            .copied()
            .ok_or_else(|| DataError::UnknownPair(name.to_string()))
    }

    /// All registered pairs.
    pub fn all() -> &'static [Pair] {
        &PAIRS
    }

    /// EUR/USD minute bars, the series used for EUR conversion.
    pub fn eur_usd_1() -> Pair {
        PAIRS[0]
    }

    pub fn eur_usd() -> Pair {
        PAIRS[1]
    }

    pub fn gbp_usd() -> Pair {
        PAIRS[2]
    }

    pub fn usd_jpy() -> Pair {
        PAIRS[3]
    }

    pub fn eth_eur() -> Pair {
        PAIRS[4]
    }

    pub fn xbt_eur() -> Pair {
        PAIRS[5]
    }

    pub fn paxg_usd() -> Pair {
        PAIRS[6]
    }

    pub fn technical_name(&self) -> &'static str {
        self.technical_name
    }

    pub fn base_currency(&self) -> Currency {
        self.base
    }

    pub fn quote_currency(&self) -> Currency {
        self.quote
    }

    /// Price distance of one point.
    pub fn point_value(&self) -> Decimal {
        self.point_value
    }

    pub fn timeframe(&self) -> Timeframe {
        self.timeframe
    }

    /// Check if prices of this pair are expressed in `currency`.
    pub fn is_quoted_in(&self, currency: Currency) -> bool {
        self.quote == currency
    }

    /// Convert a distance in points into a price distance.
    ///
    /// Returns `None` if the result does not fit in a `Decimal`.
    pub fn points_to_price(&self, points: Decimal) -> Option<Decimal> {
        points.checked_mul(self.point_value)
    }
}

impl fmt::Display for Pair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.technical_name)
    }
}

impl FromStr for Pair {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pair::from_technical_name(s)
    }
}

impl Serialize for Pair {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.technical_name)
    }
}

impl<'de> Deserialize<'de> for Pair {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        Pair::from_technical_name(&name).map_err(de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_technical_name() {
        let pair = Pair::from_technical_name("EUR/USD M1").unwrap();
        assert_eq!(pair, Pair::eur_usd_1());
        assert_eq!(pair.base_currency(), Currency::Eur);
        assert_eq!(pair.quote_currency(), Currency::Usd);
        assert_eq!(pair.timeframe(), Timeframe::M1);

        // Case and surrounding whitespace are ignored
        assert_eq!(Pair::from_technical_name(" eth/eur ").unwrap(), Pair::eth_eur());
    }

    #[test]
    fn test_unknown_pair() {
        let err = Pair::from_technical_name("DOGE/EUR").unwrap_err();
        assert_eq!(err, DataError::UnknownPair("DOGE/EUR".to_string()));
    }

    #[test]
    fn test_technical_names_are_unique() {
        for (i, a) in Pair::all().iter().enumerate() {
            for b in &Pair::all()[i + 1..] {
                assert_ne!(a.technical_name(), b.technical_name());
            }
        }
    }

    #[test]
    fn test_points_to_price() {
        assert_eq!(Pair::eur_usd().points_to_price(dec!(20)), Some(dec!(0.0020)));
        assert_eq!(Pair::xbt_eur().points_to_price(dec!(150)), Some(dec!(150)));
        assert_eq!(Pair::usd_jpy().points_to_price(dec!(1)), Some(dec!(0.01)));
    }

    #[test]
    fn test_serializes_as_technical_name() {
        let json = serde_json::to_string(&Pair::paxg_usd()).unwrap();
        assert_eq!(json, "\"PAXG/USD\"");
        let parsed: Pair = serde_json::from_str("\"XBT/EUR\"").unwrap();
        assert_eq!(parsed, Pair::xbt_eur());
        assert!(serde_json::from_str::<Pair>("\"FOO/BAR\"").is_err());
    }
}
