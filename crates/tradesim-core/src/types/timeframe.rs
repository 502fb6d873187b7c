//! Bar timeframes.

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DataError;

/// Bar resolution of a price series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Timeframe {
    /// 1 minute bars
    #[default]
    M1,
    /// 5 minute bars
    M5,
    /// 15 minute bars
    M15,
    /// 30 minute bars
    M30,
    /// 1 hour bars
    H1,
    /// 4 hour bars
    H4,
    /// Daily bars
    D1,
}

impl Timeframe {
    /// Get the duration of the timeframe in seconds.
    pub fn as_secs(&self) -> i64 {
        match self {
            Timeframe::M1 => 60,
            Timeframe::M5 => 300,
            Timeframe::M15 => 900,
            Timeframe::M30 => 1800,
            Timeframe::H1 => 3600,
            Timeframe::H4 => 14400,
            Timeframe::D1 => 86400,
        }
    }

    /// Span covered by a single bar.
    pub fn duration(&self) -> TimeDelta {
        TimeDelta::seconds(self.as_secs())
    }

    /// Suffix used in technical pair names, e.g. the `M1` in `EUR/USD M1`.
    pub fn suffix(&self) -> &'static str {
        match self {
            Timeframe::M1 => "M1",
            Timeframe::M5 => "M5",
            Timeframe::M15 => "M15",
            Timeframe::M30 => "M30",
            Timeframe::H1 => "H1",
            Timeframe::H4 => "H4",
            Timeframe::D1 => "D1",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}

impl FromStr for Timeframe {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "M1" | "1M" | "1MIN" => Ok(Timeframe::M1),
            "M5" | "5M" | "5MIN" => Ok(Timeframe::M5),
            "M15" | "15M" | "15MIN" => Ok(Timeframe::M15),
            "M30" | "30M" | "30MIN" => Ok(Timeframe::M30),
            "H1" | "1H" => Ok(Timeframe::H1),
            "H4" | "4H" => Ok(Timeframe::H4),
            "D1" | "1D" | "DAILY" => Ok(Timeframe::D1),
            _ => Err(DataError::InvalidTimeframe(s.to_string())),
        }
    }
}
