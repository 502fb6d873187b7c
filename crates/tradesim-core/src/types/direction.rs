//! Trade direction and position type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Trade direction (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    /// Get the opposite direction.
    pub fn opposite(&self) -> Self {
        match self {
            Direction::Buy => Direction::Sell,
            Direction::Sell => Direction::Buy,
        }
    }

    /// Sign of a favorable price move (+1 for buy, -1 for sell).
    pub fn sign(&self) -> Decimal {
        match self {
            Direction::Buy => Decimal::ONE,
            Direction::Sell => -Decimal::ONE,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Buy => write!(f, "BUY"),
            Direction::Sell => write!(f, "SELL"),
        }
    }
}

/// How a position manages its protective levels. Fixed at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionType {
    /// Stop and limit stay where they were placed
    HardLimit,
    /// Stop follows favorable price moves
    Trailing,
}

impl fmt::Display for PositionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionType::HardLimit => write!(f, "HARD_LIMIT"),
            PositionType::Trailing => write!(f, "TRAILING"),
        }
    }
}
