//! Position risk state and profit/loss calculation.
//!
//! Provides positions with fixed or trailing protective levels and the
//! calculator that turns price moves into account-currency profit/loss.

mod calculator;
mod position;
mod trailing_stop;

pub use calculator::{Account, ProfitLossResult, TradingCalculator};
pub use position::{Opening, Position, RiskRule, TriggeredLevel};
pub use trailing_stop::{AdaptLevels, AdaptOutcome, HardLimit, Levels, PositionKind, TrailingStop};
