//! Core value types for the trading simulator.
//!
//! This crate provides the building blocks shared by the risk engine:
//! - Instrument registry (Pair, Currency, Timeframe)
//! - Price bars and time series (TimeSeriesEntry, BarTimeSeries)
//! - Trade direction and exit signals
//! - The TimeSeries lookup trait consumed by profit/loss conversion

pub mod error;
pub mod traits;
pub mod types;

pub use error::{CalculationError, DataError, PositionError, TradingError, TradingResult};
pub use traits::*;
pub use types::*;
