//! Core data types for the trading simulator.

mod currency;
mod direction;
mod ohlcv;
mod pair;
mod signal;
mod timeframe;

pub use currency::Currency;
pub use direction::{Direction, PositionType};
pub use ohlcv::{BarTimeSeries, Ohlc, TimeSeriesEntry};
pub use pair::Pair;
pub use signal::ExitSignal;
pub use timeframe::Timeframe;
