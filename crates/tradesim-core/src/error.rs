//! Error types for the trading simulator.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::{Direction, PositionType};

/// Top-level simulator error.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TradingError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Position error: {0}")]
    Position(#[from] PositionError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Calculation error: {0}")]
    Calculation(#[from] CalculationError),
}

/// Errors raised while creating or adapting a position.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PositionError {
    #[error("Position size must be positive (got: {0})")]
    InvalidSize(Decimal),

    #[error("{which} distance must be positive (got: {value})")]
    InvalidDistance { which: &'static str, value: Decimal },

    #[error("Trailing step size must be positive (got: {0})")]
    InvalidStepSize(Decimal),

    #[error("Margin must not be negative (got: {0})")]
    InvalidMargin(Decimal),

    #[error("Levels violate {direction} placement: stop {stop}, entry {entry}, limit {limit}")]
    InvalidLevels {
        direction: Direction,
        stop: Decimal,
        entry: Decimal,
        limit: Decimal,
    },

    #[error("Adaptation is not supported for {0} positions")]
    UnsupportedOperation(PositionType),

    #[error("{other} does not match the {position} position")]
    PairMismatch { position: String, other: String },

    #[error("Bar at {time} is older than the last adapted bar at {last}")]
    StaleBar {
        time: DateTime<Utc>,
        last: DateTime<Utc>,
    },

    #[error("Exit amount {amount} exceeds position size {size}")]
    ExitExceedsSize { amount: Decimal, size: Decimal },

    #[error("Exit signal closes {signal} but position is {position}")]
    ExitDirectionMismatch {
        signal: Direction,
        position: Direction,
    },
}

/// Price data errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    #[error("Unknown pair: {0}")]
    UnknownPair(String),

    #[error("Invalid timeframe: {0}")]
    InvalidTimeframe(String),

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("No entry in {pair} series at {time}")]
    NoEntryForTime { pair: String, time: DateTime<Utc> },

    #[error("Pair mismatch: expected {expected}, got {actual}")]
    PairMismatch { expected: String, actual: String },
}

/// Monetary calculation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalculationError {
    #[error("Invalid conversion rate {rate} at {time}")]
    InvalidConversionRate { rate: Decimal, time: DateTime<Utc> },

    #[error("{0} must be positive (got: {1})")]
    NonPositive(&'static str, Decimal),

    #[error("Arithmetic overflow in {0}")]
    Overflow(&'static str),
}

/// Result type alias for simulator operations.
pub type TradingResult<T> = Result<T, TradingError>;
