//! Core traits for the trading simulator.

mod time_series;

pub use time_series::TimeSeries;
