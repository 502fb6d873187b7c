//! Bid/ask OHLC bars and in-memory time series.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::Pair;
use crate::error::DataError;
use crate::traits::TimeSeries;

/// Open/high/low/close prices for one side of the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Ohlc {
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
}

impl Ohlc {
    pub fn new(open: Decimal, high: Decimal, low: Decimal, close: Decimal) -> Self {
        Self {
            open,
            high,
            low,
            close,
        }
    }

    /// A bar where all four prices are the same.
    pub fn flat(price: Decimal) -> Self {
        Self::new(price, price, price, price)
    }
}

/// Immutable bid/ask price bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSeriesEntry {
    /// Bar open time
    pub time: DateTime<Utc>,
    pub open_bid: Decimal,
    pub open_ask: Decimal,
    pub high_bid: Decimal,
    pub high_ask: Decimal,
    pub low_bid: Decimal,
    pub low_ask: Decimal,
    pub close_bid: Decimal,
    pub close_ask: Decimal,
    /// Traded volume
    pub volume: Decimal,
    /// Number of trades in the bar
    pub trades: Decimal,
    pub pair: Pair,
}

fn mid(bid: Decimal, ask: Decimal) -> Decimal {
    (bid + ask) / Decimal::TWO
}

impl TimeSeriesEntry {
    /// Create a bar from its bid and ask sides. Volume and trades start at zero.
    pub fn new(time: DateTime<Utc>, pair: Pair, bid: Ohlc, ask: Ohlc) -> Self {
        Self {
            time,
            open_bid: bid.open,
            open_ask: ask.open,
            high_bid: bid.high,
            high_ask: ask.high,
            low_bid: bid.low,
            low_ask: ask.low,
            close_bid: bid.close,
            close_ask: ask.close,
            volume: Decimal::ZERO,
            trades: Decimal::ZERO,
            pair,
        }
    }

    /// Set volume and trade count.
    pub fn with_volume(mut self, volume: Decimal, trades: Decimal) -> Self {
        self.volume = volume;
        self.trades = trades;
        self
    }

    pub fn bid(&self) -> Ohlc {
        Ohlc::new(self.open_bid, self.high_bid, self.low_bid, self.close_bid)
    }

    pub fn ask(&self) -> Ohlc {
        Ohlc::new(self.open_ask, self.high_ask, self.low_ask, self.close_ask)
    }

    #[inline]
    pub fn open_mid(&self) -> Decimal {
        mid(self.open_bid, self.open_ask)
    }

    #[inline]
    pub fn high_mid(&self) -> Decimal {
        mid(self.high_bid, self.high_ask)
    }

    #[inline]
    pub fn low_mid(&self) -> Decimal {
        mid(self.low_bid, self.low_ask)
    }

    #[inline]
    pub fn close_mid(&self) -> Decimal {
        mid(self.close_bid, self.close_ask)
    }

    /// Spread at the close.
    pub fn close_spread(&self) -> Decimal {
        self.close_ask - self.close_bid
    }

    /// Check if the mid price closed above where it opened.
    pub fn is_green_candle(&self) -> bool {
        self.close_mid() > self.open_mid()
    }
}

impl fmt::Display for TimeSeriesEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} O:{} H:{} L:{} C:{} (mid) V:{} N:{}",
            self.pair,
            self.time.format("%Y-%m-%d %H:%M"),
            self.open_mid(),
            self.high_mid(),
            self.low_mid(),
            self.close_mid(),
            self.volume,
            self.trades
        )
    }
}

/// Time-ordered bars of a single pair, keyed by bar open time.
#[derive(Debug, Clone)]
pub struct BarTimeSeries {
    pair: Pair,
    entries: BTreeMap<DateTime<Utc>, TimeSeriesEntry>,
}

impl BarTimeSeries {
    /// Create a new empty series.
    pub fn new(pair: Pair) -> Self {
        Self {
            pair,
            entries: BTreeMap::new(),
        }
    }

    /// Build a series from bars in any order.
    pub fn from_entries(
        pair: Pair,
        entries: impl IntoIterator<Item = TimeSeriesEntry>,
    ) -> Result<Self, DataError> {
        let mut series = Self::new(pair);
        for entry in entries {
            series.push(entry)?;
        }
        Ok(series)
    }

    /// Insert a bar, replacing any bar with the same open time.
    pub fn push(&mut self, entry: TimeSeriesEntry) -> Result<(), DataError> {
        if entry.pair != self.pair {
            return Err(DataError::PairMismatch {
                expected: self.pair.to_string(),
                actual: entry.pair.to_string(),
            });
        }
        self.entries.insert(entry.time, entry);
        Ok(())
    }

    /// Latest bar opened at or before `time`.
    pub fn entry_at_or_before(&self, time: DateTime<Utc>) -> Option<&TimeSeriesEntry> {
        self.entries.range(..=time).next_back().map(|(_, e)| e)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first(&self) -> Option<&TimeSeriesEntry> {
        self.entries.values().next()
    }

    pub fn last(&self) -> Option<&TimeSeriesEntry> {
        self.entries.values().next_back()
    }

    /// Iterate bars from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &TimeSeriesEntry> {
        self.entries.values()
    }
}

impl TimeSeries for BarTimeSeries {
    fn pair(&self) -> Pair {
        self.pair
    }

    /// Exact match on bar open time, otherwise the bar whose span covers `time`.
    fn entry_for_time(&self, time: DateTime<Utc>) -> Result<&TimeSeriesEntry, DataError> {
        let span = self.pair.timeframe().duration();
        self.entry_at_or_before(time)
            .filter(|e| time - e.time < span)
            .ok_or_else(|| DataError::NoEntryForTime {
                pair: self.pair.to_string(),
                time,
            })
    }
}
