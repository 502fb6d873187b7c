//! Profit/loss calculation in account currency.

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};
use tradesim_core::{
    CalculationError, Currency, DataError, Direction, Pair, TimeSeries, TradingResult,
};

/// Currency the account is kept in and the precision balances are booked at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub currency: Currency,
    /// Decimal places profit is rounded to
    pub precision: u32,
}

impl Account {
    /// Account booked at the currency's minor-unit precision.
    pub fn new(currency: Currency) -> Self {
        Self {
            currency,
            precision: currency.minor_unit_precision(),
        }
    }
}

impl Default for Account {
    fn default() -> Self {
        Self::new(Currency::Eur)
    }
}

/// Realized profit/loss of a closed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfitLossResult {
    /// Profit in account currency, negative for a loss
    pub profit: Decimal,
    /// Quote-currency units per account-currency unit that was applied
    pub conversion_rate: Decimal,
}

/// Converts price moves of one pair into account-currency amounts.
///
/// Pairs not quoted in the account currency are converted with the close
/// mid of the conversion series (e.g. EUR/USD for a EUR account trading a
/// USD-quoted pair). The calculator only reads the series, so one instance
/// can be shared across simulations.
#[derive(Clone)]
pub struct TradingCalculator {
    pair: Pair,
    conversion: Arc<dyn TimeSeries>,
    account: Account,
}

impl TradingCalculator {
    /// Create a calculator for a EUR account.
    pub fn new(pair: Pair, conversion: Arc<dyn TimeSeries>) -> Self {
        Self {
            pair,
            conversion,
            account: Account::default(),
        }
    }

    /// Use a different account currency or precision.
    pub fn with_account(mut self, account: Account) -> Self {
        self.account = account;
        self
    }

    pub fn pair(&self) -> Pair {
        self.pair
    }

    pub fn account(&self) -> Account {
        self.account
    }

    /// Quote-currency units per account-currency unit at `time`.
    ///
    /// Always one when the pair is quoted in the account currency; the
    /// conversion series is not consulted in that case.
    pub fn conversion_rate(&self, time: DateTime<Utc>) -> TradingResult<Decimal> {
        if self.pair.is_quoted_in(self.account.currency) {
            return Ok(Decimal::ONE);
        }

        let series_pair = self.conversion.pair();
        if series_pair.base_currency() != self.account.currency
            || series_pair.quote_currency() != self.pair.quote_currency()
        {
            return Err(DataError::PairMismatch {
                expected: format!("{}/{}", self.account.currency, self.pair.quote_currency()),
                actual: series_pair.to_string(),
            }
            .into());
        }

        let rate = self.conversion.entry_for_time(time)?.close_mid();
        if rate <= Decimal::ZERO {
            warn!(pair = %series_pair, %time, %rate, "invalid conversion rate");
            return Err(CalculationError::InvalidConversionRate { rate, time }.into());
        }
        Ok(rate)
    }

    /// Realized profit/loss of a trade closed at `time`.
    ///
    /// Favorable moves are positive in both directions. The result is
    /// rounded to the account precision, midpoint away from zero.
    pub fn calc_profit_loss(
        &self,
        entry_price: Decimal,
        exit_price: Decimal,
        time: DateTime<Utc>,
        direction: Direction,
        size: Decimal,
    ) -> TradingResult<ProfitLossResult> {
        let price_diff = match direction {
            Direction::Buy => exit_price.checked_sub(entry_price),
            Direction::Sell => entry_price.checked_sub(exit_price),
        }
        .ok_or(CalculationError::Overflow("price difference"))?;
        let raw = price_diff
            .checked_mul(size)
            .ok_or(CalculationError::Overflow("profit"))?;

        let conversion_rate = self.conversion_rate(time)?;
        let converted = raw
            .checked_div(conversion_rate)
            .ok_or(CalculationError::Overflow("conversion"))?;
        let profit = converted.round_dp_with_strategy(
            self.account.precision,
            RoundingStrategy::MidpointAwayFromZero,
        );

        debug!(
            pair = %self.pair,
            %direction,
            %size,
            %conversion_rate,
            %profit,
            "calculated profit/loss"
        );

        Ok(ProfitLossResult {
            profit,
            conversion_rate,
        })
    }

    /// Convert a risk distance into account-currency terms for sizing.
    ///
    /// Computes `distance / size * rate`, unrounded. `scaling` must be
    /// positive but does not enter the result; see DESIGN.md.
    pub fn calc_distance_in_account_currency(
        &self,
        distance_in_points: Decimal,
        scaling: Decimal,
        time: DateTime<Utc>,
        size: Decimal,
    ) -> TradingResult<Decimal> {
        if scaling <= Decimal::ZERO {
            return Err(CalculationError::NonPositive("scaling", scaling).into());
        }
        if size <= Decimal::ZERO {
            return Err(CalculationError::NonPositive("size", size).into());
        }

        let rate = self.conversion_rate(time)?;
        let per_unit = distance_in_points
            .checked_div(size)
            .ok_or(CalculationError::Overflow("distance"))?;
        per_unit
            .checked_mul(rate)
            .ok_or_else(|| CalculationError::Overflow("distance").into())
    }
}

impl fmt::Debug for TradingCalculator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TradingCalculator")
            .field("pair", &self.pair)
            .field("conversion", &self.conversion.pair())
            .field("account", &self.account)
            .finish()
    }
}
