//! Open positions and their protective levels.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;
use tradesim_core::{
    Direction, ExitSignal, Pair, PositionError, PositionType, TimeSeriesEntry, TradingResult,
};

use crate::calculator::{ProfitLossResult, TradingCalculator};
use crate::trailing_stop::{AdaptOutcome, HardLimit, Levels, PositionKind, TrailingStop};

/// Parameters shared by every way of opening a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opening {
    pub size: Decimal,
    pub direction: Direction,
    /// Bar the position is opened on; its close mid is the entry price
    pub entry: TimeSeriesEntry,
    pub margin: Decimal,
}

impl Opening {
    /// Open without margin.
    pub fn new(size: Decimal, direction: Direction, entry: TimeSeriesEntry) -> Self {
        Self {
            size,
            direction,
            entry,
            margin: Decimal::ZERO,
        }
    }

    pub fn with_margin(mut self, margin: Decimal) -> Self {
        self.margin = margin;
        self
    }
}

/// How a new position manages its protective levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RiskRule {
    /// Fixed stop and limit
    #[default]
    HardLimit,
    /// Stop trails the mid price in steps of `step_size`
    Trailing { step_size: Decimal },
}

/// Protective level touched by a bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TriggeredLevel {
    Stop(Decimal),
    Limit(Decimal),
}

/// An open trade.
///
/// Only the protective levels change after creation, and only through
/// [`Position::adapt`]. A position belongs to a single simulation run and is
/// mutated through `&mut`.
#[derive(Debug, Clone, Serialize)]
pub struct Position {
    size: Decimal,
    direction: Direction,
    entry: TimeSeriesEntry,
    stop_level: Decimal,
    limit_level: Decimal,
    margin: Decimal,
    kind: PositionKind,
    #[serde(skip)]
    last_adapted: DateTime<Utc>,
}

impl Position {
    /// Open a position with stop and limit given as point distances from the
    /// entry price.
    pub fn from_distances(
        opening: Opening,
        stop_in_points: Decimal,
        limit_in_points: Decimal,
        rule: RiskRule,
    ) -> Result<Self, PositionError> {
        let stop_error = PositionError::InvalidDistance {
            which: "Stop",
            value: stop_in_points,
        };
        let limit_error = PositionError::InvalidDistance {
            which: "Limit",
            value: limit_in_points,
        };
        if stop_in_points <= Decimal::ZERO {
            return Err(stop_error);
        }
        if limit_in_points <= Decimal::ZERO {
            return Err(limit_error);
        }

        // Levels that do not fit in a Decimal are rejected as bad distances
        let pair = opening.entry.pair;
        let entry_price = opening.entry.close_mid();
        let stop_offset = pair
            .points_to_price(stop_in_points)
            .ok_or_else(|| stop_error.clone())?;
        let limit_offset = pair
            .points_to_price(limit_in_points)
            .ok_or_else(|| limit_error.clone())?;

        let (stop_level, limit_level) = match opening.direction {
            Direction::Buy => (
                entry_price.checked_sub(stop_offset),
                entry_price.checked_add(limit_offset),
            ),
            Direction::Sell => (
                entry_price.checked_add(stop_offset),
                entry_price.checked_sub(limit_offset),
            ),
        };
        let stop_level = stop_level.ok_or(stop_error)?;
        let limit_level = limit_level.ok_or(limit_error)?;

        Self::from_levels(opening, stop_level, limit_level, rule)
    }

    /// Open a position with already resolved stop and limit levels.
    pub fn from_levels(
        opening: Opening,
        stop_level: Decimal,
        limit_level: Decimal,
        rule: RiskRule,
    ) -> Result<Self, PositionError> {
        let Opening {
            size,
            direction,
            entry,
            margin,
        } = opening;

        if size <= Decimal::ZERO {
            return Err(PositionError::InvalidSize(size));
        }
        if margin < Decimal::ZERO {
            return Err(PositionError::InvalidMargin(margin));
        }

        let entry_price = entry.close_mid();
        let placed = match direction {
            Direction::Buy => stop_level < entry_price && entry_price < limit_level,
            Direction::Sell => stop_level > entry_price && entry_price > limit_level,
        };
        if !placed {
            return Err(PositionError::InvalidLevels {
                direction,
                stop: stop_level,
                entry: entry_price,
                limit: limit_level,
            });
        }

        let kind = match rule {
            RiskRule::HardLimit => PositionKind::HardLimit(HardLimit),
            RiskRule::Trailing { step_size } => {
                let distance = entry_price.checked_sub(stop_level).ok_or(
                    PositionError::InvalidLevels {
                        direction,
                        stop: stop_level,
                        entry: entry_price,
                        limit: limit_level,
                    },
                )?;
                PositionKind::Trailing(TrailingStop::new(step_size, distance.abs())?)
            }
        };

        Ok(Self {
            size,
            direction,
            last_adapted: entry.time,
            entry,
            stop_level,
            limit_level,
            margin,
            kind,
        })
    }

    pub fn size(&self) -> Decimal {
        self.size
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pair(&self) -> Pair {
        self.entry.pair
    }

    /// Bar the position was opened on.
    pub fn entry(&self) -> &TimeSeriesEntry {
        &self.entry
    }

    pub fn entry_price(&self) -> Decimal {
        self.entry.close_mid()
    }

    pub fn open_time(&self) -> DateTime<Utc> {
        self.entry.time
    }

    pub fn stop_level(&self) -> Decimal {
        self.stop_level
    }

    pub fn limit_level(&self) -> Decimal {
        self.limit_level
    }

    pub fn margin(&self) -> Decimal {
        self.margin
    }

    pub fn position_type(&self) -> PositionType {
        self.kind.position_type()
    }

    pub fn kind(&self) -> &PositionKind {
        &self.kind
    }

    /// Step size of a trailing position.
    pub fn trailing_step_size(&self) -> Option<Decimal> {
        match &self.kind {
            PositionKind::Trailing(rule) => Some(rule.step_size()),
            PositionKind::HardLimit(_) => None,
        }
    }

    /// Feed the next bar to the position's adaptation rule.
    ///
    /// Bars must belong to the position's pair and arrive in non-decreasing
    /// time order.
    pub fn adapt(&mut self, bar: &TimeSeriesEntry) -> Result<AdaptOutcome, PositionError> {
        if bar.pair != self.entry.pair {
            return Err(PositionError::PairMismatch {
                position: self.entry.pair.to_string(),
                other: bar.pair.to_string(),
            });
        }
        if bar.time < self.last_adapted {
            return Err(PositionError::StaleBar {
                time: bar.time,
                last: self.last_adapted,
            });
        }

        let mut levels = Levels {
            direction: self.direction,
            stop: self.stop_level,
            limit: self.limit_level,
        };
        let outcome = self.kind.rule_mut().adapt(&mut levels, bar)?;

        self.stop_level = levels.stop;
        self.limit_level = levels.limit;
        self.last_adapted = bar.time;

        if let AdaptOutcome::StopMoved { from, to } = outcome {
            debug!(
                pair = %self.entry.pair,
                direction = %self.direction,
                time = %bar.time,
                %from,
                %to,
                "stop level moved"
            );
        }
        Ok(outcome)
    }

    /// Protective level the bar's mid range reached, stop first.
    pub fn triggered_level(&self, bar: &TimeSeriesEntry) -> Option<TriggeredLevel> {
        let (stop_hit, limit_hit) = match self.direction {
            Direction::Buy => (
                bar.low_mid() <= self.stop_level,
                bar.high_mid() >= self.limit_level,
            ),
            Direction::Sell => (
                bar.high_mid() >= self.stop_level,
                bar.low_mid() <= self.limit_level,
            ),
        };

        if stop_hit {
            Some(TriggeredLevel::Stop(self.stop_level))
        } else if limit_hit {
            Some(TriggeredLevel::Limit(self.limit_level))
        } else {
            None
        }
    }

    /// Profit/loss if the whole position were closed at the bar's close mid.
    pub fn unrealized_profit_loss(
        &self,
        calculator: &TradingCalculator,
        bar: &TimeSeriesEntry,
    ) -> TradingResult<ProfitLossResult> {
        self.check_calculator(calculator)?;
        calculator.calc_profit_loss(
            self.entry_price(),
            bar.close_mid(),
            bar.time,
            self.direction,
            self.size,
        )
    }

    /// Profit/loss of closing `signal.amount()` of the position at `exit_price`.
    pub fn realize(
        &self,
        calculator: &TradingCalculator,
        signal: &ExitSignal,
        exit_price: Decimal,
        time: DateTime<Utc>,
    ) -> TradingResult<ProfitLossResult> {
        if signal.direction_to_close() != self.direction {
            return Err(PositionError::ExitDirectionMismatch {
                signal: signal.direction_to_close(),
                position: self.direction,
            }
            .into());
        }
        if signal.amount() > self.size {
            return Err(PositionError::ExitExceedsSize {
                amount: signal.amount(),
                size: self.size,
            }
            .into());
        }
        self.check_calculator(calculator)?;

        calculator.calc_profit_loss(
            self.entry_price(),
            exit_price,
            time,
            self.direction,
            signal.amount(),
        )
    }

    fn check_calculator(&self, calculator: &TradingCalculator) -> Result<(), PositionError> {
        if calculator.pair() != self.entry.pair {
            return Err(PositionError::PairMismatch {
                position: self.entry.pair.to_string(),
                other: calculator.pair().to_string(),
            });
        }
        Ok(())
    }
}
