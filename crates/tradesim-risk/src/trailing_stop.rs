//! Protective level adaptation.

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::trace;
use tradesim_core::{Direction, PositionError, PositionType, TimeSeriesEntry};

/// Protective levels handed to an adaptation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Levels {
    pub direction: Direction,
    pub stop: Decimal,
    pub limit: Decimal,
}

/// What a single `adapt` call did to the levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AdaptOutcome {
    Unchanged,
    StopMoved { from: Decimal, to: Decimal },
}

/// Rule that moves a position's protective levels as bars arrive.
pub trait AdaptLevels {
    fn position_type(&self) -> PositionType;

    /// Feed one bar to the rule.
    ///
    /// A rule that does not define its adaptation fails with
    /// [`PositionError::UnsupportedOperation`]; keeping the levels untouched
    /// is itself a rule and has to be stated explicitly.
    fn adapt(
        &mut self,
        _levels: &mut Levels,
        _bar: &TimeSeriesEntry,
    ) -> Result<AdaptOutcome, PositionError> {
        Err(PositionError::UnsupportedOperation(self.position_type()))
    }
}

/// Stop and limit stay where they were placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct HardLimit;

impl AdaptLevels for HardLimit {
    fn position_type(&self) -> PositionType {
        PositionType::HardLimit
    }

    fn adapt(
        &mut self,
        _levels: &mut Levels,
        _bar: &TimeSeriesEntry,
    ) -> Result<AdaptOutcome, PositionError> {
        Ok(AdaptOutcome::Unchanged)
    }
}

/// Stop that follows the mid price at a fixed distance, in steps.
///
/// The stop only ever moves in the holder's favor: up for buys, down for
/// sells. The limit level is left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrailingStop {
    step_size: Decimal,
    distance: Decimal,
}

impl TrailingStop {
    /// Create a trailing rule keeping the stop `distance` away from the mid
    /// price, moving it only when it gains at least `step_size`.
    pub fn new(step_size: Decimal, distance: Decimal) -> Result<Self, PositionError> {
        if step_size <= Decimal::ZERO {
            return Err(PositionError::InvalidStepSize(step_size));
        }
        if distance <= Decimal::ZERO {
            return Err(PositionError::InvalidDistance {
                which: "Trailing",
                value: distance,
            });
        }
        Ok(Self {
            step_size,
            distance,
        })
    }

    pub fn step_size(&self) -> Decimal {
        self.step_size
    }

    /// Distance kept between the mid price and the stop.
    pub fn distance(&self) -> Decimal {
        self.distance
    }

    /// Stop level the rule would place for a given mid price, if representable.
    pub fn candidate_stop(&self, direction: Direction, mid: Decimal) -> Option<Decimal> {
        match direction {
            Direction::Buy => mid.checked_sub(self.distance),
            Direction::Sell => mid.checked_add(self.distance),
        }
    }
}

impl AdaptLevels for TrailingStop {
    fn position_type(&self) -> PositionType {
        PositionType::Trailing
    }

    fn adapt(
        &mut self,
        levels: &mut Levels,
        bar: &TimeSeriesEntry,
    ) -> Result<AdaptOutcome, PositionError> {
        let Some(candidate) = self.candidate_stop(levels.direction, bar.close_mid()) else {
            return Ok(AdaptOutcome::Unchanged);
        };
        let gain = match levels.direction {
            Direction::Buy => candidate.checked_sub(levels.stop),
            Direction::Sell => levels.stop.checked_sub(candidate),
        };

        if gain.map_or(true, |gain| gain < self.step_size) {
            trace!(
                time = %bar.time,
                stop = %levels.stop,
                candidate = %candidate,
                "trailing candidate rejected"
            );
            return Ok(AdaptOutcome::Unchanged);
        }

        let from = levels.stop;
        levels.stop = candidate;
        Ok(AdaptOutcome::StopMoved {
            from,
            to: candidate,
        })
    }
}

/// Closed set of adaptation rules a position can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionKind {
    HardLimit(HardLimit),
    Trailing(TrailingStop),
}

impl PositionKind {
    pub fn position_type(&self) -> PositionType {
        self.rule().position_type()
    }

    fn rule(&self) -> &dyn AdaptLevels {
        match self {
            PositionKind::HardLimit(rule) => rule,
            PositionKind::Trailing(rule) => rule,
        }
    }

    pub(crate) fn rule_mut(&mut self) -> &mut dyn AdaptLevels {
        match self {
            PositionKind::HardLimit(rule) => rule,
            PositionKind::Trailing(rule) => rule,
        }
    }
}
