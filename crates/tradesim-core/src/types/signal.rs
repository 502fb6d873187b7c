//! Exit signals produced by strategy close logic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Direction;
use crate::error::PositionError;

/// Instruction to close `amount` of the positions opened in `direction_to_close`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExitSignal {
    amount: Decimal,
    direction_to_close: Direction,
}

impl ExitSignal {
    /// Create a new exit signal. The amount must be positive.
    pub fn new(amount: Decimal, direction_to_close: Direction) -> Result<Self, PositionError> {
        if amount <= Decimal::ZERO {
            return Err(PositionError::InvalidSize(amount));
        }
        Ok(Self {
            amount,
            direction_to_close,
        })
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn direction_to_close(&self) -> Direction {
        self.direction_to_close
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_exit_signal() {
        let signal = ExitSignal::new(dec!(0.5), Direction::Sell).unwrap();
        assert_eq!(signal.amount(), dec!(0.5));
        assert_eq!(signal.direction_to_close(), Direction::Sell);
    }

    #[test]
    fn test_exit_signal_rejects_non_positive_amount() {
        assert_eq!(
            ExitSignal::new(Decimal::ZERO, Direction::Buy),
            Err(PositionError::InvalidSize(Decimal::ZERO))
        );
        assert!(ExitSignal::new(dec!(-1), Direction::Buy).is_err());
    }
}
