//! Property tests for position and profit/loss invariants.
//!
//! Uses proptest to verify:
//! 1. Trailing stops only tighten, and only in whole steps
//! 2. Constructed positions place stop and limit on the correct sides
//! 3. Buy and sell profit/loss are exact mirrors
//! 4. Pairs quoted in the account currency are never converted

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use std::sync::Arc;
use tradesim_core::{BarTimeSeries, Direction, Ohlc, Pair, TimeSeries, TimeSeriesEntry};
use tradesim_risk::{AdaptOutcome, Opening, Position, RiskRule, TradingCalculator};

// ── Helpers ──────────────────────────────────────────────────────────

fn minute(n: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 9, 4, 0, 0, 0).unwrap() + TimeDelta::minutes(n)
}

/// EUR/USD bar with a one-point spread around `mid_ticks` (4 decimals).
fn bar(n: i64, mid_ticks: i64) -> TimeSeriesEntry {
    let mid = Decimal::new(mid_ticks, 4);
    let half_spread = Decimal::new(5, 5);
    TimeSeriesEntry::new(
        minute(n),
        Pair::eur_usd_1(),
        Ohlc::flat(mid - half_spread),
        Ohlc::flat(mid + half_spread),
    )
}

fn conversion_series(rate_ticks: i64) -> Arc<dyn TimeSeries> {
    let rate = Decimal::new(rate_ticks, 4);
    let entry =
        TimeSeriesEntry::new(minute(0), Pair::eur_usd_1(), Ohlc::flat(rate), Ohlc::flat(rate));
    Arc::new(BarTimeSeries::from_entries(Pair::eur_usd_1(), [entry]).unwrap())
}

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Buy), Just(Direction::Sell)]
}

/// EUR/USD mid price in ticks, 0.9000 to 1.4000
fn arb_mid_ticks() -> impl Strategy<Value = i64> {
    9_000..14_000_i64
}

fn arb_points() -> impl Strategy<Value = Decimal> {
    (1..500_i64).prop_map(Decimal::from)
}

fn arb_size() -> impl Strategy<Value = Decimal> {
    (1..100_000_i64).prop_map(|s| Decimal::new(s, 2))
}

// ── 1. Trailing monotonicity ─────────────────────────────────────────

proptest! {
    /// Stops never loosen, and every accepted move gains at least one step.
    #[test]
    fn trailing_stop_only_tightens(
        direction in arb_direction(),
        entry_ticks in arb_mid_ticks(),
        stop_points in arb_points(),
        step_ticks in 1..50_i64,
        moves in prop::collection::vec(-80..80_i64, 1..60),
    ) {
        let step = Decimal::new(step_ticks, 4);
        let mut position = Position::from_distances(
            Opening::new(Decimal::ONE, direction, bar(0, entry_ticks)),
            stop_points,
            Decimal::from(1000),
            RiskRule::Trailing { step_size: step },
        ).unwrap();
        let limit = position.limit_level();

        let mut mid = entry_ticks;
        for (i, delta) in moves.into_iter().enumerate() {
            mid = (mid + delta).max(1);
            let before = position.stop_level();
            let outcome = position.adapt(&bar(i as i64 + 1, mid)).unwrap();
            let after = position.stop_level();

            match direction {
                Direction::Buy => {
                    prop_assert!(after >= before, "buy stop loosened: {after} < {before}")
                }
                Direction::Sell => {
                    prop_assert!(after <= before, "sell stop loosened: {after} > {before}")
                }
            }
            match outcome {
                AdaptOutcome::Unchanged => prop_assert_eq!(after, before),
                AdaptOutcome::StopMoved { from, to } => {
                    prop_assert_eq!(from, before);
                    prop_assert_eq!(to, after);
                    prop_assert!((to - from).abs() >= step);
                }
            }
            prop_assert_eq!(position.limit_level(), limit);
        }
    }

    /// Replaying the same bar cannot move the stop a second time.
    #[test]
    fn trailing_stop_is_idempotent_per_price(
        direction in arb_direction(),
        entry_ticks in arb_mid_ticks(),
        stop_points in arb_points(),
        delta in -200..200_i64,
    ) {
        let mut position = Position::from_distances(
            Opening::new(Decimal::ONE, direction, bar(0, entry_ticks)),
            stop_points,
            Decimal::from(1000),
            RiskRule::Trailing { step_size: Decimal::new(1, 4) },
        ).unwrap();

        let next = bar(1, entry_ticks + delta);
        position.adapt(&next).unwrap();
        let stop = position.stop_level();
        prop_assert_eq!(position.adapt(&next).unwrap(), AdaptOutcome::Unchanged);
        prop_assert_eq!(position.stop_level(), stop);
    }
}

// ── 2. Directional level placement ───────────────────────────────────

proptest! {
    #[test]
    fn levels_sit_on_the_correct_side(
        direction in arb_direction(),
        entry_ticks in arb_mid_ticks(),
        stop_points in arb_points(),
        limit_points in arb_points(),
        trailing in any::<bool>(),
    ) {
        let rule = if trailing {
            RiskRule::Trailing { step_size: Decimal::new(1, 4) }
        } else {
            RiskRule::HardLimit
        };
        let position = Position::from_distances(
            Opening::new(Decimal::ONE, direction, bar(0, entry_ticks)),
            stop_points,
            limit_points,
            rule,
        ).unwrap();

        let entry = position.entry_price();
        match direction {
            Direction::Buy => {
                prop_assert!(position.stop_level() < entry);
                prop_assert!(entry < position.limit_level());
            }
            Direction::Sell => {
                prop_assert!(position.stop_level() > entry);
                prop_assert!(entry > position.limit_level());
            }
        }
    }
}

// ── 3. Profit/loss symmetry ──────────────────────────────────────────

proptest! {
    #[test]
    fn buy_and_sell_profit_mirror(
        entry_ticks in arb_mid_ticks(),
        exit_ticks in arb_mid_ticks(),
        size in arb_size(),
        rate_ticks in 8_000..15_000_i64,
        converted in any::<bool>(),
    ) {
        let pair = if converted { Pair::eur_usd() } else { Pair::xbt_eur() };
        let calc = TradingCalculator::new(pair, conversion_series(rate_ticks));
        let entry = Decimal::new(entry_ticks, 4);
        let exit = Decimal::new(exit_ticks, 4);

        let buy = calc.calc_profit_loss(entry, exit, minute(0), Direction::Buy, size).unwrap();
        let sell = calc.calc_profit_loss(entry, exit, minute(0), Direction::Sell, size).unwrap();

        prop_assert_eq!(buy.profit, -sell.profit);
        prop_assert_eq!(buy.conversion_rate, sell.conversion_rate);
    }
}

// ── 4. Account-currency pairs ────────────────────────────────────────

proptest! {
    #[test]
    fn account_quoted_pairs_use_unit_rate(
        entry_ticks in arb_mid_ticks(),
        exit_ticks in arb_mid_ticks(),
        size in arb_size(),
        direction in arb_direction(),
        eth in any::<bool>(),
    ) {
        let pair = if eth { Pair::eth_eur() } else { Pair::xbt_eur() };
        // The series has a bar only at minute 0; a unit rate never looks it up
        let calc = TradingCalculator::new(pair, conversion_series(11_000));
        let result = calc
            .calc_profit_loss(
                Decimal::new(entry_ticks, 4),
                Decimal::new(exit_ticks, 4),
                minute(10_000),
                direction,
                size,
            )
            .unwrap();
        prop_assert_eq!(result.conversion_rate, Decimal::ONE);
    }
}
