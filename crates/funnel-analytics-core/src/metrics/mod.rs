//! Derived funnel metrics.
//!
//! Every ratio goes through [`safe_div`]: a zero or negative denominator
//! yields exactly zero, never an error. Callers that need to tell "no data"
//! apart from "genuinely zero" must inspect the aggregate totals themselves.
//! Rounding to two places (half-up) happens only on final outputs.

pub mod acquisition;
pub mod dashboard;
pub mod general;
pub mod qualification;
pub mod revenue;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;

use crate::types::{Money, Rate};

/// `numerator / denominator`, or 0 when the denominator is not positive.
pub fn safe_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

/// Percentage `numerator / denominator * 100` under the safe-division rule.
pub fn ratio(numerator: Decimal, denominator: Decimal) -> Rate {
    safe_div(numerator, denominator)
        .checked_mul(dec!(100))
        .unwrap_or(Decimal::ZERO)
}

/// Percentage from two counts.
pub fn count_ratio(numerator: u64, denominator: u64) -> Rate {
    ratio(Decimal::from(numerator), Decimal::from(denominator))
}

/// Two decimal places, midpoint away from zero.
pub fn round_pct(value: Rate) -> Rate {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub fn round_currency(value: Money) -> Money {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_denominator_is_zero() {
        assert_eq!(ratio(dec!(5), dec!(0)), Decimal::ZERO);
        assert_eq!(ratio(dec!(0), dec!(0)), Decimal::ZERO);
        assert_eq!(safe_div(dec!(5), dec!(0)), Decimal::ZERO);
    }

    #[test]
    fn test_negative_denominator_is_zero() {
        assert_eq!(ratio(dec!(5), dec!(-2)), Decimal::ZERO);
    }

    #[test]
    fn test_zero_numerator_is_zero() {
        for d in [dec!(1), dec!(3), dec!(1000)] {
            assert_eq!(ratio(Decimal::ZERO, d), Decimal::ZERO);
        }
    }

    #[test]
    fn test_ratio_scales_by_100() {
        assert_eq!(ratio(dec!(1), dec!(4)), dec!(25));
        assert_eq!(count_ratio(3, 12), dec!(25));
    }

    #[test]
    fn test_half_up_rounding() {
        assert_eq!(round_pct(dec!(12.345)), dec!(12.35));
        assert_eq!(round_pct(dec!(12.344)), dec!(12.34));
        assert_eq!(round_pct(dec!(-0.125)), dec!(-0.13));
        assert_eq!(round_pct(count_ratio(1, 3)), dec!(33.33));
        assert_eq!(round_pct(count_ratio(2, 3)), dec!(66.67));
    }
}
