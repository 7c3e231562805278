use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::period::Period;
use crate::records::revenue::RevenueRecord;
use crate::types::{Count, Money};

/// Summed revenue over one resolved period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueAggregate {
    pub period: Period,
    pub records_included: usize,
    pub billing: Money,
    pub cash_in: Money,
    pub qualified_students: Count,
}

impl RevenueAggregate {
    pub fn empty(period: Period) -> Self {
        RevenueAggregate {
            period,
            records_included: 0,
            billing: Decimal::ZERO,
            cash_in: Decimal::ZERO,
            qualified_students: 0,
        }
    }
}

/// Fold daily revenue records dated inside `period` (inclusive).
///
/// Sums saturate at the representable bounds rather than overflowing.
pub fn aggregate_revenue(records: &[RevenueRecord], period: &Period) -> RevenueAggregate {
    records
        .iter()
        .filter(|r| period.contains(r.date))
        .fold(RevenueAggregate::empty(*period), |mut agg, day| {
            agg.records_included += 1;
            agg.billing = agg.billing.saturating_add(day.billing);
            agg.cash_in = agg.cash_in.saturating_add(day.cash_in);
            agg.qualified_students = agg
                .qualified_students
                .saturating_add(day.qualified_students);
            agg
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn rec(day: u32, billing: Money, cash_in: Money, students: Count) -> RevenueRecord {
        RevenueRecord {
            organization_id: Some("org-1".to_string()),
            date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
            billing,
            cash_in,
            qualified_students: students,
        }
    }

    #[test]
    fn test_sums_inside_period() {
        let period = Period::custom(
            NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 3).unwrap(),
        )
        .unwrap();
        let records = vec![
            rec(1, dec!(999), dec!(999), 99),
            rec(2, dec!(1000.50), dec!(400), 2),
            rec(3, dec!(499.50), dec!(100.25), 1),
            rec(4, dec!(999), dec!(999), 99),
        ];
        let agg = aggregate_revenue(&records, &period);
        assert_eq!(agg.records_included, 2);
        assert_eq!(agg.billing, dec!(1500));
        assert_eq!(agg.cash_in, dec!(500.25));
        assert_eq!(agg.qualified_students, 3);
    }

    #[test]
    fn test_huge_amounts_saturate() {
        let period = Period::custom(
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
        )
        .unwrap();
        let records = vec![
            rec(1, Decimal::MAX, dec!(1), Count::MAX),
            rec(2, Decimal::MAX, dec!(1), 1),
        ];
        let agg = aggregate_revenue(&records, &period);
        assert_eq!(agg.billing, Decimal::MAX);
        assert_eq!(agg.cash_in, dec!(2));
        assert_eq!(agg.qualified_students, Count::MAX);
    }

    #[test]
    fn test_empty_is_zero() {
        let period = Period::custom(
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 31).unwrap(),
        )
        .unwrap();
        assert_eq!(aggregate_revenue(&[], &period), RevenueAggregate::empty(period));
    }
}
