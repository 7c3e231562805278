use serde::{Deserialize, Serialize};

use crate::aggregation::RevenueAggregate;
use crate::metrics::{round_currency, safe_div};
use crate::types::{Count, Money};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueMetrics {
    pub billing: Money,
    pub cash_in: Money,
    pub qualified_students: Count,
    /// billing / qualified_students, a currency amount rather than a percentage
    pub revenue_per_student: Money,
}

pub fn calculate_revenue_metrics(agg: &RevenueAggregate) -> RevenueMetrics {
    RevenueMetrics {
        billing: agg.billing,
        cash_in: agg.cash_in,
        qualified_students: agg.qualified_students,
        revenue_per_student: round_currency(safe_div(
            agg.billing,
            Money::from(agg.qualified_students),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::Period;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn agg(billing: Money, students: Count) -> RevenueAggregate {
        let day = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let mut a = RevenueAggregate::empty(Period::custom(day, day).unwrap());
        a.billing = billing;
        a.qualified_students = students;
        a
    }

    #[test]
    fn test_revenue_per_student() {
        let m = calculate_revenue_metrics(&agg(dec!(10000), 3));
        // 3333.333.. rounds to cents
        assert_eq!(m.revenue_per_student, dec!(3333.33));
    }

    #[test]
    fn test_zero_students_is_zero() {
        let m = calculate_revenue_metrics(&agg(dec!(5000), 0));
        assert_eq!(m.revenue_per_student, Decimal::ZERO);
        assert_eq!(m.billing, dec!(5000));
    }
}
