use serde::{Deserialize, Serialize};

use crate::aggregation::QualificationAggregate;
use crate::metrics::{count_ratio, round_pct};
use crate::types::{Count, Rate};

/// Headline KPI for the whole qualification funnel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralMetrics {
    /// total_sales / total_mql * 100
    pub ascension_rate: Rate,
    pub total_sales: Count,
    pub total_mql: Count,
}

/// Sales over MQLs of the same aggregate, in percent.
pub fn calculate_ascension_rate(total_sales: Count, total_mql: Count) -> Rate {
    round_pct(count_ratio(total_sales, total_mql))
}

pub fn calculate_general_metrics(agg: &QualificationAggregate) -> GeneralMetrics {
    GeneralMetrics {
        ascension_rate: calculate_ascension_rate(agg.total_sales, agg.total_mql),
        total_sales: agg.total_sales,
        total_mql: agg.total_mql,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_ascension_rate() {
        assert_eq!(calculate_ascension_rate(4, 30), dec!(13.33));
        assert_eq!(calculate_ascension_rate(1, 8), dec!(12.5));
        assert_eq!(calculate_ascension_rate(5, 0), Decimal::ZERO);
    }
}
