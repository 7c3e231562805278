use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::aggregation::QualificationAggregate;
use crate::metrics::{count_ratio, round_pct};
use crate::types::{Count, Rate, Tier, TierCounts};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One percentage per tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierRates {
    pub diamond: Rate,
    pub gold: Rate,
    pub silver: Rate,
    pub bronze: Rate,
}

impl TierRates {
    pub fn get(&self, tier: Tier) -> Rate {
        match tier {
            Tier::Diamond => self.diamond,
            Tier::Gold => self.gold,
            Tier::Silver => self.silver,
            Tier::Bronze => self.bronze,
        }
    }

    fn from_fn(mut f: impl FnMut(Tier) -> Rate) -> Self {
        TierRates {
            diamond: f(Tier::Diamond),
            gold: f(Tier::Gold),
            silver: f(Tier::Silver),
            bronze: f(Tier::Bronze),
        }
    }
}

/// Stage-to-stage rates of the qualification funnel, all in percent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualificationMetrics {
    /// responded_form / total_leads
    pub form_response_rate: Rate,
    /// total_mql / responded_form
    pub mql_rate: Rate,
    /// total_scheduled / total_mql
    pub scheduling_rate: Rate,
    /// total_calls / total_scheduled
    pub show_up_rate: Rate,
    /// total_sales / total_calls
    pub conversion_rate: Rate,
    /// Tier MQL / total MQL. Rounded independently, so need not sum to 100.
    pub tier_share_pct: TierRates,
    pub total_mql_by_tier: TierCounts,
    pub total_mql: Count,
}

/// Funnel for one tier, or for all tiers combined when `tier` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierFunnelRow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tier: Option<Tier>,
    pub label: String,
    pub mql: Count,
    pub scheduled: Count,
    pub calls_done: Count,
    pub sales: Count,
    /// Share of all MQLs
    pub share_pct: Rate,
    /// scheduled / mql
    pub scheduling_rate: Rate,
    /// calls_done / scheduled
    pub show_up_rate: Rate,
    /// sales / calls_done
    pub conversion_rate: Rate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierBreakdown {
    pub tiers: Vec<TierFunnelRow>,
    pub overall: TierFunnelRow,
    pub total_mql: Count,
}

// ---------------------------------------------------------------------------
// Calculations
// ---------------------------------------------------------------------------

/// Funnel rates computed from summed totals, never from averaged daily rates.
pub fn calculate_qualification_metrics(agg: &QualificationAggregate) -> QualificationMetrics {
    QualificationMetrics {
        form_response_rate: round_pct(count_ratio(agg.responded_form, agg.total_leads)),
        mql_rate: round_pct(count_ratio(agg.total_mql, agg.responded_form)),
        scheduling_rate: round_pct(count_ratio(agg.total_scheduled, agg.total_mql)),
        show_up_rate: round_pct(count_ratio(agg.total_calls, agg.total_scheduled)),
        conversion_rate: round_pct(count_ratio(agg.total_sales, agg.total_calls)),
        tier_share_pct: TierRates::from_fn(|t| {
            round_pct(count_ratio(agg.total_mql_by_tier.get(t), agg.total_mql))
        }),
        total_mql_by_tier: agg.total_mql_by_tier,
        total_mql: agg.total_mql,
    }
}

fn funnel_row(
    tier: Option<Tier>,
    mql: Count,
    scheduled: Count,
    calls_done: Count,
    sales: Count,
    total_mql: Count,
) -> TierFunnelRow {
    TierFunnelRow {
        tier,
        label: tier.map_or_else(|| "overall".to_string(), |t| t.to_string()),
        mql,
        scheduled,
        calls_done,
        sales,
        share_pct: round_pct(count_ratio(mql, total_mql)),
        scheduling_rate: round_pct(count_ratio(scheduled, mql)),
        show_up_rate: round_pct(count_ratio(calls_done, scheduled)),
        conversion_rate: round_pct(count_ratio(sales, calls_done)),
    }
}

/// Per-tier funnel with MQL share and stage rates, plus a combined row.
pub fn tier_breakdown(agg: &QualificationAggregate) -> TierBreakdown {
    let tiers = Tier::ALL
        .into_iter()
        .map(|t| {
            funnel_row(
                Some(t),
                agg.total_mql_by_tier.get(t),
                agg.total_scheduled_by_tier.get(t),
                agg.total_calls_by_tier.get(t),
                agg.total_sales_by_tier.get(t),
                agg.total_mql,
            )
        })
        .collect();

    let overall = funnel_row(
        None,
        agg.total_mql,
        agg.total_scheduled,
        agg.total_calls,
        agg.total_sales,
        agg.total_mql,
    );

    TierBreakdown {
        tiers,
        overall,
        total_mql: agg.total_mql,
    }
}

/// Sum of the four rounded shares; useful for display footnotes.
pub fn tier_share_total(shares: &TierRates) -> Rate {
    Tier::ALL
        .into_iter()
        .map(|t| shares.get(t))
        .fold(Decimal::ZERO, |acc, r| acc.saturating_add(r))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::period::Period;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn agg() -> QualificationAggregate {
        let p = Period::custom(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        )
        .unwrap();
        let mut a = QualificationAggregate::empty(p);
        a.total_leads = 200;
        a.responded_form = 80;
        a.total_mql_by_tier = TierCounts {
            diamond: 10,
            gold: 10,
            silver: 10,
            bronze: 0,
        };
        a.total_scheduled_by_tier = TierCounts {
            diamond: 8,
            gold: 4,
            ..Default::default()
        };
        a.total_calls_by_tier = TierCounts {
            diamond: 6,
            gold: 3,
            ..Default::default()
        };
        a.total_sales_by_tier = TierCounts {
            diamond: 2,
            ..Default::default()
        };
        a.total_mql = 30;
        a.total_scheduled = 12;
        a.total_calls = 9;
        a.total_sales = 2;
        a
    }

    #[test]
    fn test_funnel_rates() {
        let m = calculate_qualification_metrics(&agg());
        assert_eq!(m.form_response_rate, dec!(40));
        assert_eq!(m.mql_rate, dec!(37.5));
        assert_eq!(m.scheduling_rate, dec!(40));
        assert_eq!(m.show_up_rate, dec!(75));
        // 2 / 9 = 22.222..
        assert_eq!(m.conversion_rate, dec!(22.22));
    }

    #[test]
    fn test_tier_shares_not_normalized() {
        let m = calculate_qualification_metrics(&agg());
        assert_eq!(m.tier_share_pct.diamond, dec!(33.33));
        assert_eq!(m.tier_share_pct.bronze, Decimal::ZERO);
        // 33.33 * 3 = 99.99, left as is
        assert_eq!(tier_share_total(&m.tier_share_pct), dec!(99.99));
    }

    #[test]
    fn test_empty_aggregate_gives_zero_rates() {
        let a = QualificationAggregate::empty(agg().period);
        let m = calculate_qualification_metrics(&a);
        assert_eq!(m.form_response_rate, Decimal::ZERO);
        assert_eq!(m.conversion_rate, Decimal::ZERO);
        assert_eq!(m.tier_share_pct, TierRates::default());
    }

    #[test]
    fn test_tier_breakdown_rows() {
        let b = tier_breakdown(&agg());
        assert_eq!(b.tiers.len(), 4);
        let diamond = &b.tiers[0];
        assert_eq!(diamond.tier, Some(Tier::Diamond));
        assert_eq!(diamond.scheduling_rate, dec!(80));
        assert_eq!(diamond.show_up_rate, dec!(75));
        assert_eq!(diamond.conversion_rate, dec!(33.33));

        let silver = &b.tiers[2];
        assert_eq!(silver.scheduling_rate, Decimal::ZERO);
        assert_eq!(silver.show_up_rate, Decimal::ZERO);

        assert_eq!(b.overall.label, "overall");
        assert_eq!(b.overall.share_pct, dec!(100));
        assert_eq!(b.overall.scheduling_rate, dec!(40));
    }
}
