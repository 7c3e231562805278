use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::metrics::{ratio, round_currency, round_pct, safe_div};
use crate::types::{Count, Money, Multiple, Rate};

/// Acquisition figures for one period, usually read from stored monthly records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcquisitionMetricsInput {
    pub total_leads: Count,
    pub investment: Money,
    pub revenue: Money,
    pub qualified_leads: Count,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquisitionMetrics {
    pub total_leads: Count,
    pub qualified_leads: Count,
    pub investment: Money,
    pub revenue: Money,
    /// investment / total_leads
    pub cost_per_lead: Money,
    /// revenue / investment, a multiple (3.2 means 3.2x)
    pub roas: Multiple,
    /// (revenue - investment) / investment * 100
    pub roi: Rate,
}

pub fn calculate_acquisition_metrics(input: &AcquisitionMetricsInput) -> AcquisitionMetrics {
    AcquisitionMetrics {
        total_leads: input.total_leads,
        qualified_leads: input.qualified_leads,
        investment: input.investment,
        revenue: input.revenue,
        cost_per_lead: round_currency(safe_div(input.investment, Decimal::from(input.total_leads))),
        roas: round_pct(safe_div(input.revenue, input.investment)),
        roi: round_pct(ratio(net_return(input), input.investment)),
    }
}

/// `revenue - investment`, or 0 when the difference is not representable.
fn net_return(input: &AcquisitionMetricsInput) -> Money {
    input
        .revenue
        .checked_sub(input.investment)
        .unwrap_or(Decimal::ZERO)
}
