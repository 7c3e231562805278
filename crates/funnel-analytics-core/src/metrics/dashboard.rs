use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::aggregation::{
    aggregate_qualification, aggregate_qualification_for_funnel, aggregate_revenue,
    QualificationAggregate, RevenueAggregate,
};
use crate::metrics::acquisition::{
    calculate_acquisition_metrics, AcquisitionMetrics, AcquisitionMetricsInput,
};
use crate::metrics::general::{calculate_general_metrics, GeneralMetrics};
use crate::metrics::qualification::{
    calculate_qualification_metrics, tier_breakdown, QualificationMetrics, TierBreakdown,
};
use crate::metrics::revenue::{calculate_revenue_metrics, RevenueMetrics};
use crate::period::{resolve_selection, Period, PeriodSelection};
use crate::records::qualification::QualificationRecord;
use crate::records::revenue::RevenueRecord;
use crate::types::{with_metadata, ComputationOutput};
use crate::FunnelAnalyticsResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Everything needed to render one organization's dashboard for a period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardInput {
    pub period: PeriodSelection,
    /// Restrict qualification records to one funnel
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub funnel_id: Option<String>,
    #[serde(default)]
    pub qualification: Vec<QualificationRecord>,
    #[serde(default)]
    pub revenue: Vec<RevenueRecord>,
    #[serde(default)]
    pub acquisition: AcquisitionMetricsInput,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardReport {
    pub period: Period,
    pub qualification: QualificationMetrics,
    pub tiers: TierBreakdown,
    pub revenue: RevenueMetrics,
    pub acquisition: AcquisitionMetrics,
    pub general: GeneralMetrics,
}

// ---------------------------------------------------------------------------
// Composition
// ---------------------------------------------------------------------------

/// Derive every metric family from already-built aggregates.
pub fn compose_dashboard(
    qualification: &QualificationAggregate,
    revenue: &RevenueAggregate,
    acquisition: &AcquisitionMetricsInput,
) -> DashboardReport {
    DashboardReport {
        period: qualification.period,
        qualification: calculate_qualification_metrics(qualification),
        tiers: tier_breakdown(qualification),
        revenue: calculate_revenue_metrics(revenue),
        acquisition: calculate_acquisition_metrics(acquisition),
        general: calculate_general_metrics(qualification),
    }
}

/// Resolve the period, aggregate both record sets and compute the dashboard.
///
/// Only an inverted custom range fails. Zero-valued metrics that come from
/// empty denominators are called out in the warnings so they are not read as
/// measured zeros.
pub fn build_dashboard_report(
    input: &DashboardInput,
    now: NaiveDateTime,
) -> FunnelAnalyticsResult<ComputationOutput<DashboardReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let period = resolve_selection(&input.period, now)?;

    let q_agg = match input.funnel_id.as_deref() {
        Some(funnel) => aggregate_qualification_for_funnel(&input.qualification, funnel, &period),
        None => aggregate_qualification(&input.qualification, &period),
    };
    let r_agg = aggregate_revenue(&input.revenue, &period);

    if q_agg.records_included == 0 {
        warnings.push(format!(
            "No qualification records between {} and {}; funnel rates are reported as 0",
            period.start_date, period.end_date
        ));
    }
    if r_agg.records_included == 0 {
        warnings.push(format!(
            "No revenue records between {} and {}",
            period.start_date, period.end_date
        ));
    } else if r_agg.qualified_students == 0 {
        warnings.push("Qualified students is zero; revenue per student set to 0".to_string());
    }
    if input.acquisition.investment.is_zero() {
        warnings.push("Investment is zero; ROAS and ROI set to 0".to_string());
    }
    for issue in q_agg.stage_inconsistencies() {
        warnings.push(format!("Funnel stage inconsistency: {issue}"));
    }

    let report = compose_dashboard(&q_agg, &r_agg, &input.acquisition);

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Period aggregation of daily funnel records with safe-division conversion metrics",
        &serde_json::json!({
            "period_start": period.start_date.to_string(),
            "period_end": period.end_date.to_string(),
            "preset": period.preset,
            "funnel_id": input.funnel_id,
            "qualification_records_in_period": q_agg.records_included,
            "revenue_records_in_period": r_agg.records_included,
            "rounding": "2dp half-up at output",
        }),
        warnings,
        elapsed,
        report,
    ))
}
