use serde::{Deserialize, Serialize};

use crate::period::Period;
use crate::records::qualification::QualificationRecord;
use crate::types::{Count, Tier, TierCounts};

/// Summed qualification funnel over one resolved period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualificationAggregate {
    pub period: Period,
    /// Number of daily records that fell inside the period
    pub records_included: usize,
    pub total_leads: Count,
    pub responded_form: Count,
    pub total_mql_by_tier: TierCounts,
    pub total_scheduled_by_tier: TierCounts,
    pub total_calls_by_tier: TierCounts,
    pub total_sales_by_tier: TierCounts,
    /// Sum of `total_mql_by_tier`
    pub total_mql: Count,
    /// Sum of `total_scheduled_by_tier`
    pub total_scheduled: Count,
    /// Sum of `total_calls_by_tier`
    pub total_calls: Count,
    /// Sum of `total_sales_by_tier`
    pub total_sales: Count,
}

impl QualificationAggregate {
    pub fn empty(period: Period) -> Self {
        QualificationAggregate {
            period,
            records_included: 0,
            total_leads: 0,
            responded_form: 0,
            total_mql_by_tier: TierCounts::default(),
            total_scheduled_by_tier: TierCounts::default(),
            total_calls_by_tier: TierCounts::default(),
            total_sales_by_tier: TierCounts::default(),
            total_mql: 0,
            total_scheduled: 0,
            total_calls: 0,
            total_sales: 0,
        }
    }

    /// Funnel stages where a later count exceeds the one before it.
    ///
    /// These are reported, never corrected: malformed input still aggregates.
    pub fn stage_inconsistencies(&self) -> Vec<String> {
        let mut found = Vec::new();
        if self.responded_form > self.total_leads {
            found.push(format!(
                "responded_form ({}) exceeds total_leads ({})",
                self.responded_form, self.total_leads
            ));
        }
        if self.total_mql > self.responded_form {
            found.push(format!(
                "total_mql ({}) exceeds responded_form ({})",
                self.total_mql, self.responded_form
            ));
        }
        for tier in Tier::ALL {
            let stages = [
                ("mql", self.total_mql_by_tier.get(tier)),
                ("scheduled", self.total_scheduled_by_tier.get(tier)),
                ("calls_done", self.total_calls_by_tier.get(tier)),
                ("sales", self.total_sales_by_tier.get(tier)),
            ];
            for pair in stages.windows(2) {
                let (prev_name, prev) = pair[0];
                let (name, value) = pair[1];
                if value > prev {
                    found.push(format!(
                        "{tier} {name} ({value}) exceeds {tier} {prev_name} ({prev})"
                    ));
                }
            }
        }
        found
    }
}

/// Fold daily qualification records into one aggregate for `period`.
///
/// Records dated outside the period (date-only, inclusive both ends) are
/// skipped, so pre-scoped and unscoped inputs give the same answer. Tier
/// slots are summed first; cross-tier totals are then derived from them.
/// Counts saturate at `Count::MAX` instead of overflowing.
pub fn aggregate_qualification(
    records: &[QualificationRecord],
    period: &Period,
) -> QualificationAggregate {
    fold_qualification(records, period)
}

/// Aggregate only the records belonging to one funnel.
pub fn aggregate_qualification_for_funnel(
    records: &[QualificationRecord],
    funnel_id: &str,
    period: &Period,
) -> QualificationAggregate {
    fold_qualification(records.iter().filter(|r| r.funnel_id == funnel_id), period)
}

fn fold_qualification<'a>(
    records: impl IntoIterator<Item = &'a QualificationRecord>,
    period: &Period,
) -> QualificationAggregate {
    let mut agg = QualificationAggregate::empty(*period);
    let mut skipped = 0usize;

    for day in records {
        if !period.contains(day.date) {
            skipped += 1;
            continue;
        }
        agg.records_included += 1;
        agg.total_leads = agg.total_leads.saturating_add(day.leads_total);
        agg.responded_form = agg.responded_form.saturating_add(day.responded_form);
        agg.total_mql_by_tier += day.mql;
        agg.total_scheduled_by_tier += day.scheduled;
        agg.total_calls_by_tier += day.calls_done;
        agg.total_sales_by_tier += day.sales;
    }

    agg.total_mql = agg.total_mql_by_tier.total();
    agg.total_scheduled = agg.total_scheduled_by_tier.total();
    agg.total_calls = agg.total_calls_by_tier.total();
    agg.total_sales = agg.total_sales_by_tier.total();

    if skipped > 0 {
        tracing::debug!(
            skipped,
            start = %period.start_date,
            end = %period.end_date,
            "qualification records outside period"
        );
    }
    let issues = agg.stage_inconsistencies();
    if !issues.is_empty() {
        tracing::warn!(count = issues.len(), "qualification funnel stages out of order");
    }

    agg
}
