use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::FunnelAnalyticsError;
use crate::metrics::acquisition::AcquisitionMetricsInput;
use crate::metrics::{ratio, round_currency, round_pct, safe_div};
use crate::types::{Count, Money, Rate};
use crate::FunnelAnalyticsResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Calendar month of a monthly acquisition record. Accepts Portuguese codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Month {
    Jan,
    #[serde(alias = "fev")]
    Feb,
    Mar,
    #[serde(alias = "abr")]
    Apr,
    #[serde(alias = "mai")]
    May,
    Jun,
    Jul,
    #[serde(alias = "ago")]
    Aug,
    #[serde(alias = "set")]
    Sep,
    #[serde(alias = "out")]
    Oct,
    Nov,
    #[serde(alias = "dez")]
    Dec,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    /// 1-based month number.
    pub fn number(&self) -> u32 {
        *self as u32 + 1
    }

    pub fn from_number(n: u32) -> Option<Month> {
        Month::ALL.get((n as usize).checked_sub(1)?).copied()
    }

    fn code(&self) -> &'static str {
        ["jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec"]
            [*self as usize]
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Month {
    type Err = FunnelAnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        let pt = [
            "jan", "fev", "mar", "abr", "mai", "jun", "jul", "ago", "set", "out", "nov", "dez",
        ];
        Month::ALL
            .into_iter()
            .zip(pt)
            .find(|(m, p)| m.code() == key || *p == key)
            .map(|(m, _)| m)
            .or_else(|| key.parse::<u32>().ok().and_then(Month::from_number))
            .ok_or_else(|| FunnelAnalyticsError::InvalidInput {
                field: "month".to_string(),
                reason: format!("unknown month '{s}'"),
            })
    }
}

/// Monthly acquisition figures for one funnel, as submitted for upsert.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcquisitionInput {
    pub funnel_id: String,
    pub month: Month,
    pub year: i32,
    #[serde(default)]
    pub total_leads: Option<Count>,
    #[serde(default)]
    pub qualified_leads: Option<Count>,
    #[serde(default)]
    pub scheduled: Option<Count>,
    #[serde(default)]
    pub calls_done: Option<Count>,
    #[serde(default)]
    pub sales: Option<Count>,
    #[serde(default)]
    pub investment: Option<Money>,
}

/// Stored monthly acquisition record.
///
/// `cost_per_lead` and `conversion_rate` are computed once when the record is
/// written and then carried as data. Readers must use the stored values so
/// that history stays stable if the formulas change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquisitionRecord {
    pub funnel_id: String,
    pub month: Month,
    pub year: i32,
    pub total_leads: Count,
    pub qualified_leads: Count,
    pub scheduled: Count,
    pub calls_done: Count,
    pub sales: Count,
    pub investment: Money,
    /// investment / total_leads, 0 when there are no leads
    pub cost_per_lead: Money,
    /// sales / qualified_leads * 100, 0 when there are no qualified leads
    pub conversion_rate: Rate,
}

impl AcquisitionRecord {
    /// Build a record from input, computing the stored derived fields.
    pub fn derive(input: &AcquisitionInput) -> FunnelAnalyticsResult<Self> {
        if input.funnel_id.trim().is_empty() {
            return Err(FunnelAnalyticsError::InvalidInput {
                field: "funnel_id".to_string(),
                reason: "Funnel reference is required".to_string(),
            });
        }
        let investment = input.investment.unwrap_or(Decimal::ZERO);
        if investment < Decimal::ZERO {
            return Err(FunnelAnalyticsError::InvalidInput {
                field: "investment".to_string(),
                reason: "Investment cannot be negative".to_string(),
            });
        }

        let total_leads = input.total_leads.unwrap_or(0);
        let qualified_leads = input.qualified_leads.unwrap_or(0);
        let sales = input.sales.unwrap_or(0);

        Ok(AcquisitionRecord {
            funnel_id: input.funnel_id.trim().to_string(),
            month: input.month,
            year: input.year,
            total_leads,
            qualified_leads,
            scheduled: input.scheduled.unwrap_or(0),
            calls_done: input.calls_done.unwrap_or(0),
            sales,
            investment,
            cost_per_lead: round_currency(safe_div(investment, Decimal::from(total_leads))),
            conversion_rate: round_pct(ratio(Decimal::from(sales), Decimal::from(qualified_leads))),
        })
    }
}

// ---------------------------------------------------------------------------
// Ledger
// ---------------------------------------------------------------------------

type LedgerKey = (String, i32, Month);

/// In-memory store of acquisition records keyed by (funnel, year, month).
#[derive(Debug, Clone, Default)]
pub struct AcquisitionLedger {
    records: BTreeMap<LedgerKey, AcquisitionRecord>,
}

impl AcquisitionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load records exactly as previously stored, without recomputing anything.
    pub fn from_stored(records: impl IntoIterator<Item = AcquisitionRecord>) -> Self {
        let mut ledger = Self::new();
        for r in records {
            ledger
                .records
                .insert((r.funnel_id.clone(), r.year, r.month), r);
        }
        ledger
    }

    /// Create or replace the record for `(funnel_id, month, year)`.
    pub fn upsert(
        &mut self,
        input: &AcquisitionInput,
    ) -> FunnelAnalyticsResult<&AcquisitionRecord> {
        let record = AcquisitionRecord::derive(input)?;
        tracing::debug!(
            funnel_id = record.funnel_id.as_str(),
            year = record.year,
            month = %record.month,
            "upserting acquisition record"
        );
        let key = (record.funnel_id.clone(), record.year, record.month);
        let stored = match self.records.entry(key) {
            Entry::Occupied(mut slot) => {
                slot.insert(record);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(record),
        };
        Ok(&*stored)
    }

    pub fn get(&self, funnel_id: &str, month: Month, year: i32) -> Option<&AcquisitionRecord> {
        self.records.get(&(funnel_id.to_string(), year, month))
    }

    /// All records of one funnel in chronological order.
    pub fn for_funnel<'a>(
        &'a self,
        funnel_id: &'a str,
    ) -> impl Iterator<Item = &'a AcquisitionRecord> + 'a {
        self.records
            .values()
            .filter(move |r| r.funnel_id == funnel_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AcquisitionRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<AcquisitionRecord> {
        self.records.into_values().collect()
    }
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcquisitionSummary {
    pub months: usize,
    pub total_leads: Count,
    pub qualified_leads: Count,
    pub total_investment: Money,
    pub total_sales: Count,
    /// total_investment / total_leads
    pub avg_cost_per_lead: Money,
    /// Mean of the stored per-month conversion rates
    pub avg_conversion_rate: Rate,
}

impl AcquisitionSummary {
    /// Inputs for acquisition metrics over the summarized months.
    pub fn metrics_input(&self, revenue: Money) -> AcquisitionMetricsInput {
        AcquisitionMetricsInput {
            total_leads: self.total_leads,
            investment: self.total_investment,
            revenue,
            qualified_leads: self.qualified_leads,
        }
    }
}

/// Roll up stored monthly records. Conversion rate is averaged from the stored
/// values, not recomputed from the summed counts.
pub fn summarize_acquisition<'a>(
    records: impl IntoIterator<Item = &'a AcquisitionRecord>,
) -> AcquisitionSummary {
    let mut summary = AcquisitionSummary::default();
    let mut rate_sum = Decimal::ZERO;

    for r in records {
        summary.months += 1;
        summary.total_leads = summary.total_leads.saturating_add(r.total_leads);
        summary.qualified_leads = summary.qualified_leads.saturating_add(r.qualified_leads);
        summary.total_investment = summary.total_investment.saturating_add(r.investment);
        summary.total_sales = summary.total_sales.saturating_add(r.sales);
        rate_sum = rate_sum.saturating_add(r.conversion_rate);
    }

    summary.avg_cost_per_lead = round_currency(safe_div(
        summary.total_investment,
        Decimal::from(summary.total_leads),
    ));
    summary.avg_conversion_rate = round_pct(safe_div(rate_sum, Decimal::from(summary.months)));
    summary
}
