use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::records::{to_count, NormalizedBatch, RejectedEntry};
use crate::types::{Count, Tier, TierCounts};
use crate::validation::{validate_qualification_record, ValidationError};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A daily qualification entry as typed by an operator or imported.
///
/// Every numeric field is optional and signed so that validation can report
/// missing or negative values instead of failing deserialization. Per-stage
/// maps are keyed by tier name; unrecognised keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QualificationEntry {
    pub organization_id: Option<String>,
    pub funnel_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub leads_total: Option<i64>,
    pub responded_form: Option<i64>,
    pub mql: BTreeMap<String, i64>,
    pub scheduled: BTreeMap<String, i64>,
    pub calls_done: BTreeMap<String, i64>,
    pub sales: BTreeMap<String, i64>,
}

impl QualificationEntry {
    /// The four per-tier stage maps in funnel order.
    pub fn stages(&self) -> [(&'static str, &BTreeMap<String, i64>); 4] {
        [
            ("mql", &self.mql),
            ("scheduled", &self.scheduled),
            ("calls_done", &self.calls_done),
            ("sales", &self.sales),
        ]
    }
}

/// Canonical per-day qualification record for one organization + funnel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualificationRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    pub funnel_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub leads_total: Count,
    #[serde(default)]
    pub responded_form: Count,
    #[serde(default)]
    pub mql: TierCounts,
    #[serde(default)]
    pub scheduled: TierCounts,
    #[serde(default)]
    pub calls_done: TierCounts,
    #[serde(default)]
    pub sales: TierCounts,
}

impl QualificationRecord {
    /// A record with every count at zero.
    pub fn empty(funnel_id: impl Into<String>, date: NaiveDate) -> Self {
        QualificationRecord {
            organization_id: None,
            funnel_id: funnel_id.into(),
            date,
            leads_total: 0,
            responded_form: 0,
            mql: TierCounts::default(),
            scheduled: TierCounts::default(),
            calls_done: TierCounts::default(),
            sales: TierCounts::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

fn tier_counts(map: &BTreeMap<String, i64>) -> TierCounts {
    let mut counts = TierCounts::default();
    for (key, value) in map {
        if let Ok(tier) = key.parse::<Tier>() {
            // "gold" and "ouro" both land in the same slot
            let slot = counts.get_mut(tier);
            *slot = slot.saturating_add(to_count(*value));
        }
    }
    counts
}

/// Convert a raw entry into a canonical record, or return every violation.
///
/// Missing numeric fields default to zero.
pub fn normalize_qualification(
    raw: &QualificationEntry,
    now: NaiveDateTime,
) -> Result<QualificationRecord, Vec<ValidationError>> {
    let validation = validate_qualification_record(raw, now);
    if !validation.valid {
        return Err(validation.errors);
    }

    let (Some(funnel_id), Some(date)) = (raw.funnel_id.as_ref(), raw.date) else {
        return Err(validation.errors);
    };

    Ok(QualificationRecord {
        organization_id: raw.organization_id.clone(),
        funnel_id: funnel_id.trim().to_string(),
        date,
        leads_total: raw.leads_total.map(to_count).unwrap_or(0),
        responded_form: raw.responded_form.map(to_count).unwrap_or(0),
        mql: tier_counts(&raw.mql),
        scheduled: tier_counts(&raw.scheduled),
        calls_done: tier_counts(&raw.calls_done),
        sales: tier_counts(&raw.sales),
    })
}

/// Normalize a batch, keeping accepted records and indexing the rejects.
pub fn normalize_qualification_batch(
    entries: &[QualificationEntry],
    now: NaiveDateTime,
) -> NormalizedBatch<QualificationRecord> {
    let mut batch = NormalizedBatch::default();
    for (index, entry) in entries.iter().enumerate() {
        match normalize_qualification(entry, now) {
            Ok(record) => batch.records.push(record),
            Err(errors) => batch.rejected.push(RejectedEntry { index, errors }),
        }
    }
    tracing::debug!(
        accepted = batch.records.len(),
        rejected = batch.rejected.len(),
        "normalized qualification batch"
    );
    batch
}
