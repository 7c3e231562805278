use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::records::{to_count, NormalizedBatch, RejectedEntry};
use crate::types::{Count, Money};
use crate::validation::{validate_revenue_record, ValidationError};

/// A daily revenue entry before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevenueEntry {
    pub organization_id: Option<String>,
    pub date: Option<NaiveDate>,
    /// Gross sales value
    pub billing: Option<Money>,
    /// Cash actually collected
    pub cash_in: Option<Money>,
    pub qualified_students: Option<i64>,
}

/// Canonical per-day revenue record for one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevenueRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    pub date: NaiveDate,
    #[serde(default)]
    pub billing: Money,
    #[serde(default)]
    pub cash_in: Money,
    #[serde(default)]
    pub qualified_students: Count,
}

pub fn normalize_revenue(
    raw: &RevenueEntry,
    now: NaiveDateTime,
) -> Result<RevenueRecord, Vec<ValidationError>> {
    let validation = validate_revenue_record(raw, now);
    if !validation.valid {
        return Err(validation.errors);
    }
    let Some(date) = raw.date else {
        return Err(validation.errors);
    };

    Ok(RevenueRecord {
        organization_id: raw.organization_id.clone(),
        date,
        billing: raw.billing.unwrap_or(Decimal::ZERO),
        cash_in: raw.cash_in.unwrap_or(Decimal::ZERO),
        qualified_students: raw.qualified_students.map(to_count).unwrap_or(0),
    })
}

pub fn normalize_revenue_batch(
    entries: &[RevenueEntry],
    now: NaiveDateTime,
) -> NormalizedBatch<RevenueRecord> {
    let mut batch = NormalizedBatch::default();
    for (index, entry) in entries.iter().enumerate() {
        match normalize_revenue(entry, now) {
            Ok(record) => batch.records.push(record),
            Err(errors) => batch.rejected.push(RejectedEntry { index, errors }),
        }
    }
    batch
}
