//! Input rules applied to raw daily entries before they reach the aggregator.
//!
//! Every violation is collected; nothing short-circuits, so a caller can show
//! the complete list in one pass.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::clock::Clock;
use crate::records::qualification::QualificationEntry;
use crate::records::revenue::RevenueEntry;
use crate::types::Tier;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    fn from_errors(errors: Vec<ValidationError>) -> Self {
        ValidationResult {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Flat display strings, one per violation.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.to_string()).collect()
    }
}

// ---------------------------------------------------------------------------
// Rule helpers
// ---------------------------------------------------------------------------

fn require_present<T>(errors: &mut Vec<ValidationError>, field: &str, value: Option<T>) {
    if value.is_none() {
        errors.push(ValidationError::new(field, "is required"));
    }
}

fn check_count(errors: &mut Vec<ValidationError>, field: &str, value: Option<i64>) {
    if let Some(v) = value {
        if v < 0 {
            errors.push(ValidationError::new(
                field,
                format!("cannot be negative (got {v})"),
            ));
        }
    }
}

fn check_amount(errors: &mut Vec<ValidationError>, field: &str, value: Option<Decimal>) {
    if let Some(v) = value {
        if v.is_sign_negative() && !v.is_zero() {
            errors.push(ValidationError::new(
                field,
                format!("cannot be negative (got {v})"),
            ));
        }
    }
}

/// Today is allowed up to its last instant; anything on a later calendar day is not.
fn check_not_future(
    errors: &mut Vec<ValidationError>,
    date: Option<NaiveDate>,
    now: NaiveDateTime,
) {
    if let Some(date) = date {
        if date > now.date() {
            errors.push(ValidationError::new(
                "date",
                format!("cannot be in the future (got {date}, today is {})", now.date()),
            ));
        }
    }
}

// ---------------------------------------------------------------------------
// Public validators
// ---------------------------------------------------------------------------

/// Validate one raw qualification entry.
///
/// Unknown tier keys are skipped without an error.
pub fn validate_qualification_record(
    raw: &QualificationEntry,
    now: NaiveDateTime,
) -> ValidationResult {
    let mut errors = Vec::new();

    let funnel_id = raw.funnel_id.as_deref().filter(|s| !s.trim().is_empty());
    require_present(&mut errors, "funnel_id", funnel_id);
    require_present(&mut errors, "date", raw.date);

    check_count(&mut errors, "leads_total", raw.leads_total);
    check_count(&mut errors, "responded_form", raw.responded_form);

    for (stage, map) in raw.stages() {
        for (key, value) in map {
            match key.parse::<Tier>() {
                Ok(tier) => check_count(&mut errors, &format!("{stage}.{tier}"), Some(*value)),
                Err(_) => tracing::debug!(stage, key = key.as_str(), "ignoring unknown tier key"),
            }
        }
    }

    check_not_future(&mut errors, raw.date, now);

    ValidationResult::from_errors(errors)
}

/// Validate one raw revenue entry.
pub fn validate_revenue_record(raw: &RevenueEntry, now: NaiveDateTime) -> ValidationResult {
    let mut errors = Vec::new();

    require_present(&mut errors, "date", raw.date);
    check_amount(&mut errors, "billing", raw.billing);
    check_amount(&mut errors, "cash_in", raw.cash_in);
    check_count(&mut errors, "qualified_students", raw.qualified_students);
    check_not_future(&mut errors, raw.date, now);

    ValidationResult::from_errors(errors)
}

pub fn validate_qualification_with(
    raw: &QualificationEntry,
    clock: &impl Clock,
) -> ValidationResult {
    validate_qualification_record(raw, clock.now())
}

pub fn validate_revenue_with(raw: &RevenueEntry, clock: &impl Clock) -> ValidationResult {
    validate_revenue_record(raw, clock.now())
}
