use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::clock::Clock;
use crate::error::FunnelAnalyticsError;
use crate::FunnelAnalyticsResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Named, clock-relative date range shorthand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodPreset {
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "last7days")]
    Last7Days,
    #[serde(rename = "last30days")]
    Last30Days,
    #[serde(rename = "thisMonth")]
    ThisMonth,
    #[serde(rename = "lastMonth")]
    LastMonth,
}

impl PeriodPreset {
    pub const ALL: [PeriodPreset; 5] = [
        PeriodPreset::Today,
        PeriodPreset::Last7Days,
        PeriodPreset::Last30Days,
        PeriodPreset::ThisMonth,
        PeriodPreset::LastMonth,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PeriodPreset::Today => "today",
            PeriodPreset::Last7Days => "last7days",
            PeriodPreset::Last30Days => "last30days",
            PeriodPreset::ThisMonth => "thisMonth",
            PeriodPreset::LastMonth => "lastMonth",
        }
    }
}

impl fmt::Display for PeriodPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodPreset {
    type Err = FunnelAnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['-', '_'], "");
        PeriodPreset::ALL
            .into_iter()
            .find(|p| p.as_str().to_ascii_lowercase() == key)
            .ok_or_else(|| FunnelAnalyticsError::InvalidInput {
                field: "preset".to_string(),
                reason: format!(
                    "unknown period preset '{s}' \
                     (expected today, last7days, last30days, thisMonth, lastMonth)"
                ),
            })
    }
}

/// Inclusive date range. A custom range carries no preset tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<PeriodPreset>,
}

impl Period {
    /// Build a caller-supplied range, rejecting `start > end`.
    pub fn custom(start_date: NaiveDate, end_date: NaiveDate) -> FunnelAnalyticsResult<Self> {
        if start_date > end_date {
            return Err(FunnelAnalyticsError::InvalidRange {
                start: start_date,
                end: end_date,
            });
        }
        Ok(Period {
            start_date,
            end_date,
            preset: None,
        })
    }

    /// Date-only membership test, inclusive on both ends.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Number of calendar days covered by the range.
    pub fn days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }
}

/// Serialized form of a period request: either a preset or explicit dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "preset")]
pub enum PeriodSelection {
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "last7days")]
    Last7Days,
    #[serde(rename = "last30days")]
    Last30Days,
    #[serde(rename = "thisMonth")]
    ThisMonth,
    #[serde(rename = "lastMonth")]
    LastMonth,
    #[serde(rename = "custom")]
    Custom {
        start_date: NaiveDate,
        end_date: NaiveDate,
    },
}

impl From<PeriodPreset> for PeriodSelection {
    fn from(p: PeriodPreset) -> Self {
        match p {
            PeriodPreset::Today => PeriodSelection::Today,
            PeriodPreset::Last7Days => PeriodSelection::Last7Days,
            PeriodPreset::Last30Days => PeriodSelection::Last30Days,
            PeriodPreset::ThisMonth => PeriodSelection::ThisMonth,
            PeriodPreset::LastMonth => PeriodSelection::LastMonth,
        }
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Map a preset to a concrete inclusive range anchored on `now`'s calendar day.
pub fn resolve_period(preset: PeriodPreset, now: NaiveDateTime) -> Period {
    let today = now.date();

    let (start_date, end_date) = match preset {
        PeriodPreset::Today => (today, today),
        PeriodPreset::Last7Days => (today - Duration::days(6), today),
        PeriodPreset::Last30Days => (today - Duration::days(29), today),
        PeriodPreset::ThisMonth => (first_of_month(today), today),
        PeriodPreset::LastMonth => {
            let last_of_prev = first_of_month(today) - Duration::days(1);
            (first_of_month(last_of_prev), last_of_prev)
        }
    };

    Period {
        start_date,
        end_date,
        preset: Some(preset),
    }
}

/// Resolve a preset or custom selection. Only a custom range can fail.
pub fn resolve_selection(
    selection: &PeriodSelection,
    now: NaiveDateTime,
) -> FunnelAnalyticsResult<Period> {
    let preset = match selection {
        PeriodSelection::Custom {
            start_date,
            end_date,
        } => return Period::custom(*start_date, *end_date),
        PeriodSelection::Today => PeriodPreset::Today,
        PeriodSelection::Last7Days => PeriodPreset::Last7Days,
        PeriodSelection::Last30Days => PeriodPreset::Last30Days,
        PeriodSelection::ThisMonth => PeriodPreset::ThisMonth,
        PeriodSelection::LastMonth => PeriodPreset::LastMonth,
    };
    Ok(resolve_period(preset, now))
}

/// Convenience wrapper reading "now" from a clock.
pub fn resolve_period_with(preset: PeriodPreset, clock: &impl Clock) -> Period {
    resolve_period(preset, clock.now())
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
