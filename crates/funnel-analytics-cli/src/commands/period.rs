use chrono::{NaiveDate, NaiveDateTime};
use clap::Args;
use serde_json::{json, Value};

use funnel_analytics_core::period::{resolve_selection, Period, PeriodPreset, PeriodSelection};

use crate::commands::Context;

/// Period selection shared by every command that filters by date
#[derive(Args, Clone)]
pub struct PeriodArgs {
    /// Preset: today, last7days, last30days, thisMonth, lastMonth
    #[arg(long, conflicts_with_all = ["start", "end"])]
    pub preset: Option<PeriodPreset>,

    /// Custom range start (YYYY-MM-DD), inclusive
    #[arg(long, requires = "end")]
    pub start: Option<NaiveDate>,

    /// Custom range end (YYYY-MM-DD), inclusive
    #[arg(long, requires = "start")]
    pub end: Option<NaiveDate>,
}

impl PeriodArgs {
    /// Defaults to the last 30 days when nothing is given.
    pub fn selection(&self) -> PeriodSelection {
        match (self.preset, self.start, self.end) {
            (_, Some(start_date), Some(end_date)) => PeriodSelection::Custom {
                start_date,
                end_date,
            },
            (Some(preset), _, _) => preset.into(),
            _ => PeriodSelection::Last30Days,
        }
    }

    pub fn resolve(&self, now: NaiveDateTime) -> Result<Period, Box<dyn std::error::Error>> {
        Ok(resolve_selection(&self.selection(), now)?)
    }
}

pub fn run_period(args: PeriodArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let period = args.resolve(ctx.now)?;
    Ok(json!({
        "result": {
            "start_date": period.start_date,
            "end_date": period.end_date,
            "preset": period.preset,
            "days": period.days(),
        }
    }))
}
