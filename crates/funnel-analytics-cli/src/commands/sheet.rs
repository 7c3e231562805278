use clap::Args;
use serde_json::{json, Value};

use funnel_analytics_core::sheet::{parse_week_row, week_totals, WeekSummary};

use crate::input;

/// Arguments for weekly sheet normalization
#[derive(Args)]
pub struct SheetWeekArgs {
    /// Path to JSON array of rows, each an array of cells (reads piped stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_sheet_week(args: SheetWeekArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let rows: Vec<Vec<Value>> = input::load(args.input.as_deref(), "sheet rows")?;
    let weeks: Vec<WeekSummary> = rows.iter().map(|row| parse_week_row(row)).collect();
    let totals = week_totals(&weeks);
    Ok(json!({ "result": totals, "results": weeks }))
}
