use clap::Args;
use serde_json::Value;

use funnel_analytics_core::metrics::dashboard::{build_dashboard_report, DashboardInput};

use crate::commands::period::PeriodArgs;
use crate::commands::Context;
use crate::input;

/// Arguments for the period dashboard
#[derive(Args)]
pub struct DashboardArgs {
    /// Path to JSON dashboard input (reads piped stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,

    /// Override the period in the input document
    #[command(flatten)]
    pub period: PeriodArgs,

    /// Override the funnel filter in the input document
    #[arg(long)]
    pub funnel: Option<String>,
}

pub fn run_dashboard(
    args: DashboardArgs,
    ctx: &Context,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut dashboard: DashboardInput = input::load(args.input.as_deref(), "the dashboard")?;

    if args.period.preset.is_some() || args.period.start.is_some() {
        dashboard.period = args.period.selection();
    }
    if args.funnel.is_some() {
        dashboard.funnel_id = args.funnel;
    }

    let report = build_dashboard_report(&dashboard, ctx.now)?;
    Ok(serde_json::to_value(report)?)
}
