use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use serde_json::{json, Value};

use funnel_analytics_core::aggregation::aggregate_qualification;
use funnel_analytics_core::metrics::acquisition::{
    calculate_acquisition_metrics, AcquisitionMetricsInput,
};
use funnel_analytics_core::metrics::general::{calculate_ascension_rate, calculate_general_metrics};
use funnel_analytics_core::metrics::qualification::{
    calculate_qualification_metrics, tier_breakdown,
};
use funnel_analytics_core::metrics::revenue::calculate_revenue_metrics;
use funnel_analytics_core::records::qualification::{
    normalize_qualification_batch, QualificationEntry,
};

use crate::commands::aggregate::{
    qualification_aggregate, rejection_warnings, revenue_aggregate, QualificationRecordsArgs,
    RecordsArgs,
};
use crate::commands::period::PeriodArgs;
use crate::commands::Context;
use crate::input;

/// Arguments for acquisition metrics
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct AcquisitionArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Total leads acquired
    #[arg(long)]
    pub total_leads: Option<u64>,

    /// Amount invested in acquisition
    #[arg(long)]
    pub investment: Option<Decimal>,

    /// Revenue attributed to the acquisition
    #[arg(long)]
    pub revenue: Option<Decimal>,

    /// Leads that passed qualification
    #[arg(long)]
    pub qualified_leads: Option<u64>,
}

/// Arguments for the ascension rate
#[derive(Args)]
pub struct AscensionArgs {
    /// Path to JSON array of qualification entries (ignored when --sales and --mql are given)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub period: PeriodArgs,

    /// Total sales
    #[arg(long, requires = "mql")]
    pub sales: Option<u64>,

    /// Total MQLs
    #[arg(long, requires = "sales")]
    pub mql: Option<u64>,
}

#[derive(Subcommand)]
pub enum MetricsCommand {
    /// Funnel stage rates and tier shares
    Qualification(QualificationRecordsArgs),
    /// Billing, cash-in and revenue per student
    Revenue(RecordsArgs),
    /// Cost per lead, ROAS and ROI
    Acquisition(AcquisitionArgs),
    /// Sales over MQLs across the whole funnel
    Ascension(AscensionArgs),
    /// Per-tier funnel with stage rates
    Tiers(QualificationRecordsArgs),
}

pub fn run_metrics(
    cmd: MetricsCommand,
    ctx: &Context,
) -> Result<Value, Box<dyn std::error::Error>> {
    match cmd {
        MetricsCommand::Qualification(args) => {
            let (agg, rejected) = qualification_aggregate(&args, ctx)?;
            Ok(json!({
                "result": calculate_qualification_metrics(&agg),
                "warnings": rejection_warnings(&rejected),
            }))
        }
        MetricsCommand::Revenue(args) => {
            let (agg, rejected) = revenue_aggregate(&args, ctx)?;
            Ok(json!({
                "result": calculate_revenue_metrics(&agg),
                "warnings": rejection_warnings(&rejected),
            }))
        }
        MetricsCommand::Acquisition(args) => run_acquisition(args),
        MetricsCommand::Ascension(args) => run_ascension(args, ctx),
        MetricsCommand::Tiers(args) => {
            let (agg, rejected) = qualification_aggregate(&args, ctx)?;
            let breakdown = tier_breakdown(&agg);
            let mut rows = breakdown.tiers;
            rows.push(breakdown.overall);
            Ok(json!({
                "result": { "total_mql": breakdown.total_mql },
                "results": rows,
                "warnings": rejection_warnings(&rejected),
            }))
        }
    }
}

fn run_acquisition(args: AcquisitionArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let acq_input: AcquisitionMetricsInput = if let Some(ref path) = args.input {
        input::load(Some(path.as_str()), "acquisition metrics")?
    } else if args.investment.is_some() || args.revenue.is_some() {
        AcquisitionMetricsInput {
            total_leads: args.total_leads.unwrap_or(0),
            investment: args
                .investment
                .ok_or("--investment is required (or provide --input)")?,
            revenue: args.revenue.ok_or("--revenue is required (or provide --input)")?,
            qualified_leads: args.qualified_leads.unwrap_or(0),
        }
    } else {
        input::load(None, "acquisition metrics")?
    };

    let metrics = calculate_acquisition_metrics(&acq_input);
    let mut warnings = Vec::new();
    if acq_input.investment.is_zero() {
        warnings.push("Investment is zero; ROAS and ROI set to 0".to_string());
    }
    Ok(json!({ "result": metrics, "warnings": warnings }))
}

fn run_ascension(args: AscensionArgs, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    if let (Some(sales), Some(mql)) = (args.sales, args.mql) {
        return Ok(json!({
            "result": {
                "ascension_rate": calculate_ascension_rate(sales, mql),
                "total_sales": sales,
                "total_mql": mql,
            }
        }));
    }

    let period = args.period.resolve(ctx.now)?;
    let entries: Vec<QualificationEntry> =
        input::load_many(args.input.as_deref(), "ascension rate")?;
    let batch = normalize_qualification_batch(&entries, ctx.now);
    let agg = aggregate_qualification(&batch.records, &period);
    Ok(json!({
        "result": calculate_general_metrics(&agg),
        "warnings": rejection_warnings(&batch.rejected),
    }))
}
