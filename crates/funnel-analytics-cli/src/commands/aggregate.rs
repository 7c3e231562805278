use clap::{Args, Subcommand};
use serde_json::{json, Value};

use funnel_analytics_core::aggregation::{
    aggregate_qualification, aggregate_qualification_for_funnel, aggregate_revenue,
    QualificationAggregate, RevenueAggregate,
};
use funnel_analytics_core::records::qualification::{
    normalize_qualification_batch, QualificationEntry,
};
use funnel_analytics_core::records::revenue::{normalize_revenue_batch, RevenueEntry};
use funnel_analytics_core::records::RejectedEntry;

use crate::commands::period::PeriodArgs;
use crate::commands::Context;
use crate::input;

/// Raw daily records plus the period to sum them over
#[derive(Args)]
pub struct RecordsArgs {
    /// Path to JSON array of daily entries (reads piped stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,

    #[command(flatten)]
    pub period: PeriodArgs,
}

/// Qualification records, optionally scoped to one funnel
#[derive(Args)]
pub struct QualificationRecordsArgs {
    #[command(flatten)]
    pub records: RecordsArgs,

    /// Only include records from this funnel
    #[arg(long)]
    pub funnel: Option<String>,
}

#[derive(Subcommand)]
pub enum AggregateCommand {
    /// Sum qualification entries per tier and stage
    Qualification(QualificationRecordsArgs),
    /// Sum revenue entries
    Revenue(RecordsArgs),
}

/// Normalize, reject invalid entries and aggregate over the period.
pub fn qualification_aggregate(
    args: &QualificationRecordsArgs,
    ctx: &Context,
) -> Result<(QualificationAggregate, Vec<RejectedEntry>), Box<dyn std::error::Error>> {
    let period = args.records.period.resolve(ctx.now)?;
    let entries: Vec<QualificationEntry> =
        input::load_many(args.records.input.as_deref(), "qualification aggregation")?;
    let batch = normalize_qualification_batch(&entries, ctx.now);
    let agg = match args.funnel.as_deref() {
        Some(funnel) => aggregate_qualification_for_funnel(&batch.records, funnel, &period),
        None => aggregate_qualification(&batch.records, &period),
    };
    Ok((agg, batch.rejected))
}

pub fn revenue_aggregate(
    args: &RecordsArgs,
    ctx: &Context,
) -> Result<(RevenueAggregate, Vec<RejectedEntry>), Box<dyn std::error::Error>> {
    let period = args.period.resolve(ctx.now)?;
    let entries: Vec<RevenueEntry> =
        input::load_many(args.input.as_deref(), "revenue aggregation")?;
    let batch = normalize_revenue_batch(&entries, ctx.now);
    Ok((aggregate_revenue(&batch.records, &period), batch.rejected))
}

/// Rejected entries become warnings so they show up in every output format.
pub fn rejection_warnings(rejected: &[RejectedEntry]) -> Vec<String> {
    rejected
        .iter()
        .map(|r| {
            let reasons: Vec<String> = r.errors.iter().map(|e| e.to_string()).collect();
            format!("entry {} skipped: {}", r.index, reasons.join("; "))
        })
        .collect()
}

pub fn run_aggregate(
    cmd: AggregateCommand,
    ctx: &Context,
) -> Result<Value, Box<dyn std::error::Error>> {
    match cmd {
        AggregateCommand::Qualification(args) => {
            let (agg, rejected) = qualification_aggregate(&args, ctx)?;
            let mut warnings = rejection_warnings(&rejected);
            warnings.extend(agg.stage_inconsistencies());
            Ok(json!({ "result": agg, "warnings": warnings }))
        }
        AggregateCommand::Revenue(args) => {
            let (agg, rejected) = revenue_aggregate(&args, ctx)?;
            Ok(json!({ "result": agg, "warnings": rejection_warnings(&rejected) }))
        }
    }
}
