use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use funnel_analytics_core::metrics::acquisition::calculate_acquisition_metrics;
use funnel_analytics_core::records::acquisition::{
    summarize_acquisition, AcquisitionInput, AcquisitionLedger, AcquisitionRecord,
};

use crate::input;

/// Arguments for the monthly acquisition summary
#[derive(Args)]
pub struct AcquisitionSummaryArgs {
    /// Path to JSON array of monthly acquisition entries (reads piped stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,

    /// Input holds previously stored records; their derived fields are kept as-is
    #[arg(long)]
    pub stored: bool,

    /// Summarize a single funnel
    #[arg(long)]
    pub funnel: Option<String>,

    /// Revenue for the summarized months, enables ROAS and ROI
    #[arg(long)]
    pub revenue: Option<Decimal>,
}

pub fn run_acquisition_summary(
    args: AcquisitionSummaryArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let ledger = if args.stored {
        let records: Vec<AcquisitionRecord> =
            input::load_many(args.input.as_deref(), "the acquisition summary")?;
        AcquisitionLedger::from_stored(records)
    } else {
        let entries: Vec<AcquisitionInput> =
            input::load_many(args.input.as_deref(), "the acquisition summary")?;
        let mut ledger = AcquisitionLedger::new();
        for entry in &entries {
            ledger.upsert(entry)?;
        }
        ledger
    };

    let records: Vec<&AcquisitionRecord> = match args.funnel.as_deref() {
        Some(funnel) => ledger.for_funnel(funnel).collect(),
        None => ledger.iter().collect(),
    };
    let summary = summarize_acquisition(records.iter().copied());

    let mut result = serde_json::to_value(&summary)?;
    if let (Some(revenue), Value::Object(map)) = (args.revenue, &mut result) {
        let metrics = calculate_acquisition_metrics(&summary.metrics_input(revenue));
        map.insert("roas".to_string(), serde_json::to_value(metrics.roas)?);
        map.insert("roi".to_string(), serde_json::to_value(metrics.roi)?);
    }

    Ok(json!({ "result": result, "results": records }))
}
