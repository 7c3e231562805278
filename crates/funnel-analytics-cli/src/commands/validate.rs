use clap::Subcommand;
use serde_json::{json, Value};

use funnel_analytics_core::records::qualification::QualificationEntry;
use funnel_analytics_core::records::revenue::RevenueEntry;
use funnel_analytics_core::validation::{
    validate_qualification_record, validate_revenue_record, ValidationResult,
};

use crate::commands::{Context, InputArgs};
use crate::input;

#[derive(Subcommand)]
pub enum ValidateCommand {
    /// Validate daily qualification entries (array or single object)
    Qualification(InputArgs),
    /// Validate daily revenue entries (array or single object)
    Revenue(InputArgs),
}

pub fn run_validate(
    cmd: ValidateCommand,
    ctx: &Context,
) -> Result<Value, Box<dyn std::error::Error>> {
    let results: Vec<ValidationResult> = match cmd {
        ValidateCommand::Qualification(args) => {
            let entries: Vec<QualificationEntry> =
                input::load_many(args.input.as_deref(), "qualification validation")?;
            entries
                .iter()
                .map(|e| validate_qualification_record(e, ctx.now))
                .collect()
        }
        ValidateCommand::Revenue(args) => {
            let entries: Vec<RevenueEntry> =
                input::load_many(args.input.as_deref(), "revenue validation")?;
            entries
                .iter()
                .map(|e| validate_revenue_record(e, ctx.now))
                .collect()
        }
    };
    Ok(summarize(&results))
}

fn summarize(results: &[ValidationResult]) -> Value {
    let valid = results.iter().filter(|r| r.valid).count();
    let rows: Vec<Value> = results
        .iter()
        .enumerate()
        .map(|(index, r)| {
            json!({
                "index": index,
                "valid": r.valid,
                "errors": r.messages().join("; "),
            })
        })
        .collect();

    json!({
        "result": {
            "checked": results.len(),
            "valid": valid,
            "invalid": results.len() - valid,
        },
        "results": rows,
    })
}
