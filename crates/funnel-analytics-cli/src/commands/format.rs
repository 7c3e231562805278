use clap::Subcommand;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use funnel_analytics_core::format::{format_currency, format_number, format_percentage};

use crate::commands::Context;

#[derive(Subcommand)]
pub enum FormatCommand {
    /// Money with symbol and grouping, e.g. "R$ 1.234,56" (no-break space after the symbol)
    Currency {
        #[arg(allow_hyphen_values = true)]
        value: Decimal,
    },
    /// Percentage value (12.5 means 12.5%)
    Percent {
        #[arg(allow_hyphen_values = true)]
        value: Decimal,

        /// Fraction digits to keep
        #[arg(long, default_value_t = 2)]
        decimals: u32,
    },
    /// Grouped number with up to three decimals
    Number {
        #[arg(allow_hyphen_values = true)]
        value: Decimal,
    },
}

pub fn run_format(cmd: FormatCommand, ctx: &Context) -> Result<Value, Box<dyn std::error::Error>> {
    let (value, formatted) = match cmd {
        FormatCommand::Currency { value } => (value, format_currency(value, &ctx.format)),
        FormatCommand::Percent { value, decimals } => {
            (value, format_percentage(value, decimals, &ctx.format))
        }
        FormatCommand::Number { value } => (value, format_number(value, &ctx.format)),
    };
    Ok(json!({ "result": { "formatted": formatted, "value": value } }))
}
