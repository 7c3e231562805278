pub mod acquisition;
pub mod aggregate;
pub mod dashboard;
pub mod format;
pub mod metrics;
pub mod period;
pub mod sheet;
pub mod validate;

use chrono::NaiveDateTime;
use clap::Args;

use funnel_analytics_core::FormatConfig;

/// Settings resolved once in `main` and shared by every command.
pub struct Context {
    pub now: NaiveDateTime,
    pub format: FormatConfig,
}

/// Arguments for commands that take only a JSON document
#[derive(Args)]
pub struct InputArgs {
    /// Path to JSON input file (reads piped stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,
}
