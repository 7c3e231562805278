mod commands;
mod input;
mod output;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use funnel_analytics_core::{Clock, FixedClock, FormatConfig, SystemClock};

use commands::acquisition::AcquisitionSummaryArgs;
use commands::aggregate::AggregateCommand;
use commands::dashboard::DashboardArgs;
use commands::format::FormatCommand;
use commands::metrics::MetricsCommand;
use commands::period::PeriodArgs;
use commands::sheet::SheetWeekArgs;
use commands::validate::ValidateCommand;
use commands::Context;

/// Sales-funnel analytics over daily qualification and revenue records
#[derive(Parser)]
#[command(
    name = "funnel",
    version,
    about = "Sales-funnel period aggregation and conversion metrics",
    long_about = "Resolve reporting periods, validate and aggregate daily qualification \
                  and revenue records, and compute funnel conversion, revenue-per-student, \
                  ROAS and ascension metrics with decimal precision. Input is JSON via \
                  --input or stdin."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Treat this date (YYYY-MM-DD) as today instead of reading the system clock
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    /// YAML or JSON file with currency and number display settings
    #[arg(long, global = true)]
    format_config: Option<String>,

    /// Log debug events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a period preset or custom range to concrete dates
    Period(PeriodArgs),
    /// Check raw daily entries and list every violation
    #[command(subcommand)]
    Validate(ValidateCommand),
    /// Sum daily records over a period
    #[command(subcommand)]
    Aggregate(AggregateCommand),
    /// Derive conversion metrics from records or totals
    #[command(subcommand)]
    Metrics(MetricsCommand),
    /// Full period report: funnel, tiers, revenue, acquisition, ascension
    Dashboard(DashboardArgs),
    /// Upsert monthly acquisition figures and summarize them
    AcquisitionSummary(AcquisitionSummaryArgs),
    /// Normalize weekly spreadsheet rows and total them
    SheetWeek(SheetWeekArgs),
    /// Render a value with the configured locale conventions
    #[command(subcommand)]
    Format(FormatCommand),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("funnel_analytics_core=debug,funnel=debug")
    } else {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("funnel_analytics_core=warn,funnel=warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_format_config(path: Option<&str>) -> Result<FormatConfig, Box<dyn std::error::Error>> {
    let cfg = match path {
        Some(p) => {
            let cfg: FormatConfig = input::file::read_yaml(p)?;
            cfg.validate()?;
            tracing::debug!(path = p, "loaded format config");
            cfg
        }
        None => FormatConfig::from_env()?,
    };
    Ok(cfg)
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let now = match cli.today {
        Some(date) => FixedClock::on(date).now(),
        None => SystemClock.now(),
    };
    let format = match load_format_config(cli.format_config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };
    let ctx = Context { now, format };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Period(args) => commands::period::run_period(args, &ctx),
        Commands::Validate(cmd) => commands::validate::run_validate(cmd, &ctx),
        Commands::Aggregate(cmd) => commands::aggregate::run_aggregate(cmd, &ctx),
        Commands::Metrics(cmd) => commands::metrics::run_metrics(cmd, &ctx),
        Commands::Dashboard(args) => commands::dashboard::run_dashboard(args, &ctx),
        Commands::AcquisitionSummary(args) => commands::acquisition::run_acquisition_summary(args),
        Commands::SheetWeek(args) => commands::sheet::run_sheet_week(args),
        Commands::Format(cmd) => commands::format::run_format(cmd, &ctx),
        Commands::Version => {
            println!("funnel {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
