mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::forecast::ForecastArgs;
use commands::plan::{PlanArgs, ReportArgs};

/// Financial forecasting and scenario planning
#[derive(Parser)]
#[command(
    name = "fincast",
    version,
    about = "Financial forecasting and scenario planning",
    long_about = "A CLI for generating financial forecasts and scenario plans \
                  from historical metrics. Fits per-category models, applies \
                  optimistic/realistic/pessimistic adjustments, and derives \
                  budgets, KPI targets, risks and planning reports."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a forecast for one category under a scenario
    Forecast(ForecastArgs),
    /// Build a full financial plan across all scenarios
    Plan(PlanArgs),
    /// Build a plan and render its planning report
    Report(ReportArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Minimal,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Forecast(args) => commands::forecast::run_forecast(args),
        Commands::Plan(args) => commands::plan::run_plan(args),
        Commands::Report(args) => commands::plan::run_report(args),
        Commands::Version => {
            println!("fincast {}", env!("CARGO_PKG_VERSION"));
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
