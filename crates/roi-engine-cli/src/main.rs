mod commands;
mod config;
mod input;
mod output;
mod telemetry;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::analysis::{AnalyzeArgs, BreakEvenArgs, ProjectionArgs, SensitivityArgs};
use commands::compare::CompareArgs;

/// Property investment ROI analysis
#[derive(Parser)]
#[command(
    name = "roi",
    version,
    about = "Property investment ROI analysis",
    long_about = "A CLI for buy-to-let investment analysis with decimal precision. \
                  Computes financing, yields, cash flow, multi-year projections with \
                  exit economics, sensitivity tables and break-even levels."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// YAML or JSON file overriding system assumptions (closing costs, selling fee, bands)
    #[arg(long, global = true)]
    assumptions: Option<String>,

    /// Log filter when RUST_LOG is unset (e.g. "debug", "roi_engine_core=debug")
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Full ROI analysis: financing, costs, income, ratios, projection, sensitivity, break-even
    Analyze(AnalyzeArgs),
    /// Year-by-year projection over the holding period
    Projection(ProjectionArgs),
    /// Cash-flow sensitivity to rent, vacancy and interest rate
    Sensitivity(SensitivityArgs),
    /// Break-even occupancy and rent
    BreakEven(BreakEvenArgs),
    /// Compare several properties side by side
    Compare(CompareArgs),
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

fn main() {
    let cli = Cli::parse();

    if let Err(e) = telemetry::init(&cli.log_level) {
        eprintln!("{}: {}", "error".red().bold(), e);
        process::exit(1);
    }

    let assumptions = match config::load_assumptions(cli.assumptions.as_deref()) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Analyze(args) => commands::analysis::run_analyze(args, &assumptions),
        Commands::Projection(args) => commands::analysis::run_projection(args, &assumptions),
        Commands::Sensitivity(args) => commands::analysis::run_sensitivity(args, &assumptions),
        Commands::BreakEven(args) => commands::analysis::run_break_even(args, &assumptions),
        Commands::Compare(args) => commands::compare::run_compare(args, &assumptions),
        Commands::Version => {
            println!("roi {}", env!("CARGO_PKG_VERSION"));
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
