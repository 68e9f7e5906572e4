mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::import_costing::{InsuranceEstimateArgs, LandedCostArgs};
use commands::scenarios::SensitivityArgs;
use output::currency::Grouping;
use output::DisplayOptions;

/// Import landed-cost simulations
#[derive(Parser)]
#[command(
    name = "lcs",
    version,
    about = "Import landed-cost simulations",
    long_about = "Simulates the landed cost of an imported shipment with decimal precision: \
                  FOB-to-local conversion, cascading import taxes, inclusive destination \
                  tax, logistics fees, margin and unit cost."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Currency symbol for table output
    #[arg(long, default_value = "R$", global = true)]
    currency: String,

    /// Thousands/decimal separators for table output
    #[arg(long, default_value = "comma", global = true)]
    grouping: Grouping,

    /// Log pipeline stages to stderr (overrides RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the landed cost of a shipment
    LandedCost(LandedCostArgs),
    /// Reference insurance premium range (0.5%-2% of cargo value)
    InsuranceEstimate(InsuranceEstimateArgs),
    /// Sweep one or two inputs and tabulate a landed-cost metric
    Sensitivity(SensitivityArgs),
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
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::LandedCost(args) => commands::import_costing::run_landed_cost(args),
        Commands::InsuranceEstimate(args) => commands::import_costing::run_insurance_estimate(args),
        Commands::Sensitivity(args) => commands::scenarios::run_sensitivity(args),
        Commands::Version => {
            println!("lcs {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    let display = DisplayOptions {
        currency_symbol: cli.currency,
        grouping: cli.grouping,
    };
    match result.and_then(|value| output::format_output(&cli.output, &value, &display)) {
        Ok(()) => process::exit(0),
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
