mod commands;
mod input;
mod output;
mod telemetry;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use purchase_power_core::PurchasePowerError;
use std::process;

use commands::calculate::CalculateArgs;
use commands::lending::{CreditLoanArgs, DsrArgs};
use commands::regions::RegionsArgs;
use commands::tax::TaxArgs;

/// Home purchase-power calculations for first-time buyers in Korea
#[derive(Parser)]
#[command(
    name = "hpp",
    version,
    about = "Home purchase-power calculations for first-time buyers",
    long_about = "Estimates how much home a household can buy under Korean lending \
                  regulation: acquisition tax, LTV / DSR / regional mortgage caps, \
                  unsecured credit loans and government loan eligibility. All amounts \
                  are in 만원 with decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Policy override file (JSON or YAML); defaults to the built-in rules
    #[arg(long, global = true)]
    policy: Option<String>,

    /// Log filter for stderr output; RUST_LOG takes precedence
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full purchase-power calculation
    Calculate(CalculateArgs),
    /// Acquisition tax and registration fee at a price
    AcquisitionTax(TaxArgs),
    /// Maximum loan under the DSR ceiling
    Dsr(DsrArgs),
    /// Unsecured credit-loan limit for one borrower
    CreditLoan(CreditLoanArgs),
    /// Compare reachable prices across regions for a cash budget
    Regions(RegionsArgs),
    /// Print the policy in force
    Policy,
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Yaml,
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

    let result = commands::load_policy(cli.policy.as_deref()).and_then(|policy| match cli.command {
        Commands::Calculate(args) => commands::calculate::run_calculate(args, &policy),
        Commands::AcquisitionTax(args) => commands::tax::run_tax(args, &policy),
        Commands::Dsr(args) => commands::lending::run_dsr(args, &policy),
        Commands::CreditLoan(args) => commands::lending::run_credit_loan(args, &policy),
        Commands::Regions(args) => commands::regions::run_regions(args, &policy),
        Commands::Policy => commands::policy::run_policy(&policy),
        Commands::Version => {
            println!("hpp {}", env!("CARGO_PKG_VERSION"));
            process::exit(0);
        }
    });

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(exit_code(e.as_ref()));
        }
    }
}

/// 2 for input the caller can fix, 1 for everything else.
fn exit_code(err: &(dyn std::error::Error + 'static)) -> i32 {
    match err.downcast_ref::<PurchasePowerError>() {
        Some(e) if e.is_caller_error() => 2,
        Some(_) => 1,
        None if err.is::<serde_json::Error>() => 2,
        None => 1,
    }
}
