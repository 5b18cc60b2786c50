mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::loan::{ScheduleArgs, SplitArgs, SummaryArgs};

/// Fixed-rate loan amortization
#[derive(Parser)]
#[command(
    name = "mortgage",
    version,
    about = "Fixed-rate loan amortization schedules and summary statistics",
    long_about = "A CLI for computing fixed-rate, fully amortizing loan schedules with \
                  decimal precision. Reports the level payment, APR, APY, total interest, \
                  and any installment's principal/interest split."
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
    /// Summary statistics: payment, APR, APY, totals, years to pay
    Summary(SummaryArgs),
    /// Full amortization schedule, or one installment with --payment
    Schedule(ScheduleArgs),
    /// Split an arbitrary payment amount into interest and principal
    Split(SplitArgs),
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
    env_logger::init();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Summary(args) => commands::loan::run_summary(args),
        Commands::Schedule(args) => commands::loan::run_schedule(args),
        Commands::Split(args) => commands::loan::run_split(args),
        Commands::Version => {
            println!("mortgage {}", env!("CARGO_PKG_VERSION"));
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
