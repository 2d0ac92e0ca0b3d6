mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;
use tracing_subscriber::EnvFilter;

use commands::lot::LotArgs;
use commands::session::{ReportArgs, SessionArgs};

/// Auction lot payment breakdowns
#[derive(Parser)]
#[command(
    name = "lotpay",
    version,
    about = "Auction lot payment breakdowns",
    long_about = "Computes per-lot and session payment figures for auction lots with decimal \
                  precision: GST, TCS, penalties, security deposit, EMD, MSTC service charge \
                  or transaction fees, TDS, and the seller vs MSTC payment split."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log calculation details to stderr (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate every payment component for a single lot
    Lot(LotArgs),
    /// Seller vs MSTC payment breakdown for each lot in a session
    Breakdown(SessionArgs),
    /// Session totals across all lots
    Summary(SessionArgs),
    /// Breakdown grid with column totals and group subtotals
    Table(SessionArgs),
    /// Full session report (calculations, breakdowns, totals, summary, grid)
    Report(ReportArgs),
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

fn init_logging(verbose: bool) {
    let fallback = if verbose {
        "lotpay=debug,auction_payments_core=debug"
    } else {
        "lotpay=warn,auction_payments_core=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Lot(args) => commands::lot::run_lot(args),
        Commands::Breakdown(args) => commands::session::run_breakdown(args),
        Commands::Summary(args) => commands::session::run_summary(args),
        Commands::Table(args) => commands::session::run_table(args),
        Commands::Report(args) => commands::session::run_report(args),
        Commands::Version => {
            println!("lotpay {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
