use clap::Args;
use serde_json::Value;

use auction_payments_core::breakdown::{self, LotBreakdown};
use auction_payments_core::report;
use auction_payments_core::summary;

use crate::input;

/// Arguments for commands operating on a whole session
#[derive(Args)]
pub struct SessionArgs {
    /// Path to JSON/YAML session file with `config` and `lots`
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the full session report
#[derive(Args)]
pub struct ReportArgs {
    /// Path to JSON/YAML session file with `config` and `lots`
    #[arg(long)]
    pub input: Option<String>,

    /// Reject questionable input instead of warning about it
    #[arg(long)]
    pub strict: bool,
}

pub fn run_breakdown(args: SessionArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let session = input::load_session(args.input.as_deref(), "breakdown")?;
    let result: Vec<LotBreakdown> = session
        .lots
        .iter()
        .map(|lot| breakdown::calculate_lot_breakdown(lot, &session.config))
        .collect();
    Ok(serde_json::to_value(result)?)
}

pub fn run_summary(args: SessionArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let session = input::load_session(args.input.as_deref(), "summary")?;
    let result = summary::calculate_summary(&session.lots, &session.config);
    Ok(serde_json::to_value(result)?)
}

pub fn run_table(args: SessionArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let session = input::load_session(args.input.as_deref(), "table")?;
    let result = breakdown::build_breakdown_table(&session.lots, &session.config);
    Ok(serde_json::to_value(result)?)
}

pub fn run_report(args: ReportArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut session = input::load_session(args.input.as_deref(), "report")?;
    session.strict |= args.strict;
    let result = report::compute_payment_report(&session)?;
    Ok(serde_json::to_value(result)?)
}
