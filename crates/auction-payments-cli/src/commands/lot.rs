use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use auction_payments_core::lot;
use auction_payments_core::{Config, DepositType, Lot, MstcPaymentType};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum DepositArg {
    NotApplicable,
    Percentage,
    Lumpsum,
}

impl From<DepositArg> for DepositType {
    fn from(arg: DepositArg) -> Self {
        match arg {
            DepositArg::NotApplicable => DepositType::NotApplicable,
            DepositArg::Percentage => DepositType::Percentage,
            DepositArg::Lumpsum => DepositType::Lumpsum,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PaymentModeArg {
    ServiceCharge,
    TransactionFees,
}

impl From<PaymentModeArg> for MstcPaymentType {
    fn from(arg: PaymentModeArg) -> Self {
        match arg {
            PaymentModeArg::ServiceCharge => MstcPaymentType::ServiceCharge,
            PaymentModeArg::TransactionFees => MstcPaymentType::TransactionFees,
        }
    }
}

/// Session configuration flags
#[derive(Args)]
pub struct ConfigArgs {
    /// How the security deposit is derived
    #[arg(long, value_enum, default_value = "not-applicable")]
    pub sd_type: DepositArg,

    /// How the EMD is derived
    #[arg(long, value_enum, default_value = "not-applicable")]
    pub emd_type: DepositArg,

    /// Platform fee mode
    #[arg(long, value_enum, default_value = "service-charge")]
    pub payment_mode: PaymentModeArg,

    /// GST on reverse-charge basis (lot GST is ignored)
    #[arg(long)]
    pub gst_on_rcm: bool,

    /// Withhold 2% TDS on the service charge
    #[arg(long)]
    pub tds_on_sc: bool,

    /// Apply 0.1% income-tax TDS on material value
    #[arg(long)]
    pub it_tds: bool,

    /// Apply 0.5% TCS on GST on material value
    #[arg(long)]
    pub tcs_on_gst: bool,

    /// MSTC service charge / transaction fee percentage (e.g. 2 for 2%)
    #[arg(long, default_value = "0")]
    pub sc_percent: Decimal,
}

impl From<&ConfigArgs> for Config {
    fn from(args: &ConfigArgs) -> Self {
        Config {
            security_deposit_type: args.sd_type.into(),
            emd_type: args.emd_type.into(),
            mstc_payment_type: args.payment_mode.into(),
            gst_on_rcm: args.gst_on_rcm,
            tds_on_sc: args.tds_on_sc,
            it_tds: args.it_tds,
            tcs_on_gst: args.tcs_on_gst,
            mstc_sc_percent: args.sc_percent,
        }
    }
}

/// Arguments for a single lot calculation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct LotArgs {
    /// Lot name
    #[arg(long, default_value = "Lot 1")]
    pub name: String,

    /// Quantity
    #[arg(long)]
    pub quantity: Option<Decimal>,

    /// Bid value per unit
    #[arg(long, alias = "bid")]
    pub bid_value: Option<Decimal>,

    /// GST percentage (e.g. 18)
    #[arg(long, alias = "gst")]
    pub gst_percent: Option<Decimal>,

    /// TCS percentage
    #[arg(long, alias = "tcs")]
    pub tcs_percent: Option<Decimal>,

    /// Penalty percentage
    #[arg(long, alias = "penalty")]
    pub penalty_percent: Option<Decimal>,

    /// Security deposit percentage or amount (per --sd-type)
    #[arg(long, alias = "sd")]
    pub sd_value: Option<Decimal>,

    /// EMD percentage or amount (per --emd-type)
    #[arg(long, alias = "emd")]
    pub emd_value: Option<Decimal>,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Path to JSON/YAML file with `lot` and `config` (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

#[derive(Deserialize)]
struct LotInput {
    lot: Lot,
    #[serde(default)]
    config: Config,
}

pub fn run_lot(args: LotArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let lot_input: LotInput = if let Some(ref path) = args.input {
        input::file::read_file(path)?
    } else if let Some(lot_input) = input::stdin::read_stdin()? {
        lot_input
    } else {
        LotInput {
            lot: Lot {
                id: 1,
                name: args.name,
                quantity: args
                    .quantity
                    .ok_or("--quantity is required (or provide --input)")?,
                bid_value: args
                    .bid_value
                    .ok_or("--bid-value is required (or provide --input)")?,
                gst_percent: args.gst_percent.unwrap_or(Decimal::ZERO),
                tcs_percent: args.tcs_percent.unwrap_or(Decimal::ZERO),
                penalty_percent: args.penalty_percent.unwrap_or(Decimal::ZERO),
                sd_value: args.sd_value.unwrap_or(Decimal::ZERO),
                emd_value: args.emd_value.unwrap_or(Decimal::ZERO),
            },
            config: Config::from(&args.config),
        }
    };

    lot::check_magnitude(std::slice::from_ref(&lot_input.lot), &lot_input.config)?;
    let result = lot::calculate_lot(&lot_input.lot, &lot_input.config);
    Ok(serde_json::to_value(result)?)
}
