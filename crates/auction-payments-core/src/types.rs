use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{de, Deserialize, Deserializer, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Percentages as plain numbers (18 = 18%). Never as fractions.
pub type Percent = Decimal;

const HUNDRED: Decimal = dec!(100);

/// Apply a plain-number percentage to a base amount: `base × pct / 100`.
pub fn percent_of(base: Money, pct: Percent) -> Money {
    base * pct / HUNDRED
}

// ---------------------------------------------------------------------------
// Modes
// ---------------------------------------------------------------------------

/// How a security deposit or EMD is derived for each lot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepositType {
    /// No deposit is collected.
    #[default]
    #[serde(alias = "notApplicable")]
    NotApplicable,
    /// The lot value is a percentage of material value.
    Percentage,
    /// The lot value is a fixed amount.
    #[serde(alias = "lumpSum")]
    Lumpsum,
}

impl DepositType {
    /// Deposit amount for a lot given its material value and the lot's
    /// configured deposit value.
    pub fn resolve(self, material_value: Money, value: Decimal) -> Money {
        match self {
            DepositType::NotApplicable => Decimal::ZERO,
            DepositType::Percentage => percent_of(material_value, value),
            DepositType::Lumpsum => value,
        }
    }

    pub fn applies(self) -> bool {
        !matches!(self, DepositType::NotApplicable)
    }
}

impl std::fmt::Display for DepositType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DepositType::NotApplicable => write!(f, "Not Applicable"),
            DepositType::Percentage => write!(f, "Percentage"),
            DepositType::Lumpsum => write!(f, "Lumpsum"),
        }
    }
}

/// How the platform (MSTC) fee is charged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MstcPaymentType {
    /// Fee is deducted from seller proceeds.
    #[default]
    #[serde(alias = "serviceCharge")]
    ServiceCharge,
    /// Fee is paid by the buyer on top of the lot total.
    #[serde(alias = "transactionFees")]
    TransactionFees,
}

impl std::fmt::Display for MstcPaymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MstcPaymentType::ServiceCharge => write!(f, "Service Charge"),
            MstcPaymentType::TransactionFees => write!(f, "Transaction Fees"),
        }
    }
}

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// One auction lot as entered by the user.
///
/// Missing or `null` numeric fields deserialize as zero. Field names are
/// accepted in snake_case or the front end's camelCase.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lot {
    #[serde(deserialize_with = "null_as_default")]
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub quantity: Decimal,
    /// Bid value per unit.
    #[serde(alias = "bidValue", deserialize_with = "null_as_default")]
    pub bid_value: Money,
    #[serde(alias = "gstPercent", deserialize_with = "null_as_default")]
    pub gst_percent: Percent,
    #[serde(alias = "tcsPercent", deserialize_with = "null_as_default")]
    pub tcs_percent: Percent,
    #[serde(alias = "penaltyPercent", deserialize_with = "null_as_default")]
    pub penalty_percent: Percent,
    /// Percentage or amount, depending on `Config::security_deposit_type`.
    #[serde(alias = "sdValue", deserialize_with = "null_as_default")]
    pub sd_value: Decimal,
    /// Percentage or amount, depending on `Config::emd_type`.
    #[serde(alias = "emdValue", deserialize_with = "null_as_default")]
    pub emd_value: Decimal,
}

/// Session-wide mode flags. Immutable for the duration of a calculation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(alias = "securityDepositType")]
    pub security_deposit_type: DepositType,
    #[serde(alias = "emdType")]
    pub emd_type: DepositType,
    #[serde(alias = "mstcPaymentType")]
    pub mstc_payment_type: MstcPaymentType,
    /// GST on reverse-charge basis: the buyer self-assesses, so the lot
    /// carries no GST.
    #[serde(alias = "gstOnRcm", deserialize_with = "flag")]
    pub gst_on_rcm: bool,
    /// Withhold 2% TDS from the service charge.
    #[serde(alias = "tdsOnSc", deserialize_with = "flag")]
    pub tds_on_sc: bool,
    /// Withhold 0.1% income-tax TDS on material value.
    #[serde(alias = "itTds", deserialize_with = "flag")]
    pub it_tds: bool,
    /// Collect 0.5% TCS on GST on material value.
    #[serde(alias = "tcsOnGst", deserialize_with = "flag")]
    pub tcs_on_gst: bool,
    #[serde(alias = "mstcScPercent", deserialize_with = "null_as_default")]
    pub mstc_sc_percent: Percent,
}

impl Config {
    pub fn is_transaction_fees(&self) -> bool {
        self.mstc_payment_type == MstcPaymentType::TransactionFees
    }
}

// ---------------------------------------------------------------------------
// Serde helpers
// ---------------------------------------------------------------------------

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FlagRepr {
    Bool(bool),
    Int(i64),
}

/// Accepts `true`/`false` as well as the front end's numeric `0`/`1`.
fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<FlagRepr>::deserialize(deserializer)? {
        None | Some(FlagRepr::Int(0)) | Some(FlagRepr::Bool(false)) => Ok(false),
        Some(FlagRepr::Int(1)) | Some(FlagRepr::Bool(true)) => Ok(true),
        Some(FlagRepr::Int(n)) => Err(de::Error::custom(format!(
            "expected a boolean or 0/1 flag, got {n}"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Output envelope
// ---------------------------------------------------------------------------

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
