//! Seller vs platform (MSTC) payment breakdown.
//!
//! Re-derives the display grouping of a lot's payment from its
//! [`LotCalculation`](crate::lot::LotCalculation):
//! 1. **Seller payment** -- EMD, non-adjustable security deposit and the
//!    balance payment to the seller.
//! 2. **MSTC payment** -- service charge *or* transaction fees (never both),
//!    IT TDS and TCS on GST.
//!
//! The balance payment formula depends on the platform payment mode. In
//! transaction-fees mode the lot total already contains the fee once, so it
//! is added back before the MSTC payment (which contains it again) is
//! subtracted. The formulas are kept in exactly that algebraic form.
//!
//! Also builds [`BreakdownTable`], a layout-free grid model of the breakdown
//! across lots with column totals and group subtotals.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::lot::{calculate_lot, IT_TDS_RATE, TCS_ON_GST_RATE, TDS_ON_SERVICE_CHARGE_RATE};
use crate::types::{Config, Lot, Money, MstcPaymentType};

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Display grouping of one lot's payment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotBreakdown {
    pub lot_name: String,
    pub sd_amount: Money,
    pub emd_amount: Money,
    /// Remainder due to the seller after EMD, SD and MSTC payment.
    pub balance_payment: Money,
    /// Only reported in service-charge mode.
    pub tds_on_service_charge: Money,
    /// EMD + balance payment + SD.
    pub seller_payment_total: Money,
    /// Zero in transaction-fees mode.
    pub service_charge_amount: Money,
    /// Zero in service-charge mode.
    pub transaction_fees_amount: Money,
    pub it_tds_amount: Money,
    pub tcs_on_gst_amount: Money,
    pub mstc_payment_total: Money,
    /// MSTC payment + seller payment.
    pub grand_total: Money,
}

impl LotBreakdown {
    /// The platform fee actually charged under the active mode.
    pub fn platform_fee(&self) -> Money {
        self.service_charge_amount + self.transaction_fees_amount
    }
}

/// Column sums over a set of lot breakdowns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BreakdownTotals {
    pub sd_amount: Money,
    pub emd_amount: Money,
    pub balance_payment: Money,
    pub service_charge_amount: Money,
    pub transaction_fees_amount: Money,
    pub tds_on_service_charge: Money,
    pub it_tds_amount: Money,
    pub tcs_on_gst_amount: Money,
    pub grand_total: Money,
}

/// Which payment category a breakdown column belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnGroup {
    Seller,
    Mstc,
    Total,
}

/// One column of the breakdown grid: a value per lot plus the column total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownColumn {
    /// Stable machine key (e.g. `balance_payment`).
    pub key: String,
    pub label: String,
    pub group: ColumnGroup,
    pub values: Vec<Money>,
    pub total: Money,
}

/// Subtotals shown across each column group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupSubtotals {
    /// SD + EMD + balance payment.
    pub seller: Money,
    /// Platform fee + IT TDS + TCS on GST.
    pub mstc: Money,
    pub grand_total: Money,
}

/// Grid model of the payment breakdown, one row per lot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownTable {
    pub lot_names: Vec<String>,
    pub columns: Vec<BreakdownColumn>,
    pub totals: BreakdownTotals,
    pub subtotals: GroupSubtotals,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Split one lot's payment into seller and MSTC groups.
pub fn calculate_lot_breakdown(lot: &Lot, config: &Config) -> LotBreakdown {
    let calc = calculate_lot(lot, config);

    let emd_amount = calc.emd;
    let sd_amount = calc.sd_amount;

    let (service_charge_amount, transaction_fees_amount) = match config.mstc_payment_type {
        MstcPaymentType::ServiceCharge => (calc.service_charge, Decimal::ZERO),
        MstcPaymentType::TransactionFees => (Decimal::ZERO, calc.service_charge),
    };

    let it_tds_amount = if config.it_tds {
        calc.material_value * IT_TDS_RATE
    } else {
        Decimal::ZERO
    };
    let tcs_on_gst_amount = if config.tcs_on_gst {
        calc.material_value * TCS_ON_GST_RATE
    } else {
        Decimal::ZERO
    };

    let (mstc_payment, balance_payment, tds_on_service_charge) = match config.mstc_payment_type {
        MstcPaymentType::ServiceCharge => {
            // Service charge is already net of TDS
            let mstc_payment = service_charge_amount + it_tds_amount + tcs_on_gst_amount;
            let balance_payment = calc.total - emd_amount - mstc_payment - sd_amount;
            let tds = if config.tds_on_sc {
                calc.service_charge_without_gst * TDS_ON_SERVICE_CHARGE_RATE
            } else {
                Decimal::ZERO
            };
            (mstc_payment, balance_payment, tds)
        }
        MstcPaymentType::TransactionFees => {
            let mstc_payment = transaction_fees_amount + it_tds_amount + tcs_on_gst_amount;
            let balance_payment =
                calc.total - emd_amount - mstc_payment + transaction_fees_amount - sd_amount;
            (mstc_payment, balance_payment, Decimal::ZERO)
        }
    };

    let seller_payment_total = emd_amount + balance_payment + sd_amount;
    let grand_total = mstc_payment + seller_payment_total;

    LotBreakdown {
        lot_name: lot.name.clone(),
        sd_amount,
        emd_amount,
        balance_payment,
        tds_on_service_charge,
        seller_payment_total,
        service_charge_amount,
        transaction_fees_amount,
        it_tds_amount,
        tcs_on_gst_amount,
        mstc_payment_total: mstc_payment,
        grand_total,
    }
}

/// Sum every breakdown column across lots.
pub fn sum_breakdowns(breakdowns: &[LotBreakdown]) -> BreakdownTotals {
    breakdowns
        .iter()
        .fold(BreakdownTotals::default(), |acc, b| BreakdownTotals {
            sd_amount: acc.sd_amount + b.sd_amount,
            emd_amount: acc.emd_amount + b.emd_amount,
            balance_payment: acc.balance_payment + b.balance_payment,
            service_charge_amount: acc.service_charge_amount + b.service_charge_amount,
            transaction_fees_amount: acc.transaction_fees_amount + b.transaction_fees_amount,
            tds_on_service_charge: acc.tds_on_service_charge + b.tds_on_service_charge,
            it_tds_amount: acc.it_tds_amount + b.it_tds_amount,
            tcs_on_gst_amount: acc.tcs_on_gst_amount + b.tcs_on_gst_amount,
            grand_total: acc.grand_total + b.grand_total,
        })
}

/// Build the breakdown grid for a set of lots.
///
/// SD and EMD columns only appear when the corresponding deposit applies.
/// The platform fee column is labelled for the active payment mode.
pub fn build_breakdown_table(lots: &[Lot], config: &Config) -> BreakdownTable {
    let breakdowns: Vec<LotBreakdown> = lots
        .iter()
        .map(|lot| calculate_lot_breakdown(lot, config))
        .collect();
    let totals = sum_breakdowns(&breakdowns);
    let transaction_fees = config.is_transaction_fees();

    let column = |key: &str,
                  label: String,
                  group: ColumnGroup,
                  total: Money,
                  value: fn(&LotBreakdown) -> Money| BreakdownColumn {
        key: key.to_string(),
        label,
        group,
        values: breakdowns.iter().map(value).collect(),
        total,
    };

    let mut columns = Vec::with_capacity(7);
    if config.security_deposit_type.applies() {
        columns.push(column(
            "sd_amount",
            "SD Amount".into(),
            ColumnGroup::Seller,
            totals.sd_amount,
            |b| b.sd_amount,
        ));
    }
    if config.emd_type.applies() {
        columns.push(column(
            "emd_amount",
            "EMD Amount".into(),
            ColumnGroup::Seller,
            totals.emd_amount,
            |b| b.emd_amount,
        ));
    }
    columns.push(column(
        "balance_payment",
        "Balance Payment".into(),
        ColumnGroup::Seller,
        totals.balance_payment,
        |b| b.balance_payment,
    ));

    let platform_fee_total = if transaction_fees {
        totals.transaction_fees_amount
    } else {
        totals.service_charge_amount
    };
    let (fee_key, fee_label) = if transaction_fees {
        ("transaction_fees_amount", "Transaction Fees".to_string())
    } else if config.tds_on_sc {
        (
            "service_charge_amount",
            format!(
                "Service Charge (Excl S/C TDS: {})",
                totals.tds_on_service_charge.normalize()
            ),
        )
    } else {
        ("service_charge_amount", "Service Charge".to_string())
    };
    columns.push(column(
        fee_key,
        fee_label,
        ColumnGroup::Mstc,
        platform_fee_total,
        LotBreakdown::platform_fee,
    ));
    columns.push(column(
        "it_tds_amount",
        "IT TDS".into(),
        ColumnGroup::Mstc,
        totals.it_tds_amount,
        |b| b.it_tds_amount,
    ));
    columns.push(column(
        "tcs_on_gst_amount",
        "TCS on GST".into(),
        ColumnGroup::Mstc,
        totals.tcs_on_gst_amount,
        |b| b.tcs_on_gst_amount,
    ));
    columns.push(column(
        "grand_total",
        "Total Payable".into(),
        ColumnGroup::Total,
        totals.grand_total,
        |b| b.grand_total,
    ));

    let subtotals = GroupSubtotals {
        seller: totals.sd_amount + totals.emd_amount + totals.balance_payment,
        mstc: platform_fee_total + totals.it_tds_amount + totals.tcs_on_gst_amount,
        grand_total: totals.grand_total,
    };

    tracing::debug!(
        lots = lots.len(),
        columns = columns.len(),
        seller = %subtotals.seller,
        mstc = %subtotals.mstc,
        "built breakdown table"
    );

    BreakdownTable {
        lot_names: breakdowns.into_iter().map(|b| b.lot_name).collect(),
        columns,
        totals,
        subtotals,
    }
}
