//! Portfolio-level aggregation across lots.
//!
//! Plain decimal addition in input order; lots never depend on each other.

use serde::{Deserialize, Serialize};

use crate::lot::{calculate_lot, LotCalculation};
use crate::types::{Config, Lot, Money};

/// Aggregate payment figures for all lots in a session.
///
/// The `balance_*` fields are the post-EMD figures, i.e. what remains to be
/// paid once the earnest money already deposited is credited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total_emd: Money,
    /// Total payment less EMD.
    pub total_balance: Money,
    pub total_mstc_sc: Money,
    pub total_tcs_on_gst: Money,
    pub total_it_tds: Money,
    pub total_seller_payment: Money,
    /// Sum of lot totals.
    pub total_payment: Money,
    pub mstc_payment: Money,
    pub balance_seller_payment: Money,
    pub balance_mstc_sc: Money,
    pub balance_tcs_on_gst: Money,
    pub balance_it_tds: Money,
    pub balance_total: Money,
    pub total_sd_amount: Money,
    /// Total payment + MSTC service charge + SD.
    pub grand_total: Money,
}

/// Column totals of the lot entry table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LotTotals {
    pub material_value: Money,
    pub gst: Money,
    pub tcs: Money,
    pub penalty: Money,
    pub transaction_fees: Money,
    pub sd_amount: Money,
    pub total: Money,
}

/// Fold every lot's calculation into session totals.
pub fn calculate_summary(lots: &[Lot], config: &Config) -> Summary {
    let calculations: Vec<LotCalculation> =
        lots.iter().map(|lot| calculate_lot(lot, config)).collect();
    summarize_calculations(&calculations)
}

/// Same as [`calculate_summary`] for lots that have already been calculated.
pub fn summarize_calculations(calculations: &[LotCalculation]) -> Summary {
    let mut total_emd = Money::ZERO;
    let mut total_mstc_sc = Money::ZERO;
    let mut total_tcs_on_gst = Money::ZERO;
    let mut total_it_tds = Money::ZERO;
    let mut total_seller_payment = Money::ZERO;
    let mut total_payment = Money::ZERO;
    let mut total_sd_amount = Money::ZERO;

    for calc in calculations {
        total_emd += calc.emd;
        total_mstc_sc += calc.mstc_sc;
        total_tcs_on_gst += calc.tcs_on_gst;
        total_it_tds += calc.it_tds;
        total_seller_payment += calc.seller_payment;
        total_payment += calc.total;
        total_sd_amount += calc.sd_amount;
    }

    let total_balance = total_payment - total_emd;
    let grand_total = total_payment + total_mstc_sc + total_sd_amount;

    tracing::debug!(
        lots = calculations.len(),
        %total_payment,
        %grand_total,
        "summarized lots"
    );

    Summary {
        total_emd,
        total_balance,
        total_mstc_sc,
        total_tcs_on_gst,
        total_it_tds,
        total_seller_payment,
        total_payment,
        mstc_payment: total_mstc_sc,
        balance_seller_payment: total_seller_payment - total_emd,
        balance_mstc_sc: total_mstc_sc,
        balance_tcs_on_gst: total_tcs_on_gst,
        balance_it_tds: total_it_tds,
        balance_total: total_balance + total_mstc_sc,
        total_sd_amount,
        grand_total,
    }
}

/// Sum the lot table columns.
pub fn calculate_lot_totals(calculations: &[LotCalculation]) -> LotTotals {
    calculations
        .iter()
        .fold(LotTotals::default(), |acc, calc| LotTotals {
            material_value: acc.material_value + calc.material_value,
            gst: acc.gst + calc.gst,
            tcs: acc.tcs + calc.tcs,
            penalty: acc.penalty + calc.penalty,
            transaction_fees: acc.transaction_fees + calc.transaction_fees,
            sd_amount: acc.sd_amount + calc.sd_amount,
            total: acc.total + calc.total,
        })
}
