//! Session report: every lot calculation, breakdown, lot-table totals, the
//! portfolio summary and the breakdown grid, wrapped in the standard
//! computation envelope.
//!
//! Input is never rejected by default. Suspicious values (negative
//! quantities, percentages outside 0-100, ...) are computed as given and
//! surfaced as warnings. With `strict` set they become
//! [`AuctionPaymentError::InvalidInput`] instead. Amounts beyond the decimal
//! range are always rejected.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Instant;

use crate::breakdown::{
    build_breakdown_table, calculate_lot_breakdown, BreakdownTable, LotBreakdown,
};
use crate::error::AuctionPaymentError;
use crate::lot::{calculate_lot, check_magnitude, LotCalculation};
use crate::summary::{calculate_lot_totals, summarize_calculations, LotTotals, Summary};
use crate::types::{with_metadata, ComputationOutput, Config, DepositType, Lot};
use crate::AuctionPaymentResult;

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

/// A full calculation session: one config applied to every lot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentSessionInput {
    #[serde(default)]
    pub config: Config,
    #[serde(default)]
    pub lots: Vec<Lot>,
    /// Reject questionable input instead of warning about it.
    #[serde(default)]
    pub strict: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentReport {
    pub calculations: Vec<LotCalculation>,
    pub breakdowns: Vec<LotBreakdown>,
    pub lot_totals: LotTotals,
    pub summary: Summary,
    pub table: BreakdownTable,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the complete payment report for a session.
pub fn compute_payment_report(
    input: &PaymentSessionInput,
) -> AuctionPaymentResult<ComputationOutput<PaymentReport>> {
    let start = Instant::now();

    check_magnitude(&input.lots, &input.config)?;

    let findings = check_input(input);
    if input.strict {
        if let Some(finding) = findings.iter().find(|f| f.rejectable) {
            return Err(AuctionPaymentError::InvalidInput {
                field: finding.field.clone(),
                reason: finding.reason.clone(),
            });
        }
    }
    let warnings: Vec<String> = findings
        .into_iter()
        .map(|f| format!("{}: {}", f.field, f.reason))
        .collect();

    let config = &input.config;
    let calculations: Vec<LotCalculation> = input
        .lots
        .iter()
        .map(|lot| calculate_lot(lot, config))
        .collect();
    let breakdowns: Vec<LotBreakdown> = input
        .lots
        .iter()
        .map(|lot| calculate_lot_breakdown(lot, config))
        .collect();
    let lot_totals = calculate_lot_totals(&calculations);
    let summary = summarize_calculations(&calculations);
    let table = build_breakdown_table(&input.lots, config);

    let output = PaymentReport {
        calculations,
        breakdowns,
        lot_totals,
        summary,
        table,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    tracing::debug!(
        lots = input.lots.len(),
        warnings = warnings.len(),
        elapsed_us = elapsed,
        "computed payment report"
    );

    Ok(with_metadata(
        "Auction lot payment breakdown — seller vs MSTC split",
        &serde_json::json!({
            "mstc_payment_type": config.mstc_payment_type.to_string(),
            "security_deposit_type": config.security_deposit_type.to_string(),
            "emd_type": config.emd_type.to_string(),
            "gst_on_rcm": config.gst_on_rcm,
            "mstc_sc_percent": config.mstc_sc_percent.to_string(),
            "service_charge_gst": "18%",
            "tds_on_service_charge": applied(config.tds_on_sc, "2% of pre-GST service charge"),
            "it_tds": applied(config.it_tds, "0.1% of material value"),
            "tcs_on_gst": applied(config.tcs_on_gst, "0.5% of material value"),
            "rounding": "none",
        }),
        warnings,
        elapsed,
        output,
    ))
}

fn applied(enabled: bool, rate: &'static str) -> &'static str {
    if enabled {
        rate
    } else {
        "not applied"
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

struct Finding {
    field: String,
    reason: String,
    /// Whether strict mode turns this finding into an error.
    rejectable: bool,
}

impl Finding {
    fn reject(field: String, reason: impl Into<String>) -> Self {
        Finding {
            field,
            reason: reason.into(),
            rejectable: true,
        }
    }

    fn note(field: String, reason: impl Into<String>) -> Self {
        Finding {
            field,
            reason: reason.into(),
            rejectable: false,
        }
    }
}

fn check_input(input: &PaymentSessionInput) -> Vec<Finding> {
    let mut findings = Vec::new();

    if input.config.mstc_sc_percent < Decimal::ZERO {
        findings.push(Finding::reject(
            "config.mstc_sc_percent".into(),
            "Service charge percentage is negative",
        ));
    }
    if input.lots.is_empty() {
        findings.push(Finding::note("lots".into(), "No lots supplied; all totals are zero"));
    }

    let mut seen = HashSet::new();
    for (i, lot) in input.lots.iter().enumerate() {
        check_lot(i, lot, &input.config, &mut findings);
        if !seen.insert(lot.id) {
            findings.push(Finding::reject(
                format!("lots[{i}].id"),
                format!("Duplicate lot id {}", lot.id),
            ));
        }
    }

    findings
}

fn check_lot(index: usize, lot: &Lot, config: &Config, findings: &mut Vec<Finding>) {
    let field = |name: &str| format!("lots[{index}].{name}");

    if lot.quantity < Decimal::ZERO {
        findings.push(Finding::reject(field("quantity"), "Quantity is negative"));
    }
    if lot.bid_value < Decimal::ZERO {
        findings.push(Finding::reject(field("bid_value"), "Bid value is negative"));
    }

    for (name, pct) in [
        ("gst_percent", lot.gst_percent),
        ("tcs_percent", lot.tcs_percent),
        ("penalty_percent", lot.penalty_percent),
    ] {
        if !is_plain_percent(pct) {
            findings.push(Finding::reject(
                field(name),
                format!("Percentage {pct} is outside 0-100"),
            ));
        }
    }

    for (name, value, mode) in [
        ("sd_value", lot.sd_value, config.security_deposit_type),
        ("emd_value", lot.emd_value, config.emd_type),
    ] {
        if value < Decimal::ZERO {
            findings.push(Finding::reject(field(name), "Deposit value is negative"));
        } else if mode == DepositType::Percentage && value > dec!(100) {
            findings.push(Finding::reject(
                field(name),
                format!("Deposit percentage {value} exceeds 100"),
            ));
        }
    }

    if config.gst_on_rcm && !lot.gst_percent.is_zero() {
        findings.push(Finding::note(
            field("gst_percent"),
            "GST is on reverse-charge basis; lot GST percentage is ignored",
        ));
    }
}

fn is_plain_percent(pct: Decimal) -> bool {
    pct >= Decimal::ZERO && pct <= dec!(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MstcPaymentType;

    fn session() -> PaymentSessionInput {
        PaymentSessionInput {
            config: Config {
                security_deposit_type: DepositType::Percentage,
                emd_type: DepositType::Lumpsum,
                mstc_payment_type: MstcPaymentType::ServiceCharge,
                gst_on_rcm: false,
                tds_on_sc: true,
                it_tds: true,
                tcs_on_gst: false,
                mstc_sc_percent: dec!(2),
            },
            lots: vec![
                Lot {
                    id: 1,
                    name: "Lot A".into(),
                    quantity: dec!(10),
                    bid_value: dec!(100),
                    gst_percent: dec!(18),
                    tcs_percent: dec!(1),
                    penalty_percent: Decimal::ZERO,
                    sd_value: dec!(5),
                    emd_value: dec!(100),
                },
                Lot {
                    id: 2,
                    name: "Lot B".into(),
                    quantity: dec!(2),
                    bid_value: dec!(750),
                    gst_percent: dec!(12),
                    tcs_percent: Decimal::ZERO,
                    penalty_percent: dec!(1),
                    sd_value: dec!(5),
                    emd_value: dec!(50),
                },
            ],
            strict: false,
        }
    }

    #[test]
    fn test_report_contains_every_view() {
        let out = compute_payment_report(&session()).unwrap();
        let report = &out.result;

        assert_eq!(report.calculations.len(), 2);
        assert_eq!(report.breakdowns.len(), 2);
        assert_eq!(report.table.lot_names, vec!["Lot A", "Lot B"]);
        assert_eq!(
            report.summary.total_payment,
            report.calculations.iter().map(|c| c.total).sum::<Decimal>()
        );
        assert_eq!(report.lot_totals.total, report.summary.total_payment);
        assert!(out.warnings.is_empty());
    }

    #[test]
    fn test_metadata_populated() {
        let out = compute_payment_report(&session()).unwrap();

        assert!(out.methodology.contains("Auction lot payment"));
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
        assert!(!out.metadata.version.is_empty());
        assert_eq!(out.assumptions["mstc_payment_type"], "Service Charge");
        assert_eq!(out.assumptions["rounding"], "none");
    }

    #[test]
    fn test_questionable_input_warns_but_computes() {
        let mut input = session();
        input.lots[0].quantity = dec!(-1);
        input.lots[1].gst_percent = dec!(120);
        input.lots[1].id = 1;

        let out = compute_payment_report(&input).unwrap();
        assert!(out.warnings.iter().any(|w| w.starts_with("lots[0].quantity")));
        assert!(out.warnings.iter().any(|w| w.starts_with("lots[1].gst_percent")));
        assert!(out.warnings.iter().any(|w| w.contains("Duplicate lot id 1")));
        assert_eq!(out.result.calculations[0].material_value, dec!(-100));
        // 1500 x 120%
        assert_eq!(out.result.calculations[1].gst, dec!(1800));
    }

    #[test]
    fn test_strict_mode_rejects_first_problem() {
        let mut input = session();
        input.strict = true;
        input.lots[1].bid_value = dec!(-5);

        match compute_payment_report(&input) {
            Err(AuctionPaymentError::InvalidInput { field, reason }) => {
                assert_eq!(field, "lots[1].bid_value");
                assert!(reason.contains("negative"));
            }
            other => panic!("Expected InvalidInput, got {:?}", other.map(|o| o.warnings)),
        }
    }

    #[test]
    fn test_strict_mode_tolerates_notes() {
        let mut input = session();
        input.strict = true;
        input.config.gst_on_rcm = true;

        let out = compute_payment_report(&input).unwrap();
        assert_eq!(out.warnings.len(), 2);
        assert!(out.result.calculations.iter().all(|c| c.gst.is_zero()));

        input.lots.clear();
        let out = compute_payment_report(&input).unwrap();
        assert_eq!(out.warnings, vec!["lots: No lots supplied; all totals are zero"]);
        assert_eq!(out.result.summary, Summary::default());
    }

    #[test]
    fn test_deposit_percentage_over_hundred() {
        let mut input = session();
        input.lots[0].sd_value = dec!(150);

        let out = compute_payment_report(&input).unwrap();
        assert!(out
            .warnings
            .iter()
            .any(|w| w.starts_with("lots[0].sd_value") && w.contains("exceeds 100")));

        input.strict = true;
        assert!(compute_payment_report(&input).is_err());
    }

    #[test]
    fn test_negative_service_charge_percent() {
        let mut input = session();
        input.config.mstc_sc_percent = dec!(-2);

        let out = compute_payment_report(&input).unwrap();
        assert!(out
            .warnings
            .iter()
            .any(|w| w.starts_with("config.mstc_sc_percent") && w.contains("negative")));
        assert_eq!(out.result.calculations[0].service_charge_without_gst, dec!(-20));

        input.strict = true;
        match compute_payment_report(&input) {
            Err(AuctionPaymentError::InvalidInput { field, .. }) => {
                assert_eq!(field, "config.mstc_sc_percent");
            }
            other => panic!("Expected InvalidInput, got {:?}", other.map(|o| o.warnings)),
        }
    }

    #[test]
    fn test_negative_deposit_values() {
        let mut input = session();
        input.lots[1].emd_value = dec!(-50);
        input.lots[0].sd_value = dec!(-1);

        let out = compute_payment_report(&input).unwrap();
        assert!(out
            .warnings
            .iter()
            .any(|w| w == "lots[1].emd_value: Deposit value is negative"));
        assert!(out
            .warnings
            .iter()
            .any(|w| w == "lots[0].sd_value: Deposit value is negative"));
        assert_eq!(out.result.calculations[1].emd, dec!(-50));

        input.lots[0].sd_value = dec!(5);
        input.strict = true;
        match compute_payment_report(&input) {
            Err(AuctionPaymentError::InvalidInput { field, reason }) => {
                assert_eq!(field, "lots[1].emd_value");
                assert_eq!(reason, "Deposit value is negative");
            }
            other => panic!("Expected InvalidInput, got {:?}", other.map(|o| o.warnings)),
        }
    }

    #[test]
    fn test_every_lot_percentage_is_range_checked() {
        let mut input = session();
        input.lots[0].tcs_percent = dec!(-1);
        input.lots[1].penalty_percent = dec!(101);

        let out = compute_payment_report(&input).unwrap();
        assert!(out.warnings.iter().any(|w| w.starts_with("lots[0].tcs_percent")));
        assert!(out
            .warnings
            .iter()
            .any(|w| w.starts_with("lots[1].penalty_percent") && w.contains("outside 0-100")));

        input.strict = true;
        match compute_payment_report(&input) {
            Err(AuctionPaymentError::InvalidInput { field, .. }) => {
                assert_eq!(field, "lots[0].tcs_percent");
            }
            other => panic!("Expected InvalidInput, got {:?}", other.map(|o| o.warnings)),
        }
    }

    #[test]
    fn test_overflowing_amounts_rejected_without_strict() {
        let mut input = session();
        input.lots[1].quantity = dec!(1e15);
        input.lots[1].bid_value = dec!(1e15);
        assert!(!input.strict);

        match compute_payment_report(&input) {
            Err(AuctionPaymentError::InvalidInput { field, reason }) => {
                assert_eq!(field, "lots[1]");
                assert!(reason.contains("decimal range"));
            }
            other => panic!("Expected InvalidInput, got {:?}", other.map(|o| o.warnings)),
        }
    }

    #[test]
    fn test_session_deserializes_camel_case_front_end_keys() {
        let json = r#"{
            "config": { "mstcPaymentType": "transactionFees", "mstcScPercent": 2, "gstOnRcm": 1 },
            "lots": [ { "quantity": 10, "bidValue": 100, "gstPercent": 18 } ]
        }"#;
        let input: PaymentSessionInput = serde_json::from_str(json).unwrap();
        assert!(input.config.is_transaction_fees());
        assert_eq!(input.config.mstc_sc_percent, dec!(2));

        let out = compute_payment_report(&input).unwrap();
        let calc = &out.result.calculations[0];
        assert_eq!(calc.material_value, dec!(1000));
        // RCM: the 18% is ignored
        assert_eq!(calc.gst, Decimal::ZERO);
        assert_eq!(calc.transaction_fees, dec!(23.6));
        assert!(out.warnings.iter().any(|w| w.starts_with("lots[0].gst_percent")));
    }

    #[test]
    fn test_session_deserializes_front_end_shape() {
        let json = r#"{
            "config": {
                "security_deposit_type": "notApplicable",
                "emd_type": "percentage",
                "mstc_payment_type": "transactionFees",
                "gst_on_rcm": 0, "tds_on_sc": 1, "it_tds": 0, "tcs_on_gst": 1,
                "mstc_sc_percent": 2
            },
            "lots": [
                { "id": 1, "name": "Lot 1", "quantity": 10, "bid_value": 100,
                  "gst_percent": 18, "tcs_percent": 1, "emd_value": 10 }
            ]
        }"#;
        let input: PaymentSessionInput = serde_json::from_str(json).unwrap();
        assert!(!input.strict);

        let out = compute_payment_report(&input).unwrap();
        let calc = &out.result.calculations[0];
        assert_eq!(calc.emd, dec!(100));
        // (23.6 - 0.4) added on top
        assert_eq!(calc.transaction_fees, dec!(23.2));
        assert_eq!(calc.total, dec!(1215.0));
        assert_eq!(calc.tcs_on_gst, dec!(5));
    }
}
