//! Per-lot payment calculation.
//!
//! Derives every monetary field of a single auction lot from the lot's own
//! inputs and the session [`Config`]: material value, penalty, GST, TCS,
//! security deposit, EMD, platform service charge / transaction fees, the
//! TDS components and the total payable by the buyer.
//!
//! All arithmetic uses `rust_decimal::Decimal` and nothing is rounded;
//! rounding belongs to whoever displays the figures.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::AuctionPaymentError;
use crate::types::{percent_of, Config, DepositType, Lot, Money, MstcPaymentType};
use crate::AuctionPaymentResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// GST loaded onto the platform service charge (18%).
pub const SERVICE_CHARGE_GST_FACTOR: Decimal = dec!(1.18);

/// TDS withheld from the service charge (2% of the pre-GST charge).
pub const TDS_ON_SERVICE_CHARGE_RATE: Decimal = dec!(0.02);

/// Income-tax TDS on material value (0.1%).
pub const IT_TDS_RATE: Decimal = dec!(0.001);

/// TCS on GST on material value (0.5%).
pub const TCS_ON_GST_RATE: Decimal = dec!(0.005);

/// No derived figure (lot, breakdown, summary or grid) weighs any input
/// component more than this many times over.
const MAGNITUDE_HEADROOM: Decimal = dec!(8);

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Every derived monetary field for one lot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LotCalculation {
    pub lot_id: u64,
    pub name: String,
    /// quantity x bid value.
    pub material_value: Money,
    pub penalty: Money,
    /// Zero when GST is on reverse-charge basis.
    pub gst: Money,
    /// TCS on the GST-inclusive value.
    pub tcs: Money,
    /// Total payable by the buyer for this lot.
    pub total: Money,
    pub emd: Money,
    /// Service charge incl. 18% GST, net of TDS.
    pub service_charge: Money,
    pub service_charge_without_gst: Money,
    /// Equal to `service_charge` in transaction-fees mode, zero otherwise.
    pub transaction_fees: Money,
    /// TDS withheld from the service charge.
    pub tds: Money,
    pub tcs_on_gst: Money,
    pub seller_payment: Money,
    pub it_tds: Money,
    /// Platform service charge as booked against the seller.
    pub mstc_sc: Money,
    pub sd_amount: Money,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Calculate all payment components for a single lot.
///
/// Total over its inputs: zero or absent values simply yield zero-valued
/// outputs, and out-of-range percentages are applied as given.
///
/// The only bound is the decimal range (about 7.9e28). Lots for which
/// [`check_magnitude`] fails overflow `Decimal` and panic here, so callers
/// taking untrusted input should run that check first.
pub fn calculate_lot(lot: &Lot, config: &Config) -> LotCalculation {
    let material_value = lot.quantity * lot.bid_value;
    let penalty = percent_of(material_value, lot.penalty_percent);

    // Reverse charge: the buyer self-assesses GST, none is carried here
    let effective_gst_percent = if config.gst_on_rcm {
        Decimal::ZERO
    } else {
        lot.gst_percent
    };
    let gst = percent_of(material_value, effective_gst_percent);
    let tcs = percent_of(material_value + gst, lot.tcs_percent);

    let sd_amount = config
        .security_deposit_type
        .resolve(material_value, lot.sd_value);
    let emd = config.emd_type.resolve(material_value, lot.emd_value);

    // Service charge = base% x material value x 1.18, less TDS on the
    // pre-GST charge
    let service_charge_without_gst = percent_of(material_value, config.mstc_sc_percent);
    let tds = if config.tds_on_sc {
        service_charge_without_gst * TDS_ON_SERVICE_CHARGE_RATE
    } else {
        Decimal::ZERO
    };
    let service_charge_gross = service_charge_without_gst * SERVICE_CHARGE_GST_FACTOR;
    let service_charge = service_charge_gross - tds;

    // Transaction fees reuse the service charge formula; only the category
    // (and who pays it) changes.
    let transaction_fees = match config.mstc_payment_type {
        MstcPaymentType::TransactionFees => service_charge,
        MstcPaymentType::ServiceCharge => Decimal::ZERO,
    };

    // In service-charge mode the charge comes out of seller proceeds and is
    // not part of what the buyer pays.
    let total = material_value + penalty + gst + tcs + sd_amount + transaction_fees;

    let it_tds = if config.it_tds {
        material_value * IT_TDS_RATE
    } else {
        Decimal::ZERO
    };
    let tcs_on_gst = if config.tcs_on_gst {
        material_value * TCS_ON_GST_RATE
    } else {
        Decimal::ZERO
    };

    let seller_payment = material_value + gst + tcs - it_tds - service_charge;

    tracing::trace!(
        lot_id = lot.id,
        %material_value,
        %total,
        %seller_payment,
        "calculated lot"
    );

    LotCalculation {
        lot_id: lot.id,
        name: lot.name.clone(),
        material_value,
        penalty,
        gst,
        tcs,
        total,
        emd,
        service_charge,
        service_charge_without_gst,
        transaction_fees,
        tds,
        tcs_on_gst,
        seller_payment,
        it_tds,
        mstc_sc: service_charge,
        sd_amount,
    }
}

/// Verify that every figure derived from these lots fits the decimal range.
///
/// Replays the lot chain with checked arithmetic and bounds the session
/// aggregates by the summed component magnitudes.
pub fn check_magnitude(lots: &[Lot], config: &Config) -> AuctionPaymentResult<()> {
    let mut session_bound = Decimal::ZERO;
    for (i, lot) in lots.iter().enumerate() {
        let bound =
            lot_magnitude(lot, config).ok_or_else(|| out_of_range(format!("lots[{i}]")))?;
        session_bound = session_bound
            .checked_add(bound)
            .ok_or_else(|| out_of_range("lots".into()))?;
    }
    session_bound
        .checked_mul(MAGNITUDE_HEADROOM)
        .map(|_| ())
        .ok_or_else(|| out_of_range("lots".into()))
}

fn out_of_range(field: String) -> AuctionPaymentError {
    AuctionPaymentError::InvalidInput {
        field,
        reason: "Amounts exceed the supported decimal range".into(),
    }
}

/// Sum of the absolute values of every independent component of a lot, or
/// `None` if any of them overflows.
fn lot_magnitude(lot: &Lot, config: &Config) -> Option<Decimal> {
    let pct = |base: Decimal, rate: Decimal| base.checked_mul(rate)?.checked_div(dec!(100));
    let deposit = |mode: DepositType, base: Decimal, value: Decimal| match mode {
        DepositType::NotApplicable => Some(Decimal::ZERO),
        DepositType::Percentage => pct(base, value),
        DepositType::Lumpsum => Some(value),
    };

    let material_value = lot.quantity.checked_mul(lot.bid_value)?;
    let penalty = pct(material_value, lot.penalty_percent)?;
    let gst = if config.gst_on_rcm {
        Decimal::ZERO
    } else {
        pct(material_value, lot.gst_percent)?
    };
    let tcs = pct(material_value.checked_add(gst)?, lot.tcs_percent)?;
    let sd = deposit(config.security_deposit_type, material_value, lot.sd_value)?;
    let emd = deposit(config.emd_type, material_value, lot.emd_value)?;
    let charge = pct(material_value, config.mstc_sc_percent)?;
    let charge_gross = charge.checked_mul(SERVICE_CHARGE_GST_FACTOR)?;
    let tds = charge.checked_mul(TDS_ON_SERVICE_CHARGE_RATE)?;

    [material_value, penalty, gst, tcs, sd, emd, charge_gross, tds]
        .iter()
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_lot() -> Lot {
        Lot {
            id: 1,
            name: "Lot 1".into(),
            quantity: dec!(10),
            bid_value: dec!(100),
            gst_percent: dec!(18),
            tcs_percent: dec!(1),
            penalty_percent: Decimal::ZERO,
            sd_value: Decimal::ZERO,
            emd_value: Decimal::ZERO,
        }
    }

    fn base_config() -> Config {
        Config {
            security_deposit_type: DepositType::NotApplicable,
            emd_type: DepositType::NotApplicable,
            mstc_payment_type: MstcPaymentType::ServiceCharge,
            gst_on_rcm: false,
            tds_on_sc: false,
            it_tds: false,
            tcs_on_gst: false,
            mstc_sc_percent: dec!(2),
        }
    }

    #[test]
    fn test_service_charge_mode_reference_lot() {
        let calc = calculate_lot(&base_lot(), &base_config());

        assert_eq!(calc.material_value, dec!(1000));
        assert_eq!(calc.gst, dec!(180));
        // (1000 + 180) x 1%
        assert_eq!(calc.tcs, dec!(11.8));
        assert_eq!(calc.total, dec!(1191.8));
        assert_eq!(calc.service_charge_without_gst, dec!(20));
        assert_eq!(calc.service_charge, dec!(23.6));
        assert_eq!(calc.mstc_sc, dec!(23.6));
        assert_eq!(calc.transaction_fees, Decimal::ZERO);
        // 1000 + 180 + 11.8 - 0 - 23.6
        assert_eq!(calc.seller_payment, dec!(1168.2));
        assert_eq!(calc.lot_id, 1);
        assert_eq!(calc.name, "Lot 1");
    }

    #[test]
    fn test_transaction_fees_mode_adds_fee_to_total() {
        let mut cfg = base_config();
        cfg.mstc_payment_type = MstcPaymentType::TransactionFees;
        let calc = calculate_lot(&base_lot(), &cfg);

        assert_eq!(calc.transaction_fees, dec!(23.6));
        assert_eq!(calc.total, dec!(1215.4));
        assert_eq!(calc.seller_payment, dec!(1168.2));
    }

    #[test]
    fn test_it_tds_and_tcs_on_gst() {
        let mut cfg = base_config();
        cfg.it_tds = true;
        cfg.tcs_on_gst = true;
        let calc = calculate_lot(&base_lot(), &cfg);

        assert_eq!(calc.it_tds, dec!(1.0));
        assert_eq!(calc.tcs_on_gst, dec!(5.0));
        // IT TDS comes out of seller payment, TCS on GST does not
        assert_eq!(calc.seller_payment, dec!(1167.2));
        assert_eq!(calc.total, dec!(1191.8));
    }

    #[test]
    fn test_tds_on_service_charge() {
        let mut cfg = base_config();
        cfg.tds_on_sc = true;
        let calc = calculate_lot(&base_lot(), &cfg);

        // 2% of 20
        assert_eq!(calc.tds, dec!(0.4));
        // 23.6 - 0.4
        assert_eq!(calc.service_charge, dec!(23.2));
        assert_eq!(calc.seller_payment, dec!(1168.6));
    }

    #[test]
    fn test_gst_on_rcm_suppresses_gst() {
        let mut cfg = base_config();
        cfg.gst_on_rcm = true;
        let calc = calculate_lot(&base_lot(), &cfg);

        assert_eq!(calc.gst, Decimal::ZERO);
        // TCS now on 1000 only
        assert_eq!(calc.tcs, dec!(10));
        assert_eq!(calc.total, dec!(1010));
    }

    #[test]
    fn test_penalty_added_to_total_not_seller_payment() {
        let mut lot = base_lot();
        lot.penalty_percent = dec!(5);
        let calc = calculate_lot(&lot, &base_config());

        assert_eq!(calc.penalty, dec!(50));
        assert_eq!(calc.total, dec!(1241.8));
        assert_eq!(calc.seller_payment, dec!(1168.2));
    }

    #[test]
    fn test_security_deposit_modes() {
        let mut lot = base_lot();
        lot.sd_value = dec!(10);
        let mut cfg = base_config();

        assert_eq!(calculate_lot(&lot, &cfg).sd_amount, Decimal::ZERO);

        cfg.security_deposit_type = DepositType::Percentage;
        let calc = calculate_lot(&lot, &cfg);
        assert_eq!(calc.sd_amount, dec!(100));
        assert_eq!(calc.total, dec!(1291.8));

        cfg.security_deposit_type = DepositType::Lumpsum;
        assert_eq!(calculate_lot(&lot, &cfg).sd_amount, dec!(10));
    }

    #[test]
    fn test_emd_modes_do_not_change_total() {
        let mut lot = base_lot();
        lot.emd_value = dec!(5);
        let mut cfg = base_config();

        cfg.emd_type = DepositType::Percentage;
        let calc = calculate_lot(&lot, &cfg);
        assert_eq!(calc.emd, dec!(50));
        assert_eq!(calc.total, dec!(1191.8));

        cfg.emd_type = DepositType::Lumpsum;
        assert_eq!(calculate_lot(&lot, &cfg).emd, dec!(5));
    }

    #[test]
    fn test_empty_lot_is_all_zero() {
        let mut cfg = base_config();
        cfg.it_tds = true;
        cfg.tcs_on_gst = true;
        cfg.tds_on_sc = true;
        let calc = calculate_lot(&Lot::default(), &cfg);

        assert_eq!(calc.material_value, Decimal::ZERO);
        assert_eq!(calc.total, Decimal::ZERO);
        assert_eq!(calc.service_charge, Decimal::ZERO);
        assert_eq!(calc.seller_payment, Decimal::ZERO);
    }

    #[test]
    fn test_out_of_range_percentages_computed_as_given() {
        let mut lot = base_lot();
        lot.gst_percent = dec!(150);
        lot.penalty_percent = dec!(-10);
        let calc = calculate_lot(&lot, &base_config());

        assert_eq!(calc.gst, dec!(1500));
        assert_eq!(calc.penalty, dec!(-100));
    }

    #[test]
    fn test_magnitude_check_accepts_realistic_lots() {
        let mut lot = base_lot();
        lot.quantity = dec!(1000000);
        lot.bid_value = dec!(1000000000);
        assert!(check_magnitude(&[lot, base_lot()], &base_config()).is_ok());
        assert!(check_magnitude(&[], &base_config()).is_ok());
    }

    #[test]
    fn test_magnitude_check_rejects_overflowing_material_value() {
        let mut lot = base_lot();
        lot.quantity = dec!(1e15);
        lot.bid_value = dec!(1e15);

        match check_magnitude(&[base_lot(), lot], &base_config()) {
            Err(AuctionPaymentError::InvalidInput { field, .. }) => assert_eq!(field, "lots[1]"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_magnitude_check_rejects_overflowing_percentage() {
        let mut lot = base_lot();
        lot.quantity = dec!(1e13);
        lot.bid_value = dec!(1e13);
        assert!(check_magnitude(std::slice::from_ref(&lot), &base_config()).is_ok());

        lot.gst_percent = dec!(1e6);
        assert!(check_magnitude(&[lot], &base_config()).is_err());
    }

    #[test]
    fn test_magnitude_check_bounds_session_sums() {
        let mut lot = base_lot();
        lot.quantity = dec!(1e14);
        lot.bid_value = dec!(1e13);
        lot.gst_percent = Decimal::ZERO;
        lot.tcs_percent = Decimal::ZERO;
        let cfg = Config {
            mstc_sc_percent: Decimal::ZERO,
            ..base_config()
        };
        assert!(check_magnitude(std::slice::from_ref(&lot), &cfg).is_ok());

        let many = vec![lot; 100];
        match check_magnitude(&many, &cfg) {
            Err(AuctionPaymentError::InvalidInput { field, .. }) => assert_eq!(field, "lots"),
            other => panic!("Expected InvalidInput, got {other:?}"),
        }
    }
}
