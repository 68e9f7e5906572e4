//! Reference range for international cargo insurance.
//!
//! When the actual premium is unknown, the customary estimate is 0.5%-2% of
//! the cargo value (FOB + international freight). The range is reported in
//! both the foreign and the local currency.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LandedCostError;
use crate::import_costing::checked;
use crate::import_costing::tax::apply_ad_valorem;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::LandedCostResult;

/// Lower bound of the customary premium range, in percent of cargo value.
pub const DEFAULT_LOW_PCT: Decimal = dec!(0.5);

/// Upper bound of the customary premium range, in percent of cargo value.
pub const DEFAULT_HIGH_PCT: Decimal = dec!(2.0);

/// Input for the insurance reference estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsuranceEstimateInput {
    /// Total FOB value of the shipment (foreign currency).
    pub fob_total: Money,
    /// International freight (foreign currency).
    pub international_freight: Money,
    /// Foreign-to-local conversion factor.
    pub exchange_rate: Decimal,
    /// Lower premium bound in percent (defaults to 0.5).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_pct: Option<Percent>,
    /// Upper premium bound in percent (defaults to 2.0).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub high_pct: Option<Percent>,
}

/// Premium range in both currencies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsuranceEstimateOutput {
    pub cargo_value_foreign: Money,
    pub cargo_value_local: Money,
    pub low_pct: Percent,
    pub high_pct: Percent,
    pub low_premium_foreign: Money,
    pub mid_premium_foreign: Money,
    pub high_premium_foreign: Money,
    pub low_premium_local: Money,
    pub mid_premium_local: Money,
    pub high_premium_local: Money,
}

/// Estimate a reference insurance premium range for a shipment.
pub fn estimate_insurance(
    input: &InsuranceEstimateInput,
) -> LandedCostResult<ComputationOutput<InsuranceEstimateOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let low_pct = input.low_pct.unwrap_or(DEFAULT_LOW_PCT);
    let high_pct = input.high_pct.unwrap_or(DEFAULT_HIGH_PCT);
    validate_input(input, low_pct, high_pct)?;

    let cargo_value_foreign = checked::sum(
        &[input.fob_total, input.international_freight],
        "cargo value",
    )?;
    if cargo_value_foreign.is_zero() {
        warnings.push("Cargo value is zero; premium range is zero.".into());
    }

    let output = premium_range(cargo_value_foreign, input.exchange_rate, low_pct, high_pct)?;

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Cargo insurance reference range (percent of FOB + freight)",
        &serde_json::json!({
            "cargo_value": "FOB + international freight",
            "low_pct": low_pct.to_string(),
            "high_pct": high_pct.to_string(),
            "mid": "arithmetic mean of low and high",
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Premium range for an already-validated cargo value.
pub(crate) fn premium_range(
    cargo_value_foreign: Money,
    exchange_rate: Decimal,
    low_pct: Percent,
    high_pct: Percent,
) -> LandedCostResult<InsuranceEstimateOutput> {
    let low_premium_foreign = apply_ad_valorem(cargo_value_foreign, low_pct)?;
    let high_premium_foreign = apply_ad_valorem(cargo_value_foreign, high_pct)?;
    // Halved first: the sum then never exceeds the high premium
    let mid_premium_foreign = low_premium_foreign / dec!(2) + high_premium_foreign / dec!(2);
    let to_local = |amount: Money| checked::mul(amount, exchange_rate, "premium (local)");

    Ok(InsuranceEstimateOutput {
        cargo_value_foreign,
        cargo_value_local: to_local(cargo_value_foreign)?,
        low_pct,
        high_pct,
        low_premium_foreign,
        mid_premium_foreign,
        high_premium_foreign,
        low_premium_local: to_local(low_premium_foreign)?,
        mid_premium_local: to_local(mid_premium_foreign)?,
        high_premium_local: to_local(high_premium_foreign)?,
    })
}

fn validate_input(
    input: &InsuranceEstimateInput,
    low_pct: Percent,
    high_pct: Percent,
) -> LandedCostResult<()> {
    if input.fob_total < Decimal::ZERO {
        return Err(LandedCostError::InvalidInput {
            field: "fob_total".into(),
            reason: "FOB total cannot be negative".into(),
        });
    }
    if input.international_freight < Decimal::ZERO {
        return Err(LandedCostError::InvalidInput {
            field: "international_freight".into(),
            reason: "International freight cannot be negative".into(),
        });
    }
    if input.exchange_rate <= Decimal::ZERO {
        return Err(LandedCostError::InvalidInput {
            field: "exchange_rate".into(),
            reason: "Exchange rate must be positive".into(),
        });
    }
    if low_pct < Decimal::ZERO {
        return Err(LandedCostError::InvalidInput {
            field: "low_pct".into(),
            reason: "Premium percentage cannot be negative".into(),
        });
    }
    if high_pct < low_pct {
        return Err(LandedCostError::InvalidInput {
            field: "high_pct".into(),
            reason: "Upper premium bound must be >= lower bound".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_input() -> InsuranceEstimateInput {
        InsuranceEstimateInput {
            fob_total: dec!(20453.40),
            international_freight: dec!(14000),
            exchange_rate: dec!(5.85),
            low_pct: None,
            high_pct: None,
        }
    }

    #[test]
    fn test_default_range() {
        let out = estimate_insurance(&sample_input()).unwrap().result;

        assert_eq!(out.cargo_value_foreign, dec!(34453.40));
        assert_eq!(out.low_pct, dec!(0.5));
        assert_eq!(out.high_pct, dec!(2.0));
        // 34453.40 x 0.5% = 172.267; x 2% = 689.068
        assert_eq!(out.low_premium_foreign, dec!(172.267));
        assert_eq!(out.high_premium_foreign, dec!(689.068));
        assert_eq!(out.mid_premium_foreign, dec!(430.6675));
    }

    #[test]
    fn test_local_conversion() {
        let out = estimate_insurance(&sample_input()).unwrap().result;
        assert_eq!(out.cargo_value_local, dec!(34453.40) * dec!(5.85));
        assert_eq!(out.low_premium_local, out.low_premium_foreign * dec!(5.85));
        assert_eq!(out.high_premium_local, out.high_premium_foreign * dec!(5.85));
    }

    #[test]
    fn test_custom_bounds() {
        let mut input = sample_input();
        input.low_pct = Some(dec!(1));
        input.high_pct = Some(dec!(1));
        let out = estimate_insurance(&input).unwrap().result;
        assert_eq!(out.low_premium_foreign, out.high_premium_foreign);
        assert_eq!(out.mid_premium_foreign, out.low_premium_foreign);
    }

    #[test]
    fn test_zero_cargo_warns() {
        let mut input = sample_input();
        input.fob_total = Decimal::ZERO;
        input.international_freight = Decimal::ZERO;
        let result = estimate_insurance(&input).unwrap();
        assert_eq!(result.result.high_premium_local, Decimal::ZERO);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let mut input = sample_input();
        input.low_pct = Some(dec!(3));
        match estimate_insurance(&input).unwrap_err() {
            LandedCostError::InvalidInput { field, .. } => assert_eq!(field, "high_pct"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_cargo_value_overflow_is_error() {
        let mut input = sample_input();
        input.fob_total = Decimal::MAX;
        match estimate_insurance(&input).unwrap_err() {
            LandedCostError::ArithmeticOverflow { context } => assert_eq!(context, "cargo value"),
            other => panic!("Expected ArithmeticOverflow, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_exchange_rate_rejected() {
        let mut input = sample_input();
        input.exchange_rate = Decimal::ZERO;
        match estimate_insurance(&input).unwrap_err() {
            LandedCostError::InvalidInput { field, .. } => assert_eq!(field, "exchange_rate"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }
}
