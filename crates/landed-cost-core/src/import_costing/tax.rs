//! The two tax philosophies used by the import cascade.
//!
//! * **Exclusive (ad-valorem)** -- tax = base x rate. The base never contains
//!   the tax itself. Used for import duty, excise and the social
//!   contributions.
//! * **Inclusive** -- the legal base already contains the tax, so the base is
//!   found by solving `base = pretax_sum + base x rate`, i.e.
//!   `base = pretax_sum / (1 - rate)`. Used for the destination indirect tax.
//!
//! Rates cross this boundary in percent units (18 = 18%).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::LandedCostError;
use crate::import_costing::checked;
use crate::types::{Money, Percent, Rate};
use crate::LandedCostResult;

/// Percent-to-decimal divisor.
pub const HUNDRED: Decimal = dec!(100);

/// Convert a percent-unit rate (18) to a decimal rate (0.18).
pub fn pct_to_rate(pct: Percent) -> Rate {
    pct / HUNDRED
}

/// Result of solving an inclusive-rate tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InclusiveTaxSolution {
    /// Tax-inclusive base: `pretax_sum / (1 - rate)`.
    pub base: Money,
    /// Tax amount: `base x rate`.
    pub tax: Money,
}

/// Exclusive ad-valorem tax: `base x rate_pct / 100`.
pub fn apply_ad_valorem(base: Money, rate_pct: Percent) -> LandedCostResult<Money> {
    checked::mul(base, pct_to_rate(rate_pct), "ad-valorem tax")
}

/// Solve an inclusive-rate tax for its base and amount.
///
/// `rate_pct` must lie in `[0, 100)`. At exactly 100 the denominator
/// vanishes; above 100 the base would turn negative.
pub fn solve_inclusive_tax(
    pretax_sum: Money,
    rate_pct: Percent,
) -> LandedCostResult<InclusiveTaxSolution> {
    if rate_pct < Decimal::ZERO {
        return Err(LandedCostError::InvalidInput {
            field: "rate_pct".into(),
            reason: "Inclusive tax rate cannot be negative".into(),
        });
    }
    if rate_pct > HUNDRED {
        return Err(LandedCostError::InvalidInput {
            field: "rate_pct".into(),
            reason: "Inclusive tax rate must be below 100%".into(),
        });
    }

    let rate = pct_to_rate(rate_pct);
    let denominator = Decimal::ONE - rate;
    if denominator.is_zero() {
        return Err(LandedCostError::DivisionByZero {
            context: "inclusive tax base (rate = 100%)".into(),
        });
    }

    let base = checked::div(pretax_sum, denominator, "inclusive tax base")?;
    Ok(InclusiveTaxSolution {
        base,
        tax: checked::mul(base, rate, "inclusive tax")?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_ad_valorem_simple() {
        assert_eq!(apply_ad_valorem(dec!(1000), dec!(18)).unwrap(), dec!(180));
        assert_eq!(apply_ad_valorem(dec!(1000), dec!(7.8)).unwrap(), dec!(78));
    }

    #[test]
    fn test_ad_valorem_zero_rate() {
        assert_eq!(
            apply_ad_valorem(dec!(12345.67), Decimal::ZERO).unwrap(),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_inclusive_tax_known_value() {
        // 820 / (1 - 0.18) = 1000; tax = 180
        let sol = solve_inclusive_tax(dec!(820), dec!(18)).unwrap();
        assert_eq!(sol.base, dec!(1000));
        assert_eq!(sol.tax, dec!(180));
    }

    #[test]
    fn test_inclusive_tax_identity() {
        let pretax = dec!(324858.9296812330);
        for pct in [dec!(17), dec!(18), dec!(19), dec!(20), dec!(21), dec!(22)] {
            let sol = solve_inclusive_tax(pretax, pct).unwrap();
            let diff = (sol.base - sol.tax - pretax).abs();
            assert!(
                diff < dec!(0.0000001),
                "base - tax should equal pretax at {}%, diff {}",
                pct,
                diff
            );
        }
    }

    #[test]
    fn test_inclusive_tax_exceeds_exclusive() {
        // Inclusive 18% on 820 gives 180; exclusive 18% on 820 gives 147.6
        let inclusive = solve_inclusive_tax(dec!(820), dec!(18)).unwrap().tax;
        let exclusive = apply_ad_valorem(dec!(820), dec!(18)).unwrap();
        assert!(inclusive > exclusive);
    }

    #[test]
    fn test_inclusive_tax_zero_rate() {
        let sol = solve_inclusive_tax(dec!(5000), Decimal::ZERO).unwrap();
        assert_eq!(sol.base, dec!(5000));
        assert_eq!(sol.tax, Decimal::ZERO);
    }

    #[test]
    fn test_inclusive_tax_rate_100_division_by_zero() {
        match solve_inclusive_tax(dec!(5000), dec!(100)).unwrap_err() {
            LandedCostError::DivisionByZero { .. } => {}
            other => panic!("Expected DivisionByZero, got {:?}", other),
        }
    }

    #[test]
    fn test_inclusive_tax_rate_above_100_rejected() {
        match solve_inclusive_tax(dec!(5000), dec!(120)).unwrap_err() {
            LandedCostError::InvalidInput { field, .. } => assert_eq!(field, "rate_pct"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_inclusive_tax_negative_rate_rejected() {
        assert!(solve_inclusive_tax(dec!(5000), dec!(-1)).is_err());
    }

    #[test]
    fn test_ad_valorem_overflow_is_error() {
        assert!(matches!(
            apply_ad_valorem(Decimal::MAX, dec!(250)),
            Err(LandedCostError::ArithmeticOverflow { .. })
        ));
    }

    #[test]
    fn test_inclusive_base_overflow_is_error() {
        // 1 - 0.99 leaves a divisor of 0.01
        match solve_inclusive_tax(Decimal::MAX, dec!(99)).unwrap_err() {
            LandedCostError::ArithmeticOverflow { context } => {
                assert_eq!(context, "inclusive tax base")
            }
            other => panic!("Expected ArithmeticOverflow, got {:?}", other),
        }
    }
}
