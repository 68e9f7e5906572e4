//! Advisory notes attached to a landed-cost result.
//!
//! Advisories never change a computed value. They flag inputs that are
//! legal but suspicious (zero insurance, non-standard destination rate, no
//! margin) and remind the operator of costs the input record does not carry.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::import_costing::checked;
use crate::import_costing::insurance::{premium_range, DEFAULT_HIGH_PCT, DEFAULT_LOW_PCT};
use crate::import_costing::landed_cost::LandedCostInput;
use crate::types::Money;
use crate::LandedCostResult;

/// Destination indirect-tax rates offered by the entry form (percent).
pub const STANDARD_DESTINATION_RATES: [Decimal; 6] =
    [dec!(17), dec!(18), dec!(19), dec!(20), dec!(21), dec!(22)];

/// Cost items outside the input record that commonly apply to imports.
pub const UNCAPTURED_COST_REMINDERS: [&str; 3] = [
    "product certification / lab reports",
    "bank charges",
    "extra logistics costs (demurrage, extra storage)",
];

/// Collect advisories for a validated input. `fob_total` is the foreign
/// FOB total already computed by the pipeline.
pub fn collect_advisories(
    input: &LandedCostInput,
    fob_total: Money,
) -> LandedCostResult<Vec<String>> {
    let mut advisories = Vec::new();

    if input.international_insurance.is_zero() {
        let range = premium_range(
            checked::sum(&[fob_total, input.international_freight], "cargo value")?,
            input.exchange_rate,
            DEFAULT_LOW_PCT,
            DEFAULT_HIGH_PCT,
        )?;
        advisories.push(format!(
            "International insurance is zero; insuring the cargo is recommended. \
             Reference premium at {}%-{}% of cargo value: {} to {} in local currency.",
            DEFAULT_LOW_PCT.normalize(),
            DEFAULT_HIGH_PCT.normalize(),
            range.low_premium_local.round_dp(2),
            range.high_premium_local.round_dp(2),
        ));
    }

    if !is_standard_destination_rate(input.destination_tax_rate_pct) {
        advisories.push(format!(
            "Destination tax rate {}% is outside the standard set ({}).",
            input.destination_tax_rate_pct.normalize(),
            STANDARD_DESTINATION_RATES
                .iter()
                .map(|r| r.to_string())
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }

    if input.margin_pct.is_zero() {
        advisories.push("Margin is zero; the total carries no exchange-rate buffer.".into());
    }

    for item in UNCAPTURED_COST_REMINDERS {
        advisories.push(format!("Remember to include {} if applicable.", item));
    }

    for advisory in &advisories {
        tracing::info!(advisory = %advisory, "landed cost advisory");
    }

    Ok(advisories)
}

/// Whether `pct` is one of the rates offered by the entry form.
pub fn is_standard_destination_rate(pct: Decimal) -> bool {
    STANDARD_DESTINATION_RATES.contains(&pct)
}
