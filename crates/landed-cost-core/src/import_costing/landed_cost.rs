//! Landed cost of an imported shipment.
//!
//! Turns a foreign-currency FOB price into a per-unit cost in local
//! currency:
//!
//! 1. **Foreign subtotal** -- FOB total and CIF in the foreign currency.
//! 2. **Conversion** -- every foreign amount x exchange rate.
//! 3. **Ad-valorem cascade** -- import duty on CIF, excise on CIF + duty,
//!    two social contributions on CIF + duty + excise (same base, not
//!    cascaded into each other).
//! 4. **Destination tax** -- inclusive rate solved on the sum of every cost
//!    and tax so far, see [`solve_inclusive_tax`].
//! 5. **Aggregation** -- tax, logistics and grand totals.
//! 6. **Margin and unit cost.**
//!
//! All arithmetic uses `rust_decimal::Decimal`. Percent inputs are divided
//! by 100 before multiplication. Nothing is rounded; rounding to cents is a
//! display concern.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LandedCostError;
use crate::import_costing::advisories::collect_advisories;
use crate::import_costing::checked;
use crate::import_costing::tax::{
    apply_ad_valorem, pct_to_rate, solve_inclusive_tax, InclusiveTaxSolution, HUNDRED,
};
use crate::types::{with_metadata, ComputationOutput, Money, Percent, Rate};
use crate::LandedCostResult;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Shipment parameters as entered on the import form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandedCostInput {
    // --- Foreign currency -------------------------------------------------
    /// FOB price per unit.
    pub fob_unit_price: Money,
    /// Number of units shipped (>= 1).
    pub quantity: u32,
    /// International freight for the whole shipment.
    pub international_freight: Money,
    /// International cargo insurance for the whole shipment.
    pub international_insurance: Money,

    // --- Conversion -------------------------------------------------------
    /// Foreign-to-local conversion factor (> 0).
    pub exchange_rate: Decimal,

    // --- Tax rates (percent units) ---------------------------------------
    /// Destination indirect-tax rate, inclusive basis. Must be below 100.
    pub destination_tax_rate_pct: Percent,
    /// Import duty, on CIF.
    pub import_duty_pct: Percent,
    /// Excise tax, on CIF + duty.
    pub excise_tax_pct: Percent,
    /// First social contribution, on CIF + duty + excise.
    pub social_contrib_pct_a: Percent,
    /// Second social contribution, on the same base as the first.
    pub social_contrib_pct_b: Percent,

    // --- Fixed charges (local currency) ----------------------------------
    pub merchant_marine_fee: Money,
    pub customs_system_fee: Money,

    // --- Logistics / admin (local currency) ------------------------------
    pub storage_fee: Money,
    pub terminal_handling_fee: Money,
    pub customs_clearance_fee: Money,
    pub inland_freight: Money,
    pub import_admin_fee: Money,

    /// Safety / exchange-risk margin applied to the grand total (percent).
    pub margin_pct: Percent,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Stage 1: foreign-currency subtotal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForeignSubtotal {
    /// fob_unit_price x quantity.
    pub fob_total: Money,
    /// fob_total + freight + insurance.
    pub cif_foreign: Money,
}

/// Stage 2: foreign amounts in local currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalConversion {
    pub fob_total_local: Money,
    pub freight_local: Money,
    pub insurance_local: Money,
    /// fob_total_local + freight_local + insurance_local.
    pub cif_local: Money,
}

/// Stage 3: exclusive ad-valorem cascade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxCascade {
    pub base_duty: Money,
    pub duty: Money,
    pub base_excise: Money,
    pub excise: Money,
    pub base_social: Money,
    pub social_a: Money,
    pub social_b: Money,
}

/// Stage 4: inclusive destination tax.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationTax {
    /// Every cost and tax that enters the inclusive base.
    pub pretax_sum: Money,
    /// pretax_sum / (1 - rate).
    pub inclusive_base: Money,
    /// inclusive_base x rate.
    pub inclusive_tax: Money,
}

/// Share of each component in the grand total (before margin).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostComposition {
    pub merchandise_share: Rate,
    pub freight_and_insurance_share: Rate,
    pub tax_share: Rate,
    pub logistics_share: Rate,
    /// tax_total / cif_local.
    pub effective_tax_rate: Rate,
}

/// Full landed-cost breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandedCostOutput {
    pub foreign: ForeignSubtotal,
    pub conversion: LocalConversion,
    pub cascade: TaxCascade,
    pub destination: DestinationTax,
    /// Cascade taxes + destination tax + fixed charges.
    pub tax_total: Money,
    /// Storage, handling, clearance, inland freight, admin.
    pub logistics_total: Money,
    /// Merchandise + freight + insurance + taxes + logistics.
    pub grand_total: Money,
    pub margin_amount: Money,
    pub grand_total_with_margin: Money,
    /// grand_total_with_margin / quantity.
    pub unit_cost: Money,
    pub composition: CostComposition,
    pub warnings: Vec<String>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Compute the landed cost of a shipment.
pub fn compute_landed_cost(
    input: &LandedCostInput,
) -> LandedCostResult<ComputationOutput<LandedCostOutput>> {
    let start = Instant::now();

    let output = compute_breakdown(input)?;
    let warnings = output.warnings.clone();

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Import landed cost — FX conversion, ad-valorem cascade, inclusive destination tax",
        &serde_json::json!({
            "duty_base": "CIF (local)",
            "excise_base": "CIF + duty",
            "social_contribution_base": "CIF + duty + excise (shared by both contributions)",
            "destination_tax": "inclusive: base = pretax_sum / (1 - rate)",
            "margin": "applied to grand total",
            "rounding": "none (display only)",
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// The bare breakdown without the computation envelope.
pub fn compute_breakdown(input: &LandedCostInput) -> LandedCostResult<LandedCostOutput> {
    let mut output = compute_figures(input)?;
    output.warnings = collect_advisories(input, output.foreign.fob_total)?;
    Ok(output)
}

/// The breakdown with `warnings` left empty: advisories are neither built
/// nor logged. Used by the sensitivity sweep, which evaluates the pipeline
/// many times and reads a single figure from each point.
pub fn compute_figures(input: &LandedCostInput) -> LandedCostResult<LandedCostOutput> {
    validate_input(input)?;

    let foreign = foreign_subtotal(input)?;
    let conversion = convert_to_local(input, &foreign)?;
    let cascade = run_cascade(input, &conversion)?;
    tracing::debug!(
        cif_local = %conversion.cif_local,
        duty = %cascade.duty,
        excise = %cascade.excise,
        social_a = %cascade.social_a,
        social_b = %cascade.social_b,
        "ad-valorem cascade complete"
    );

    let pretax_sum = checked::sum(
        &[
            conversion.cif_local,
            cascade.duty,
            cascade.excise,
            cascade.social_a,
            cascade.social_b,
            input.storage_fee,
            input.terminal_handling_fee,
            input.customs_clearance_fee,
            input.inland_freight,
            input.import_admin_fee,
            input.merchant_marine_fee,
            input.customs_system_fee,
        ],
        "pretax sum",
    )?;
    let InclusiveTaxSolution { base, tax } =
        solve_inclusive_tax(pretax_sum, input.destination_tax_rate_pct)?;
    let destination = DestinationTax {
        pretax_sum,
        inclusive_base: base,
        inclusive_tax: tax,
    };
    tracing::debug!(
        pretax_sum = %destination.pretax_sum,
        inclusive_base = %destination.inclusive_base,
        inclusive_tax = %destination.inclusive_tax,
        "destination tax solved"
    );

    // --- Aggregation ------------------------------------------------------
    let tax_total = checked::sum(
        &[
            cascade.duty,
            cascade.excise,
            cascade.social_a,
            cascade.social_b,
            destination.inclusive_tax,
            input.merchant_marine_fee,
            input.customs_system_fee,
        ],
        "tax total",
    )?;
    let logistics_total = checked::sum(
        &[
            input.storage_fee,
            input.terminal_handling_fee,
            input.customs_clearance_fee,
            input.inland_freight,
            input.import_admin_fee,
        ],
        "logistics total",
    )?;
    let grand_total = checked::sum(
        &[
            conversion.fob_total_local,
            conversion.freight_local,
            conversion.insurance_local,
            tax_total,
            logistics_total,
        ],
        "grand total",
    )?;

    // --- Margin and unit cost ---------------------------------------------
    let grand_total_with_margin = checked::mul(
        grand_total,
        Decimal::ONE + pct_to_rate(input.margin_pct),
        "grand total with margin",
    )?;
    let margin_amount = grand_total_with_margin - grand_total;
    // quantity >= 1, so the quotient never exceeds the dividend
    let unit_cost = grand_total_with_margin / Decimal::from(input.quantity);
    tracing::debug!(
        grand_total = %grand_total,
        grand_total_with_margin = %grand_total_with_margin,
        unit_cost = %unit_cost,
        "landed cost totals"
    );

    let composition = CostComposition {
        merchandise_share: share_of(conversion.fob_total_local, grand_total)?,
        freight_and_insurance_share: share_of(
            conversion.freight_local + conversion.insurance_local,
            grand_total,
        )?,
        tax_share: share_of(tax_total, grand_total)?,
        logistics_share: share_of(logistics_total, grand_total)?,
        effective_tax_rate: share_of(tax_total, conversion.cif_local)?,
    };

    Ok(LandedCostOutput {
        foreign,
        conversion,
        cascade,
        destination,
        tax_total,
        logistics_total,
        grand_total,
        margin_amount,
        grand_total_with_margin,
        unit_cost,
        composition,
        warnings: Vec::new(),
    })
}

/// Stage 1: FOB total and CIF in the foreign currency.
pub fn foreign_subtotal(input: &LandedCostInput) -> LandedCostResult<ForeignSubtotal> {
    let fob_total = checked::mul(
        input.fob_unit_price,
        Decimal::from(input.quantity),
        "fob total",
    )?;
    Ok(ForeignSubtotal {
        fob_total,
        cif_foreign: checked::sum(
            &[
                fob_total,
                input.international_freight,
                input.international_insurance,
            ],
            "cif (foreign)",
        )?,
    })
}

/// Stage 2: convert each foreign amount separately, then sum.
pub fn convert_to_local(
    input: &LandedCostInput,
    foreign: &ForeignSubtotal,
) -> LandedCostResult<LocalConversion> {
    let fob_total_local =
        checked::mul(foreign.fob_total, input.exchange_rate, "fob total (local)")?;
    let freight_local = checked::mul(
        input.international_freight,
        input.exchange_rate,
        "freight (local)",
    )?;
    let insurance_local = checked::mul(
        input.international_insurance,
        input.exchange_rate,
        "insurance (local)",
    )?;
    Ok(LocalConversion {
        fob_total_local,
        freight_local,
        insurance_local,
        cif_local: checked::sum(
            &[fob_total_local, freight_local, insurance_local],
            "cif (local)",
        )?,
    })
}

/// Stage 3: each base includes every tax computed before it.
pub fn run_cascade(
    input: &LandedCostInput,
    conversion: &LocalConversion,
) -> LandedCostResult<TaxCascade> {
    let base_duty = conversion.cif_local;
    let duty = apply_ad_valorem(base_duty, input.import_duty_pct)?;

    let base_excise = checked::sum(&[base_duty, duty], "excise base")?;
    let excise = apply_ad_valorem(base_excise, input.excise_tax_pct)?;

    let base_social = checked::sum(&[base_excise, excise], "social contribution base")?;
    let social_a = apply_ad_valorem(base_social, input.social_contrib_pct_a)?;
    let social_b = apply_ad_valorem(base_social, input.social_contrib_pct_b)?;

    Ok(TaxCascade {
        base_duty,
        duty,
        base_excise,
        excise,
        base_social,
        social_a,
        social_b,
    })
}

fn share_of(part: Money, whole: Money) -> LandedCostResult<Rate> {
    if whole.is_zero() {
        Ok(Decimal::ZERO)
    } else {
        checked::div(part, whole, "cost composition")
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &LandedCostInput) -> LandedCostResult<()> {
    if input.quantity == 0 {
        return Err(LandedCostError::InvalidInput {
            field: "quantity".into(),
            reason: "Quantity must be at least 1".into(),
        });
    }
    if input.exchange_rate <= Decimal::ZERO {
        return Err(LandedCostError::InvalidInput {
            field: "exchange_rate".into(),
            reason: "Exchange rate must be positive".into(),
        });
    }
    if input.destination_tax_rate_pct >= HUNDRED {
        return Err(LandedCostError::InvalidInput {
            field: "destination_tax_rate_pct".into(),
            reason: "Inclusive destination tax rate must be below 100%".into(),
        });
    }

    let non_negative = [
        ("fob_unit_price", input.fob_unit_price),
        ("international_freight", input.international_freight),
        ("international_insurance", input.international_insurance),
        ("destination_tax_rate_pct", input.destination_tax_rate_pct),
        ("import_duty_pct", input.import_duty_pct),
        ("excise_tax_pct", input.excise_tax_pct),
        ("social_contrib_pct_a", input.social_contrib_pct_a),
        ("social_contrib_pct_b", input.social_contrib_pct_b),
        ("merchant_marine_fee", input.merchant_marine_fee),
        ("customs_system_fee", input.customs_system_fee),
        ("storage_fee", input.storage_fee),
        ("terminal_handling_fee", input.terminal_handling_fee),
        ("customs_clearance_fee", input.customs_clearance_fee),
        ("inland_freight", input.inland_freight),
        ("import_admin_fee", input.import_admin_fee),
        ("margin_pct", input.margin_pct),
    ];
    for (field, value) in non_negative {
        require_non_negative(value, field)?;
    }
    Ok(())
}

fn require_non_negative(value: Decimal, field: &str) -> LandedCostResult<()> {
    if value < Decimal::ZERO {
        return Err(LandedCostError::InvalidInput {
            field: field.into(),
            reason: format!("{} cannot be negative (got {})", field, value),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
