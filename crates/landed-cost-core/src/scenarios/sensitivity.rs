use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::LandedCostError;
use crate::import_costing::landed_cost::{compute_figures, LandedCostInput, LandedCostOutput};
use crate::types::*;
use crate::LandedCostResult;

/// Upper bound on sweep points per variable.
const MAX_SWEEP_POINTS: usize = 1000;

/// Output metric read from each evaluated landed cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LandedCostMetric {
    UnitCost,
    GrandTotalWithMargin,
    GrandTotal,
    TaxTotal,
    DestinationTax,
}

impl LandedCostMetric {
    fn read(self, out: &LandedCostOutput) -> Money {
        match self {
            LandedCostMetric::UnitCost => out.unit_cost,
            LandedCostMetric::GrandTotalWithMargin => out.grand_total_with_margin,
            LandedCostMetric::GrandTotal => out.grand_total,
            LandedCostMetric::TaxTotal => out.tax_total,
            LandedCostMetric::DestinationTax => out.destination.inclusive_tax,
        }
    }
}

impl std::fmt::Display for LandedCostMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LandedCostMetric::UnitCost => write!(f, "unit_cost"),
            LandedCostMetric::GrandTotalWithMargin => write!(f, "grand_total_with_margin"),
            LandedCostMetric::GrandTotal => write!(f, "grand_total"),
            LandedCostMetric::TaxTotal => write!(f, "tax_total"),
            LandedCostMetric::DestinationTax => write!(f, "destination_tax"),
        }
    }
}

impl std::str::FromStr for LandedCostMetric {
    type Err = LandedCostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unit_cost" => Ok(LandedCostMetric::UnitCost),
            "grand_total_with_margin" => Ok(LandedCostMetric::GrandTotalWithMargin),
            "grand_total" => Ok(LandedCostMetric::GrandTotal),
            "tax_total" => Ok(LandedCostMetric::TaxTotal),
            "destination_tax" => Ok(LandedCostMetric::DestinationTax),
            other => Err(LandedCostError::InvalidInput {
                field: "output_metric".into(),
                reason: format!(
                    "Unknown metric '{}'. Expected one of: unit_cost, \
                     grand_total_with_margin, grand_total, tax_total, destination_tax",
                    other
                ),
            }),
        }
    }
}

/// Input for a 1- or 2-way landed-cost sensitivity sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandedCostSensitivityInput {
    /// Base case shipment
    pub base_input: LandedCostInput,
    /// First input field to sweep (by field name, e.g. "exchange_rate")
    pub variable_1: SensitivityVariable,
    /// Optional second input field, producing a 2-D matrix
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_2: Option<SensitivityVariable>,
    pub output_metric: LandedCostMetric,
}

/// Output of a landed-cost sensitivity sweep
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LandedCostSensitivityOutput {
    pub variable_1_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_2_name: Option<String>,
    pub variable_1_values: Vec<Decimal>,
    /// Empty for a 1-way sweep
    pub variable_2_values: Vec<Decimal>,
    pub output_metric: String,
    /// Matrix[i][j] = metric when variable_1 = variable_1_values[i] and
    /// variable_2 = variable_2_values[j]. A 1-way sweep has one column.
    pub matrix: Vec<Vec<Decimal>>,
    /// Metric for the unmodified base input
    pub base_case_value: Decimal,
}

/// Generate the sweep values for a sensitivity variable from min to max with step.
fn generate_sweep_values(var: &SensitivityVariable) -> LandedCostResult<Vec<Decimal>> {
    if var.step <= Decimal::ZERO {
        return Err(LandedCostError::InvalidInput {
            field: format!("variable:{}", var.name),
            reason: "Step must be positive".into(),
        });
    }
    if var.min > var.max {
        return Err(LandedCostError::InvalidInput {
            field: format!("variable:{}", var.name),
            reason: "Min must be <= max".into(),
        });
    }
    // An unrepresentable span or step count is far past the cap
    let steps = var
        .max
        .checked_sub(var.min)
        .and_then(|span| span.checked_div(var.step));
    if !matches!(steps, Some(n) if n < Decimal::from(MAX_SWEEP_POINTS)) {
        return Err(LandedCostError::InvalidInput {
            field: format!("variable:{}", var.name),
            reason: format!("Sweep exceeds {} points", MAX_SWEEP_POINTS),
        });
    }

    let mut values = Vec::new();
    let mut current = Some(var.min);
    while let Some(value) = current.filter(|v| *v <= var.max) {
        values.push(value);
        // Past Decimal::MAX is past max as well
        current = value.checked_add(var.step);
    }
    // Ensure max is included if step doesn't land exactly on it
    if let Some(&last) = values.last() {
        if last < var.max {
            values.push(var.max);
        }
    }

    Ok(values)
}

/// Overwrite one numeric input field by name.
pub fn set_input_field(
    input: &mut LandedCostInput,
    field: &str,
    value: Decimal,
) -> LandedCostResult<()> {
    let slot = match field {
        "quantity" => {
            if !value.fract().is_zero() {
                return Err(LandedCostError::InvalidInput {
                    field: "quantity".into(),
                    reason: format!("Quantity must be a whole number, got {}", value),
                });
            }
            input.quantity = value.to_u32().ok_or_else(|| LandedCostError::InvalidInput {
                field: "quantity".into(),
                reason: format!("Quantity must be between 0 and {}, got {}", u32::MAX, value),
            })?;
            return Ok(());
        }
        "fob_unit_price" => &mut input.fob_unit_price,
        "international_freight" => &mut input.international_freight,
        "international_insurance" => &mut input.international_insurance,
        "exchange_rate" => &mut input.exchange_rate,
        "destination_tax_rate_pct" => &mut input.destination_tax_rate_pct,
        "import_duty_pct" => &mut input.import_duty_pct,
        "excise_tax_pct" => &mut input.excise_tax_pct,
        "social_contrib_pct_a" => &mut input.social_contrib_pct_a,
        "social_contrib_pct_b" => &mut input.social_contrib_pct_b,
        "merchant_marine_fee" => &mut input.merchant_marine_fee,
        "customs_system_fee" => &mut input.customs_system_fee,
        "storage_fee" => &mut input.storage_fee,
        "terminal_handling_fee" => &mut input.terminal_handling_fee,
        "customs_clearance_fee" => &mut input.customs_clearance_fee,
        "inland_freight" => &mut input.inland_freight,
        "import_admin_fee" => &mut input.import_admin_fee,
        "margin_pct" => &mut input.margin_pct,
        other => {
            return Err(LandedCostError::InvalidInput {
                field: format!("variable:{}", other),
                reason: "Not a numeric landed-cost input field".into(),
            })
        }
    };
    *slot = value;
    Ok(())
}

/// Sweep one or two input fields and record the chosen metric at every point.
///
/// Points whose inputs fail validation (e.g. a destination rate swept up to
/// 100%) or whose amounts overflow are reported as warnings and hold zero in
/// the matrix. Points are evaluated without advisories.
pub fn landed_cost_sensitivity(
    input: &LandedCostSensitivityInput,
) -> LandedCostResult<ComputationOutput<LandedCostSensitivityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let v1_values = generate_sweep_values(&input.variable_1)?;
    let v2_values = match &input.variable_2 {
        Some(var) => generate_sweep_values(var)?,
        None => Vec::new(),
    };

    // Reject unknown field names before evaluating anything
    let mut probe = input.base_input.clone();
    set_input_field(&mut probe, &input.variable_1.name, v1_values[0])?;
    if let (Some(var), Some(&v2)) = (&input.variable_2, v2_values.first()) {
        set_input_field(&mut probe, &var.name, v2)?;
    }

    let base = compute_figures(&input.base_input)?;
    let base_case_value = input.output_metric.read(&base);

    let evaluate = |v1: Decimal, v2: Option<Decimal>| -> LandedCostResult<Decimal> {
        let mut point = input.base_input.clone();
        set_input_field(&mut point, &input.variable_1.name, v1)?;
        if let (Some(var), Some(v2)) = (&input.variable_2, v2) {
            set_input_field(&mut point, &var.name, v2)?;
        }
        let out = compute_figures(&point)?;
        Ok(input.output_metric.read(&out))
    };

    let mut matrix = Vec::with_capacity(v1_values.len());
    for v1 in &v1_values {
        let columns: Vec<Option<Decimal>> = if v2_values.is_empty() {
            vec![None]
        } else {
            v2_values.iter().copied().map(Some).collect()
        };
        let mut row = Vec::with_capacity(columns.len());
        for v2 in columns {
            match evaluate(*v1, v2) {
                Ok(val) => row.push(val),
                Err(e) => {
                    let at = match v2 {
                        Some(v2) => format!("({v1}, {v2})"),
                        None => format!("({v1})"),
                    };
                    warnings.push(format!("Evaluation failed at {at}: {e}"));
                    row.push(Decimal::ZERO);
                }
            }
        }
        matrix.push(row);
    }

    let output = LandedCostSensitivityOutput {
        variable_1_name: input.variable_1.name.clone(),
        variable_2_name: input.variable_2.as_ref().map(|v| v.name.clone()),
        variable_1_values: v1_values,
        variable_2_values: v2_values,
        output_metric: input.output_metric.to_string(),
        matrix,
        base_case_value,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        if input.variable_2.is_some() {
            "2-Way Landed Cost Sensitivity"
        } else {
            "1-Way Landed Cost Sensitivity"
        },
        &serde_json::json!({
            "variable_1": input.variable_1.name,
            "variable_2": input.variable_2.as_ref().map(|v| v.name.clone()),
            "output_metric": input.output_metric.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import_costing::landed_cost::tests::reference_input as base_input;
    use rust_decimal_macros::dec;

    fn var(name: &str, min: Decimal, max: Decimal, step: Decimal) -> SensitivityVariable {
        SensitivityVariable {
            name: name.into(),
            min,
            max,
            step,
        }
    }

    #[test]
    fn test_sweep_values_include_max() {
        let values = generate_sweep_values(&var("x", dec!(1), dec!(2), dec!(0.4))).unwrap();
        assert_eq!(values, vec![dec!(1), dec!(1.4), dec!(1.8), dec!(2)]);
    }

    #[test]
    fn test_sweep_rejects_bad_step() {
        assert!(generate_sweep_values(&var("x", dec!(1), dec!(2), Decimal::ZERO)).is_err());
        assert!(generate_sweep_values(&var("x", dec!(3), dec!(2), dec!(1))).is_err());
        assert!(generate_sweep_values(&var("x", dec!(0), dec!(1), dec!(0.0001))).is_err());
    }

    #[test]
    fn test_one_way_exchange_rate() {
        let input = LandedCostSensitivityInput {
            base_input: base_input(),
            variable_1: var("exchange_rate", dec!(5.0), dec!(6.5), dec!(0.5)),
            variable_2: None,
            output_metric: LandedCostMetric::UnitCost,
        };
        let out = landed_cost_sensitivity(&input).unwrap().result;

        assert_eq!(out.variable_1_values.len(), 4);
        assert!(out.variable_2_values.is_empty());
        assert_eq!(out.matrix.len(), 4);
        assert!(out.matrix.iter().all(|row| row.len() == 1));
        // A weaker local currency raises unit cost
        for i in 1..out.matrix.len() {
            assert!(out.matrix[i][0] > out.matrix[i - 1][0]);
        }
        assert_eq!(out.base_case_value.round_dp(2), dec!(105.47));
    }

    #[test]
    fn test_two_way_fx_and_margin() {
        let input = LandedCostSensitivityInput {
            base_input: base_input(),
            variable_1: var("exchange_rate", dec!(5.5), dec!(6.0), dec!(0.25)),
            variable_2: Some(var("margin_pct", dec!(0), dec!(20), dec!(10))),
            output_metric: LandedCostMetric::GrandTotalWithMargin,
        };
        let result = landed_cost_sensitivity(&input).unwrap();
        let out = &result.result;

        assert_eq!(out.matrix.len(), 3);
        assert_eq!(out.matrix[0].len(), 3);
        assert!(result.warnings.is_empty());
        // Row 1 is FX 5.75; column 1 is margin 10
        let mut point = base_input();
        point.exchange_rate = dec!(5.75);
        let expected = compute_figures(&point).unwrap().grand_total_with_margin;
        assert_eq!(out.matrix[1][1], expected);
        // Higher margin, higher total
        assert!(out.matrix[1][2] > out.matrix[1][1]);
    }

    #[test]
    fn test_invalid_points_become_warnings() {
        let input = LandedCostSensitivityInput {
            base_input: base_input(),
            variable_1: var("destination_tax_rate_pct", dec!(90), dec!(100), dec!(5)),
            variable_2: None,
            output_metric: LandedCostMetric::DestinationTax,
        };
        let result = landed_cost_sensitivity(&input).unwrap();
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.result.matrix[2][0], Decimal::ZERO);
        assert!(result.result.matrix[1][0] > result.result.matrix[0][0]);
    }

    #[test]
    fn test_quantity_sweep() {
        let input = LandedCostSensitivityInput {
            base_input: base_input(),
            variable_1: var("quantity", dec!(1000), dec!(5000), dec!(2000)),
            variable_2: None,
            output_metric: LandedCostMetric::UnitCost,
        };
        let out = landed_cost_sensitivity(&input).unwrap().result;
        assert_eq!(out.variable_1_values.len(), 3);
    }

    #[test]
    fn test_fractional_quantity_rejected() {
        let mut input = base_input();
        assert!(set_input_field(&mut input, "quantity", dec!(10.5)).is_err());
        set_input_field(&mut input, "quantity", dec!(10)).unwrap();
        assert_eq!(input.quantity, 10);
    }

    #[test]
    fn test_quantity_out_of_range_rejected() {
        let mut input = base_input();
        let too_many = Decimal::from(u32::MAX) + Decimal::ONE;
        match set_input_field(&mut input, "quantity", too_many).unwrap_err() {
            LandedCostError::InvalidInput { reason, .. } => {
                assert!(reason.contains("between 0 and 4294967295"), "{}", reason)
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
        match set_input_field(&mut input, "quantity", dec!(-3)).unwrap_err() {
            LandedCostError::InvalidInput { reason, .. } => {
                assert!(!reason.contains("whole number"), "{}", reason)
            }
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_sweep_step_count_beyond_decimal_range_rejected() {
        let input = LandedCostSensitivityInput {
            base_input: base_input(),
            variable_1: var(
                "margin_pct",
                Decimal::ZERO,
                dec!(10000000000),
                Decimal::new(1, 28),
            ),
            variable_2: None,
            output_metric: LandedCostMetric::UnitCost,
        };
        match landed_cost_sensitivity(&input).unwrap_err() {
            LandedCostError::InvalidInput { field, .. } => assert_eq!(field, "variable:margin_pct"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
        // Span itself overflows
        let unbounded = var("x", Decimal::MIN, Decimal::MAX, Decimal::MAX);
        assert!(generate_sweep_values(&unbounded).is_err());
    }

    #[test]
    fn test_sweep_stops_at_decimal_max() {
        let top = var("x", Decimal::MAX - dec!(2), Decimal::MAX, Decimal::ONE);
        let values = generate_sweep_values(&top).unwrap();
        assert_eq!(
            values,
            vec![Decimal::MAX - dec!(2), Decimal::MAX - Decimal::ONE, Decimal::MAX]
        );
    }

    #[test]
    fn test_oversized_points_become_warnings() {
        let input = LandedCostSensitivityInput {
            base_input: base_input(),
            variable_1: var(
                "storage_fee",
                Decimal::MAX - Decimal::ONE,
                Decimal::MAX,
                Decimal::ONE,
            ),
            variable_2: None,
            output_metric: LandedCostMetric::GrandTotal,
        };
        let result = landed_cost_sensitivity(&input).unwrap();
        assert_eq!(result.warnings.len(), 2);
        assert!(result.warnings[0].contains("overflow"), "{}", result.warnings[0]);
        assert!(result.result.matrix.iter().all(|row| row[0].is_zero()));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let input = LandedCostSensitivityInput {
            base_input: base_input(),
            variable_1: var("wacc", dec!(0.05), dec!(0.10), dec!(0.01)),
            variable_2: None,
            output_metric: LandedCostMetric::UnitCost,
        };
        match landed_cost_sensitivity(&input).unwrap_err() {
            LandedCostError::InvalidInput { field, .. } => assert_eq!(field, "variable:wacc"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_metric_parse() {
        assert_eq!(
            "unit_cost".parse::<LandedCostMetric>().unwrap(),
            LandedCostMetric::UnitCost
        );
        assert!("irr".parse::<LandedCostMetric>().is_err());
        assert_eq!(LandedCostMetric::TaxTotal.to_string(), "tax_total");
    }
}
