use clap::Args;
use serde_json::Value;

use landed_cost_core::import_costing::landed_cost::LandedCostInput;
use landed_cost_core::scenarios::sensitivity::{
    self, LandedCostMetric, LandedCostSensitivityInput,
};
use landed_cost_core::SensitivityVariable;

use crate::input;

/// Arguments for landed-cost sensitivity analysis
#[derive(Args)]
pub struct SensitivityArgs {
    /// First sensitivity variable in format name:min:max:step
    /// (e.g. "exchange_rate:5.5:6.5:0.25")
    #[arg(long)]
    pub var1: String,

    /// Second sensitivity variable (optional, creates a 2D table)
    #[arg(long)]
    pub var2: Option<String>,

    /// Output metric: unit_cost, grand_total_with_margin, grand_total,
    /// tax_total, destination_tax
    #[arg(long, default_value = "unit_cost")]
    pub metric: String,

    /// Path to JSON or YAML file with the base case shipment (or pipe it on stdin)
    #[arg(long)]
    pub base_inputs: Option<String>,
}

fn parse_sens_var(spec: &str) -> Result<SensitivityVariable, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = spec.split(':').collect();
    if parts.len() != 4 {
        return Err(format!(
            "Sensitivity variable must be name:min:max:step, got '{}'",
            spec
        )
        .into());
    }
    Ok(SensitivityVariable {
        name: parts[0].to_string(),
        min: parts[1].parse()?,
        max: parts[2].parse()?,
        step: parts[3].parse()?,
    })
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let variable_1 = parse_sens_var(&args.var1)?;
    let variable_2 = args.var2.as_deref().map(parse_sens_var).transpose()?;
    let output_metric: LandedCostMetric = args.metric.parse()?;

    let base_input: LandedCostInput = if let Some(ref path) = args.base_inputs {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        return Err("--base-inputs <file> or stdin required for sensitivity analysis".into());
    };

    let result = sensitivity::landed_cost_sensitivity(&LandedCostSensitivityInput {
        base_input,
        variable_1,
        variable_2,
        output_metric,
    })?;
    Ok(serde_json::to_value(result)?)
}
