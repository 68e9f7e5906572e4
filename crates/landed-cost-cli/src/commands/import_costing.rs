use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use landed_cost_core::import_costing::insurance::{self, InsuranceEstimateInput};
use landed_cost_core::import_costing::landed_cost::{self, LandedCostInput};

use crate::input;

/// Arguments for a landed-cost simulation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct LandedCostArgs {
    /// FOB price per unit (foreign currency)
    #[arg(long)]
    pub fob_unit_price: Option<Decimal>,

    /// Number of units
    #[arg(long)]
    pub quantity: Option<u32>,

    /// International freight (foreign currency)
    #[arg(long, alias = "freight")]
    pub international_freight: Option<Decimal>,

    /// International insurance (foreign currency)
    #[arg(long, alias = "insurance")]
    pub international_insurance: Option<Decimal>,

    /// Foreign-to-local exchange rate (e.g. 5.85)
    #[arg(long, alias = "fx")]
    pub exchange_rate: Option<Decimal>,

    /// Destination indirect-tax rate in percent, inclusive basis (e.g. 18)
    #[arg(long, alias = "destination-tax")]
    pub destination_tax_rate_pct: Option<Decimal>,

    /// Import duty in percent
    #[arg(long, alias = "duty")]
    pub import_duty_pct: Option<Decimal>,

    /// Excise tax in percent
    #[arg(long, alias = "excise")]
    pub excise_tax_pct: Option<Decimal>,

    /// First social contribution in percent
    #[arg(long)]
    pub social_contrib_pct_a: Option<Decimal>,

    /// Second social contribution in percent
    #[arg(long)]
    pub social_contrib_pct_b: Option<Decimal>,

    /// Merchant marine fee (local currency)
    #[arg(long)]
    pub merchant_marine_fee: Option<Decimal>,

    /// Customs system fee (local currency)
    #[arg(long)]
    pub customs_system_fee: Option<Decimal>,

    /// Storage (local currency)
    #[arg(long)]
    pub storage_fee: Option<Decimal>,

    /// Terminal handling charge (local currency)
    #[arg(long, alias = "thc")]
    pub terminal_handling_fee: Option<Decimal>,

    /// Customs clearance (local currency)
    #[arg(long)]
    pub customs_clearance_fee: Option<Decimal>,

    /// Inland freight (local currency)
    #[arg(long)]
    pub inland_freight: Option<Decimal>,

    /// Import administration fee (local currency)
    #[arg(long)]
    pub import_admin_fee: Option<Decimal>,

    /// Safety / exchange-risk margin in percent
    #[arg(long, alias = "margin")]
    pub margin_pct: Option<Decimal>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the insurance reference estimate
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct InsuranceEstimateArgs {
    /// Total FOB value (foreign currency)
    #[arg(long)]
    pub fob_total: Option<Decimal>,

    /// International freight (foreign currency)
    #[arg(long, alias = "freight")]
    pub international_freight: Option<Decimal>,

    /// Foreign-to-local exchange rate
    #[arg(long, alias = "fx")]
    pub exchange_rate: Option<Decimal>,

    /// Lower premium bound in percent (default 0.5)
    #[arg(long)]
    pub low_pct: Option<Decimal>,

    /// Upper premium bound in percent (default 2.0)
    #[arg(long)]
    pub high_pct: Option<Decimal>,

    /// Path to JSON or YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_landed_cost(args: LandedCostArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let lc_input: LandedCostInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        landed_cost_input_from_flags(args)?
    };
    let result = landed_cost::compute_landed_cost(&lc_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_insurance_estimate(
    args: InsuranceEstimateArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let ins_input: InsuranceEstimateInput = if let Some(ref path) = args.input {
        input::file::read_input(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        data
    } else {
        InsuranceEstimateInput {
            fob_total: args
                .fob_total
                .ok_or("--fob-total is required (or provide --input)")?,
            international_freight: args.international_freight.unwrap_or(Decimal::ZERO),
            exchange_rate: args
                .exchange_rate
                .ok_or("--exchange-rate is required (or provide --input)")?,
            low_pct: args.low_pct,
            high_pct: args.high_pct,
        }
    };
    let result = insurance::estimate_insurance(&ins_input)?;
    Ok(serde_json::to_value(result)?)
}

/// Shipment basics and the destination rate are required; every fee, rate
/// and margin left off the command line is zero.
fn landed_cost_input_from_flags(
    args: LandedCostArgs,
) -> Result<LandedCostInput, Box<dyn std::error::Error>> {
    let zero = Decimal::ZERO;
    Ok(LandedCostInput {
        fob_unit_price: args
            .fob_unit_price
            .ok_or("--fob-unit-price is required (or provide --input)")?,
        quantity: args
            .quantity
            .ok_or("--quantity is required (or provide --input)")?,
        international_freight: args.international_freight.unwrap_or(zero),
        international_insurance: args.international_insurance.unwrap_or(zero),
        exchange_rate: args
            .exchange_rate
            .ok_or("--exchange-rate is required (or provide --input)")?,
        destination_tax_rate_pct: args
            .destination_tax_rate_pct
            .ok_or("--destination-tax-rate-pct is required (or provide --input)")?,
        import_duty_pct: args.import_duty_pct.unwrap_or(zero),
        excise_tax_pct: args.excise_tax_pct.unwrap_or(zero),
        social_contrib_pct_a: args.social_contrib_pct_a.unwrap_or(zero),
        social_contrib_pct_b: args.social_contrib_pct_b.unwrap_or(zero),
        merchant_marine_fee: args.merchant_marine_fee.unwrap_or(zero),
        customs_system_fee: args.customs_system_fee.unwrap_or(zero),
        storage_fee: args.storage_fee.unwrap_or(zero),
        terminal_handling_fee: args.terminal_handling_fee.unwrap_or(zero),
        customs_clearance_fee: args.customs_clearance_fee.unwrap_or(zero),
        inland_freight: args.inland_freight.unwrap_or(zero),
        import_admin_fee: args.import_admin_fee.unwrap_or(zero),
        margin_pct: args.margin_pct.unwrap_or(zero),
    })
}
