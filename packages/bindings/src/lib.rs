use napi::Result as NapiResult;
use napi_derive::napi;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Import costing
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_landed_cost(input_json: String) -> NapiResult<String> {
    let input: landed_cost_core::import_costing::landed_cost::LandedCostInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = landed_cost_core::import_costing::landed_cost::compute_landed_cost(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn estimate_insurance(input_json: String) -> NapiResult<String> {
    let input: landed_cost_core::import_costing::insurance::InsuranceEstimateInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = landed_cost_core::import_costing::insurance::estimate_insurance(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[napi]
pub fn landed_cost_sensitivity(input_json: String) -> NapiResult<String> {
    let input: landed_cost_core::scenarios::sensitivity::LandedCostSensitivityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = landed_cost_core::scenarios::sensitivity::landed_cost_sensitivity(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
