use rust_decimal::Decimal;
use serde_json::{Map, Value};
use std::str::FromStr;
use tabled::{builder::Builder, Table};

use super::currency::{format_local_currency, is_local_money_field};
use super::{flatten_object, DisplayOptions};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value, display: &DisplayOptions) {
    match value {
        Value::Object(map) => {
            // Check if "result" key holds the primary data
            if let Some(result) = map.get("result") {
                print_result_table(result, map, display);
            } else {
                print_flat_object(map, display);
            }
        }
        _ => {
            println!("{}", value);
        }
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>, display: &DisplayOptions) {
    match result {
        Value::Object(res_map) if res_map.contains_key("matrix") => {
            print_matrix_table(res_map);
        }
        Value::Object(res_map) => print_flat_object(res_map, display),
        _ => print_flat_object(envelope, display),
    }

    // Print warnings if any
    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    // Print methodology
    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// Render a field/value table. Nested groups become dotted keys; the
/// result's own `warnings` list is skipped since the envelope prints it.
fn print_flat_object(map: &Map<String, Value>, display: &DisplayOptions) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in flatten_object(map) {
        if key == "warnings" {
            continue;
        }
        builder.push_record([key.clone(), display_value(&key, &val, display)]);
    }
    println!("{}", Table::from(builder));
}

/// Sensitivity output: variable_1 down the side, variable_2 across the top.
fn print_matrix_table(res_map: &Map<String, Value>) {
    let v1_name = res_map
        .get("variable_1_name")
        .and_then(Value::as_str)
        .unwrap_or("variable_1");
    let metric = res_map
        .get("output_metric")
        .and_then(Value::as_str)
        .unwrap_or("value");
    let v1_values = as_array(res_map.get("variable_1_values"));
    let v2_values = as_array(res_map.get("variable_2_values"));
    let matrix = as_array(res_map.get("matrix"));

    let mut builder = Builder::default();
    let mut header = vec![v1_name.to_string()];
    if v2_values.is_empty() {
        header.push(metric.to_string());
    } else {
        let v2_name = res_map
            .get("variable_2_name")
            .and_then(Value::as_str)
            .unwrap_or("variable_2");
        header.extend(
            v2_values
                .iter()
                .map(|v| format!("{}={}", v2_name, format_value(v))),
        );
    }
    builder.push_record(header);

    for (v1, row) in v1_values.iter().zip(matrix.iter()) {
        let mut record = vec![format_value(v1)];
        record.extend(as_array(Some(row)).iter().map(format_value));
        builder.push_record(record);
    }
    println!("{}", Table::from(builder));

    if let Some(base) = res_map.get("base_case_value") {
        println!("\nBase case {}: {}", metric, format_value(base));
    }
}

fn as_array(value: Option<&Value>) -> Vec<Value> {
    match value {
        Some(Value::Array(arr)) => arr.clone(),
        _ => Vec::new(),
    }
}

fn display_value(key: &str, value: &Value, display: &DisplayOptions) -> String {
    if let Value::String(s) = value {
        if is_local_money_field(key) {
            if let Ok(amount) = Decimal::from_str(s) {
                return format_local_currency(amount, &display.currency_symbol, display.grouping);
            }
        }
    }
    format_value(value)
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
