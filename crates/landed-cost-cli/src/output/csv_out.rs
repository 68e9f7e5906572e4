use serde_json::{Map, Value};
use std::io;

use super::flatten_object;

/// Write output as CSV to stdout.
pub fn print_csv(value: &Value) -> csv::Result<()> {
    let stdout = io::stdout();
    write_csv(stdout.lock(), value)
}

fn write_csv<W: io::Write>(out: W, value: &Value) -> csv::Result<()> {
    let mut wtr = csv::Writer::from_writer(out);
    for record in csv_records(value) {
        wtr.write_record(&record)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Build CSV rows: a matrix grid for sensitivity output, otherwise a
/// two-column field/value listing with dotted keys for nested groups.
fn csv_records(value: &Value) -> Vec<Vec<String>> {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) if result.contains_key("matrix") => matrix_records(result),
            Some(Value::Object(result)) => field_records(result),
            _ => field_records(map),
        },
        other => vec![vec![format_csv_value(other)]],
    }
}

fn field_records(map: &Map<String, Value>) -> Vec<Vec<String>> {
    let mut records = vec![vec!["field".to_string(), "value".to_string()]];
    for (key, val) in flatten_object(map) {
        records.push(vec![key, format_csv_value(&val)]);
    }
    records
}

fn matrix_records(result: &Map<String, Value>) -> Vec<Vec<String>> {
    let empty = Vec::new();
    let v1_name = result
        .get("variable_1_name")
        .and_then(Value::as_str)
        .unwrap_or("variable_1");
    let v1_values = result
        .get("variable_1_values")
        .and_then(Value::as_array)
        .unwrap_or(&empty);
    let v2_values = result
        .get("variable_2_values")
        .and_then(Value::as_array)
        .unwrap_or(&empty);
    let matrix = result
        .get("matrix")
        .and_then(Value::as_array)
        .unwrap_or(&empty);

    let mut header = vec![v1_name.to_string()];
    if v2_values.is_empty() {
        let metric = result
            .get("output_metric")
            .and_then(Value::as_str)
            .unwrap_or("value");
        header.push(metric.to_string());
    } else {
        header.extend(v2_values.iter().map(format_csv_value));
    }

    let mut records = vec![header];
    for (v1, row) in v1_values.iter().zip(matrix.iter()) {
        let mut record = vec![format_csv_value(v1)];
        if let Value::Array(cells) = row {
            record.extend(cells.iter().map(format_csv_value));
        }
        records.push(record);
    }
    records
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr
            .iter()
            .map(format_csv_value)
            .collect::<Vec<_>>()
            .join("; "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
