pub mod csv_out;
pub mod currency;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use currency::Grouping;
use serde_json::{Map, Value};

/// Presentation settings for human-readable formats.
#[derive(Debug, Clone)]
pub struct DisplayOptions {
    pub currency_symbol: String,
    pub grouping: Grouping,
}

/// Dispatch output to the appropriate formatter.
pub fn format_output(
    format: &OutputFormat,
    value: &Value,
    display: &DisplayOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => table::print_table(value, display),
        OutputFormat::Csv => csv_out::print_csv(value)?,
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
    Ok(())
}

/// Pretty-print JSON to stdout.
fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}

/// Flatten nested objects into `(dotted.key, value)` pairs, in key order.
/// Arrays and scalars are leaves.
pub fn flatten_object(map: &Map<String, Value>) -> Vec<(String, Value)> {
    let mut rows = Vec::new();
    flatten_into(&mut rows, "", map);
    rows
}

fn flatten_into(rows: &mut Vec<(String, Value)>, prefix: &str, map: &Map<String, Value>) {
    for (key, val) in map {
        let full = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match val {
            Value::Object(inner) => flatten_into(rows, &full, inner),
            other => rows.push((full, other.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_nested_result() {
        let value = json!({
            "foreign": { "fob_total": "20453.40", "cif_foreign": "34453.40" },
            "unit_cost": "105.47",
        });
        let rows = flatten_object(value.as_object().unwrap());
        let keys: Vec<&str> = rows.iter().map(|(k, _)| k.as_str()).collect();
        assert!(keys.contains(&"foreign.fob_total"));
        assert!(keys.contains(&"foreign.cif_foreign"));
        assert!(keys.contains(&"unit_cost"));
        assert_eq!(rows.len(), 3);
    }
}
