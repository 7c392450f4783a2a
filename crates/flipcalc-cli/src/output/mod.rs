pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Pretty JSON with the result envelope intact.
fn render_json(value: &Value) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

fn print_json(value: &Value) {
    match render_json(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}

/// Flatten nested objects into dotted keys (`results.net_profit`).
/// With `index_arrays`, arrays of objects expand to `lenders[0].name` rows;
/// otherwise arrays stay leaf values.
pub fn flatten_object(map: &Map<String, Value>, index_arrays: bool) -> Vec<(String, Value)> {
    let mut rows = Vec::new();
    flatten_into(None, map, index_arrays, &mut rows);
    rows
}

fn flatten_into(
    prefix: Option<&str>,
    map: &Map<String, Value>,
    index_arrays: bool,
    rows: &mut Vec<(String, Value)>,
) {
    for (key, val) in map {
        let name = match prefix {
            Some(p) => format!("{}.{}", p, key),
            None => key.clone(),
        };
        match val {
            Value::Object(inner) if !inner.is_empty() => {
                flatten_into(Some(&name), inner, index_arrays, rows)
            }
            Value::Array(items) if index_arrays && is_object_array(items) => {
                for (i, item) in items.iter().enumerate() {
                    if let Value::Object(inner) = item {
                        flatten_into(Some(&format!("{}[{}]", name, i)), inner, true, rows);
                    }
                }
            }
            _ => rows.push((name, val.clone())),
        }
    }
}

/// Non-empty array whose elements are all objects.
pub fn is_object_array(items: &[Value]) -> bool {
    !items.is_empty() && items.iter().all(Value::is_object)
}

/// Render a scalar for a single cell.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(format_value).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_json_keeps_decimal_strings() {
        let value = json!({ "result": { "net_profit": "24665.00" }, "warnings": [] });
        let rendered = render_json(&value).unwrap();
        assert!(rendered.contains("\"net_profit\": \"24665.00\""));
        assert_eq!(serde_json::from_str::<Value>(&rendered).unwrap(), value);
    }

    #[test]
    fn test_flatten_nested_results() {
        let value = json!({
            "results": { "net_profit": "24665", "loan": { "base": "265500" } },
            "empty": {},
            "warnings": ["a", "b"]
        });
        let rows = flatten_object(value.as_object().unwrap(), false);
        let keys: Vec<&str> = rows.iter().map(|(k, _)| k.as_str()).collect();
        assert!(keys.contains(&"results.net_profit"));
        assert!(keys.contains(&"results.loan.base"));
        assert!(keys.contains(&"empty"));
        let warnings = rows.iter().find(|(k, _)| k == "warnings").unwrap();
        assert_eq!(format_value(&warnings.1), "a, b");
    }

    #[test]
    fn test_flatten_indexes_object_arrays() {
        let value = json!({
            "lenders": [{ "name": "A" }, { "name": "B" }],
            "values": ["1", "2"]
        });
        let rows = flatten_object(value.as_object().unwrap(), true);
        let keys: Vec<&str> = rows.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["lenders[0].name", "lenders[1].name", "values"]);
    }
}
