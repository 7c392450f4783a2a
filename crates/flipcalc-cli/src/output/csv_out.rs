use serde_json::Value;
use std::io;

use super::{flatten_object, format_value};

/// Write output as two-column CSV (field, value) to stdout. Nested fields
/// use dotted keys and lists of records are indexed.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let target = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match target {
        Value::Object(map) => {
            let _ = wtr.write_record(["field", "value"]);
            for (key, val) in flatten_object(map, true) {
                let _ = wtr.write_record([key, format_value(&val)]);
            }
        }
        Value::Array(arr) => {
            for item in arr {
                let _ = wtr.write_record([format_value(item)]);
            }
        }
        _ => {
            let _ = wtr.write_record([format_value(target)]);
        }
    }

    let _ = wtr.flush();
}
