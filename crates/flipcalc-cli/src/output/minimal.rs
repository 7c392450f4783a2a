use serde_json::{Map, Value};

use super::format_value;

/// Headline fields, most specific first. Null values are skipped so an
/// unsolvable break-even falls through to the next answer.
const PRIORITY_KEYS: [&str; 9] = [
    "probability_weighted_profit",
    "profit_change",
    "break_even_arv",
    "suggested_arv",
    "cash_left_in_deal",
    "base_case_value",
    "best_profit",
    "net_profit",
    "total_cash_needed",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        if let Some(val) = find_priority(map) {
            println!("{}", format_value(val));
            return;
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_value(val));
            return;
        }
    }

    println!("{}", format_value(result_obj));
}

/// Search the object, then its nested `results` object (deal analysis).
fn find_priority(map: &Map<String, Value>) -> Option<&Value> {
    let direct = PRIORITY_KEYS
        .iter()
        .filter_map(|key| map.get(*key))
        .find(|val| !val.is_null());
    if direct.is_some() {
        return direct;
    }
    match map.get("results") {
        Some(Value::Object(inner)) => find_priority(inner),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_deal_results() {
        let value = json!({ "results": { "loan_amount": "1", "net_profit": "24665" } });
        let found = find_priority(value.as_object().unwrap()).unwrap();
        assert_eq!(found, &json!("24665"));
    }

    #[test]
    fn test_null_break_even_falls_through() {
        let value = json!({ "break_even_arv": null, "current_net_profit": "5", "net_profit": "7" });
        let found = find_priority(value.as_object().unwrap()).unwrap();
        assert_eq!(found, &json!("7"));
    }
}
