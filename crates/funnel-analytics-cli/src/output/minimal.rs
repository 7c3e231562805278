use serde_json::{Map, Value};

use super::scalar_text;

/// Headline fields, most specific first. Searched depth-first so nested
/// reports (the dashboard) still surface their key figure.
const PRIORITY_KEYS: [&str; 9] = [
    "formatted",
    "ascension_rate",
    "avg_conversion_rate",
    "conversion_rate",
    "revenue_per_student",
    "roas",
    "invalid",
    "total_mql",
    "days",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in PRIORITY_KEYS {
            if let Some(val) = find_key(map, key) {
                println!("{}", scalar_text(val));
                return;
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, scalar_text(val));
            return;
        }
    }

    println!("{}", scalar_text(result_obj));
}

fn find_key<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
        return Some(val);
    }
    map.values()
        .filter_map(Value::as_object)
        .find_map(|nested| find_key(nested, key))
}
