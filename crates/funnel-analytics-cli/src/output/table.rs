use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{flatten_fields, scalar_text};

/// Format output as tables: the `result` object as field/value rows, any
/// `results` array as one row per item, then warnings and methodology.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) if map.contains_key("result") || map.contains_key("results") => {
            print_envelope(map)
        }
        Value::Object(_) => print_fields(value),
        Value::Array(arr) => print_array_table(arr),
        _ => println!("{}", value),
    }
}

fn print_envelope(envelope: &Map<String, Value>) {
    if let Some(result) = envelope.get("result") {
        print_fields(result);
    }

    if let Some(Value::Array(rows)) = envelope.get("results") {
        if envelope.contains_key("result") {
            println!();
        }
        print_array_table(rows);
    }

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

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_fields(value: &Value) {
    let mut fields = Vec::new();
    flatten_fields("", value, &mut fields);

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (key, val) in fields {
        builder.push_record([key, val]);
    }
    println!("{}", Table::from(builder));
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(headers.clone());

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(scalar_text).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", scalar_text(item));
        }
    }
}
