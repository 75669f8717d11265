use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::flatten::{flatten_result, scalar};

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => match map.get("result") {
            Some(Value::Object(result)) => print_result_table(result, map),
            _ => print_field_table(map),
        },
        Value::Array(rows) => print_row_table(rows),
        _ => println!("{}", value),
    }
}

fn print_result_table(result: &Map<String, Value>, envelope: &Map<String, Value>) {
    print_field_table(result);

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings.iter().filter_map(Value::as_str) {
                println!("  - {}", w);
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_field_table(map: &Map<String, Value>) {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    for (field, val) in flatten_result(map) {
        builder.push_record([field, val]);
    }
    println!("{}", Table::from(builder));
}

/// Regional comparisons and other record lists: one row per record.
fn print_row_table(rows: &[Value]) {
    let Some(Value::Object(first)) = rows.first() else {
        if rows.is_empty() {
            println!("(empty)");
        }
        for row in rows {
            println!("{}", scalar(row));
        }
        return;
    };

    let headers: Vec<String> = first.keys().cloned().collect();
    let mut builder = Builder::default();
    builder.push_record(headers.clone());
    for row in rows {
        let record: Vec<String> = headers
            .iter()
            .map(|h| row.get(h.as_str()).map(scalar).unwrap_or_default())
            .collect();
        builder.push_record(record);
    }
    println!("{}", Table::from(builder));
}
