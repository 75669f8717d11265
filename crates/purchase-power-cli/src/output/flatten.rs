use serde_json::{Map, Value};

/// Flatten a nested result into `(field, value)` rows. Nested sections
/// become `section.field`; lists of records get one row per record,
/// summarised by its label and verdict.
pub fn flatten_result(map: &Map<String, Value>) -> Vec<(String, String)> {
    let mut rows = Vec::new();
    push_rows(&mut rows, "", map);
    rows
}

fn push_rows(rows: &mut Vec<(String, String)>, prefix: &str, map: &Map<String, Value>) {
    for (key, val) in map {
        let name = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) => push_rows(rows, &name, inner),
            Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object) => {
                for item in items {
                    rows.push((name.clone(), summarise_record(item)));
                }
            }
            _ => rows.push((name, scalar(val))),
        }
    }
}

fn pick(item: &Value, keys: &[&str]) -> String {
    keys.iter()
        .find_map(|k| item.get(*k))
        .map(scalar)
        .unwrap_or_default()
}

fn summarise_record(item: &Value) -> String {
    let label = pick(item, &["name", "role", "region"]);
    let verdict = match pick(item, &["eligible", "feasible"]).as_str() {
        "true" => "O",
        "false" => "X",
        _ => "",
    };
    let detail = pick(item, &["reason", "max_loan"]);
    format!("{label} [{verdict}] {detail}").trim_end().to_string()
}

/// Render a leaf value as plain text.
pub fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(scalar).collect::<Vec<_>>().join(", "),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
