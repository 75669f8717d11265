use purchase_power_core::format_price;
use rust_decimal::Decimal;
use serde_json::Value;

use super::flatten::scalar;

/// Headline figure of each command, as JSON pointers into the result.
const HEADLINE_FIELDS: [&str; 4] = [
    "/purchase_power/recommended_price",
    "/total_transaction_cost",
    "/max_loan",
    "/mortgage_cap",
];

/// Print just the headline amount, in 억/만원 where it parses as money.
/// Falls back to the first result field, then to the raw value.
pub fn print_minimal(value: &Value) {
    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let headline = HEADLINE_FIELDS
        .iter()
        .filter_map(|pointer| result.pointer(pointer))
        .find(|v| !v.is_null());

    match (headline, result) {
        (Some(val), _) => println!("{}", as_money(val)),
        (None, Value::Object(map)) if !map.is_empty() => {
            if let Some((key, val)) = map.iter().next() {
                println!("{}: {}", key, scalar(val));
            }
        }
        _ => println!("{}", scalar(result)),
    }
}

fn as_money(value: &Value) -> String {
    match value.as_str().and_then(|s| s.parse::<Decimal>().ok()) {
        Some(amount) => format_price(amount),
        None => scalar(value),
    }
}
