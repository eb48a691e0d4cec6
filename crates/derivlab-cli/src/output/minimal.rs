use serde_json::Value;

use super::format_scalar;

/// Headline field for each calculator, in priority order.
const PRIORITY_KEYS: [&str; 3] = ["price", "rounded_contracts", "hedge_ratio"];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    let result_obj = value.get("result").unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                println!("{}", format_scalar(val));
                return;
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_scalar(val));
            return;
        }
    }

    println!("{}", format_scalar(result_obj));
}
