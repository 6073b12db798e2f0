use serde_json::Value;

/// Headline figures in priority order. Nested paths are dot-separated.
const PRIORITY_PATHS: [&str; 6] = [
    "ratios.net_rental_yield",
    "operating.monthly_cash_flow",
    "break_even_occupancy_percent",
    "leaders.highest_net_yield",
    "net_rental_yield",
    "cash_on_cash_return",
];

/// Print just the key answer value from the output.
///
/// Looks for the headline figure of each command, then falls back to the
/// first field of the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    for path in PRIORITY_PATHS {
        if let Some(val) = lookup(result_obj, path) {
            if !val.is_null() {
                println!("{}", format_minimal(val));
                return;
            }
        }
    }

    match result_obj {
        Value::Object(map) => {
            if let Some((key, val)) = map.iter().next() {
                println!("{}: {}", key, format_minimal(val));
            }
        }
        // Row tables (projection, sensitivity): the last row is the horizon
        Value::Array(rows) => {
            if let Some(last) = rows.last() {
                println!("{}", format_minimal(last));
            }
        }
        other => println!("{}", format_minimal(other)),
    }
}

fn lookup<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |current, key| current.get(key))
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
