use serde_json::Value;

/// Fields that best answer "how much?" for each command, in priority order.
const PRIORITY_KEYS: [&str; 4] = ["grand_total", "total", "total_payment", "balance_payment"];

/// Print just the key answer value from the output.
///
/// Looks for the priority fields on the result, then on a nested `summary`
/// or `subtotals` object (report and grid output), then falls back to the
/// first field. Arrays print one line per element.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Array(items) = result_obj {
        for item in items {
            print_minimal(item);
        }
        return;
    }

    if let Value::Object(map) = result_obj {
        let nested = ["summary", "subtotals"]
            .iter()
            .filter_map(|k| map.get(*k).and_then(Value::as_object));
        for candidate in std::iter::once(map).chain(nested) {
            for key in &PRIORITY_KEYS {
                if let Some(val) = candidate.get(*key) {
                    if !val.is_null() {
                        println!("{}", format_minimal(val));
                        return;
                    }
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
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
