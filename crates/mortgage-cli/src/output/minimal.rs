use serde_json::Value;

/// Print just the key answer value from the output.
///
/// Looks for well-known loan fields in order of priority, then falls back
/// to the first field of the result object. Schedules print their last row.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let result_obj = match result_obj {
        Value::Array(rows) => rows.last().unwrap_or(result_obj),
        other => other,
    };

    let priority_keys = [
        "monthly_payment",
        "remaining_balance",
        "interest",
        "total_interest",
    ];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
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
