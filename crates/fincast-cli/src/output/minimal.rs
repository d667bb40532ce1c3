use serde_json::Value;

/// Print just the key answer value from the output.
///
/// Heuristic: look for well-known identifier fields in order of priority,
/// then fall back to the first field in the object.
pub fn print_minimal(value: &Value) {
    // Reports nest the plan; answer from the plan itself
    let target = value
        .as_object()
        .and_then(|m| m.get("plan"))
        .unwrap_or(value);

    // Priority list of key output fields
    let priority_keys = [
        "plan_id",
        "forecast_id",
        "model_accuracy",
        "name",
    ];

    if let Value::Object(map) = target {
        // Try priority keys first (skip null values)
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", format_minimal(val));
                    return;
                }
            }
        }

        // Fall back to first field
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    // Not an object, just print directly
    println!("{}", format_minimal(target));
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
