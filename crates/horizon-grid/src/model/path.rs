//! Dot-path access into opaque row records.

use serde_json::Value;

/// Splits `"a.b[0].c"` into `["a", "b", "0", "c"]`.
fn segments(path: &str) -> Vec<&str> {
    let mut out = Vec::new();
    for part in path.split('.') {
        let Some(open) = part.find('[') else {
            out.push(part);
            continue;
        };

        if open > 0 {
            out.push(&part[..open]);
        }
        let mut rest = &part[open..];
        while let Some(stripped) = rest.strip_prefix('[') {
            match stripped.find(']') {
                Some(close) => {
                    out.push(&stripped[..close]);
                    rest = &stripped[close + 1..];
                }
                None => {
                    out.push(stripped);
                    rest = "";
                }
            }
        }
        if !rest.is_empty() {
            out.push(rest);
        }
    }
    out
}

/// Looks up the value at a dot-separated path.
///
/// Object fields are matched by name and numeric segments index into arrays.
/// A path that leads nowhere yields `None`; it is never an error.
///
/// ```
/// use horizon_grid::model::value_at;
/// use serde_json::json;
///
/// let person = json!({"name": {"first": "Peter"}, "phones": ["082444"]});
/// assert_eq!(value_at(&person, "name.first"), Some(&json!("Peter")));
/// assert_eq!(value_at(&person, "phones[0]"), Some(&json!("082444")));
/// assert_eq!(value_at(&person, "name.middle"), None);
/// ```
pub fn value_at<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return None;
    }
    segments(path)
        .into_iter()
        .try_fold(data, |current, segment| match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
}

/// Renders a value for display in a cell. Absent and `null` values are blank.
pub fn display_value(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    }
}
