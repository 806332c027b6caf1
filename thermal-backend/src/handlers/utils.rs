use std::collections::HashMap;

use serde_json::Value;

use crate::error::ApiError;

/// Read an integer id from the path. Anything that is not an integer cannot
/// name a stored record, so it is reported as not found.
pub fn path_id(
    path: &HashMap<String, String>,
    key: &str,
    not_found: &'static str,
) -> Result<i64, ApiError> {
    path.get(key)
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .ok_or_else(|| ApiError::not_found(not_found))
}

/// Accept an id sent either as a JSON integer or as a numeric string.
pub fn id_from_value(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn path_id_rejects_non_integers_as_not_found() {
        let mut path = HashMap::new();
        path.insert("id".to_string(), "abc".to_string());
        let err = path_id(&path, "id", "receipt not found").unwrap_err();
        assert!(matches!(err, ApiError::NotFound(msg) if msg == "receipt not found"));

        path.insert("id".to_string(), "42".to_string());
        assert_eq!(path_id(&path, "id", "receipt not found").unwrap(), 42);
    }

    #[test]
    fn ids_from_json() {
        assert_eq!(id_from_value(&json!(7)), Some(7));
        assert_eq!(id_from_value(&json!("7")), Some(7));
        assert_eq!(id_from_value(&json!(1.5)), None);
        assert_eq!(id_from_value(&json!(null)), None);
        assert_eq!(id_from_value(&json!("seven")), None);
    }
}
