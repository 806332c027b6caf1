use serde::Serialize;

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: String,
    pub code: String,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(
        field: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Build the 400 body for a failed validation. The first issue reported for a
/// field wins.
pub fn to_payload(error: &str, issues: &[ValidationIssue]) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for issue in issues {
        if map.contains_key(&issue.field) {
            continue;
        }
        map.insert(
            issue.field.clone(),
            serde_json::json!({ "code": issue.code, "message": issue.message }),
        );
    }
    serde_json::json!({ "error": error, "validation": serde_json::Value::Object(map) })
}

/// Check a required free-text field: present, non-empty after trimming,
/// bounded in length and free of control characters.
pub fn check_text(
    issues: &mut Vec<ValidationIssue>,
    field: &str,
    value: Option<&serde_json::Value>,
    max_chars: usize,
) -> Option<String> {
    let raw = match value {
        None | Some(serde_json::Value::Null) => {
            issues.push(ValidationIssue::new(
                field,
                "missing",
                format!("{field} is required"),
            ));
            return None;
        }
        Some(serde_json::Value::String(s)) => s,
        Some(_) => {
            issues.push(ValidationIssue::new(
                field,
                "invalid_type",
                format!("{field} must be a string"),
            ));
            return None;
        }
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        issues.push(ValidationIssue::new(
            field,
            "empty",
            format!("{field} must not be empty"),
        ));
        return None;
    }
    let before = issues.len();
    if trimmed.chars().count() > max_chars {
        issues.push(ValidationIssue::new(
            field,
            "too_long",
            format!("{field} must be <= {max_chars} chars"),
        ));
    }
    if trimmed.chars().any(|c| c.is_control()) {
        issues.push(ValidationIssue::new(
            field,
            "control_chars",
            format!("{field} contains control characters"),
        ));
    }
    (issues.len() == before).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn payload_keeps_first_issue_per_field() {
        let issues = vec![
            ValidationIssue::new("customer", "too_long", "customer must be <= 200 chars"),
            ValidationIssue::new(
                "customer",
                "control_chars",
                "customer contains control characters",
            ),
            ValidationIssue::new("tax", "missing", "tax is required"),
        ];
        let payload = to_payload("invalid receipt data", &issues);
        assert_eq!(
            payload,
            json!({
                "error": "invalid receipt data",
                "validation": {
                    "customer": { "code": "too_long", "message": "customer must be <= 200 chars" },
                    "tax": { "code": "missing", "message": "tax is required" },
                }
            })
        );
    }

    #[test]
    fn text_is_trimmed_and_checked() {
        let mut issues = Vec::new();
        assert_eq!(
            check_text(&mut issues, "storeName", Some(&json!("  Shop ")), 200),
            Some("Shop".to_string())
        );
        assert!(issues.is_empty());

        assert_eq!(check_text(&mut issues, "storeName", None, 200), None);
        assert_eq!(check_text(&mut issues, "storeName", Some(&json!("   ")), 200), None);
        assert_eq!(check_text(&mut issues, "storeName", Some(&json!(5)), 200), None);
        assert_eq!(check_text(&mut issues, "storeName", Some(&json!("a\u{7}b")), 200), None);
        assert_eq!(check_text(&mut issues, "storeName", Some(&json!("abc")), 2), None);
        let codes: Vec<_> = issues.iter().map(|i| i.code.as_str()).collect();
        assert_eq!(
            codes,
            vec!["missing", "empty", "invalid_type", "control_chars", "too_long"]
        );
    }
}
