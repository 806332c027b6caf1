use serde::Deserialize;
use serde_json::Value;
use thermal_store::{Money, MoneyError, NewReceipt, ReceiptItem};

use crate::validation::{check_text, ValidationIssue};

pub const INVALID_RECEIPT: &str = "invalid receipt data";

const MAX_TEXT_CHARS: usize = 200;

/// Body of `POST /receipts`. Fields are kept loose so that every problem can
/// be reported per field rather than failing on the first bad type.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReceipt {
    #[serde(alias = "store_name")]
    pub store_name: Option<Value>,
    #[serde(alias = "order_number")]
    pub order_number: Option<Value>,
    pub customer: Option<Value>,
    pub subtotal: Option<Value>,
    pub tax: Option<Value>,
    pub total: Option<Value>,
    pub items: Option<Value>,
}

impl CreateReceipt {
    pub fn validate(self) -> Result<NewReceipt, Vec<ValidationIssue>> {
        let mut issues: Vec<ValidationIssue> = Vec::new();

        let mut text = |field: &str, value: Option<&Value>| {
            check_text(&mut issues, field, value, MAX_TEXT_CHARS)
        };
        let store_name = text("storeName", self.store_name.as_ref());
        let order_number = text("orderNumber", self.order_number.as_ref());
        let customer = text("customer", self.customer.as_ref());
        let subtotal = check_money(&mut issues, "subtotal", self.subtotal.as_ref());
        let tax = check_money(&mut issues, "tax", self.tax.as_ref());
        let total = check_money(&mut issues, "total", self.total.as_ref());
        let items = check_items(&mut issues, self.items);

        match (store_name, order_number, customer, subtotal, tax, total, items) {
            (
                Some(store_name),
                Some(order_number),
                Some(customer),
                Some(subtotal),
                Some(tax),
                Some(total),
                Some(items),
            ) if issues.is_empty() => Ok(NewReceipt {
                store_name,
                order_number,
                customer,
                subtotal,
                tax,
                total,
                items,
            }),
            _ => Err(issues),
        }
    }
}

fn check_money(
    issues: &mut Vec<ValidationIssue>,
    field: &str,
    value: Option<&Value>,
) -> Option<Money> {
    let raw = match value {
        None | Some(Value::Null) => {
            issues.push(ValidationIssue::new(field, "missing", format!("{field} is required")));
            return None;
        }
        Some(Value::String(s)) => s,
        Some(_) => {
            issues.push(ValidationIssue::new(
                field,
                "invalid_type",
                format!("{field} must be a decimal string"),
            ));
            return None;
        }
    };
    match raw.parse::<Money>() {
        Ok(amount) => Some(amount),
        Err(err) => {
            let (code, message) = match err {
                MoneyError::Empty => ("empty", format!("{field} must not be empty")),
                MoneyError::Invalid(_) => (
                    "invalid_decimal",
                    format!("{field} must be a decimal number"),
                ),
                MoneyError::TooPrecise(_) => (
                    "too_precise",
                    format!("{field} must have at most two fractional digits"),
                ),
                MoneyError::TooLarge(_) => (
                    "too_large",
                    format!("{field} exceeds eight integer digits"),
                ),
            };
            issues.push(ValidationIssue::new(field, code, message));
            None
        }
    }
}

fn check_items(issues: &mut Vec<ValidationIssue>, value: Option<Value>) -> Option<String> {
    let raw = match value {
        None | Some(Value::Null) => {
            issues.push(ValidationIssue::new("items", "missing", "items is required"));
            return None;
        }
        Some(Value::String(s)) => s,
        Some(_) => {
            issues.push(ValidationIssue::new(
                "items",
                "invalid_type",
                "items must be a JSON-encoded string",
            ));
            return None;
        }
    };
    match serde_json::from_str::<Vec<ReceiptItem>>(&raw) {
        Ok(_) => Some(raw),
        Err(_) => {
            issues.push(ValidationIssue::new(
                "items",
                "invalid_items",
                "items must encode a list of {name, price, quantity?}",
            ));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn dto(value: Value) -> CreateReceipt {
        serde_json::from_value(value).unwrap()
    }

    fn valid() -> Value {
        json!({
            "storeName": "Test",
            "orderNumber": "#1",
            "customer": "A",
            "subtotal": "2.00",
            "tax": "0.16",
            "total": "2.16",
            "items": "[{\"name\":\"Coffee\",\"price\":2.00,\"quantity\":1}]"
        })
    }

    #[test]
    fn valid_payload_becomes_new_receipt() {
        let receipt = dto(valid()).validate().unwrap();
        assert_eq!(receipt.store_name, "Test");
        assert_eq!(receipt.subtotal, Money::from_cents(200));
        assert_eq!(receipt.tax, Money::from_cents(16));
        assert_eq!(receipt.total, Money::from_cents(216));
        assert!(receipt.items.contains("Coffee"));
    }

    #[test]
    fn every_bad_field_is_reported() {
        let issues = dto(json!({
            "storeName": "",
            "customer": "A\u{0}",
            "subtotal": 2.0,
            "tax": "0.165",
            "total": "abc",
            "items": "{\"name\":\"Coffee\"}"
        }))
        .validate()
        .unwrap_err();

        let found: Vec<(&str, &str)> = issues
            .iter()
            .map(|i| (i.field.as_str(), i.code.as_str()))
            .collect();
        assert_eq!(
            found,
            vec![
                ("storeName", "empty"),
                ("orderNumber", "missing"),
                ("customer", "control_chars"),
                ("subtotal", "invalid_type"),
                ("tax", "too_precise"),
                ("total", "invalid_decimal"),
                ("items", "invalid_items"),
            ]
        );
    }

    #[test]
    fn items_must_be_a_string() {
        let mut body = valid();
        body["items"] = json!([{ "name": "Coffee", "price": 2.0 }]);
        let issues = dto(body).validate().unwrap_err();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, "invalid_type");
    }

    #[test]
    fn snake_case_aliases_are_accepted() {
        let mut body = valid();
        let map = body.as_object_mut().unwrap();
        let name = map.remove("storeName").unwrap();
        map.insert("store_name".into(), name);
        assert!(dto(body).validate().is_ok());
    }
}
