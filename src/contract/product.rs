//! Product catalog passthrough contract.

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};
use url::Url;

use crate::contract::{field_path, validate, Contract, ContractError, Violation};

/// A catalog product as exposed to callers.
///
/// `price` keeps the upstream number representation so integral prices are
/// not rewritten as floats on the way through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: Number,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl Contract for Product {
    const SUBJECT: &'static str = "Product";

    fn check(&self, scope: &str, violations: &mut Vec<Violation>) {
        if let Some(image_url) = &self.image_url {
            if Url::parse(image_url).is_err() {
                violations.push(Violation::new(
                    field_path(scope, "imageUrl"),
                    "must be an absolute URL",
                ));
            }
        }
    }
}

impl Contract for Vec<Product> {
    const SUBJECT: &'static str = "Product[]";

    fn check(&self, scope: &str, violations: &mut Vec<Violation>) {
        for (index, product) in self.iter().enumerate() {
            product.check(&format!("{}[{}]", scope, index), violations);
        }
    }
}

/// Decode the product service body: a JSON array of products.
///
/// Every element is checked so the error lists all broken entries.
pub fn decode_products(value: Value) -> Result<Vec<Product>, ContractError> {
    let items = match value {
        Value::Array(items) => items,
        other => {
            return Err(ContractError {
                subject: <Vec<Product> as Contract>::SUBJECT,
                violations: vec![Violation::new(
                    "$",
                    format!("expected an array, got {}", json_type(&other)),
                )],
            })
        }
    };

    let mut products = Vec::with_capacity(items.len());
    let mut violations = Vec::new();
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<Product>(item) {
            Ok(product) => products.push(product),
            Err(e) => violations.push(Violation::new(format!("[{}]", index), e.to_string())),
        }
    }

    if !violations.is_empty() {
        return Err(ContractError {
            subject: <Vec<Product> as Contract>::SUBJECT,
            violations,
        });
    }
    validate(products)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_passthrough_is_exact() {
        let body = json!([
            {
                "id": "p1",
                "name": "Product",
                "price": 10,
                "imageUrl": "https://example.com/image.png",
                "description": "Desc",
                "category": "Cat"
            },
            { "id": "p2", "name": "Other", "price": 4.5 }
        ]);

        let products = decode_products(body.clone()).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(serde_json::to_value(&products).unwrap(), body);
    }

    #[test]
    fn test_unknown_fields_are_dropped() {
        let products =
            decode_products(json!([{ "id": "p1", "name": "P", "price": 1, "cost": 0.4 }])).unwrap();
        assert_eq!(
            serde_json::to_value(&products).unwrap(),
            json!([{ "id": "p1", "name": "P", "price": 1 }])
        );
    }

    #[test]
    fn test_string_price_is_rejected() {
        let err = decode_products(json!([
            { "id": "p1", "name": "P", "price": 1 },
            { "id": "p2", "name": "Q", "price": "9.99" }
        ]))
        .unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert_eq!(err.violations[0].field, "[1]");
    }

    #[test]
    fn test_image_url_checked_per_index() {
        let err = decode_products(json!([
            { "id": "p1", "name": "P", "price": 1, "imageUrl": "not a url" },
            { "id": "p2", "name": "Q", "price": 2 },
            { "id": "p3", "name": "R", "price": 3, "imageUrl": "/relative.png" }
        ]))
        .unwrap_err();
        let fields: Vec<_> = err.violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["[0].imageUrl", "[2].imageUrl"]);
    }

    #[test]
    fn test_empty_strings_are_valid() {
        let body = json!([{ "id": "", "name": "", "price": 0 }]);
        let products = decode_products(body.clone()).unwrap();
        assert_eq!(serde_json::to_value(&products).unwrap(), body);
    }

    #[test]
    fn test_non_array_body() {
        let err = decode_products(json!({ "items": [] })).unwrap_err();
        assert_eq!(err.violations[0].reason, "expected an array, got object");
    }
}
