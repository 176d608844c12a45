//! Typed contracts for everything crossing the gateway boundary.
//!
//! # Data Flow
//! ```text
//! Inbound query string
//!     → query.rs (ContentQuery / HomeQuery, defaults + bounds)
//!     → handler
//!
//! Upstream JSON / adapter output
//!     → content.rs, product.rs (one type per payload)
//!     → validate() (Contract::check)
//!     → serialized to the caller
//! ```
//!
//! # Design Decisions
//! - One Rust type per payload; serde handles structure, `Contract` handles
//!   constraints serde cannot express (URL fields)
//! - Failures list every violation, not just the first
//! - Unknown upstream fields are dropped by deserialization and never forwarded

pub mod content;
pub mod product;
pub mod query;

use std::fmt;

use thiserror::Error;

pub use content::{HealthResponse, HeroBannerContent, HomeContent};
pub use product::{decode_products, Product};
pub use query::{ContentQuery, HomeQuery, QueryError, RevalidateSeconds};

/// One broken rule, addressed by a field path such as `[2].price`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub field: String,
    pub reason: String,
}

impl Violation {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

pub(crate) fn join(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// A payload did not match its documented shape.
#[derive(Debug, Error)]
#[error("{subject} violates its contract: {}", join(.violations))]
pub struct ContractError {
    pub subject: &'static str,
    pub violations: Vec<Violation>,
}

/// Constraints on an outbound payload beyond what its type already enforces.
pub trait Contract {
    /// Name used in error reports.
    const SUBJECT: &'static str;

    /// Push a violation for every broken rule. `scope` prefixes field names.
    fn check(&self, scope: &str, violations: &mut Vec<Violation>);
}

/// Run `T`'s contract, handing the value back when it holds.
pub fn validate<T: Contract>(value: T) -> Result<T, ContractError> {
    let mut violations = Vec::new();
    value.check("", &mut violations);
    if violations.is_empty() {
        Ok(value)
    } else {
        Err(ContractError {
            subject: T::SUBJECT,
            violations,
        })
    }
}

/// Join a scope and a field name into a field path.
pub(crate) fn field_path(scope: &str, field: &str) -> String {
    if scope.is_empty() {
        field.to_string()
    } else {
        format!("{}.{}", scope, field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_reports_rule_errors() {
        let product = Product {
            id: "p1".into(),
            name: "Shirt".into(),
            price: serde_json::Number::from(10),
            image_url: Some("shirt.png".into()),
            description: None,
            category: None,
        };
        let err = validate(product).unwrap_err();
        assert_eq!(
            err.violations,
            vec![Violation::new("imageUrl", "must be an absolute URL")]
        );
        assert_eq!(
            err.to_string(),
            "Product violates its contract: imageUrl: must be an absolute URL"
        );
    }

    #[test]
    fn test_field_path() {
        assert_eq!(field_path("", "id"), "id");
        assert_eq!(field_path("[3]", "id"), "[3].id");
    }
}
