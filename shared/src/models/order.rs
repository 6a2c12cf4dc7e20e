//! Order Model
//!
//! The order draft filled in across the two checkout steps, the pure step
//! validators, and the wire payloads for order submission.

use super::product::ProductId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// ── Text length limits ──────────────────────────────────────────────

/// Delivery addresses
pub const MAX_ADDRESS_LEN: usize = 500;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Phone numbers
pub const MAX_PHONE_LEN: usize = 100;

// ── Payment ─────────────────────────────────────────────────────────

/// Payment method for an order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Online,
    Cash,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Online => write!(f, "online"),
            PaymentMethod::Cash => write!(f, "cash"),
        }
    }
}

// ── Draft fields and validation errors ──────────────────────────────

/// Order draft field names, used as keys of the validation error map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderField {
    Payment,
    Address,
    Email,
    Phone,
}

impl OrderField {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderField::Payment => "payment",
            OrderField::Address => "address",
            OrderField::Email => "email",
            OrderField::Phone => "phone",
        }
    }
}

impl std::fmt::Display for OrderField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-level validation errors for one checkout step.
///
/// Empty map ⇔ the step is valid. `BTreeMap` keeps render order stable.
pub type FormErrors = BTreeMap<OrderField, String>;

// ── Order draft ─────────────────────────────────────────────────────

/// In-progress order fields, built incrementally across the delivery and
/// contact steps. Cleared wholesale after a successful submission.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub payment: Option<PaymentMethod>,
    pub address: String,
    pub email: String,
    pub phone: String,
}

impl OrderDraft {
    /// Validate the delivery step (payment method + address).
    pub fn validate_delivery(&self) -> FormErrors {
        let mut errors = FormErrors::new();
        if self.payment.is_none() {
            errors.insert(OrderField::Payment, "payment method is required".into());
        }
        if let Some(e) = validate_required_text(&self.address, OrderField::Address, MAX_ADDRESS_LEN)
        {
            errors.insert(OrderField::Address, e);
        }
        errors
    }

    /// Validate the contact step (email + phone).
    pub fn validate_contacts(&self) -> FormErrors {
        let mut errors = FormErrors::new();
        match validate_required_text(&self.email, OrderField::Email, MAX_EMAIL_LEN) {
            Some(e) => {
                errors.insert(OrderField::Email, e);
            }
            None => {
                if !is_plausible_email(&self.email) {
                    errors.insert(OrderField::Email, "email is invalid".into());
                }
            }
        }
        match validate_required_text(&self.phone, OrderField::Phone, MAX_PHONE_LEN) {
            Some(e) => {
                errors.insert(OrderField::Phone, e);
            }
            None => {
                if !is_plausible_phone(&self.phone) {
                    errors.insert(OrderField::Phone, "phone is invalid".into());
                }
            }
        }
        errors
    }

    /// Both steps at once, delivery errors first.
    pub fn validate_all(&self) -> FormErrors {
        let mut errors = self.validate_delivery();
        errors.extend(self.validate_contacts());
        errors
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// Non-empty (after trim) and within the length limit; returns the error
/// message, presence errors before length errors.
fn validate_required_text(value: &str, field: OrderField, max_len: usize) -> Option<String> {
    if value.trim().is_empty() {
        return Some(format!("{field} is required"));
    }
    if value.len() > max_len {
        return Some(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        ));
    }
    None
}

/// `local@domain` with a non-empty part on each side. Anything stricter
/// belongs to the server.
fn is_plausible_email(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

/// At least 5 digits somewhere in the string; separators and a leading `+`
/// are fine.
fn is_plausible_phone(value: &str) -> bool {
    value.chars().filter(char::is_ascii_digit).count() >= 5
}

// ── Wire payloads ───────────────────────────────────────────────────

/// Finalized order as POSTed to the order API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub payment: PaymentMethod,
    pub address: String,
    pub email: String,
    pub phone: String,
    /// Product ids in basket insertion order
    pub items: Vec<ProductId>,
    /// Client-computed total, echoed back by the server on success
    pub total: i64,
}

/// Server acknowledgement for a submitted order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderReceipt {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub total: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_draft() -> OrderDraft {
        OrderDraft {
            payment: Some(PaymentMethod::Cash),
            address: "Main St 1".into(),
            email: "buyer@example.com".into(),
            phone: "+34 600 000 000".into(),
        }
    }

    #[test]
    fn test_empty_delivery_step_reports_both_fields() {
        let draft = OrderDraft::default();
        let errors = draft.validate_delivery();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[&OrderField::Payment], "payment method is required");
        assert_eq!(errors[&OrderField::Address], "address is required");
    }

    #[test]
    fn test_filled_delivery_step_is_valid() {
        let errors = filled_draft().validate_delivery();
        assert!(errors.is_empty());
    }

    #[test]
    fn test_whitespace_address_counts_as_missing() {
        let draft = OrderDraft {
            address: "   ".into(),
            ..filled_draft()
        };
        assert_eq!(draft.validate_delivery()[&OrderField::Address], "address is required");
    }

    #[test]
    fn test_overlong_address_is_rejected() {
        let draft = OrderDraft {
            address: "x".repeat(MAX_ADDRESS_LEN + 1),
            ..filled_draft()
        };
        let errors = draft.validate_delivery();
        assert!(errors[&OrderField::Address].contains("too long"));
    }

    #[test]
    fn test_empty_contact_step_reports_both_fields() {
        let draft = OrderDraft::default();
        let errors = draft.validate_contacts();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[&OrderField::Email], "email is required");
        assert_eq!(errors[&OrderField::Phone], "phone is required");
    }

    #[test]
    fn test_malformed_email_and_phone() {
        let draft = OrderDraft {
            email: "not-an-address".into(),
            phone: "abc".into(),
            ..filled_draft()
        };
        let errors = draft.validate_contacts();
        assert_eq!(errors[&OrderField::Email], "email is invalid");
        assert_eq!(errors[&OrderField::Phone], "phone is invalid");
    }

    #[test]
    fn test_presence_beats_format() {
        let draft = OrderDraft {
            email: "".into(),
            ..filled_draft()
        };
        assert_eq!(draft.validate_contacts()[&OrderField::Email], "email is required");
    }

    #[test]
    fn test_validate_all_merges_steps() {
        let errors = OrderDraft::default().validate_all();
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_payment_method_wire_names() {
        assert_eq!(serde_json::to_string(&PaymentMethod::Online).unwrap(), "\"online\"");
        assert_eq!(serde_json::to_string(&PaymentMethod::Cash).unwrap(), "\"cash\"");
    }

    #[test]
    fn test_order_request_serializes_flat() {
        let req = OrderRequest {
            payment: PaymentMethod::Online,
            address: "Main St 1".into(),
            email: "buyer@example.com".into(),
            phone: "600000000".into(),
            items: vec!["a".into(), "b".into()],
            total: 350,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["payment"], "online");
        assert_eq!(value["items"][1], "b");
        assert_eq!(value["total"], 350);
    }
}
