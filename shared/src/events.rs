//! Application events
//!
//! Typed events published on the storefront bus. Every event carries its
//! payload and has a stable string name ([`AppEvent::name`]) used by pattern
//! subscriptions and logging. The set of names is closed: [`EVENT_NAMES`]
//! lists every name the application can publish, and a test keeps the two in
//! sync.

use crate::models::{FormErrors, OrderDraft, OrderField, PaymentMethod, Product, ProductId};
use serde::{Deserialize, Serialize};

/// Application event with payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppEvent {
    // ========== Catalog ==========
    /// Catalog replaced wholesale; carries the new projection.
    ItemsChanged { catalog: Vec<Product> },
    /// A catalog card was selected for preview.
    CardSelected { id: ProductId },
    /// Preview changed; carries the full product and its basket membership.
    PreviewChanged { product: Product, in_basket: bool },

    // ========== Basket ==========
    /// A view asked to add (`included`) or remove a product.
    BasketToggled { id: ProductId, included: bool },
    /// Basket membership or totals changed.
    BasketChanged { count: usize, total: i64 },
    /// Basket view opened.
    BasketOpened,

    // ========== Delivery step ==========
    /// Delivery form opened.
    OrderOpened,
    /// A delivery-form text field changed.
    OrderFieldChanged { field: OrderField, value: String },
    /// Payment method picked.
    PaymentChanged { method: PaymentMethod },
    /// Delivery-step validation output (possibly empty).
    OrderErrorsChanged { errors: FormErrors },

    // ========== Contact step ==========
    /// Contact form opened.
    ContactsOpened,
    /// A contact-form text field changed.
    ContactFieldChanged { field: OrderField, value: String },
    /// Contact-step validation output (possibly empty).
    ContactErrorsChanged { errors: FormErrors },

    // ========== Submission ==========
    /// The step just edited became valid; carries the draft.
    OrderReady { draft: OrderDraft },
    /// Contact form submitted; triggers the API call.
    ContactsSubmitted,
    /// Order accepted by the API; carries the server-reported total.
    OrderSubmitted { total: i64 },
    /// Order submission failed; basket and draft are untouched.
    OrderFailed { message: String },

    // ========== Modal ==========
    ModalOpened,
    ModalClosed,
}

impl AppEvent {
    /// Stable event name.
    ///
    /// Field-change events embed the field (`order.address:change`), so
    /// pattern subscriptions like `^order\..*:change$` keep working.
    pub fn name(&self) -> String {
        match self {
            AppEvent::ItemsChanged { .. } => "items:changed".into(),
            AppEvent::CardSelected { .. } => "card:select".into(),
            AppEvent::PreviewChanged { .. } => "preview:changed".into(),
            AppEvent::BasketToggled { .. } => "basket:toggle".into(),
            AppEvent::BasketChanged { .. } => "basket:changed".into(),
            AppEvent::BasketOpened => "basket:open".into(),
            AppEvent::OrderOpened => "order:open".into(),
            AppEvent::OrderFieldChanged { field, .. } => format!("order.{field}:change"),
            AppEvent::PaymentChanged { .. } => "payment:change".into(),
            AppEvent::OrderErrorsChanged { .. } => "form-errors.order:change".into(),
            AppEvent::ContactsOpened => "contacts:open".into(),
            AppEvent::ContactFieldChanged { field, .. } => format!("contacts.{field}:change"),
            AppEvent::ContactErrorsChanged { .. } => "form-errors.contacts:change".into(),
            AppEvent::OrderReady { .. } => "order:ready".into(),
            AppEvent::ContactsSubmitted => "contacts:submit".into(),
            AppEvent::OrderSubmitted { .. } => "order:submitted".into(),
            AppEvent::OrderFailed { .. } => "order:failed".into(),
            AppEvent::ModalOpened => "modal:open".into(),
            AppEvent::ModalClosed => "modal:close".into(),
        }
    }
}

impl std::fmt::Display for AppEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name())
    }
}

/// Every event name the application can publish, dynamic field names
/// expanded. Subscriptions registered against other names are dead code;
/// tests check new variants land here.
pub const EVENT_NAMES: &[&str] = &[
    "items:changed",
    "card:select",
    "preview:changed",
    "basket:toggle",
    "basket:changed",
    "basket:open",
    "order:open",
    "order.payment:change",
    "order.address:change",
    "order.email:change",
    "order.phone:change",
    "payment:change",
    "form-errors.order:change",
    "contacts:open",
    "contacts.payment:change",
    "contacts.address:change",
    "contacts.email:change",
    "contacts.phone:change",
    "form-errors.contacts:change",
    "order:ready",
    "contacts:submit",
    "order:submitted",
    "order:failed",
    "modal:open",
    "modal:close",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Category, FormErrors};

    fn sample_product() -> Product {
        Product {
            id: "p-1".into(),
            title: "Widget".into(),
            description: String::new(),
            category: Category::Other,
            price: Some(100),
            image: String::new(),
        }
    }

    #[test]
    fn test_every_variant_name_is_registered() {
        let fields = [
            OrderField::Payment,
            OrderField::Address,
            OrderField::Email,
            OrderField::Phone,
        ];
        let mut events = vec![
            AppEvent::ItemsChanged { catalog: vec![] },
            AppEvent::CardSelected { id: "p-1".into() },
            AppEvent::PreviewChanged {
                product: sample_product(),
                in_basket: false,
            },
            AppEvent::BasketToggled {
                id: "p-1".into(),
                included: true,
            },
            AppEvent::BasketChanged { count: 0, total: 0 },
            AppEvent::BasketOpened,
            AppEvent::OrderOpened,
            AppEvent::PaymentChanged {
                method: PaymentMethod::Cash,
            },
            AppEvent::OrderErrorsChanged {
                errors: FormErrors::new(),
            },
            AppEvent::ContactsOpened,
            AppEvent::ContactErrorsChanged {
                errors: FormErrors::new(),
            },
            AppEvent::OrderReady {
                draft: OrderDraft::default(),
            },
            AppEvent::ContactsSubmitted,
            AppEvent::OrderSubmitted { total: 0 },
            AppEvent::OrderFailed {
                message: "x".into(),
            },
            AppEvent::ModalOpened,
            AppEvent::ModalClosed,
        ];
        for field in fields {
            events.push(AppEvent::OrderFieldChanged {
                field,
                value: "x".into(),
            });
            events.push(AppEvent::ContactFieldChanged {
                field,
                value: "x".into(),
            });
        }
        for event in events {
            assert!(
                EVENT_NAMES.contains(&event.name().as_str()),
                "unregistered event name: {}",
                event.name()
            );
        }
    }

    #[test]
    fn test_field_change_names_embed_the_field() {
        let event = AppEvent::OrderFieldChanged {
            field: OrderField::Address,
            value: "Main St".into(),
        };
        assert_eq!(event.name(), "order.address:change");

        let event = AppEvent::ContactFieldChanged {
            field: OrderField::Phone,
            value: "600".into(),
        };
        assert_eq!(event.name(), "contacts.phone:change");
    }

    #[test]
    fn test_events_serialize_tagged() {
        let value = serde_json::to_value(AppEvent::OrderSubmitted { total: 500 }).unwrap();
        assert_eq!(value["type"], "ORDER_SUBMITTED");
        assert_eq!(value["total"], 500);
    }
}
