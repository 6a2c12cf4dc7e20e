//! Application state model
//!
//! Owns the catalog, the basket, the in-progress order draft and the
//! validation error map, and publishes change events on the bus. Views hold
//! no authoritative copies; they get rendering snapshots.
//!
//! The interior sits behind a mutex. The lock is always released before an
//! event is published, so handlers may re-enter the model.

use crate::bus::EventBus;
use shared::error::{StoreError, StoreResult};
use shared::events::AppEvent;
use shared::models::{FormErrors, OrderDraft, OrderField, PaymentMethod, Product, ProductId};
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Checkout progress, gated by the step validators.
///
/// `Delivery → Contacts` requires the delivery validator to pass;
/// `Contacts → Submitted` requires the contact validator and the API call.
/// Submission failure stays in `Contacts` with the draft intact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckoutStage {
    #[default]
    Browsing,
    Basket,
    Delivery,
    Contacts,
    Submitted,
}

#[derive(Default)]
struct StateInner {
    catalog: Vec<Product>,
    /// Deduplicated, insertion-ordered product ids
    basket: Vec<ProductId>,
    draft: OrderDraft,
    form_errors: FormErrors,
    preview: Option<ProductId>,
    stage: CheckoutStage,
}

impl StateInner {
    fn find(&self, id: &str) -> Option<&Product> {
        self.catalog.iter().find(|p| p.id == id)
    }
}

/// The application state model.
pub struct AppState {
    bus: Arc<EventBus>,
    inner: Mutex<StateInner>,
}

impl AppState {
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            bus,
            inner: Mutex::new(StateInner::default()),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, StateInner> {
        self.inner.lock().expect("state lock poisoned")
    }

    // ── Catalog ─────────────────────────────────────────────────────

    /// Replace the catalog wholesale and publish `items:changed`.
    ///
    /// Duplicate ids keep their first occurrence. A stale basket entry left
    /// dangling by the replacement is surfaced by [`AppState::total`].
    pub fn set_catalog(&self, products: Vec<Product>) {
        let event = {
            let mut inner = self.lock();
            inner.catalog.clear();
            for product in products {
                if inner.find(&product.id).is_some() {
                    warn!(id = %product.id, "duplicate product id in catalog, keeping first");
                    continue;
                }
                inner.catalog.push(product);
            }
            AppEvent::ItemsChanged {
                catalog: inner.catalog.clone(),
            }
        };
        self.bus.publish(&event);
    }

    pub fn catalog(&self) -> Vec<Product> {
        self.lock().catalog.clone()
    }

    pub fn find_product(&self, id: &str) -> Option<Product> {
        self.lock().find(id).cloned()
    }

    // ── Preview ─────────────────────────────────────────────────────

    /// Record the previewed product and publish `preview:changed` with the
    /// full product and its basket membership.
    pub fn set_preview(&self, product: &Product) {
        let event = {
            let mut inner = self.lock();
            inner.preview = Some(product.id.clone());
            AppEvent::PreviewChanged {
                product: product.clone(),
                in_basket: inner.basket.contains(&product.id),
            }
        };
        self.bus.publish(&event);
    }

    pub fn preview(&self) -> Option<ProductId> {
        self.lock().preview.clone()
    }

    // ── Basket ──────────────────────────────────────────────────────

    /// Insert (`included`) or remove a product id. Both directions are
    /// idempotent. Does not publish: callers batch toggles and publish
    /// `basket:changed` themselves.
    pub fn toggle_ordered_item(&self, id: &str, included: bool) -> StoreResult<()> {
        let mut inner = self.lock();
        if included {
            let product = inner
                .find(id)
                .ok_or_else(|| StoreError::MissingCatalogEntry { id: id.to_string() })?;
            if !product.is_purchasable() {
                return Err(StoreError::Unpurchasable { id: id.to_string() });
            }
            if !inner.basket.iter().any(|b| b == id) {
                inner.basket.push(id.to_string());
            }
        } else {
            inner.basket.retain(|b| b != id);
        }
        Ok(())
    }

    /// Remove every basket entry. Does not publish.
    pub fn clear_basket(&self) {
        self.lock().basket.clear();
    }

    /// Sum of basket members' prices against the current catalog.
    ///
    /// A basket id absent from the catalog is a referential-integrity defect
    /// and fails the whole sum; display paths that must stay up use
    /// [`AppState::total_lenient`].
    pub fn total(&self) -> StoreResult<i64> {
        let inner = self.lock();
        inner
            .basket
            .iter()
            .map(|id| {
                inner
                    .find(id)
                    .map(|p| p.price.unwrap_or(0))
                    .ok_or_else(|| StoreError::MissingCatalogEntry { id: id.clone() })
            })
            .sum()
    }

    /// Like [`AppState::total`], but a dangling id counts as zero.
    pub fn total_lenient(&self) -> i64 {
        let inner = self.lock();
        inner
            .basket
            .iter()
            .filter_map(|id| match inner.find(id) {
                Some(product) => product.price,
                None => {
                    warn!(%id, "basket references product missing from catalog");
                    None
                }
            })
            .sum()
    }

    pub fn item_count(&self) -> usize {
        self.lock().basket.len()
    }

    pub fn basket(&self) -> Vec<ProductId> {
        self.lock().basket.clone()
    }

    pub fn basket_contains(&self, id: &str) -> bool {
        self.lock().basket.iter().any(|b| b == id)
    }

    /// Basket members resolved against the catalog, in insertion order.
    /// Dangling ids are skipped (display path).
    pub fn selected_products(&self) -> Vec<Product> {
        let inner = self.lock();
        inner
            .basket
            .iter()
            .filter_map(|id| inner.find(id).cloned())
            .collect()
    }

    // ── Order draft ─────────────────────────────────────────────────

    /// Set a delivery-step text field, then re-validate the step. Publishes
    /// the error map; publishes `order:ready` when the step became valid.
    /// The payment field has its own setter and is ignored here.
    pub fn set_order_field(&self, field: OrderField, value: String) {
        if !self.set_text_field(field, value) {
            return;
        }
        if self.validate_order() {
            self.publish_ready();
        }
    }

    /// Set a contact-step text field, then re-validate the step. Publishes
    /// the error map; publishes `order:ready` when the step became valid.
    pub fn set_contact_field(&self, field: OrderField, value: String) {
        if !self.set_text_field(field, value) {
            return;
        }
        if self.validate_contacts() {
            self.publish_ready();
        }
    }

    /// Pick the payment method. Validation is the caller's move (the payment
    /// toggle and the address field share one error map).
    pub fn set_payment_field(&self, method: PaymentMethod) {
        self.lock().draft.payment = Some(method);
    }

    /// Run the delivery validator, store and publish the error map, and
    /// report whether the step is valid.
    pub fn validate_order(&self) -> bool {
        let errors = {
            let mut inner = self.lock();
            let errors = inner.draft.validate_delivery();
            inner.form_errors = errors.clone();
            errors
        };
        let valid = errors.is_empty();
        self.bus.publish(&AppEvent::OrderErrorsChanged { errors });
        valid
    }

    /// Run the contact validator, store and publish the error map, and
    /// report whether the step is valid.
    pub fn validate_contacts(&self) -> bool {
        let errors = {
            let mut inner = self.lock();
            let errors = inner.draft.validate_contacts();
            inner.form_errors = errors.clone();
            errors
        };
        let valid = errors.is_empty();
        self.bus.publish(&AppEvent::ContactErrorsChanged { errors });
        valid
    }

    /// Reset the draft and the error map after a successful submission.
    pub fn clear_draft(&self) {
        let mut inner = self.lock();
        inner.draft.clear();
        inner.form_errors.clear();
    }

    pub fn draft(&self) -> OrderDraft {
        self.lock().draft.clone()
    }

    pub fn form_errors(&self) -> FormErrors {
        self.lock().form_errors.clone()
    }

    fn set_text_field(&self, field: OrderField, value: String) -> bool {
        let mut inner = self.lock();
        match field {
            OrderField::Payment => {
                warn!("payment is not a text field, use set_payment_field");
                false
            }
            OrderField::Address => {
                inner.draft.address = value;
                true
            }
            OrderField::Email => {
                inner.draft.email = value;
                true
            }
            OrderField::Phone => {
                inner.draft.phone = value;
                true
            }
        }
    }

    fn publish_ready(&self) {
        let draft = self.draft();
        self.bus.publish(&AppEvent::OrderReady { draft });
    }

    // ── Checkout stage ──────────────────────────────────────────────

    pub fn stage(&self) -> CheckoutStage {
        self.lock().stage
    }

    pub fn set_stage(&self, stage: CheckoutStage) {
        self.lock().stage = stage;
    }
}
