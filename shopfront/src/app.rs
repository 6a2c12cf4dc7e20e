//! Orchestration wiring
//!
//! Connects view-originated events to model operations and model-originated
//! events back to render calls, and sequences the two network flows (catalog
//! fetch at startup, order submission from the contact step).

use crate::bus::{EventBus, EventFilter};
use crate::state::{AppState, CheckoutStage};
use crate::ui::{BasketLine, CatalogCard, ContactFormView, DeliveryFormView, SuccessView, Ui};
use shared::error::StoreError;
use shared::events::AppEvent;
use shared::models::{OrderReceipt, OrderRequest, Product};
use shop_client::{ClientError, ShopApi};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Orchestration error: either a store condition or a failed API call.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Client(#[from] ClientError),
}

/// The wired application.
///
/// Holds the bus, the state model, the API client and the UI, and registers
/// every subscription in [`App::new`]. Handlers keep only weak references,
/// so dropping the `App` unhooks the wiring.
pub struct App {
    inner: Arc<AppInner>,
}

struct AppInner {
    bus: Arc<EventBus>,
    state: Arc<AppState>,
    api: Arc<dyn ShopApi>,
    ui: Arc<dyn Ui>,
    submitting: AtomicBool,
}

impl App {
    pub fn new(
        bus: Arc<EventBus>,
        state: Arc<AppState>,
        api: Arc<dyn ShopApi>,
        ui: Arc<dyn Ui>,
    ) -> Self {
        let inner = Arc::new(AppInner {
            bus,
            state,
            api,
            ui,
            submitting: AtomicBool::new(false),
        });
        wire(&inner);
        Self { inner }
    }

    /// Publish a view-originated event.
    pub fn emit(&self, event: AppEvent) {
        self.inner.bus.publish(&event);
    }

    pub fn bus(&self) -> &Arc<EventBus> {
        &self.inner.bus
    }

    pub fn state(&self) -> &Arc<AppState> {
        &self.inner.state
    }

    /// Fetch the catalog and hand it to the model. Startup flow; also the
    /// manual "reload" path.
    pub async fn load_catalog(&self) -> Result<usize, AppError> {
        self.inner.load_catalog().await
    }

    /// Validate both steps and submit the order. Guarded against concurrent
    /// submissions; on failure basket and draft stay untouched.
    pub async fn submit_order(&self) -> Result<OrderReceipt, AppError> {
        self.inner.clone().submit_order().await
    }
}

// ============================================================================
// Event wiring
// ============================================================================

/// Register one handler holding a weak app reference.
macro_rules! handler {
    ($inner:expr, |$app:ident, $event:ident| $body:expr) => {{
        let weak = Arc::downgrade($inner);
        move |$event: &AppEvent| {
            let Some($app) = weak.upgrade() else { return };
            $body
        }
    }};
}

fn wire(inner: &Arc<AppInner>) {
    let bus = Arc::clone(&inner.bus);

    bus.subscribe_all(|event| debug!(%event, "event"));

    // Catalog render
    bus.on(
        "items:changed",
        handler!(inner, |app, event| {
            if let AppEvent::ItemsChanged { .. } = event {
                app.ui.render_catalog(&app.catalog_cards());
            }
        }),
    );

    // Card selection opens the preview
    bus.on(
        "card:select",
        handler!(inner, |app, event| {
            if let AppEvent::CardSelected { id } = event {
                match app.state.find_product(id) {
                    Some(product) => {
                        app.state.set_preview(&product);
                        app.bus.publish(&AppEvent::ModalOpened);
                    }
                    None => warn!(%id, "selected product is not in the catalog"),
                }
            }
        }),
    );

    bus.on(
        "preview:changed",
        handler!(inner, |app, event| {
            if let AppEvent::PreviewChanged { product, in_basket } = event {
                app.ui.render_preview(&card_for(product, *in_basket));
            }
        }),
    );

    // Basket toggles come from views; derived renders hang off basket:changed
    bus.on(
        "basket:toggle",
        handler!(inner, |app, event| {
            if let AppEvent::BasketToggled { id, included } = event {
                app.apply_toggle(id, *included);
            }
        }),
    );

    bus.on(
        "basket:changed",
        handler!(inner, |app, event| {
            if let AppEvent::BasketChanged { count, total } = event {
                app.ui.set_basket_counter(*count);
                app.ui.render_basket(&app.basket_lines(), *total);
                // Keep catalog card buttons truthful
                app.ui.render_catalog(&app.catalog_cards());
            }
        }),
    );

    bus.on(
        "basket:open",
        handler!(inner, |app, _event| {
            app.state.set_stage(CheckoutStage::Basket);
            app.ui
                .render_basket(&app.basket_lines(), app.state.total_lenient());
            app.bus.publish(&AppEvent::ModalOpened);
        }),
    );

    // Delivery step
    bus.on(
        "order:open",
        handler!(inner, |app, _event| {
            if app.state.item_count() == 0 {
                app.ui.show_error("basket is empty");
                return;
            }
            app.state.set_stage(CheckoutStage::Delivery);
            app.ui.render_delivery_form(&app.delivery_view(None));
            app.bus.publish(&AppEvent::ModalOpened);
        }),
    );

    bus.subscribe(
        EventFilter::pattern(r"^order\..*:change$"),
        handler!(inner, |app, event| {
            if let AppEvent::OrderFieldChanged { field, value } = event {
                app.state.set_order_field(*field, value.clone());
            }
        }),
    );

    bus.on(
        "payment:change",
        handler!(inner, |app, event| {
            if let AppEvent::PaymentChanged { method } = event {
                app.state.set_payment_field(*method);
                app.state.validate_order();
            }
        }),
    );

    bus.on(
        "form-errors.order:change",
        handler!(inner, |app, event| {
            if let AppEvent::OrderErrorsChanged { errors } = event {
                app.ui
                    .render_delivery_form(&app.delivery_view(Some(errors.clone())));
            }
        }),
    );

    // Contact step
    bus.on(
        "contacts:open",
        handler!(inner, |app, _event| {
            if !app.state.validate_order() {
                app.ui.show_error("finish the delivery step first");
                return;
            }
            app.state.set_stage(CheckoutStage::Contacts);
            app.ui.render_contact_form(&app.contact_view(None));
        }),
    );

    bus.subscribe(
        EventFilter::pattern(r"^contacts\..*:change$"),
        handler!(inner, |app, event| {
            if let AppEvent::ContactFieldChanged { field, value } = event {
                app.state.set_contact_field(*field, value.clone());
            }
        }),
    );

    bus.on(
        "form-errors.contacts:change",
        handler!(inner, |app, event| {
            if let AppEvent::ContactErrorsChanged { errors } = event {
                app.ui
                    .render_contact_form(&app.contact_view(Some(errors.clone())));
            }
        }),
    );

    // Submission: the async boundary. The completion re-enters the bus as
    // order:submitted / order:failed.
    bus.on(
        "contacts:submit",
        handler!(inner, |app, _event| {
            match tokio::runtime::Handle::try_current() {
                Ok(rt) => {
                    rt.spawn(async move {
                        let _ = app.submit_order().await;
                    });
                }
                Err(_) => warn!("contacts:submit outside an async runtime, ignoring"),
            }
        }),
    );

    // Modal lock
    bus.on(
        "modal:open",
        handler!(inner, |app, _event| {
            app.ui.set_page_locked(true);
        }),
    );

    bus.on(
        "modal:close",
        handler!(inner, |app, _event| {
            app.ui.set_page_locked(false);
            if app.state.stage() == CheckoutStage::Submitted {
                app.state.set_stage(CheckoutStage::Browsing);
            }
        }),
    );
}

fn card_for(product: &Product, in_basket: bool) -> CatalogCard {
    CatalogCard {
        id: product.id.clone(),
        title: product.title.clone(),
        image: product.image.clone(),
        price: product.price,
        category: product.category,
        description: product.description.clone(),
        in_basket,
    }
}

// ============================================================================
// AppInner
// ============================================================================

impl AppInner {
    fn catalog_cards(&self) -> Vec<CatalogCard> {
        self.state
            .catalog()
            .iter()
            .map(|p| card_for(p, self.state.basket_contains(&p.id)))
            .collect()
    }

    fn basket_lines(&self) -> Vec<BasketLine> {
        self.state
            .selected_products()
            .iter()
            .enumerate()
            .map(|(i, p)| BasketLine {
                index: i + 1,
                title: p.title.clone(),
                price: p.price.unwrap_or(0),
            })
            .collect()
    }

    /// Delivery form snapshot; `errors` defaults to a silent re-validation
    /// (used when the form opens and nothing should be published yet).
    fn delivery_view(&self, errors: Option<shared::models::FormErrors>) -> DeliveryFormView {
        let draft = self.state.draft();
        let errors = errors.unwrap_or_else(|| draft.validate_delivery());
        DeliveryFormView {
            payment: draft.payment,
            address: draft.address,
            valid: errors.is_empty(),
            errors,
        }
    }

    fn contact_view(&self, errors: Option<shared::models::FormErrors>) -> ContactFormView {
        let draft = self.state.draft();
        let errors = errors.unwrap_or_else(|| draft.validate_contacts());
        ContactFormView {
            email: draft.email,
            phone: draft.phone,
            valid: errors.is_empty(),
            errors,
        }
    }

    fn apply_toggle(&self, id: &str, included: bool) {
        match self.state.toggle_ordered_item(id, included) {
            Ok(()) => {
                self.bus.publish(&AppEvent::BasketChanged {
                    count: self.state.item_count(),
                    total: self.state.total_lenient(),
                });
                // Preview of the toggled product updates its button in place;
                // the modal stays open.
                if self.state.preview().as_deref() == Some(id) {
                    if let Some(product) = self.state.find_product(id) {
                        self.state.set_preview(&product);
                    }
                }
            }
            Err(err @ StoreError::Unpurchasable { .. }) => {
                self.ui.show_error(&err.to_string());
            }
            Err(err) => {
                error!(%err, %id, "basket toggle rejected");
                self.ui.show_error(&err.to_string());
            }
        }
    }

    async fn load_catalog(&self) -> Result<usize, AppError> {
        match self.api.fetch_products().await {
            Ok(products) => {
                let count = products.len();
                info!(count, "catalog loaded");
                self.state.set_catalog(products);
                Ok(count)
            }
            Err(err) => {
                error!(%err, "catalog fetch failed");
                self.ui.show_error(&format!("failed to load catalog: {err}"));
                Err(err.into())
            }
        }
    }

    async fn submit_order(self: Arc<Self>) -> Result<OrderReceipt, AppError> {
        if self.submitting.swap(true, Ordering::SeqCst) {
            self.ui.show_error("order submission already in progress");
            return Err(StoreError::SubmissionInFlight.into());
        }
        let result = self.do_submit().await;
        self.submitting.store(false, Ordering::SeqCst);
        result
    }

    async fn do_submit(&self) -> Result<OrderReceipt, AppError> {
        let items = self.state.basket();
        if items.is_empty() {
            self.ui.show_error("basket is empty");
            return Err(StoreError::EmptyBasket.into());
        }

        // Both validators publish their error maps, so the forms refresh.
        let delivery_ok = self.state.validate_order();
        let contacts_ok = self.state.validate_contacts();
        if !delivery_ok || !contacts_ok {
            self.ui.show_error("order draft is incomplete");
            return Err(StoreError::IncompleteOrder.into());
        }

        let total = match self.state.total() {
            Ok(total) => total,
            Err(err) => {
                // Referential integrity defect, not a user condition.
                error!(%err, "basket/catalog mismatch at submit");
                self.ui.show_error(&err.to_string());
                return Err(err.into());
            }
        };

        let draft = self.state.draft();
        let request = OrderRequest {
            payment: draft.payment.ok_or(StoreError::IncompleteOrder)?,
            address: draft.address,
            email: draft.email,
            phone: draft.phone,
            items,
            total,
        };

        match self.api.submit_order(&request).await {
            Ok(receipt) => {
                info!(total = receipt.total, "order accepted");
                self.state.clear_basket();
                self.state.clear_draft();
                self.state.set_stage(CheckoutStage::Submitted);
                self.bus
                    .publish(&AppEvent::BasketChanged { count: 0, total: 0 });
                // Payment toggle and field state reset with the cleared draft.
                self.ui.render_delivery_form(&self.delivery_view(Some(
                    shared::models::FormErrors::new(),
                )));
                self.ui.render_success(&SuccessView {
                    total: receipt.total,
                });
                self.bus.publish(&AppEvent::OrderSubmitted {
                    total: receipt.total,
                });
                Ok(receipt)
            }
            Err(err) => {
                warn!(%err, "order submission failed");
                self.ui
                    .show_error(&format!("order submission failed: {err}"));
                self.bus.publish(&AppEvent::OrderFailed {
                    message: err.to_string(),
                });
                Err(err.into())
            }
        }
    }
}
