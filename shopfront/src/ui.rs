//! View render contracts
//!
//! The core hands plain data to whatever front end is attached; nothing
//! behavioral crosses this boundary except event emission back into the bus.
//! `ConsoleUi` renders to stdout for the binary; `RecordingUi` captures calls
//! for tests.

use shared::models::{Category, FormErrors, PaymentMethod};
use std::sync::Mutex;

// ============================================================================
// Render data
// ============================================================================

/// Catalog / preview card
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogCard {
    pub id: String,
    pub title: String,
    pub image: String,
    pub price: Option<i64>,
    pub category: Category,
    pub description: String,
    /// Flips the card button between "add" and "remove"
    pub in_basket: bool,
}

/// One basket row
#[derive(Debug, Clone, PartialEq)]
pub struct BasketLine {
    /// 1-based display index
    pub index: usize,
    pub title: String,
    pub price: i64,
}

/// Delivery form snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryFormView {
    pub payment: Option<PaymentMethod>,
    pub address: String,
    pub valid: bool,
    pub errors: FormErrors,
}

/// Contact form snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct ContactFormView {
    pub email: String,
    pub phone: String,
    pub valid: bool,
    pub errors: FormErrors,
}

/// Success screen snapshot; `total` is the server-reported figure
#[derive(Debug, Clone, PartialEq)]
pub struct SuccessView {
    pub total: i64,
}

// ============================================================================
// Ui trait
// ============================================================================

/// Rendering port. Implementations must not call back into the model from
/// inside a render call.
pub trait Ui: Send + Sync {
    fn render_catalog(&self, cards: &[CatalogCard]);
    fn render_preview(&self, card: &CatalogCard);
    fn render_basket(&self, lines: &[BasketLine], total: i64);
    fn render_delivery_form(&self, view: &DeliveryFormView);
    fn render_contact_form(&self, view: &ContactFormView);
    fn render_success(&self, view: &SuccessView);
    /// Basket counter shown on the page header.
    fn set_basket_counter(&self, count: usize);
    /// Page scroll lock while a modal is open.
    fn set_page_locked(&self, locked: bool);
    fn show_error(&self, message: &str);
}

// ============================================================================
// ConsoleUi
// ============================================================================

fn format_price(price: Option<i64>) -> String {
    match price {
        Some(p) => p.to_string(),
        None => "priceless".into(),
    }
}

/// Stdout renderer used by the binary.
#[derive(Debug, Default)]
pub struct ConsoleUi;

impl ConsoleUi {
    pub fn new() -> Self {
        Self
    }
}

impl Ui for ConsoleUi {
    fn render_catalog(&self, cards: &[CatalogCard]) {
        println!("── catalog ({} items) ──", cards.len());
        for card in cards {
            let marker = if card.in_basket { "*" } else { " " };
            println!(
                "{marker} [{}] {} — {} ({})",
                card.id,
                card.title,
                format_price(card.price),
                card.category
            );
        }
    }

    fn render_preview(&self, card: &CatalogCard) {
        println!("── {} ──", card.title);
        println!("{}", card.description);
        println!("category: {}  price: {}", card.category, format_price(card.price));
        println!(
            "button: {}",
            if card.in_basket { "remove from basket" } else { "add to basket" }
        );
    }

    fn render_basket(&self, lines: &[BasketLine], total: i64) {
        println!("── basket ──");
        for line in lines {
            println!("{}. {} — {}", line.index, line.title, line.price);
        }
        println!("total: {total}");
    }

    fn render_delivery_form(&self, view: &DeliveryFormView) {
        println!("── delivery ──");
        println!(
            "payment: {}  address: {:?}",
            view.payment.map(|p| p.to_string()).unwrap_or_else(|| "-".into()),
            view.address
        );
        for (field, message) in &view.errors {
            println!("! {field}: {message}");
        }
        println!("[next: {}]", if view.valid { "enabled" } else { "disabled" });
    }

    fn render_contact_form(&self, view: &ContactFormView) {
        println!("── contacts ──");
        println!("email: {:?}  phone: {:?}", view.email, view.phone);
        for (field, message) in &view.errors {
            println!("! {field}: {message}");
        }
        println!("[pay: {}]", if view.valid { "enabled" } else { "disabled" });
    }

    fn render_success(&self, view: &SuccessView) {
        println!("── order placed ──");
        println!("{} units written off", view.total);
    }

    fn set_basket_counter(&self, count: usize) {
        println!("basket: {count}");
    }

    fn set_page_locked(&self, _locked: bool) {}

    fn show_error(&self, message: &str) {
        eprintln!("error: {message}");
    }
}

// ============================================================================
// RecordingUi
// ============================================================================

/// Everything a [`RecordingUi`] saw, in call order.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    Catalog(Vec<CatalogCard>),
    Preview(CatalogCard),
    Basket { lines: Vec<BasketLine>, total: i64 },
    DeliveryForm(DeliveryFormView),
    ContactForm(ContactFormView),
    Success(SuccessView),
    BasketCounter(usize),
    PageLocked(bool),
    Error(String),
}

/// Test double capturing every render call.
#[derive(Debug, Default)]
pub struct RecordingUi {
    calls: Mutex<Vec<RenderCall>>,
}

impl RecordingUi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().expect("recording ui lock poisoned").clone()
    }

    /// Most recent success render, if any.
    pub fn last_success(&self) -> Option<SuccessView> {
        self.calls()
            .into_iter()
            .rev()
            .find_map(|call| match call {
                RenderCall::Success(view) => Some(view),
                _ => None,
            })
    }

    /// Most recent basket counter value, if any.
    pub fn last_counter(&self) -> Option<usize> {
        self.calls()
            .into_iter()
            .rev()
            .find_map(|call| match call {
                RenderCall::BasketCounter(count) => Some(count),
                _ => None,
            })
    }

    pub fn errors(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                RenderCall::Error(message) => Some(message),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: RenderCall) {
        self.calls.lock().expect("recording ui lock poisoned").push(call);
    }
}

impl Ui for RecordingUi {
    fn render_catalog(&self, cards: &[CatalogCard]) {
        self.record(RenderCall::Catalog(cards.to_vec()));
    }

    fn render_preview(&self, card: &CatalogCard) {
        self.record(RenderCall::Preview(card.clone()));
    }

    fn render_basket(&self, lines: &[BasketLine], total: i64) {
        self.record(RenderCall::Basket {
            lines: lines.to_vec(),
            total,
        });
    }

    fn render_delivery_form(&self, view: &DeliveryFormView) {
        self.record(RenderCall::DeliveryForm(view.clone()));
    }

    fn render_contact_form(&self, view: &ContactFormView) {
        self.record(RenderCall::ContactForm(view.clone()));
    }

    fn render_success(&self, view: &SuccessView) {
        self.record(RenderCall::Success(view.clone()));
    }

    fn set_basket_counter(&self, count: usize) {
        self.record(RenderCall::BasketCounter(count));
    }

    fn set_page_locked(&self, locked: bool) {
        self.record(RenderCall::PageLocked(locked));
    }

    fn show_error(&self, message: &str) {
        self.record(RenderCall::Error(message.to_string()));
    }
}
