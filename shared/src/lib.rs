//! Shared types for the storefront
//!
//! Domain models, application events and error types used by both the
//! API client and the application crate.

pub mod error;
pub mod events;
pub mod models;

// Re-exports
pub use error::{StoreError, StoreResult};
pub use events::AppEvent;
pub use models::{
    Category, FormErrors, OrderDraft, OrderField, OrderReceipt, OrderRequest, PaymentMethod,
    Product, ProductId,
};
