//! Store error types

use crate::models::ProductId;
use thiserror::Error;

/// Errors raised by the state model and the checkout flow.
///
/// Field-level validation problems are never errors; they travel as
/// [`crate::models::FormErrors`] maps. These variants cover the conditions
/// that abort an operation outright.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// Basket references a product id absent from the catalog. Should not
    /// occur when catalog and basket are only mutated through the model.
    #[error("basket references unknown product: {id}")]
    MissingCatalogEntry { id: ProductId },

    /// Priceless products cannot enter the basket.
    #[error("product is not purchasable: {id}")]
    Unpurchasable { id: ProductId },

    /// A submission is already in flight; re-submission is disabled until it
    /// settles.
    #[error("order submission already in progress")]
    SubmissionInFlight,

    /// The draft is missing required fields; the accompanying error map has
    /// the details.
    #[error("order draft is incomplete")]
    IncompleteOrder,

    /// Submitting an empty basket.
    #[error("basket is empty")]
    EmptyBasket,
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
