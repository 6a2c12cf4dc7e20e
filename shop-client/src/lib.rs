//! Shop Client - HTTP client for the order API
//!
//! Fetches the product catalog and submits finalized orders. Raw records are
//! mapped into the internal product shape on ingest (CDN prefix applied to
//! image paths).

pub mod client;
pub mod config;
pub mod error;

pub use client::{HttpShopApi, ShopApi};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};

// Re-export shared types for convenience
pub use shared::models::{OrderReceipt, OrderRequest, Product};
