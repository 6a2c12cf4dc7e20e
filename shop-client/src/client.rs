//! Order API client
//!
//! `ShopApi` is the contract the application consumes; `HttpShopApi` is the
//! network implementation over reqwest.

use crate::{ClientConfig, ClientError, ClientResult};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared::models::{Category, OrderReceipt, OrderRequest, Product};
use tracing::{debug, warn};

// ============================================================================
// Wire shapes
// ============================================================================

/// Product record as the API returns it; `image` is a relative path.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProductRecord {
    id: String,
    title: String,
    description: String,
    category: Category,
    price: Option<i64>,
    image: String,
}

/// `GET /product` response
#[derive(Debug, Deserialize)]
struct ProductList {
    #[allow(dead_code)]
    total: u64,
    items: Vec<ProductRecord>,
}

/// Error body the API uses for non-2xx answers
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
}

// ============================================================================
// ShopApi trait
// ============================================================================

/// Order API contract.
#[async_trait]
pub trait ShopApi: Send + Sync {
    /// Fetch the full product list, in server order.
    async fn fetch_products(&self) -> ClientResult<Vec<Product>>;

    /// Fetch a single product by id.
    async fn fetch_product(&self, id: &str) -> ClientResult<Product>;

    /// Submit a finalized order.
    async fn submit_order(&self, order: &OrderRequest) -> ClientResult<OrderReceipt>;
}

// ============================================================================
// HttpShopApi - network implementation
// ============================================================================

/// HTTP client for the order API.
#[derive(Debug, Clone)]
pub struct HttpShopApi {
    client: reqwest::Client,
    base_url: String,
    cdn_url: String,
}

impl HttpShopApi {
    /// Create a client from a configuration.
    pub fn new(config: &ClientConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            cdn_url: config.cdn_url.trim_end_matches('/').to_string(),
        }
    }

    /// Prefix a relative image path with the CDN base.
    fn absolutize(&self, image: &str) -> String {
        if image.starts_with('/') {
            format!("{}{}", self.cdn_url, image)
        } else {
            format!("{}/{}", self.cdn_url, image)
        }
    }

    fn into_product(&self, record: ProductRecord) -> Product {
        Product {
            id: record.id,
            title: record.title,
            description: record.description,
            category: record.category,
            price: record.price,
            image: self.absolutize(&record.image),
        }
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let request_id = uuid::Uuid::new_v4().to_string();
        debug!(%url, %request_id, "GET");

        let resp = self
            .client
            .get(&url)
            .header("x-request-id", &request_id)
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let request_id = uuid::Uuid::new_v4().to_string();
        debug!(%url, %request_id, "POST");

        let resp = self
            .client
            .post(&url)
            .header("x-request-id", &request_id)
            .json(body)
            .send()
            .await?;
        Self::handle_response(resp).await
    }

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> ClientResult<T> {
        let status = resp.status();

        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            warn!(status = status.as_u16(), %message, "API request failed");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        resp.json().await.map_err(Into::into)
    }
}

#[async_trait]
impl ShopApi for HttpShopApi {
    async fn fetch_products(&self) -> ClientResult<Vec<Product>> {
        let list: ProductList = self.get("/product").await?;
        Ok(list
            .items
            .into_iter()
            .map(|record| self.into_product(record))
            .collect())
    }

    async fn fetch_product(&self, id: &str) -> ClientResult<Product> {
        let record: ProductRecord = self.get(&format!("/product/{id}")).await?;
        Ok(self.into_product(record))
    }

    async fn submit_order(&self, order: &OrderRequest) -> ClientResult<OrderReceipt> {
        self.post("/order", order).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(cdn: &str) -> HttpShopApi {
        HttpShopApi::new(&ClientConfig::new("http://localhost:3000/api").with_cdn_url(cdn))
    }

    #[test]
    fn test_absolutize_handles_slash_variants() {
        let api = api("https://cdn.example.com/content/");
        assert_eq!(
            api.absolutize("/items/widget.svg"),
            "https://cdn.example.com/content/items/widget.svg"
        );
        assert_eq!(
            api.absolutize("items/widget.svg"),
            "https://cdn.example.com/content/items/widget.svg"
        );
    }

    #[test]
    fn test_error_body_parsing() {
        let body: ApiErrorBody = serde_json::from_str(r#"{"error":"NotFound"}"#).unwrap();
        assert_eq!(body.error, "NotFound");
    }
}
