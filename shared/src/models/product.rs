//! Product Model

use serde::{Deserialize, Serialize};

/// Product identifier as issued by the order API (opaque string).
pub type ProductId = String;

/// Product category tag.
///
/// The catalog uses a fixed set of labels; anything the server sends outside
/// that set decodes to [`Category::Other`] rather than failing the whole
/// catalog fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Category {
    SoftSkill,
    HardSkill,
    Additional,
    Button,
    #[default]
    Other,
}

impl Category {
    /// Wire label for this category.
    pub fn label(&self) -> &'static str {
        match self {
            Category::SoftSkill => "soft-skill",
            Category::HardSkill => "hard-skill",
            Category::Additional => "additional",
            Category::Button => "button",
            Category::Other => "other",
        }
    }
}

impl From<String> for Category {
    fn from(value: String) -> Self {
        match value.as_str() {
            "soft-skill" => Category::SoftSkill,
            "hard-skill" => Category::HardSkill,
            "additional" => Category::Additional,
            "button" => Category::Button,
            _ => Category::Other,
        }
    }
}

impl From<Category> for String {
    fn from(value: Category) -> Self {
        value.label().to_string()
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Product entity
///
/// Immutable once fetched; the catalog is replaced wholesale on every fetch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub description: String,
    pub category: Category,
    /// Price in catalog units; `None` means priceless (not purchasable)
    pub price: Option<i64>,
    /// Absolute image URL (CDN prefix applied by the API client)
    pub image: String,
}

impl Product {
    /// Priceless products cannot enter the basket.
    pub fn is_purchasable(&self) -> bool {
        self.price.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_wire_labels_round_trip() {
        for cat in [
            Category::SoftSkill,
            Category::HardSkill,
            Category::Additional,
            Category::Button,
            Category::Other,
        ] {
            let json = serde_json::to_string(&cat).unwrap();
            let back: Category = serde_json::from_str(&json).unwrap();
            assert_eq!(back, cat);
        }
    }

    #[test]
    fn test_unknown_category_folds_to_other() {
        let cat: Category = serde_json::from_str("\"brand-new-label\"").unwrap();
        assert_eq!(cat, Category::Other);
    }

    #[test]
    fn test_product_deserializes_null_price() {
        let json = r#"{
            "id": "p-1",
            "title": "Widget",
            "description": "A widget",
            "category": "button",
            "price": null,
            "image": "https://cdn.example.com/widget.svg"
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price, None);
        assert!(!product.is_purchasable());
    }
}
