//! Product records returned by the commerce search API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::{ProductId, VariantId};

/// Product thumbnail.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    /// Image URL.
    pub src: String,
    /// Alt text, when the backend provides one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

/// A backend-defined sub-SKU of a product (size, color, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    /// Unique within the parent product.
    pub id: VariantId,
    pub title: String,
    /// Decimal amount as string (preserves precision).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_quantity: Option<i64>,
}

impl Variant {
    /// Parse the price string, if present and well-formed.
    #[must_use]
    pub fn price_amount(&self) -> Option<Decimal> {
        self.price.as_deref()?.trim().parse().ok()
    }
}

/// A product as returned by the search endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub image: Option<ProductImage>,
    #[serde(default)]
    pub variants: Vec<Variant>,
}

/// A product returned from a search page.
pub type SearchResult = Product;

impl Product {
    /// Look up one of this product's variants.
    #[must_use]
    pub fn variant(&self, id: VariantId) -> Option<&Variant> {
        self.variants.iter().find(|v| v.id == id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_backend_product() {
        // Shape of the upstream payload; extra fields are ignored.
        let json = r#"{
            "id": 77,
            "title": "Fog Linen Chambray Towel - Beige Stripe",
            "variants": [
                {"id": 1, "product_id": 77, "title": "XS / Silver", "price": "49"},
                {"id": 2, "product_id": 77, "title": "S / Silver", "price": "49", "inventory_quantity": 3}
            ],
            "image": {"id": 266, "product_id": 77, "src": "https://cdn.example.com/77.jpg"}
        }"#;

        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.id, ProductId::new(77));
        assert_eq!(product.variants.len(), 2);
        assert_eq!(product.variants[1].inventory_quantity, Some(3));
        assert_eq!(
            product.image.as_ref().map(|i| i.src.as_str()),
            Some("https://cdn.example.com/77.jpg")
        );
    }

    #[test]
    fn test_deserialize_product_without_image_or_variants() {
        let product: Product =
            serde_json::from_str(r#"{"id": 5, "title": "Gift Card", "image": null}"#).unwrap();
        assert!(product.image.is_none());
        assert!(product.variants.is_empty());
    }

    #[test]
    fn test_variant_price_amount() {
        let variant = Variant {
            id: VariantId::new(1),
            title: "Default".to_string(),
            price: Some(" 19.99 ".to_string()),
            inventory_quantity: None,
        };
        assert_eq!(variant.price_amount(), Some(Decimal::new(1999, 2)));

        let unpriced = Variant {
            price: Some("n/a".to_string()),
            ..variant
        };
        assert_eq!(unpriced.price_amount(), None);
    }

    #[test]
    fn test_product_variant_lookup() {
        let product = Product {
            id: ProductId::new(1),
            title: "Mug".to_string(),
            image: None,
            variants: vec![Variant {
                id: VariantId::new(10),
                title: "Blue".to_string(),
                price: None,
                inventory_quantity: None,
            }],
        };
        assert_eq!(
            product.variant(VariantId::new(10)).map(|v| v.title.as_str()),
            Some("Blue")
        );
        assert!(product.variant(VariantId::new(11)).is_none());
    }
}
