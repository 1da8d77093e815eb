//! In-memory product catalog implementing the search port.
//!
//! Used for fixtures, tests, and offline CLI sessions. Matching is a
//! case-insensitive substring match on the product title; an empty term
//! matches everything.

use product_picker_core::Product;

use super::{ProductSearchPort, SearchError, SearchQuery};

#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    products: Vec<Product>,
}

impl InMemoryCatalog {
    #[must_use]
    pub const fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Load a catalog from a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns `SearchError::Parse` if the JSON is not an array of products.
    pub fn from_json(json: &str) -> Result<Self, SearchError> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// The page of matching products for `query`.
    #[must_use]
    pub fn page(&self, query: &SearchQuery) -> Vec<Product> {
        let needle = query.term.trim().to_lowercase();
        let limit = query.limit as usize;
        let skip = query.page.saturating_sub(1) as usize * limit;

        self.products
            .iter()
            .filter(|p| needle.is_empty() || p.title.to_lowercase().contains(&needle))
            .skip(skip)
            .take(limit)
            .cloned()
            .collect()
    }
}

impl ProductSearchPort for InMemoryCatalog {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Product>, SearchError> {
        Ok(self.page(query))
    }
}
