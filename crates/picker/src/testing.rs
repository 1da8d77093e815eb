//! Fake search ports and fixture builders.
//!
//! Available to this crate's tests and, with the `testing` feature, to
//! downstream crates.

use std::collections::VecDeque;
use std::sync::Mutex;

use product_picker_core::{Product, ProductId, Variant, VariantId};

use crate::search::{ProductSearchPort, SearchError, SearchQuery};

/// Serves queued responses in order and records every query it receives.
///
/// Once the queue runs dry every search returns an empty page.
#[derive(Debug, Default)]
pub struct ScriptedSearch {
    responses: Mutex<VecDeque<Result<Vec<Product>, SearchError>>>,
    calls: Mutex<Vec<SearchQuery>>,
}

impl ScriptedSearch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one page per entry of `sizes`, with consecutive product ids.
    #[must_use]
    pub fn with_page_sizes(sizes: &[usize]) -> Self {
        let search = Self::new();
        let mut next_id = 1;
        for &size in sizes {
            let page = (0..size)
                .map(|_| {
                    let id = next_id;
                    next_id += 1;
                    sample_product(id, &format!("Product {id}"))
                })
                .collect();
            search.push_page(page);
        }
        search
    }

    pub fn push_page(&self, page: Vec<Product>) {
        self.push(Ok(page));
    }

    pub fn push_error(&self, error: SearchError) {
        self.push(Err(error));
    }

    fn push(&self, response: Result<Vec<Product>, SearchError>) {
        if let Ok(mut responses) = self.responses.lock() {
            responses.push_back(response);
        }
    }

    /// Queries received so far, in call order.
    #[must_use]
    pub fn calls(&self) -> Vec<SearchQuery> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl ProductSearchPort for ScriptedSearch {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Product>, SearchError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(query.clone());
        }
        let next = self
            .responses
            .lock()
            .ok()
            .and_then(|mut responses| responses.pop_front());
        next.unwrap_or_else(|| Ok(Vec::new()))
    }
}

/// Fails every search with a server error.
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingSearch;

impl ProductSearchPort for FailingSearch {
    async fn search(&self, _query: &SearchQuery) -> Result<Vec<Product>, SearchError> {
        Err(server_error())
    }
}

/// A 500 response as the HTTP adapter reports it.
#[must_use]
pub fn server_error() -> SearchError {
    SearchError::Status {
        status: 500,
        body: "Internal Server Error".to_string(),
    }
}

/// A product with two priced variants, ids `id * 100 + 1` and `id * 100 + 2`.
#[must_use]
pub fn sample_product(id: i64, title: &str) -> Product {
    Product {
        id: ProductId::new(id),
        title: title.to_string(),
        image: None,
        variants: vec![
            sample_variant(id * 100 + 1, "Small", "19.99"),
            sample_variant(id * 100 + 2, "Large", "24.99"),
        ],
    }
}

#[must_use]
pub fn sample_variant(id: i64, title: &str, price: &str) -> Variant {
    Variant {
        id: VariantId::new(id),
        title: title.to_string(),
        price: Some(price.to_string()),
        inventory_quantity: Some(10),
    }
}
