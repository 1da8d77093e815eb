//! Product search: the injected port, its adapters, and the modal's result
//! cache.
//!
//! # Architecture
//!
//! - [`ProductSearchPort`] is the only way the engine reaches the network
//! - [`HttpProductSearch`] talks to the commerce API with `reqwest`
//! - [`InMemoryCatalog`] serves fixtures for tests and offline sessions
//! - [`SearchResultCache`] holds the paginated results for the open modal
//! - [`Debouncer`] gates keystrokes behind a quiet period
//!
//! No retry and no response caching happen at this layer.

mod cache;
mod catalog;
mod client;
mod debounce;

pub use cache::{FetchMode, PageOutcome, PageRequest, ScrollViewport, SearchResultCache};
pub use catalog::InMemoryCatalog;
pub use client::HttpProductSearch;
pub use debounce::Debouncer;

use std::future::Future;

use product_picker_core::Product;
use thiserror::Error;

/// Errors returned by a [`ProductSearchPort`].
#[derive(Debug, Error)]
pub enum SearchError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success response from the search endpoint.
    #[error("search API returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// First part of the response body.
        body: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Endpoint URL could not be built.
    #[error("invalid search URL: {0}")]
    Url(#[from] url::ParseError),

    /// API key is not a valid header value.
    #[error("invalid API key header: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),
}

/// One page of a product search.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchQuery {
    /// Search term, may be empty.
    pub term: String,
    /// 1-based page number.
    pub page: u32,
    /// Page size.
    pub limit: u32,
}

impl SearchQuery {
    #[must_use]
    pub fn new(term: impl Into<String>, page: u32, limit: u32) -> Self {
        Self {
            term: term.into(),
            page,
            limit,
        }
    }
}

/// Remote product search, injected into the picker controller.
pub trait ProductSearchPort {
    /// Fetch one page of products matching `query.term`.
    ///
    /// A page shorter than `query.limit` means no further pages exist.
    fn search(
        &self,
        query: &SearchQuery,
    ) -> impl Future<Output = Result<Vec<Product>, SearchError>> + Send;
}
