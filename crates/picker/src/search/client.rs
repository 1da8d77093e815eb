//! HTTP adapter for the commerce product search endpoint.
//!
//! Sends `GET {base}{path}?search=&page=&limit=` with the API key in the
//! `x-api-key` header. The response body is a bare JSON array of products
//! (or `null` for no results).

use product_picker_core::Product;
use reqwest::header::{ACCEPT, HeaderMap, HeaderName, HeaderValue};
use tracing::{debug, error, instrument};
use url::Url;

use super::{ProductSearchPort, SearchError, SearchQuery};
use crate::config::PickerConfig;

const API_KEY_HEADER: &str = "x-api-key";

/// Truncate response bodies included in errors and logs.
const MAX_BODY_CHARS: usize = 500;

/// `reqwest`-backed [`ProductSearchPort`].
#[derive(Debug, Clone)]
pub struct HttpProductSearch {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpProductSearch {
    /// Create a client for the endpoint described by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint URL cannot be built, the API key is
    /// not a valid header value, or the HTTP client fails to initialize.
    pub fn new(config: &PickerConfig) -> Result<Self, SearchError> {
        let mut api_key = HeaderValue::from_str(config.expose_api_key())?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(API_KEY_HEADER), api_key);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint_url(&config.api_base_url, &config.search_path)?,
        })
    }

    /// Full request URL for `query`.
    #[must_use]
    pub fn search_url(&self, query: &SearchQuery) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair("search", &query.term)
            .append_pair("page", &query.page.to_string())
            .append_pair("limit", &query.limit.to_string());
        url
    }
}

/// Join `path` onto `base` without dropping any path prefix `base` carries.
fn endpoint_url(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    let base = base.as_str().trim_end_matches('/');
    let path = path.trim_start_matches('/');
    Url::parse(&format!("{base}/{path}"))
}

impl ProductSearchPort for HttpProductSearch {
    #[instrument(skip(self), fields(term = %query.term, page = query.page, limit = query.limit))]
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Product>, SearchError> {
        let response = self.client.get(self.search_url(query)).send().await?;
        let status = response.status();

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            let body: String = body.chars().take(MAX_BODY_CHARS).collect();
            error!(status = %status, body = %body, "Search API returned non-success status");
            return Err(SearchError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let products: Option<Vec<Product>> = match serde_json::from_str(&body) {
            Ok(products) => products,
            Err(e) => {
                error!(
                    error = %e,
                    body = %body.chars().take(MAX_BODY_CHARS).collect::<String>(),
                    "Failed to parse search response"
                );
                return Err(SearchError::Parse(e));
            }
        };

        let products = products.unwrap_or_default();
        debug!(count = products.len(), "search page received");
        Ok(products)
    }
}
