//! One-off product search against the live API.
//!
//! # Environment Variables
//!
//! - `PICKER_API_BASE_URL` - Commerce API base URL
//! - `PICKER_API_KEY` - API key sent as `x-api-key`
//! - `PICKER_PAGE_LIMIT` - Default page size

use product_picker::{HttpProductSearch, PickerConfig, ProductSearchPort, SearchQuery};
use tracing::info;

/// Search the catalog and log one line per product and variant.
///
/// # Errors
///
/// Returns an error if configuration is missing or invalid, or the search
/// request fails.
pub async fn run(term: &str, page: u32, limit: Option<u32>) -> Result<(), Box<dyn std::error::Error>> {
    let config = PickerConfig::from_env()?;
    let limit = limit.unwrap_or(config.settings().page_limit);
    let client = HttpProductSearch::new(&config)?;

    let query = SearchQuery::new(term, page, limit);
    info!(url = %client.search_url(&query), "Searching products");

    let products = client.search(&query).await?;

    info!("Found {} products", products.len());
    for product in &products {
        info!("  [{}] {}", product.id, product.title);
        for variant in &product.variants {
            info!(
                "      [{}] {} - {}",
                variant.id,
                variant.title,
                variant.price.as_deref().unwrap_or("n/a")
            );
        }
    }
    if products.len() >= limit as usize {
        info!("More results may be available on page {}", page + 1);
    }

    Ok(())
}
