//! Paginated search results for the picker modal.
//!
//! The cache never performs I/O itself. It hands out [`PageRequest`]s and
//! accepts their outcomes through [`SearchResultCache::apply`]. Every request
//! carries a sequence number; only the outcome of the most recently issued
//! request is applied, so a slow response can never overwrite newer state.

use product_picker_core::Product;
use tracing::{debug, error};

use super::{SearchError, SearchQuery};

/// How a fetched page is merged into the result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Fresh search: the page replaces all results.
    Replace,
    /// Next page: the page is appended.
    Append,
}

/// A search request issued by the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Issue order; only the latest is applied.
    pub seq: u64,
    pub query: SearchQuery,
    pub mode: FetchMode,
}

/// Scroll geometry of the result list, in layout units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollViewport {
    pub scroll_top: f64,
    pub client_height: f64,
    pub scroll_height: f64,
}

impl ScrollViewport {
    /// Whether the viewport's bottom edge is within `threshold` of the
    /// content's bottom edge.
    #[must_use]
    pub fn is_near_bottom(&self, threshold: f64) -> bool {
        self.scroll_top + self.client_height >= self.scroll_height - threshold
    }
}

/// What applying a page outcome did to the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageOutcome {
    /// Results replaced by a fresh page of `count` products.
    Replaced { count: usize },
    /// `count` products appended.
    Appended { count: usize },
    /// A fresh search failed; results cleared.
    Cleared,
    /// A next-page fetch failed; earlier pages kept.
    Kept,
    /// Superseded by a newer request or a reset; ignored.
    Stale,
}

/// Appendable result set keyed by (term, page).
#[derive(Debug, Clone)]
pub struct SearchResultCache {
    limit: u32,
    term: String,
    /// Last page requested for `term`; 0 before anything was requested.
    page: u32,
    results: Vec<Product>,
    loading: bool,
    has_more: bool,
    latest_seq: u64,
}

impl SearchResultCache {
    #[must_use]
    pub const fn new(limit: u32) -> Self {
        Self {
            limit,
            term: String::new(),
            page: 0,
            results: Vec::new(),
            loading: false,
            has_more: true,
            latest_seq: 0,
        }
    }

    #[must_use]
    pub fn results(&self) -> &[Product] {
        &self.results
    }

    /// Term of the current result set.
    #[must_use]
    pub fn term(&self) -> &str {
        &self.term
    }

    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    fn issue(&mut self, mode: FetchMode) -> PageRequest {
        self.latest_seq += 1;
        self.loading = true;
        PageRequest {
            seq: self.latest_seq,
            query: SearchQuery::new(self.term.clone(), self.page, self.limit),
            mode,
        }
    }

    /// Start a fresh search for `term` at page 1.
    ///
    /// Supersedes any request still in flight.
    pub fn begin_search(&mut self, term: impl Into<String>) -> PageRequest {
        self.term = term.into();
        self.page = 1;
        let request = self.issue(FetchMode::Replace);
        debug!(seq = request.seq, term = %self.term, "search issued");
        request
    }

    /// Request the next page, unless a request is in flight or the last
    /// page was short.
    pub fn next_page(&mut self) -> Option<PageRequest> {
        if self.loading || !self.has_more {
            return None;
        }
        self.page += 1;
        let request = self.issue(FetchMode::Append);
        debug!(seq = request.seq, page = self.page, "next page issued");
        Some(request)
    }

    /// Request the next page if the list was scrolled close to its end.
    pub fn on_scroll(&mut self, viewport: ScrollViewport, threshold: f64) -> Option<PageRequest> {
        if !viewport.is_near_bottom(threshold) {
            return None;
        }
        self.next_page()
    }

    /// Merge the outcome of `request` into the cache.
    ///
    /// Failures are logged, never stored: a failed fresh search clears the
    /// results, a failed next page keeps them and rewinds so the page can be
    /// requested again.
    pub fn apply(
        &mut self,
        request: &PageRequest,
        outcome: Result<Vec<Product>, SearchError>,
    ) -> PageOutcome {
        if request.seq != self.latest_seq {
            debug!(
                seq = request.seq,
                latest = self.latest_seq,
                "discarding stale search response"
            );
            return PageOutcome::Stale;
        }
        self.loading = false;

        match outcome {
            Ok(page) => {
                let count = page.len();
                // A full page (or an oversized one) means more may follow.
                self.has_more = count >= self.limit as usize;
                match request.mode {
                    FetchMode::Replace => {
                        self.results = page;
                        PageOutcome::Replaced { count }
                    }
                    FetchMode::Append => {
                        self.results.extend(page);
                        PageOutcome::Appended { count }
                    }
                }
            }
            Err(err) => {
                error!(
                    error = %err,
                    term = %request.query.term,
                    page = request.query.page,
                    "Error fetching products"
                );
                self.page = request.query.page.saturating_sub(1);
                match request.mode {
                    FetchMode::Replace => {
                        self.results.clear();
                        PageOutcome::Cleared
                    }
                    FetchMode::Append => PageOutcome::Kept,
                }
            }
        }
    }

    /// Clear results and return to page 1 with more pages assumed.
    ///
    /// In-flight requests become stale.
    pub fn reset(&mut self) {
        self.latest_seq += 1;
        self.term.clear();
        self.page = 1;
        self.results.clear();
        self.loading = false;
        self.has_more = true;
    }
}
