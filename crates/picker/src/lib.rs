//! Product Picker - selection and discount state engine.
//!
//! Drives the merchant-facing product picker: an ordered list of product
//! rows, a modal that searches the catalog with debounce and infinite
//! scroll, multi-select of products and variants, and per-row discounts.
//!
//! # Architecture
//!
//! - [`controller::PickerController`] owns all state and is the only entry
//!   point a UI needs
//! - [`search::ProductSearchPort`] is injected; [`search::HttpProductSearch`]
//!   is the production adapter
//! - Search state is sans-IO: the controller hands out
//!   [`search::PageRequest`]s and accepts their outcomes, so stale responses
//!   are discarded by sequence number
//!
//! # Configuration
//!
//! See [`config::PickerConfig::from_env`] for the environment variables.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod controller;
pub mod discount;
pub mod rows;
pub mod search;
pub mod selection;
pub mod session;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::{ConfigError, PickerConfig, PickerSettings, SelectionIdentity};
pub use controller::PickerController;
pub use discount::{DiscountAction, DiscountEditor, DiscountState};
pub use rows::{DiscountPolicy, ProductRowList};
pub use search::{
    HttpProductSearch, InMemoryCatalog, PageOutcome, PageRequest, ProductSearchPort,
    ScrollViewport, SearchError, SearchQuery,
};
pub use selection::{SelectionEntry, SelectionSet};
pub use session::ModalSession;
