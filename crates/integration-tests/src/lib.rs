//! Scenario tests for the product picker engine.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p product-picker-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `picker_commit` - Multi-add commit, pre-selection, row order
//! - `picker_discounts` - Discount lifecycle and retention across commits
//! - `picker_search` - Pagination, debounce, stale responses, failures
//!
//! Every test drives `PickerController` through its public API with the fake
//! search ports from `product_picker::testing`. Nothing reads the
//! environment or touches the network.
