//! Core types for the product picker.
//!
//! This module provides type-safe wrappers for the picker's domain concepts.

pub mod discount;
pub mod id;
pub mod product;
pub mod row;

pub use discount::{Discount, DiscountKind, ParseDiscountKindError};
pub use id::*;
pub use product::{Product, ProductImage, SearchResult, Variant};
pub use row::RowEntry;
