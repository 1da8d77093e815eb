//! Product Picker Core - Shared types library.
//!
//! This crate provides the data model shared by the picker engine and its
//! command-line driver:
//! - `picker` - Row list, selection, search cache and controller
//! - `cli` - Command-line tools for searching and scripted sessions
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O, no HTTP clients.
//! This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Type-safe IDs, id generators, products, discounts and rows

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
